//! In-memory film catalog: an entity table of films plus the like index.

use parking_lot::RwLock;

use crate::error::Result;
use crate::likes::LikeIndex;
use crate::popularity::{self, Ranked};
use crate::storage::FilmStorage;
use crate::table::EntityTable;
use crate::types::{Film, FilmId, UserId};

/// Films and their likes behind a single lock.
#[derive(Debug, Default)]
pub struct FilmCatalog {
    inner: RwLock<CatalogInner>,
}

#[derive(Debug, Default)]
struct CatalogInner {
    films: EntityTable<Film>,
    likes: LikeIndex,
}

impl CatalogInner {
    fn rank(&self, count: usize) -> Vec<Ranked> {
        let entries = self
            .films
            .iter()
            .map(|film| Ranked::new(film.id, self.likes.count(film.id)));
        popularity::rank(entries, count)
    }
}

impl FilmCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users that like a film (0 for unknown films)
    pub fn like_count(&self, film_id: FilmId) -> usize {
        self.inner.read().likes.count(film_id)
    }

    /// Popularity ranking with like counts attached
    pub fn ranking(&self, count: usize) -> Vec<Ranked> {
        self.inner.read().rank(count)
    }
}

impl FilmStorage for FilmCatalog {
    fn create(&self, film: Film) -> Result<Film> {
        let mut inner = self.inner.write();
        let stored = inner.films.insert(film);
        inner.likes.register(stored.id);
        Ok(stored)
    }

    fn update(&self, film: Film) -> Result<Film> {
        self.inner.write().films.replace(film)
    }

    fn delete(&self, id: FilmId) -> Result<Film> {
        let mut inner = self.inner.write();
        let removed = inner.films.remove(id)?;
        inner.likes.drop_film(id);
        Ok(removed)
    }

    fn find_by_id(&self, id: FilmId) -> Option<Film> {
        self.inner.read().films.get(id).cloned()
    }

    fn find_all(&self) -> Vec<Film> {
        self.inner.read().films.snapshot()
    }

    fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
        let mut inner = self.inner.write();
        inner.films.require(film_id)?;
        inner.likes.add(film_id, user_id);
        Ok(())
    }

    fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
        let mut inner = self.inner.write();
        inner.films.require(film_id)?;
        inner.likes.remove(film_id, user_id);
        Ok(())
    }

    fn forget_user(&self, user_id: UserId) -> usize {
        self.inner.write().likes.forget_user(user_id)
    }

    fn likes_of(&self, film_id: FilmId) -> Result<Vec<UserId>> {
        let inner = self.inner.read();
        inner.films.require(film_id)?;
        Ok(inner.likes.likers(film_id))
    }

    fn popular(&self, count: usize) -> Vec<Film> {
        let inner = self.inner.read();
        inner
            .rank(count)
            .into_iter()
            .filter_map(|ranked| inner.films.get(ranked.film_id).cloned())
            .collect()
    }

    fn len(&self) -> usize {
        self.inner.read().films.len()
    }
}
