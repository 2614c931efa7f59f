//! # Relation Service
//!
//! The facade adapters call. It owns one handle to each store and enforces
//! the rules that span both of them:
//! - a like needs an existing film *and* an existing user
//! - deleting a user also withdraws that user's likes
//!
//! Everything else is forwarded to the store that owns the data. Failures
//! come back as the store's `StoreError` without changing their kind.
//!
//! ## Locking
//! Each store call takes and releases that store's lock on its own. No
//! method here holds one store's lock while calling the other, so the two
//! stores cannot deadlock against each other.
//!
//! `delete_user` removes the user before withdrawing its likes, and
//! `like_film` checks the user again after recording the like. A like that
//! races with the deletion of its user is therefore either withdrawn by
//! `delete_user` or undone by `like_film`.

use std::sync::Arc;

use store::{
    Film, FilmCatalog, FilmId, FilmStorage, Result, StoreError, User, UserDirectory, UserId,
    UserStorage,
};
use tracing::{debug, info, instrument};

/// Number of films returned by a popularity query when the caller gives none
pub const DEFAULT_POPULAR_COUNT: usize = 10;

/// Orchestrates the user directory and the film catalog.
#[derive(Clone)]
pub struct RelationService {
    users: Arc<dyn UserStorage>,
    films: Arc<dyn FilmStorage>,
}

impl RelationService {
    /// Create a service over the given stores
    ///
    /// # Arguments
    /// * `users` - Storage for accounts and friendships
    /// * `films` - Storage for films and likes
    pub fn new(users: Arc<dyn UserStorage>, films: Arc<dyn FilmStorage>) -> Self {
        Self { users, films }
    }

    /// Service backed by fresh, empty in-memory stores
    pub fn in_memory() -> Self {
        Self::new(Arc::new(UserDirectory::new()), Arc::new(FilmCatalog::new()))
    }

    // ========================================================================
    // Films
    // ========================================================================

    pub fn all_films(&self) -> Vec<Film> {
        self.films.find_all()
    }

    /// Look up a film, treating absence as `NotFound`
    pub fn film(&self, id: FilmId) -> Result<Film> {
        self.films
            .find_by_id(id)
            .ok_or_else(|| StoreError::not_found("film", id))
    }

    #[instrument(skip(self, film), fields(name = %film.name))]
    pub fn create_film(&self, film: Film) -> Result<Film> {
        let film = self.films.create(film)?;
        info!("Created film {}", film.id);
        Ok(film)
    }

    #[instrument(skip(self, film), fields(film_id = film.id))]
    pub fn update_film(&self, film: Film) -> Result<Film> {
        let film = self.films.update(film)?;
        debug!("Updated film {}", film.id);
        Ok(film)
    }

    #[instrument(skip(self))]
    pub fn delete_film(&self, id: FilmId) -> Result<Film> {
        let film = self.films.delete(id)?;
        info!("Deleted film {}", id);
        Ok(film)
    }

    /// Record a like after checking that both the film and the user exist.
    ///
    /// The film is checked first, so when both are missing the error names
    /// the film.
    #[instrument(skip(self))]
    pub fn like_film(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
        self.film(film_id)?;
        self.user(user_id)?;
        self.films.add_like(film_id, user_id)?;
        if let Err(err) = self.user(user_id) {
            // Deleted after the first check; its likes may already be withdrawn
            let _ = self.films.remove_like(film_id, user_id);
            return Err(err);
        }
        debug!("User {} likes film {}", user_id, film_id);
        Ok(())
    }

    /// Withdraw a like. The user is checked here; the catalog checks the film.
    #[instrument(skip(self))]
    pub fn unlike_film(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
        self.user(user_id)?;
        self.films.remove_like(film_id, user_id)?;
        debug!("User {} no longer likes film {}", user_id, film_id);
        Ok(())
    }

    /// Users that like a film
    pub fn film_likes(&self, film_id: FilmId) -> Result<Vec<UserId>> {
        self.films.likes_of(film_id)
    }

    /// Most liked films, at most `count` of them. `count` must be at least 1.
    pub fn popular_films(&self, count: usize) -> Result<Vec<Film>> {
        if count == 0 {
            return Err(StoreError::Validation(
                "count must be at least 1".to_string(),
            ));
        }
        Ok(self.films.popular(count))
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub fn all_users(&self) -> Vec<User> {
        self.users.find_all()
    }

    /// Look up a user, treating absence as `NotFound`
    pub fn user(&self, id: UserId) -> Result<User> {
        self.users
            .find_by_id(id)
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    #[instrument(skip(self, user), fields(login = %user.login))]
    pub fn create_user(&self, user: User) -> Result<User> {
        let user = self.users.create(user)?;
        info!("Created user {}", user.id);
        Ok(user)
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub fn update_user(&self, user: User) -> Result<User> {
        let user = self.users.update(user)?;
        debug!("Updated user {}", user.id);
        Ok(user)
    }

    /// Delete a user, its friendships, and its likes.
    #[instrument(skip(self))]
    pub fn delete_user(&self, id: UserId) -> Result<User> {
        let user = self.users.delete(id)?;
        let withdrawn = self.films.forget_user(id);
        info!("Deleted user {} (withdrew {} likes)", id, withdrawn);
        Ok(user)
    }

    #[instrument(skip(self))]
    pub fn friend(&self, user_id: UserId, friend_id: UserId) -> Result<()> {
        self.users.add_friend(user_id, friend_id)?;
        debug!("Users {} and {} are friends", user_id, friend_id);
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn unfriend(&self, user_id: UserId, friend_id: UserId) -> Result<()> {
        self.users.remove_friend(user_id, friend_id)?;
        debug!("Users {} and {} are no longer friends", user_id, friend_id);
        Ok(())
    }

    pub fn friends(&self, user_id: UserId) -> Result<Vec<User>> {
        self.users.friends(user_id)
    }

    pub fn common_friends(&self, user_id: UserId, other_id: UserId) -> Result<Vec<User>> {
        self.users.common_friends(user_id, other_id)
    }

    /// Record counts as `(users, films)`
    pub fn counts(&self) -> (usize, usize) {
        (self.users.len(), self.films.len())
    }
}

impl Default for RelationService {
    fn default() -> Self {
        Self::in_memory()
    }
}
