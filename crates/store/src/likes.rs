//! Per-film set of liking users.
//!
//! A like is set membership, not a counter: the same user liking the same
//! film twice leaves the count unchanged.

use std::collections::{HashMap, HashSet};

use crate::types::{FilmId, UserId};

#[derive(Debug, Clone, Default)]
pub struct LikeIndex {
    likes: HashMap<FilmId, HashSet<UserId>>,
}

impl LikeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, film_id: FilmId) {
        self.likes.entry(film_id).or_default();
    }

    /// Returns `false` when the user already liked the film.
    pub fn add(&mut self, film_id: FilmId, user_id: UserId) -> bool {
        self.likes.entry(film_id).or_default().insert(user_id)
    }

    /// Returns `false` when there was no such like.
    pub fn remove(&mut self, film_id: FilmId, user_id: UserId) -> bool {
        self.likes
            .get_mut(&film_id)
            .is_some_and(|users| users.remove(&user_id))
    }

    /// Discard a film's like set entirely
    pub fn drop_film(&mut self, film_id: FilmId) {
        self.likes.remove(&film_id);
    }

    /// Remove one user's likes from every film. Returns how many were removed.
    pub fn forget_user(&mut self, user_id: UserId) -> usize {
        self.likes
            .values_mut()
            .map(|users| users.remove(&user_id))
            .filter(|removed| *removed)
            .count()
    }

    pub fn count(&self, film_id: FilmId) -> usize {
        self.likes.get(&film_id).map_or(0, HashSet::len)
    }

    /// Liking user ids, ascending
    pub fn likers(&self, film_id: FilmId) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .likes
            .get(&film_id)
            .map(|users| users.iter().copied().collect())
            .unwrap_or_default();
        users.sort_unstable();
        users
    }
}
