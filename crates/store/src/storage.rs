//! Storage capability traits.
//!
//! The service layer only talks to these traits, so the in-memory stores in
//! this crate can be replaced by a durable backend without touching it.
//!
//! ## Contract shared by both traits
//! - `find_by_id` never fails; absence is `None`
//! - `find_all` returns an owned snapshot
//! - `update` is a full replace and needs an existing id
//! - `delete` cascades into the relation index owned by the same store
//! - every method is atomic with respect to concurrent callers

use crate::error::Result;
use crate::types::{Film, FilmId, User, UserId};

/// Accounts plus the friendship graph between them.
pub trait UserStorage: Send + Sync {
    /// Store a new user. `Conflict` if the email is taken (case-insensitive).
    fn create(&self, user: User) -> Result<User>;

    /// Replace an existing user. `NotFound` for an unknown id, `Conflict` if
    /// the email belongs to a different user.
    fn update(&self, user: User) -> Result<User>;

    /// Remove a user and every friendship edge touching it
    fn delete(&self, id: UserId) -> Result<User>;

    fn find_by_id(&self, id: UserId) -> Option<User>;

    fn find_all(&self) -> Vec<User>;

    /// Make two users friends in both directions.
    ///
    /// `Validation` when `user_id == friend_id`, `NotFound` if either user is
    /// missing. Adding an existing edge is a no-op.
    fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<()>;

    /// Remove a friendship in both directions. A missing edge is a no-op;
    /// a missing user is `NotFound`.
    fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> Result<()>;

    /// Friend ids of a user, ascending
    fn friend_ids(&self, user_id: UserId) -> Result<Vec<UserId>>;

    /// Friends of a user resolved to records, ascending by id
    fn friends(&self, user_id: UserId) -> Result<Vec<User>>;

    /// Users that are friends of both, ascending by id
    fn common_friends(&self, user_id: UserId, other_id: UserId) -> Result<Vec<User>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Films plus the like index over them.
///
/// The catalog does not know about users; callers check that a liking user
/// exists before calling [`add_like`](FilmStorage::add_like).
pub trait FilmStorage: Send + Sync {
    /// Store a new film. Titles are not required to be unique.
    fn create(&self, film: Film) -> Result<Film>;

    fn update(&self, film: Film) -> Result<Film>;

    /// Remove a film and discard its like set
    fn delete(&self, id: FilmId) -> Result<Film>;

    fn find_by_id(&self, id: FilmId) -> Option<Film>;

    fn find_all(&self) -> Vec<Film>;

    /// Record that a user likes a film. Idempotent; `NotFound` if the film is
    /// missing.
    fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<()>;

    /// Withdraw a like. Removing an absent like is a no-op; `NotFound` if the
    /// film is missing.
    fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<()>;

    /// Remove a user's likes from every film, returning how many were dropped
    fn forget_user(&self, user_id: UserId) -> usize;

    /// Users that like a film, ascending
    fn likes_of(&self, film_id: FilmId) -> Result<Vec<UserId>>;

    /// Up to `count` films, most liked first, ties by ascending id
    fn popular(&self, count: usize) -> Vec<Film>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
