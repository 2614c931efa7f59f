//! Core record types owned by the store.
//!
//! The field names and serde attributes here are the wire shapes adapters
//! pass through untouched:
//! - Film: `{id, name, description, releaseDate, duration}`
//! - User: `{id, email, login, name, birthday}`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::table::Entity;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier assigned to a user by the user directory (starts at 1)
pub type UserId = u64;

/// Identifier assigned to a film by the film catalog (starts at 1)
pub type FilmId = u64;

// =============================================================================
// User
// =============================================================================

/// An account.
///
/// `id` is ignored on create (the directory assigns it) and required on
/// update. A blank `name` is replaced by `login` whenever the record is
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: UserId,
    pub email: String,
    pub login: String,
    #[serde(default)]
    pub name: String,
    pub birthday: NaiveDate,
}

impl User {
    /// Build an unsaved user; `name` may be empty.
    pub fn new(
        email: impl Into<String>,
        login: impl Into<String>,
        name: impl Into<String>,
        birthday: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            email: email.into(),
            login: login.into(),
            name: name.into(),
            birthday,
        }
    }

    /// Returns the user with its display name defaulted to the login.
    pub fn with_display_name(mut self) -> Self {
        if self.name.trim().is_empty() {
            self.name = self.login.clone();
        }
        self
    }

    /// Email folded for case-insensitive uniqueness checks
    pub(crate) fn email_key(&self) -> String {
        self.email.to_lowercase()
    }
}

impl Entity for User {
    const KIND: &'static str = "user";

    fn id(&self) -> u64 {
        self.id
    }

    fn assign_id(&mut self, id: u64) {
        self.id = id;
    }
}

// =============================================================================
// Film
// =============================================================================

/// A catalog entry. Duration is in minutes.
///
/// Likes are not part of the record; the catalog keeps them in its like
/// index and exposes them through `likes_of`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    #[serde(default)]
    pub id: FilmId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: u32,
}

impl Film {
    /// Build an unsaved film
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        release_date: NaiveDate,
        duration: u32,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            release_date,
            duration,
        }
    }
}

impl Entity for Film {
    const KIND: &'static str = "film";

    fn id(&self) -> u64 {
        self.id
    }

    fn assign_id(&mut self, id: u64) {
        self.id = id;
    }
}
