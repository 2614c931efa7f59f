//! # Store Crate
//!
//! In-memory ownership of the two entity kinds (users and films) and the
//! relations layered over them.
//!
//! ## Main Components
//!
//! - **table**: `EntityTable<T>`, the generic owner of one record kind
//! - **users**: `UserDirectory`, users plus the symmetric friend graph
//! - **films**: `FilmCatalog`, films plus the like index and popularity query
//! - **storage**: the `UserStorage` / `FilmStorage` capability traits
//! - **seed**: JSON seed snapshots for bootstrapping
//! - **error**: `StoreError` and its `ErrorKind` classification
//!
//! ## Example Usage
//!
//! ```ignore
//! use store::{FilmCatalog, FilmStorage, Film};
//!
//! let catalog = FilmCatalog::new();
//! let heat = catalog.create(Film::new("Heat", "", release, 170))?;
//! catalog.add_like(heat.id, 1)?;
//! let top = catalog.popular(10);
//! ```
//!
//! Each store guards its table and relation index with one lock, so every
//! method is atomic with respect to other callers of the same store. No
//! method ever takes another store's lock.

pub mod error;
pub mod films;
pub mod friends;
pub mod likes;
pub mod popularity;
pub mod seed;
pub mod storage;
pub mod table;
pub mod types;
pub mod users;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, Result, SeedError, StoreError};
pub use films::FilmCatalog;
pub use popularity::Ranked;
pub use seed::Seed;
pub use storage::{FilmStorage, UserStorage};
pub use table::{Entity, EntityTable};
pub use types::{Film, FilmId, User, UserId};
pub use users::UserDirectory;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rayon::prelude::*;
    use std::collections::HashSet;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1985, 7, 3).unwrap()
    }

    #[test]
    fn test_empty_stores() {
        let users = UserDirectory::new();
        let films = FilmCatalog::new();

        assert!(users.is_empty());
        assert!(films.is_empty());
        assert!(users.find_all().is_empty());
        assert!(films.popular(10).is_empty());
        assert!(users.find_by_id(1).is_none());
        assert!(films.find_by_id(1).is_none());
    }

    #[test]
    fn test_ids_monotonic_under_interleaved_deletes() {
        let films = FilmCatalog::new();
        let mut last = 0;
        for round in 0..20 {
            let film = films.create(Film::new(format!("F{round}"), "", date(), 90)).unwrap();
            assert!(film.id > last);
            last = film.id;
            if round % 3 == 0 {
                films.delete(film.id).unwrap();
            }
        }
    }

    #[test]
    fn test_concurrent_creates_get_distinct_ids() {
        let users = UserDirectory::new();

        let ids: Vec<UserId> = (0..200)
            .into_par_iter()
            .map(|i| {
                users
                    .create(User::new(format!("u{i}@mail.test"), format!("u{i}"), "", date()))
                    .unwrap()
                    .id
            })
            .collect();

        let unique: HashSet<UserId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 200);
        assert_eq!(users.len(), 200);
    }

    #[test]
    fn test_concurrent_duplicate_email_only_one_wins() {
        let users = UserDirectory::new();

        let created = (0..64)
            .into_par_iter()
            .filter(|i| {
                let email = if i % 2 == 0 { "same@mail.test" } else { "SAME@mail.test" };
                users.create(User::new(email, format!("u{i}"), "", date())).is_ok()
            })
            .count();

        assert_eq!(created, 1);
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_concurrent_friend_toggles_stay_symmetric() {
        let users = UserDirectory::new();
        for i in 0..8 {
            users
                .create(User::new(format!("u{i}@mail.test"), format!("u{i}"), "", date()))
                .unwrap();
        }

        (0..2_000u64).into_par_iter().for_each(|i| {
            let a = i % 8 + 1;
            let b = (i * 7 + 3) % 8 + 1;
            if a == b {
                return;
            }
            if i % 3 == 0 {
                users.remove_friend(b, a).unwrap();
            } else {
                users.add_friend(a, b).unwrap();
            }
        });

        for a in 1..=8 {
            for b in users.friend_ids(a).unwrap() {
                assert!(users.friend_ids(b).unwrap().contains(&a));
            }
        }
    }

    #[test]
    fn test_concurrent_likes_count_once_per_user() {
        let films = FilmCatalog::new();
        let film = films.create(Film::new("Crowded", "", date(), 95)).unwrap();

        (0..1_000u64).into_par_iter().for_each(|i| {
            films.add_like(film.id, i % 25).unwrap();
        });

        assert_eq!(films.like_count(film.id), 25);
    }
}
