//! Applying seed snapshots through the service.
//!
//! Records are created with the normal operations, so seeded data passes the
//! same uniqueness and existence rules as live traffic. Seed ids are mapped
//! to the ids the stores hand out.

use std::collections::HashMap;

use store::{FilmId, Seed, SeedError, UserId};
use tracing::info;

use crate::relations::RelationService;

/// What a seed added to the stores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub films: usize,
    pub friendships: usize,
    pub likes: usize,
}

impl RelationService {
    /// Create every record and relation in `seed`.
    ///
    /// Stops at the first rejected record; anything created before it stays.
    pub fn apply_seed(&self, seed: &Seed) -> Result<SeedReport, SeedError> {
        seed.validate()?;

        let mut user_ids: HashMap<UserId, UserId> = HashMap::new();
        for user in &seed.users {
            let created = self.create_user(user.clone())?;
            user_ids.insert(user.id, created.id);
        }

        let mut film_ids: HashMap<FilmId, FilmId> = HashMap::new();
        for film in &seed.films {
            let created = self.create_film(film.clone())?;
            film_ids.insert(film.id, created.id);
        }

        let user_id = |seed_id: UserId| {
            user_ids
                .get(&seed_id)
                .copied()
                .ok_or(SeedError::MissingReference { entity: "user", id: seed_id })
        };

        for friendship in &seed.friendships {
            self.friend(user_id(friendship.user_id)?, user_id(friendship.friend_id)?)?;
        }
        for like in &seed.likes {
            let film_id = film_ids
                .get(&like.film_id)
                .copied()
                .ok_or(SeedError::MissingReference { entity: "film", id: like.film_id })?;
            self.like_film(film_id, user_id(like.user_id)?)?;
        }

        let report = SeedReport {
            users: seed.users.len(),
            films: seed.films.len(),
            friendships: seed.friendships.len(),
            likes: seed.likes.len(),
        };
        info!(
            "Applied seed: {} users, {} films, {} friendships, {} likes",
            report.users, report.films, report.friendships, report.likes
        );
        Ok(report)
    }
}
