//! Seed snapshots: a JSON document describing users, films, and the
//! relations between them, used to bootstrap an empty store.
//!
//! Ids inside a seed are local to the document. Relations refer to records
//! by those seed ids; whoever applies the seed maps them to the ids the
//! stores actually assign.
//!
//! ```json
//! {
//!   "users": [{"id": 1, "email": "a@b.c", "login": "a", "birthday": "1990-01-01"}],
//!   "films": [{"id": 1, "name": "Heat", "releaseDate": "1995-12-15", "duration": 170}],
//!   "friendships": [{"userId": 1, "friendId": 2}],
//!   "likes": [{"filmId": 1, "userId": 1}]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SeedError;
use crate::types::{Film, FilmId, User, UserId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub films: Vec<Film>,
    #[serde(default)]
    pub friendships: Vec<Friendship>,
    #[serde(default)]
    pub likes: Vec<Like>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    pub user_id: UserId,
    pub friend_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub film_id: FilmId,
    pub user_id: UserId,
}

impl Seed {
    /// Read and validate a seed file
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let text = fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a seed document
    pub fn from_json(text: &str) -> Result<Self, SeedError> {
        let seed: Seed = serde_json::from_str(text)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Check that seed ids are unique per kind and that every relation
    /// points at a user or film the seed defines.
    pub fn validate(&self) -> Result<(), SeedError> {
        let users = unique_ids("user", self.users.iter().map(|u| u.id))?;
        let films = unique_ids("film", self.films.iter().map(|f| f.id))?;

        let require_user = |id: UserId| {
            if users.contains(&id) {
                Ok(())
            } else {
                Err(SeedError::MissingReference { entity: "user", id })
            }
        };

        for friendship in &self.friendships {
            require_user(friendship.user_id)?;
            require_user(friendship.friend_id)?;
        }
        for like in &self.likes {
            if !films.contains(&like.film_id) {
                return Err(SeedError::MissingReference {
                    entity: "film",
                    id: like.film_id,
                });
            }
            require_user(like.user_id)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.films.is_empty()
    }
}

fn unique_ids(
    entity: &'static str,
    ids: impl Iterator<Item = u64>,
) -> Result<HashSet<u64>, SeedError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SeedError::DuplicateId { entity, id });
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"{
        "users": [
            {"id": 10, "email": "a@mail.test", "login": "a", "birthday": "1990-01-01"},
            {"id": 20, "email": "b@mail.test", "login": "b", "name": "Bee", "birthday": "1991-02-02"}
        ],
        "films": [
            {"id": 1, "name": "Heat", "description": "", "releaseDate": "1995-12-15", "duration": 170}
        ],
        "friendships": [{"userId": 10, "friendId": 20}],
        "likes": [{"filmId": 1, "userId": 20}]
    }"#;

    #[test]
    fn test_parse_seed() {
        let seed = Seed::from_json(SEED).unwrap();
        assert_eq!(seed.users.len(), 2);
        assert_eq!(seed.films[0].duration, 170);
        assert_eq!(seed.friendships, vec![Friendship { user_id: 10, friend_id: 20 }]);
        assert_eq!(seed.likes, vec![Like { film_id: 1, user_id: 20 }]);
    }

    #[test]
    fn test_sections_are_optional() {
        let seed = Seed::from_json("{}").unwrap();
        assert!(seed.is_empty());
    }

    #[test]
    fn test_dangling_like_rejected() {
        let text = SEED.replace(r#""filmId": 1"#, r#""filmId": 2"#);
        match Seed::from_json(&text) {
            Err(SeedError::MissingReference { entity, id }) => {
                assert_eq!(entity, "film");
                assert_eq!(id, 2);
            }
            other => panic!("expected missing film, got {:?}", other),
        }
    }

    #[test]
    fn test_dangling_friend_rejected() {
        let text = SEED.replace(r#""friendId": 20"#, r#""friendId": 30"#);
        assert!(matches!(
            Seed::from_json(&text),
            Err(SeedError::MissingReference { entity: "user", id: 30 })
        ));
    }

    #[test]
    fn test_duplicate_user_id_rejected() {
        let text = SEED.replace(r#""id": 20"#, r#""id": 10"#);
        assert!(matches!(
            Seed::from_json(&text),
            Err(SeedError::DuplicateId { entity: "user", id: 10 })
        ));
    }

    #[test]
    fn test_duplicate_film_id_rejected() {
        let mut seed = Seed::from_json(SEED).unwrap();
        let mut copy = seed.films[0].clone();
        copy.name = "Heat (director's cut)".to_string();
        seed.films.push(copy);

        assert!(matches!(
            seed.validate(),
            Err(SeedError::DuplicateId { entity: "film", id: 1 })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Seed::from_json("{"), Err(SeedError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Seed::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }
}
