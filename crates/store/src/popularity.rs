//! Popularity ranking over like counts.
//!
//! ## Algorithm
//! 1. Pair every film id with the size of its like set
//! 2. Sort by like count descending, then by film id ascending
//! 3. Keep the first `count` entries
//!
//! The id tie-break makes the ranking a total order, so two films with the
//! same number of likes always come out oldest first.

use std::cmp::Reverse;

use crate::types::FilmId;

/// A film id together with its like count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked {
    pub film_id: FilmId,
    pub likes: usize,
}

impl Ranked {
    pub fn new(film_id: FilmId, likes: usize) -> Self {
        Self { film_id, likes }
    }
}

/// Rank `entries` and return at most `count` of them, most liked first.
pub fn rank(entries: impl IntoIterator<Item = Ranked>, count: usize) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = entries.into_iter().collect();
    if count == 0 {
        return Vec::new();
    }

    let key = |r: &Ranked| (Reverse(r.likes), r.film_id);
    if count < ranked.len() {
        // Partition so only the head needs a full sort
        ranked.select_nth_unstable_by_key(count - 1, key);
        ranked.truncate(count);
    }
    ranked.sort_unstable_by_key(key);
    ranked
}
