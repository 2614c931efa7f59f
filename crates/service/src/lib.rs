//! Service crate for Filmorate.
//!
//! This crate contains the relation service that coordinates the user
//! directory and the film catalog, plus seed application on top of it.

pub mod relations;
pub mod seed;

pub use relations::{DEFAULT_POPULAR_COUNT, RelationService};
pub use seed::SeedReport;
