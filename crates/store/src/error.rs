//! Error types for the store crate.
//!
//! Every store operation reports failures through [`StoreError`]. The three
//! variants line up one-to-one with [`ErrorKind`], which is what adapters
//! match on when they translate a failure into a response.

use std::path::PathBuf;

use thiserror::Error;

/// Failures produced by the entity tables and their relation indices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Input the store itself refuses (self-friendship, zero-sized queries)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced id does not exist in the relevant table
    ///
    /// `entity` names the table ("user" or "film") so callers that touch
    /// both tables can tell which side of a pair was missing.
    #[error("{entity} with id={id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// A uniqueness invariant would be violated
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
}

impl ErrorKind {
    /// HTTP status an adapter should answer with for this kind of failure.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
        }
    }
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        StoreError::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Conflict(_) => ErrorKind::Conflict,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or applying a seed snapshot
#[derive(Error, Debug)]
pub enum SeedError {
    /// Seed file could not be read
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Seed document is not valid JSON for the expected shape
    #[error("Malformed seed document: {0}")]
    Json(#[from] serde_json::Error),

    /// A relation in the seed points at a record the seed does not define
    #[error("Missing reference: {entity} with seed id {id}")]
    MissingReference { entity: &'static str, id: u64 },

    /// Two records of the same kind share a seed id
    #[error("Duplicate {entity} seed id {id}")]
    DuplicateId { entity: &'static str, id: u64 },

    /// The store rejected a seeded record or relation
    #[error(transparent)]
    Store(#[from] StoreError),
}
