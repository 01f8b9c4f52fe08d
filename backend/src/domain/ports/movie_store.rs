//! Port for keyed movie storage.
//!
//! The contract mirrors a keyed document store: single-key reads and writes,
//! a full scan, an existence-conditional insert, and one numeric-field
//! update for the aggregate. There is no multi-record transaction and no
//! compare-and-swap on the aggregate fields.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Movie, MovieId, RatingAggregate};

/// Errors raised by movie store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MovieStoreError {
    /// A conditional insert observed an existing record with the same id.
    #[error("movie {id} already exists")]
    AlreadyExists { id: String },
    /// Query or mutation failed during execution.
    #[error("movie store query failed: {message}")]
    Query { message: String },
}

impl MovieStoreError {
    /// Construct an [`MovieStoreError::AlreadyExists`].
    pub fn already_exists(id: impl Into<String>) -> Self {
        Self::AlreadyExists { id: id.into() }
    }

    /// Construct a [`MovieStoreError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for movie persistence adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Fetch a movie by identifier.
    async fn find_by_id(&self, id: &MovieId) -> Result<Option<Movie>, MovieStoreError>;

    /// Insert a movie only if no record with its id exists.
    async fn insert_new(&self, movie: &Movie) -> Result<(), MovieStoreError>;

    /// Delete a movie record; deleting an absent record is a no-op.
    async fn delete(&self, id: &MovieId) -> Result<(), MovieStoreError>;

    /// Read every movie record.
    async fn scan(&self) -> Result<Vec<Movie>, MovieStoreError>;

    /// Overwrite a movie's aggregate fields and refresh its update
    /// timestamp. This is a plain write: concurrent callers are
    /// last-writer-wins.
    async fn set_aggregate(
        &self,
        id: &MovieId,
        aggregate: RatingAggregate,
        updated_at: DateTime<Utc>,
    ) -> Result<(), MovieStoreError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn already_exists_formats_id() {
        let err = MovieStoreError::already_exists("abc");
        assert_eq!(err.to_string(), "movie abc already exists");
    }

    #[test]
    fn query_error_formats_message() {
        let err = MovieStoreError::query("lock poisoned");
        assert!(err.to_string().contains("lock poisoned"));
    }
}
