//! Port for review storage keyed by `(movie, author)`.

use async_trait::async_trait;

use crate::domain::{MovieId, Review, ReviewKey};

/// Largest number of keys a single [`ReviewStore::delete_batch`] call
/// accepts.
pub const DELETE_BATCH_MAX: usize = 25;

/// Errors raised by review store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewStoreError {
    /// A batch delete exceeded [`DELETE_BATCH_MAX`] keys.
    #[error("delete batch of {got} keys exceeds the {max} key limit")]
    BatchTooLarge { max: usize, got: usize },
    /// Query or mutation failed during execution.
    #[error("review store query failed: {message}")]
    Query { message: String },
}

impl ReviewStoreError {
    /// Construct a [`ReviewStoreError::BatchTooLarge`].
    #[must_use]
    pub fn batch_too_large(got: usize) -> Self {
        Self::BatchTooLarge {
            max: DELETE_BATCH_MAX,
            got,
        }
    }

    /// Construct a [`ReviewStoreError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for review persistence adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Fetch a review by composite key.
    async fn find_by_key(&self, key: &ReviewKey) -> Result<Option<Review>, ReviewStoreError>;

    /// Insert or overwrite the review at its composite key.
    async fn put(&self, review: &Review) -> Result<(), ReviewStoreError>;

    /// Delete the review at a composite key; deleting an absent record is a
    /// no-op.
    async fn delete(&self, key: &ReviewKey) -> Result<(), ReviewStoreError>;

    /// Range query: every review for one movie.
    async fn list_for_movie(&self, movie_id: &MovieId) -> Result<Vec<Review>, ReviewStoreError>;

    /// Read every review record.
    async fn scan(&self) -> Result<Vec<Review>, ReviewStoreError>;

    /// Delete up to [`DELETE_BATCH_MAX`] reviews in one call. Fails without
    /// side effects when the batch is oversized.
    async fn delete_batch(&self, keys: &[ReviewKey]) -> Result<(), ReviewStoreError>;
}
