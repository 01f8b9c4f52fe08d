//! Driving port for review mutations.

use async_trait::async_trait;

use crate::domain::{Error, MovieId, Principal, RatingAggregate, Review, UserId};

/// Request payload for creating or editing the caller's review of a movie.
#[derive(Debug, Clone)]
pub struct UpsertReviewRequest {
    /// Acting principal; the review is keyed by its subject id.
    pub principal: Principal,
    /// The reviewed movie.
    pub movie_id: MovieId,
    /// Raw rating value, validated against the 1..=5 range.
    pub rating: i64,
    /// Raw comment text, validated non-empty after trimming.
    pub comment: String,
}

/// Outcome of a review upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertReviewResponse {
    /// The review as written.
    pub review: Review,
    /// The movie's aggregate after the write.
    pub aggregate: RatingAggregate,
    /// Whether a new review was created (`false` means an edit).
    pub created: bool,
}

/// Request payload for deleting a review.
#[derive(Debug, Clone)]
pub struct DeleteReviewRequest {
    /// Acting principal; must be the author or an admin.
    pub principal: Principal,
    /// The reviewed movie.
    pub movie_id: MovieId,
    /// Author of the review being deleted.
    pub reviewer_id: UserId,
}

/// Outcome of a review deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteReviewResponse {
    /// The movie's aggregate after the removal.
    pub aggregate: RatingAggregate,
}

/// Port for review mutations, implemented by the review service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Create or edit the caller's review and recompute the movie aggregate.
    async fn upsert_review(
        &self,
        request: UpsertReviewRequest,
    ) -> Result<UpsertReviewResponse, Error>;

    /// Delete a review and recompute the movie aggregate.
    async fn delete_review(
        &self,
        request: DeleteReviewRequest,
    ) -> Result<DeleteReviewResponse, Error>;
}
