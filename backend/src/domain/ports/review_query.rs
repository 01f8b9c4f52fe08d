//! Driving port for review reads.

use async_trait::async_trait;

use crate::domain::{Error, MovieId, Principal, Review, ReviewCapabilities};

/// Request payload for listing a movie's reviews.
#[derive(Debug, Clone)]
pub struct ListMovieReviewsRequest {
    /// The movie whose reviews are listed.
    pub movie_id: MovieId,
    /// Authenticated viewer, if any; drives the capability flags.
    pub viewer: Option<Principal>,
}

/// A review decorated with the viewer's capability flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewWithCapabilities {
    pub review: Review,
    pub capabilities: ReviewCapabilities,
}

/// A review decorated with its movie's title for the moderation listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationReview {
    pub review: Review,
    /// Title of the reviewed movie, or `"unknown"` when the lookup fails.
    pub movie_title: String,
}

/// Port for review reads, implemented by the review service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// A movie's reviews, newest first, with per-review capability flags.
    /// Open to anonymous callers.
    async fn list_for_movie(
        &self,
        request: ListMovieReviewsRequest,
    ) -> Result<Vec<ReviewWithCapabilities>, Error>;

    /// Every review, newest first, decorated with movie titles. Admin only.
    async fn list_all(&self, principal: Principal) -> Result<Vec<ModerationReview>, Error>;
}
