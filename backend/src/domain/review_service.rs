//! Review domain service: the rating aggregation engine.
//!
//! Keeps a movie's `(rating_sum, rating_count, average_rating)` consistent
//! across review creates, edits, and deletes using only single-key store
//! operations. Aggregate writes are last-writer-wins; there is no
//! compare-and-swap on the store contract, so two concurrent mutations of
//! the same movie's aggregate can lose an increment.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::warn;

use crate::domain::catalogue_service::{map_movie_store_error, map_review_store_error};
use crate::domain::ports::{
    DeleteReviewRequest, DeleteReviewResponse, ListMovieReviewsRequest, ModerationReview,
    MovieStore, ReviewCommand, ReviewQuery, ReviewStore, ReviewWithCapabilities,
    UpsertReviewRequest, UpsertReviewResponse,
};
use crate::domain::{
    Comment, Error, MovieId, Principal, Rating, Review, ReviewCapabilities, ReviewKey,
    ReviewValidationError,
};

/// Title shown for moderation rows whose movie lookup fails.
const UNKNOWN_TITLE: &str = "unknown";

fn map_validation_error(error: ReviewValidationError) -> Error {
    let field = match error {
        ReviewValidationError::RatingOutOfRange { .. } => "rating",
        ReviewValidationError::EmptyComment => "comment",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

/// Review service implementing the command and query driving ports.
#[derive(Clone)]
pub struct ReviewService<M, R> {
    movie_store: Arc<M>,
    review_store: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<M, R> ReviewService<M, R> {
    /// Create a new review service over the store ports.
    pub fn new(movie_store: Arc<M>, review_store: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            movie_store,
            review_store,
            clock,
        }
    }
}

#[async_trait]
impl<M, R> ReviewCommand for ReviewService<M, R>
where
    M: MovieStore,
    R: ReviewStore,
{
    async fn upsert_review(
        &self,
        request: UpsertReviewRequest,
    ) -> Result<UpsertReviewResponse, Error> {
        let rating = Rating::new(request.rating).map_err(map_validation_error)?;
        let comment = Comment::new(&request.comment).map_err(map_validation_error)?;

        let movie = self
            .movie_store
            .find_by_id(&request.movie_id)
            .await
            .map_err(map_movie_store_error)?
            .ok_or_else(|| Error::not_found("Movie not found"))?;

        let key = ReviewKey::new(request.movie_id, *request.principal.subject_id());
        let existing = self
            .review_store
            .find_by_key(&key)
            .await
            .map_err(map_review_store_error)?;

        let now = self.clock.utc();
        let created_at = existing.as_ref().map_or(now, Review::created_at);
        let review = Review::write(
            key,
            request.principal.display_name(),
            rating,
            comment,
            created_at,
            now,
        );

        // The review write lands before the aggregate write and is not
        // rolled back if the aggregate write fails.
        self.review_store
            .put(&review)
            .await
            .map_err(map_review_store_error)?;

        let previous = existing.as_ref().map(Review::rating);
        let aggregate = movie.aggregate().apply_upsert(previous, rating);
        self.movie_store
            .set_aggregate(&request.movie_id, aggregate, now)
            .await
            .map_err(map_movie_store_error)?;

        Ok(UpsertReviewResponse {
            review,
            aggregate,
            created: existing.is_none(),
        })
    }

    async fn delete_review(
        &self,
        request: DeleteReviewRequest,
    ) -> Result<DeleteReviewResponse, Error> {
        // Ownership is checked before any store read so an unauthorised
        // caller learns nothing about the review's existence.
        let is_author = request.principal.subject_id() == &request.reviewer_id;
        if !is_author && !request.principal.is_admin() {
            return Err(Error::forbidden(
                "review deletion requires ownership or admin rights",
            ));
        }

        let key = ReviewKey::new(request.movie_id, request.reviewer_id);
        let review = self
            .review_store
            .find_by_key(&key)
            .await
            .map_err(map_review_store_error)?
            .ok_or_else(|| Error::not_found("Review not found"))?;

        let movie = self
            .movie_store
            .find_by_id(&request.movie_id)
            .await
            .map_err(map_movie_store_error)?
            .ok_or_else(|| Error::not_found("Movie not found"))?;

        self.review_store
            .delete(&key)
            .await
            .map_err(map_review_store_error)?;

        let aggregate = movie.aggregate().apply_removal(review.rating());
        self.movie_store
            .set_aggregate(&request.movie_id, aggregate, self.clock.utc())
            .await
            .map_err(map_movie_store_error)?;

        Ok(DeleteReviewResponse { aggregate })
    }
}

#[async_trait]
impl<M, R> ReviewQuery for ReviewService<M, R>
where
    M: MovieStore,
    R: ReviewStore,
{
    async fn list_for_movie(
        &self,
        request: ListMovieReviewsRequest,
    ) -> Result<Vec<ReviewWithCapabilities>, Error> {
        let mut reviews = self
            .review_store
            .list_for_movie(&request.movie_id)
            .await
            .map_err(map_review_store_error)?;
        reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(reviews
            .into_iter()
            .map(|review| {
                let capabilities =
                    ReviewCapabilities::for_viewer(request.viewer.as_ref(), &review.author_id());
                ReviewWithCapabilities {
                    review,
                    capabilities,
                }
            })
            .collect())
    }

    async fn list_all(&self, principal: Principal) -> Result<Vec<ModerationReview>, Error> {
        principal.require_admin()?;

        let mut reviews = self
            .review_store
            .scan()
            .await
            .map_err(map_review_store_error)?;
        reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let mut titles: HashMap<MovieId, String> = HashMap::new();
        let mut rows = Vec::with_capacity(reviews.len());
        for review in reviews {
            let movie_id = review.movie_id();
            if !titles.contains_key(&movie_id) {
                let title = self.lookup_title(&movie_id).await;
                titles.insert(movie_id, title);
            }
            let movie_title = titles
                .get(&movie_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_TITLE.to_owned());
            rows.push(ModerationReview {
                review,
                movie_title,
            });
        }
        Ok(rows)
    }
}

impl<M, R> ReviewService<M, R>
where
    M: MovieStore,
    R: ReviewStore,
{
    /// One memoised title lookup; a missing movie or a store failure
    /// degrades the row's title rather than failing the listing.
    async fn lookup_title(&self, movie_id: &MovieId) -> String {
        match self.movie_store.find_by_id(movie_id).await {
            Ok(Some(movie)) => movie.title().to_owned(),
            Ok(None) => UNKNOWN_TITLE.to_owned(),
            Err(error) => {
                warn!(movie_id = %movie_id, error = %error, "title lookup failed");
                UNKNOWN_TITLE.to_owned()
            }
        }
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
