//! Movie catalogue domain service.
//!
//! Implements the catalogue driving ports on top of the movie and review
//! store ports: admin-gated create and cascading delete, plus the anonymous
//! read operations.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CatalogueCommand, CatalogueQuery, CreateMovieRequest, DeleteMovieRequest, MovieStore,
    MovieStoreError, MovieSummary, ReviewStore, ReviewStoreError, DELETE_BATCH_MAX,
};
use crate::domain::{Error, Movie, MovieId, MovieValidationError};

pub(crate) fn map_movie_store_error(error: MovieStoreError) -> Error {
    match error {
        MovieStoreError::AlreadyExists { .. } => Error::conflict("Conflict detected"),
        MovieStoreError::Query { message } => {
            Error::internal(format!("movie store error: {message}"))
        }
    }
}

pub(crate) fn map_review_store_error(error: ReviewStoreError) -> Error {
    Error::internal(format!("review store error: {error}"))
}

fn map_validation_error(error: MovieValidationError) -> Error {
    let field = match error {
        MovieValidationError::EmptyTitle => "title",
        MovieValidationError::EmptyPosterUrl => "posterUrl",
        MovieValidationError::EmptyDescription => "description",
        MovieValidationError::YearTooEarly { .. } => "year",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

/// Catalogue service implementing the command and query driving ports.
#[derive(Clone)]
pub struct CatalogueService<M, R> {
    movie_store: Arc<M>,
    review_store: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<M, R> CatalogueService<M, R> {
    /// Create a new catalogue service over the store ports.
    pub fn new(movie_store: Arc<M>, review_store: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            movie_store,
            review_store,
            clock,
        }
    }
}

#[async_trait]
impl<M, R> CatalogueCommand for CatalogueService<M, R>
where
    M: MovieStore,
    R: ReviewStore,
{
    async fn create_movie(&self, request: CreateMovieRequest) -> Result<Movie, Error> {
        request.principal.require_admin()?;

        let movie = Movie::create(MovieId::random(), request.draft, self.clock.utc())
            .map_err(map_validation_error)?;

        self.movie_store
            .insert_new(&movie)
            .await
            .map_err(map_movie_store_error)?;

        info!(movie_id = %movie.id(), title = movie.title(), "movie created");
        Ok(movie)
    }

    async fn delete_movie(&self, request: DeleteMovieRequest) -> Result<(), Error> {
        request.principal.require_admin()?;

        let movie_id = request.movie_id;
        self.movie_store
            .find_by_id(&movie_id)
            .await
            .map_err(map_movie_store_error)?
            .ok_or_else(|| Error::not_found("Movie not found"))?;

        let keys = self
            .review_store
            .list_for_movie(&movie_id)
            .await
            .map_err(map_review_store_error)?
            .iter()
            .map(|review| review.key())
            .collect::<Vec<_>>();

        // All batches run concurrently and all must succeed before the movie
        // record is removed; a failed batch leaves the movie in place so a
        // retry of this call reconciles the remaining reviews.
        let batches = keys
            .chunks(DELETE_BATCH_MAX)
            .map(|chunk| self.review_store.delete_batch(chunk));
        try_join_all(batches).await.map_err(map_review_store_error)?;

        self.movie_store
            .delete(&movie_id)
            .await
            .map_err(map_movie_store_error)?;

        info!(movie_id = %movie_id, reviews = keys.len(), "movie deleted");
        Ok(())
    }
}

#[async_trait]
impl<M, R> CatalogueQuery for CatalogueService<M, R>
where
    M: MovieStore,
    R: ReviewStore,
{
    async fn list_movies(&self) -> Result<Vec<MovieSummary>, Error> {
        let mut movies = self
            .movie_store
            .scan()
            .await
            .map_err(map_movie_store_error)?;
        movies.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(movies.iter().map(MovieSummary::from).collect())
    }

    async fn get_movie(&self, movie_id: MovieId) -> Result<Movie, Error> {
        self.movie_store
            .find_by_id(&movie_id)
            .await
            .map_err(map_movie_store_error)?
            .ok_or_else(|| Error::not_found("Movie not found"))
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
