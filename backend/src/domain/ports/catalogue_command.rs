//! Driving port for movie catalogue mutations.

use async_trait::async_trait;

use crate::domain::{Error, Movie, MovieDraft, MovieId, Principal};

/// Request payload for creating a movie.
#[derive(Debug, Clone)]
pub struct CreateMovieRequest {
    /// Acting principal; must be an admin.
    pub principal: Principal,
    /// Caller-supplied movie fields, validated by the service.
    pub draft: MovieDraft,
}

/// Request payload for deleting a movie and its reviews.
#[derive(Debug, Clone)]
pub struct DeleteMovieRequest {
    /// Acting principal; must be an admin.
    pub principal: Principal,
    /// Movie to remove.
    pub movie_id: MovieId,
}

/// Port for catalogue mutations, implemented by the catalogue service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Create a movie with a fresh identifier and an empty aggregate.
    async fn create_movie(&self, request: CreateMovieRequest) -> Result<Movie, Error>;

    /// Delete a movie after cascading over its reviews.
    async fn delete_movie(&self, request: DeleteMovieRequest) -> Result<(), Error>;
}
