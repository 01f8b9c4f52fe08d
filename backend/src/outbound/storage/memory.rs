//! In-process keyed document stores.
//!
//! These adapters implement the store ports with exactly the contract the
//! engine assumes of its durable collaborators: single-key get/put/delete,
//! full scans, an existence-conditional insert, and a plain aggregate
//! write. There are no cross-record transactions and no compare-and-swap on
//! the aggregate fields, so the engine's concurrency characteristics are
//! the same against this adapter as against a remote document store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    MovieStore, MovieStoreError, ReviewStore, ReviewStoreError, DELETE_BATCH_MAX,
};
use crate::domain::{Movie, MovieId, RatingAggregate, Review, ReviewKey};

/// Movie store backed by a process-local map.
#[derive(Debug, Default)]
pub struct MemoryMovieStore {
    movies: RwLock<HashMap<MovieId, Movie>>,
}

impl MemoryMovieStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn find_by_id(&self, id: &MovieId) -> Result<Option<Movie>, MovieStoreError> {
        let movies = self
            .movies
            .read()
            .map_err(|_| MovieStoreError::query("movie store lock poisoned"))?;
        Ok(movies.get(id).cloned())
    }

    async fn insert_new(&self, movie: &Movie) -> Result<(), MovieStoreError> {
        let mut movies = self
            .movies
            .write()
            .map_err(|_| MovieStoreError::query("movie store lock poisoned"))?;
        if movies.contains_key(movie.id()) {
            return Err(MovieStoreError::already_exists(movie.id().to_string()));
        }
        movies.insert(*movie.id(), movie.clone());
        Ok(())
    }

    async fn delete(&self, id: &MovieId) -> Result<(), MovieStoreError> {
        let mut movies = self
            .movies
            .write()
            .map_err(|_| MovieStoreError::query("movie store lock poisoned"))?;
        movies.remove(id);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Movie>, MovieStoreError> {
        let movies = self
            .movies
            .read()
            .map_err(|_| MovieStoreError::query("movie store lock poisoned"))?;
        Ok(movies.values().cloned().collect())
    }

    async fn set_aggregate(
        &self,
        id: &MovieId,
        aggregate: RatingAggregate,
        updated_at: DateTime<Utc>,
    ) -> Result<(), MovieStoreError> {
        let mut movies = self
            .movies
            .write()
            .map_err(|_| MovieStoreError::query("movie store lock poisoned"))?;
        // An aggregate write racing a movie delete is dropped, not revived.
        if let Some(movie) = movies.get_mut(id) {
            *movie = movie.clone().with_aggregate(aggregate, updated_at);
        }
        Ok(())
    }
}

/// Review store backed by a process-local map keyed by `(movie, author)`.
#[derive(Debug, Default)]
pub struct MemoryReviewStore {
    reviews: RwLock<HashMap<ReviewKey, Review>>,
}

impl MemoryReviewStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn find_by_key(&self, key: &ReviewKey) -> Result<Option<Review>, ReviewStoreError> {
        let reviews = self
            .reviews
            .read()
            .map_err(|_| ReviewStoreError::query("review store lock poisoned"))?;
        Ok(reviews.get(key).cloned())
    }

    async fn put(&self, review: &Review) -> Result<(), ReviewStoreError> {
        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| ReviewStoreError::query("review store lock poisoned"))?;
        reviews.insert(review.key(), review.clone());
        Ok(())
    }

    async fn delete(&self, key: &ReviewKey) -> Result<(), ReviewStoreError> {
        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| ReviewStoreError::query("review store lock poisoned"))?;
        reviews.remove(key);
        Ok(())
    }

    async fn list_for_movie(&self, movie_id: &MovieId) -> Result<Vec<Review>, ReviewStoreError> {
        let reviews = self
            .reviews
            .read()
            .map_err(|_| ReviewStoreError::query("review store lock poisoned"))?;
        Ok(reviews
            .values()
            .filter(|review| review.movie_id() == *movie_id)
            .cloned()
            .collect())
    }

    async fn scan(&self) -> Result<Vec<Review>, ReviewStoreError> {
        let reviews = self
            .reviews
            .read()
            .map_err(|_| ReviewStoreError::query("review store lock poisoned"))?;
        Ok(reviews.values().cloned().collect())
    }

    async fn delete_batch(&self, keys: &[ReviewKey]) -> Result<(), ReviewStoreError> {
        if keys.len() > DELETE_BATCH_MAX {
            return Err(ReviewStoreError::batch_too_large(keys.len()));
        }
        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| ReviewStoreError::query("review store lock poisoned"))?;
        for key in keys {
            reviews.remove(key);
        }
        Ok(())
    }
}
