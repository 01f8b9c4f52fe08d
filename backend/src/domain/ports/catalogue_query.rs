//! Driving port for movie catalogue reads.

use async_trait::async_trait;

use crate::domain::{Error, Movie, MovieId};

/// Listing projection of a movie: browsing fields plus the cached average,
/// without the authoritative sum/count internals.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub poster_url: String,
    pub description: String,
    pub average_rating: Option<f64>,
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            id: *movie.id(),
            title: movie.title().to_owned(),
            year: movie.year().value(),
            poster_url: movie.poster_url().to_owned(),
            description: movie.description().to_owned(),
            average_rating: movie.aggregate().average_rating(),
        }
    }
}

/// Port for catalogue reads, implemented by the catalogue service.
///
/// Reads are open to anonymous callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Every movie, newest first.
    async fn list_movies(&self) -> Result<Vec<MovieSummary>, Error>;

    /// Full record for one movie.
    async fn get_movie(&self, movie_id: MovieId) -> Result<Movie, Error>;
}
