//! Movie entity and its rating aggregate.
//!
//! The movie record exclusively owns its aggregate fields. `rating_sum` and
//! `rating_count` are authoritative; `average_rating` is a cached derived
//! value recomputed on every mutation and never trusted on its own.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Rating;

/// Earliest acceptable release year (the first film ever made).
pub const EARLIEST_RELEASE_YEAR: i32 = 1888;

/// Validation errors returned by the movie constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieValidationError {
    /// Title was missing or blank once trimmed.
    EmptyTitle,
    /// Poster reference was missing or blank once trimmed.
    EmptyPosterUrl,
    /// Description was missing or blank once trimmed.
    EmptyDescription,
    /// Release year predates cinema.
    YearTooEarly { min: i32 },
}

impl fmt::Display for MovieValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyPosterUrl => write!(f, "poster url must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::YearTooEarly { min } => write!(f, "year must be {min} or later"),
        }
    }
}

impl std::error::Error for MovieValidationError {}

/// Stable movie identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovieId(Uuid);

impl MovieId {
    /// Validate and construct a [`MovieId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Uuid::parse_str(id.as_ref()).map(Self)
    }

    /// Generate a new random [`MovieId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Release year validated against [`EARLIEST_RELEASE_YEAR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseYear(i32);

impl ReleaseYear {
    /// Validate and construct a [`ReleaseYear`].
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ReleaseYear;
    ///
    /// assert!(ReleaseYear::new(1887).is_err());
    /// assert!(ReleaseYear::new(1888).is_ok());
    /// ```
    pub fn new(year: i32) -> Result<Self, MovieValidationError> {
        if year < EARLIEST_RELEASE_YEAR {
            return Err(MovieValidationError::YearTooEarly {
                min: EARLIEST_RELEASE_YEAR,
            });
        }
        Ok(Self(year))
    }

    /// The numeric year.
    #[must_use]
    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Derived rating aggregate stored on a movie.
///
/// ## Invariants
/// - `average_rating` is `None` exactly when `rating_count == 0`; otherwise
///   it equals `rating_sum / rating_count` rounded to 2 decimal places.
/// - Mutations only happen through [`RatingAggregate::apply_upsert`] and
///   [`RatingAggregate::apply_removal`], which recompute the average.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingAggregate {
    rating_sum: u64,
    rating_count: u64,
    average_rating: Option<f64>,
}

impl RatingAggregate {
    /// Aggregate of a movie with no reviews.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild an aggregate from stored sum and count, recomputing the
    /// average.
    #[must_use]
    pub fn from_parts(rating_sum: u64, rating_count: u64) -> Self {
        Self {
            rating_sum,
            rating_count,
            average_rating: derive_average(rating_sum, rating_count),
        }
    }

    /// Sum of all current review ratings.
    #[must_use]
    pub fn rating_sum(&self) -> u64 {
        self.rating_sum
    }

    /// Count of current reviews.
    #[must_use]
    pub fn rating_count(&self) -> u64 {
        self.rating_count
    }

    /// Cached average, absent when there are no reviews.
    #[must_use]
    pub fn average_rating(&self) -> Option<f64> {
        self.average_rating
    }

    /// Aggregate after a review upsert.
    ///
    /// A create (no previous rating) adds one to the count; an edit replaces
    /// the previous rating's contribution to the sum and leaves the count
    /// unchanged.
    #[must_use]
    pub fn apply_upsert(&self, previous: Option<Rating>, new: Rating) -> Self {
        let previous_value = previous.map_or(0, |rating| u64::from(rating.value()));
        let rating_sum = self.rating_sum - previous_value + u64::from(new.value());
        let rating_count = if previous.is_some() {
            self.rating_count
        } else {
            self.rating_count + 1
        };
        Self::from_parts(rating_sum, rating_count)
    }

    /// Aggregate after a review deletion; sum and count floor at zero.
    #[must_use]
    pub fn apply_removal(&self, removed: Rating) -> Self {
        let rating_sum = self.rating_sum.saturating_sub(u64::from(removed.value()));
        let rating_count = self.rating_count.saturating_sub(1);
        Self::from_parts(rating_sum, rating_count)
    }
}

/// Average rounded to 2 decimal places, absent for an empty aggregate.
fn derive_average(rating_sum: u64, rating_count: u64) -> Option<f64> {
    if rating_count == 0 {
        return None;
    }
    let average = rating_sum as f64 / rating_count as f64;
    Some((average * 100.0).round() / 100.0)
}

/// Unvalidated movie fields as supplied by a caller.
#[derive(Debug, Clone)]
pub struct MovieDraft {
    pub title: String,
    pub year: i32,
    pub poster_url: String,
    pub description: String,
}

/// Movie record.
///
/// ## Invariants
/// - Text fields are trimmed and non-empty.
/// - `year` is at least [`EARLIEST_RELEASE_YEAR`].
/// - `created_at` is set once; `updated_at` moves on every aggregate write.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    id: MovieId,
    title: String,
    year: ReleaseYear,
    poster_url: String,
    description: String,
    aggregate: RatingAggregate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Movie {
    /// Validate a draft into a fresh movie with an empty aggregate.
    pub fn create(
        id: MovieId,
        draft: MovieDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, MovieValidationError> {
        let title = non_empty(draft.title, MovieValidationError::EmptyTitle)?;
        let poster_url = non_empty(draft.poster_url, MovieValidationError::EmptyPosterUrl)?;
        let description = non_empty(draft.description, MovieValidationError::EmptyDescription)?;
        let year = ReleaseYear::new(draft.year)?;

        Ok(Self {
            id,
            title,
            year,
            poster_url,
            description,
            aggregate: RatingAggregate::empty(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Stable movie identifier.
    pub fn id(&self) -> &MovieId {
        &self.id
    }

    /// Movie title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Release year.
    #[must_use]
    pub fn year(&self) -> ReleaseYear {
        self.year
    }

    /// Poster image reference.
    pub fn poster_url(&self) -> &str {
        self.poster_url.as_str()
    }

    /// Synopsis text.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Current rating aggregate.
    #[must_use]
    pub fn aggregate(&self) -> RatingAggregate {
        self.aggregate
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Copy of this movie with a replacement aggregate and refreshed
    /// `updated_at`. Used by storage adapters applying the engine's
    /// aggregate writes.
    #[must_use]
    pub fn with_aggregate(mut self, aggregate: RatingAggregate, updated_at: DateTime<Utc>) -> Self {
        self.aggregate = aggregate;
        self.updated_at = updated_at;
        self
    }
}

fn non_empty(value: String, error: MovieValidationError) -> Result<String, MovieValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}
