//! Review entity keyed by movie and author.
//!
//! A user's review of a movie is identified by the `(movie, author)` pair;
//! the "one review per user per movie" rule is enforced purely by this
//! composite key, never by a uniqueness scan.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{MovieId, UserId};

/// Smallest acceptable rating value.
pub const RATING_MIN: i64 = 1;
/// Largest acceptable rating value.
pub const RATING_MAX: i64 = 5;

/// Validation errors returned by the review constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    /// Rating fell outside the accepted range.
    RatingOutOfRange { min: i64, max: i64 },
    /// Comment was missing or blank once trimmed.
    EmptyComment,
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RatingOutOfRange { min, max } => {
                write!(f, "rating must be between {min} and {max}")
            }
            Self::EmptyComment => write!(f, "comment must not be empty"),
        }
    }
}

impl std::error::Error for ReviewValidationError {}

/// Star rating between [`RATING_MIN`] and [`RATING_MAX`] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    /// Validate and construct a [`Rating`].
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Rating;
    ///
    /// assert!(Rating::new(0).is_err());
    /// assert!(Rating::new(3).is_ok());
    /// assert!(Rating::new(6).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(ReviewValidationError::RatingOutOfRange {
                min: RATING_MIN,
                max: RATING_MAX,
            });
        }
        // Range check above keeps the value within u8.
        Ok(Self(value as u8))
    }

    /// The numeric rating.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Review comment, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment(String);

impl Comment {
    /// Validate and construct a [`Comment`]; surrounding whitespace is
    /// stripped.
    pub fn new(text: impl AsRef<str>) -> Result<Self, ReviewValidationError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ReviewValidationError::EmptyComment);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Comment {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Composite review identity: one review per `(movie, author)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewKey {
    pub movie_id: MovieId,
    pub author_id: UserId,
}

impl ReviewKey {
    /// Build a review key.
    #[must_use]
    pub fn new(movie_id: MovieId, author_id: UserId) -> Self {
        Self {
            movie_id,
            author_id,
        }
    }
}

/// A user's review of a movie.
///
/// ## Invariants
/// - `created_at` is set on first submission and preserved across edits.
/// - `display_name` is a snapshot of the author's name at write time, not a
///   live reference into the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    key: ReviewKey,
    display_name: String,
    rating: Rating,
    comment: Comment,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Review {
    /// Build the record written by an upsert.
    ///
    /// `created_at` carries the original creation time when editing an
    /// existing review and `now` on first submission; `updated_at` is always
    /// `now`.
    #[must_use]
    pub fn write(
        key: ReviewKey,
        display_name: impl Into<String>,
        rating: Rating,
        comment: Comment,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            rating,
            comment,
            created_at,
            updated_at: now,
        }
    }

    /// Composite identity.
    #[must_use]
    pub fn key(&self) -> ReviewKey {
        self.key
    }

    /// The reviewed movie.
    #[must_use]
    pub fn movie_id(&self) -> MovieId {
        self.key.movie_id
    }

    /// The review's author (and identifier).
    #[must_use]
    pub fn author_id(&self) -> UserId {
        self.key.author_id
    }

    /// Author name snapshot taken at write time.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Star rating.
    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Comment text.
    pub fn comment(&self) -> &Comment {
        &self.comment
    }

    /// First submission timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last edit timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(5, true)]
    #[case(6, false)]
    #[case(-1, false)]
    fn rating_bounds(#[case] value: i64, #[case] ok: bool) {
        assert_eq!(Rating::new(value).is_ok(), ok);
    }

    #[rstest]
    #[case("", false)]
    #[case("   ", false)]
    #[case("great", true)]
    fn comment_must_be_non_empty(#[case] text: &str, #[case] ok: bool) {
        assert_eq!(Comment::new(text).is_ok(), ok);
    }

    #[test]
    fn comment_is_trimmed() {
        let comment = Comment::new("  a fine film  ").expect("valid comment");
        assert_eq!(comment.as_ref(), "a fine film");
    }

    #[test]
    fn write_preserves_creation_time_across_edits() {
        let key = ReviewKey::new(MovieId::random(), UserId::random());
        let created = Utc::now();
        let first = Review::write(
            key,
            "ada",
            Rating::new(4).expect("valid"),
            Comment::new("good").expect("valid"),
            created,
            created,
        );

        let later = created + chrono::Duration::minutes(10);
        let edited = Review::write(
            key,
            "ada",
            Rating::new(2).expect("valid"),
            Comment::new("changed my mind").expect("valid"),
            first.created_at(),
            later,
        );

        assert_eq!(edited.created_at(), created);
        assert_eq!(edited.updated_at(), later);
        assert_eq!(edited.rating().value(), 2);
    }
}
