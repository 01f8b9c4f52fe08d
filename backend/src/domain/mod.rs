//! Domain primitives, aggregates, and services.
//!
//! Purpose: hold the review/rating consistency engine and the types it is
//! built from, free of transport and storage concerns. Inbound adapters
//! translate HTTP traffic into the driving ports under [`ports`]; outbound
//! adapters implement the driven store and identity ports.

pub mod catalogue_service;
pub mod error;
pub mod movie;
pub mod ports;
pub mod principal;
pub mod review;
pub mod review_service;
pub mod trace_id;

pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode};
pub use self::movie::{
    Movie, MovieDraft, MovieId, MovieValidationError, RatingAggregate, ReleaseYear,
    EARLIEST_RELEASE_YEAR,
};
pub use self::principal::{Principal, ReviewCapabilities, UserId, UserIdError, ADMIN_GROUP};
pub use self::review::{
    Comment, Rating, Review, ReviewKey, ReviewValidationError, RATING_MAX, RATING_MIN,
};
pub use self::review_service::ReviewService;
pub use self::trace_id::{TraceId, TRACE_ID_HEADER};

/// Convenient result alias for domain operations.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, Error};
///
/// fn refuse() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
