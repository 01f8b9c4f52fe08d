//! Domain ports and supporting types for the hexagonal boundary.

mod catalogue_command;
mod catalogue_query;
mod identity_provider;
mod movie_store;
mod review_command;
mod review_query;
mod review_store;

#[cfg(test)]
pub use catalogue_command::MockCatalogueCommand;
pub use catalogue_command::{CatalogueCommand, CreateMovieRequest, DeleteMovieRequest};
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::{CatalogueQuery, MovieSummary};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityError, IdentityProvider, StaticIdentityProvider};
#[cfg(test)]
pub use movie_store::MockMovieStore;
pub use movie_store::{MovieStore, MovieStoreError};
#[cfg(test)]
pub use review_command::MockReviewCommand;
pub use review_command::{
    DeleteReviewRequest, DeleteReviewResponse, ReviewCommand, UpsertReviewRequest,
    UpsertReviewResponse,
};
#[cfg(test)]
pub use review_query::MockReviewQuery;
pub use review_query::{
    ListMovieReviewsRequest, ModerationReview, ReviewQuery, ReviewWithCapabilities,
};
#[cfg(test)]
pub use review_store::MockReviewStore;
pub use review_store::{ReviewStore, ReviewStoreError, DELETE_BATCH_MAX};
