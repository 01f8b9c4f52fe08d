//! Server assembly: wiring stores, services, and the identity adapter into
//! the HTTP state consumed by the inbound adapter.

mod config;

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use backend::domain::ports::IdentityProvider;
use backend::domain::{CatalogueService, ReviewService};
use backend::inbound::http::HttpState;
use backend::outbound::identity::JwtIdentityProvider;
use backend::outbound::storage::{MemoryMovieStore, MemoryReviewStore};

pub use config::{AuthMode, ServerConfig};

/// Build the handler state for one server process.
///
/// Store handles are constructed here, once, with a lifecycle tied to
/// process start; every request shares them through the state bundle.
pub fn build_state(config: &ServerConfig) -> HttpState {
    let movie_store = Arc::new(MemoryMovieStore::new());
    let review_store = Arc::new(MemoryReviewStore::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let catalogue = Arc::new(CatalogueService::new(
        Arc::clone(&movie_store),
        Arc::clone(&review_store),
        Arc::clone(&clock),
    ));
    let reviews = Arc::new(ReviewService::new(movie_store, review_store, clock));

    let identity: Arc<dyn IdentityProvider> = match &config.auth {
        AuthMode::Hs256Secret(secret) => Arc::new(JwtIdentityProvider::hs256(secret.as_bytes())),
        AuthMode::UnsignedDev => {
            warn!("accepting unsigned bearer tokens (dev only)");
            Arc::new(JwtIdentityProvider::unsigned())
        }
    };

    HttpState {
        catalogue: catalogue.clone(),
        catalogue_query: catalogue,
        reviews: reviews.clone(),
        reviews_query: reviews,
        identity,
    }
}
