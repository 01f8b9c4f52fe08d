//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CatalogueCommand, CatalogueQuery, IdentityProvider, ReviewCommand, ReviewQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Admin-gated catalogue mutations.
    pub catalogue: Arc<dyn CatalogueCommand>,
    /// Anonymous catalogue reads.
    pub catalogue_query: Arc<dyn CatalogueQuery>,
    /// Review mutations (the rating aggregation engine).
    pub reviews: Arc<dyn ReviewCommand>,
    /// Review reads with capability decoration.
    pub reviews_query: Arc<dyn ReviewQuery>,
    /// External identity provider resolving bearer credentials.
    pub identity: Arc<dyn IdentityProvider>,
}
