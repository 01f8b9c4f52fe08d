//! Backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-scoped correlation identifier.
pub use domain::TraceId;
/// Tracing middleware attaching a trace identifier to each request.
pub use middleware::trace::Trace;
