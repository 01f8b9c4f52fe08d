//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod movies;
pub mod reviews;
pub mod state;
pub(crate) mod validation;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use crate::domain::Error;

pub use error::ApiResult;
pub use state::HttpState;

/// Serialise a timestamp the way the JSON surface expects it
/// (millisecond-precision RFC 3339 in UTC).
pub(crate) fn iso_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Register every REST endpoint on an Actix service config.
///
/// Shared between the server binary and integration tests so both exercise
/// the same routing table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(movies::list_movies)
        .service(movies::list_movies_root)
        .service(movies::create_movie)
        .service(reviews::list_all_reviews)
        .service(reviews::list_reviews)
        .service(reviews::upsert_review)
        .service(reviews::delete_review)
        .service(movies::get_movie)
        .service(movies::delete_movie);
}

/// Permissive cross-origin policy: any origin, the JSON content and
/// authorization headers, and the verb set the API serves. Preflight
/// `OPTIONS` requests are answered with 200 and no body.
pub fn permissive_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(["GET", "POST", "PUT", "DELETE"])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}

/// JSON extractor configuration mapping malformed bodies to the domain
/// error envelope instead of Actix's default response.
pub fn json_error_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected malformed JSON body");
        Error::invalid_request("Invalid JSON body").into()
    })
}
