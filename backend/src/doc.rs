//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every HTTP endpoint from the inbound layer, the request
//! and response schemas, and the bearer-token security scheme. The
//! generated document backs Swagger UI (debug builds) and is exported via
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Bearer token issued by the identity provider."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Cinelog backend API",
        description = "HTTP interface for the movie review and rating service."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::movies::list_movies,
        crate::inbound::http::movies::list_movies_root,
        crate::inbound::http::movies::get_movie,
        crate::inbound::http::movies::create_movie,
        crate::inbound::http::movies::delete_movie,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::upsert_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::reviews::list_all_reviews,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::inbound::http::movies::MovieResponse,
        crate::inbound::http::movies::MovieSummaryResponse,
        crate::inbound::http::movies::CreateMovieBody,
        crate::inbound::http::movies::MessageResponse,
        crate::inbound::http::reviews::ReviewResponse,
        crate::inbound::http::reviews::UpsertReviewBody,
        crate::inbound::http::reviews::UpsertedReviewResponse,
        crate::inbound::http::reviews::DeletedReviewResponse,
        crate::inbound::http::reviews::ModerationReviewResponse,
    )),
    tags(
        (name = "movies", description = "Movie catalogue"),
        (name = "reviews", description = "Reviews and rating aggregates"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
