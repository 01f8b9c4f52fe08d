//! Review API handlers.
//!
//! ```text
//! GET /movies/{id}/reviews
//! POST /movies/{id}/reviews {"rating":4,"comment":"..."}
//! DELETE /movies/{id}/reviews/{reviewerId}
//! GET /reviews
//! ```

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    DeleteReviewRequest, ListMovieReviewsRequest, ModerationReview, ReviewWithCapabilities,
    UpsertReviewRequest, UpsertReviewResponse,
};
use crate::domain::{Error, MovieId, Principal, UserId};
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::movies::parse_movie_path;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{iso_timestamp, ApiResult};

/// A review row decorated with the viewer's capability flags.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    /// Review identifier; equals the author identifier by design.
    pub review_id: String,
    pub author_id: String,
    pub display_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl From<ReviewWithCapabilities> for ReviewResponse {
    fn from(row: ReviewWithCapabilities) -> Self {
        Self {
            review_id: row.review.author_id().to_string(),
            author_id: row.review.author_id().to_string(),
            display_name: row.review.display_name().to_owned(),
            rating: row.review.rating().value(),
            comment: row.review.comment().to_string(),
            created_at: iso_timestamp(row.review.created_at()),
            updated_at: iso_timestamp(row.review.updated_at()),
            can_edit: row.capabilities.can_edit,
            can_delete: row.capabilities.can_delete,
        }
    }
}

/// Request body for `POST /movies/{id}/reviews`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertReviewBody {
    /// Star rating between 1 and 5.
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Outcome of an upsert: the written review plus the new aggregate.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertedReviewResponse {
    pub movie_id: String,
    pub review_id: String,
    pub rating: u8,
    pub comment: String,
    /// Movie average after this write; `null` when no reviews remain.
    pub average_rating: Option<f64>,
    pub rating_count: u64,
}

impl From<UpsertReviewResponse> for UpsertedReviewResponse {
    fn from(outcome: UpsertReviewResponse) -> Self {
        Self {
            movie_id: outcome.review.movie_id().to_string(),
            review_id: outcome.review.author_id().to_string(),
            rating: outcome.review.rating().value(),
            comment: outcome.review.comment().to_string(),
            average_rating: outcome.aggregate.average_rating(),
            rating_count: outcome.aggregate.rating_count(),
        }
    }
}

/// Outcome of a review deletion.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedReviewResponse {
    pub message: String,
    /// Movie average after the removal; `null` when no reviews remain.
    pub average_rating: Option<f64>,
    pub rating_count: u64,
}

/// A moderation row: review fields plus the movie title.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerationReviewResponse {
    pub movie_id: String,
    pub review_id: String,
    pub author_id: String,
    pub display_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
    /// Title of the reviewed movie, `"unknown"` when the lookup fails.
    pub movie_title: String,
}

impl From<ModerationReview> for ModerationReviewResponse {
    fn from(row: ModerationReview) -> Self {
        Self {
            movie_id: row.review.movie_id().to_string(),
            review_id: row.review.author_id().to_string(),
            author_id: row.review.author_id().to_string(),
            display_name: row.review.display_name().to_owned(),
            rating: row.review.rating().value(),
            comment: row.review.comment().to_string(),
            created_at: iso_timestamp(row.review.created_at()),
            updated_at: iso_timestamp(row.review.updated_at()),
            movie_title: row.movie_title,
        }
    }
}

/// The outcome of deleting a review that no well-formed key can name:
/// admins observe the miss, everyone else fails the ownership check.
fn unknown_review_error(authorized: bool) -> Error {
    if authorized {
        Error::not_found("Review not found")
    } else {
        Error::forbidden("review deletion requires ownership or admin rights")
    }
}

/// List a movie's reviews with the caller's capability flags.
#[utoipa::path(
    get,
    path = "/movies/{id}/reviews",
    params(("id" = String, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "Reviews sorted newest first", body = [ReviewResponse])
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security((), ("BearerToken" = []))
)]
#[get("/movies/{id}/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let viewer = ctx.viewer().await;
    let Ok(movie_id) = MovieId::new(&path.into_inner()) else {
        // A malformed movie id cannot match any review.
        return Ok(web::Json(Vec::new()));
    };

    let rows = state
        .reviews_query
        .list_for_movie(ListMovieReviewsRequest { movie_id, viewer })
        .await?;
    Ok(web::Json(rows.into_iter().map(Into::into).collect()))
}

/// Create or edit the caller's review of a movie.
#[utoipa::path(
    post,
    path = "/movies/{id}/reviews",
    params(("id" = String, Path, description = "Movie identifier")),
    request_body = UpsertReviewBody,
    responses(
        (status = 200, description = "Existing review edited", body = UpsertedReviewResponse),
        (status = 201, description = "Review created", body = UpsertedReviewResponse),
        (status = 400, description = "Invalid rating or comment", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Movie not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "upsertReview",
    security(("BearerToken" = []))
)]
#[post("/movies/{id}/reviews")]
pub async fn upsert_review(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    path: web::Path<String>,
    payload: web::Json<UpsertReviewBody>,
) -> ApiResult<HttpResponse> {
    let principal = ctx.require_principal().await?;
    let movie_id = parse_movie_path(&path.into_inner())?;
    let body = payload.into_inner();

    // Absent fields fall through to the range and emptiness validation.
    let outcome = state
        .reviews
        .upsert_review(UpsertReviewRequest {
            principal,
            movie_id,
            rating: body.rating.unwrap_or(0),
            comment: body.comment.unwrap_or_default(),
        })
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(HttpResponse::build(status).json(UpsertedReviewResponse::from(outcome)))
}

/// Delete a review. Author or admin only.
#[utoipa::path(
    delete,
    path = "/movies/{id}/reviews/{reviewerId}",
    params(
        ("id" = String, Path, description = "Movie identifier"),
        ("reviewerId" = String, Path, description = "Author of the review")
    ),
    responses(
        (status = 200, description = "Review deleted", body = DeletedReviewResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not the author or an admin", body = Error),
        (status = 404, description = "Review not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview",
    security(("BearerToken" = []))
)]
#[delete("/movies/{id}/reviews/{reviewer_id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<DeletedReviewResponse>> {
    let principal = ctx.require_principal().await?;
    let (raw_movie, raw_reviewer) = path.into_inner();

    // A malformed reviewer id can never match the caller's subject id.
    let reviewer_id = match UserId::new(&raw_reviewer) {
        Ok(id) => id,
        Err(_) => return Err(unknown_review_error(principal.is_admin())),
    };
    let movie_id = match MovieId::new(&raw_movie) {
        Ok(id) => id,
        Err(_) => {
            let authorized = authorized_for(&principal, &reviewer_id);
            return Err(unknown_review_error(authorized));
        }
    };

    let outcome = state
        .reviews
        .delete_review(DeleteReviewRequest {
            principal,
            movie_id,
            reviewer_id,
        })
        .await?;

    Ok(web::Json(DeletedReviewResponse {
        message: "Review deleted".to_owned(),
        average_rating: outcome.aggregate.average_rating(),
        rating_count: outcome.aggregate.rating_count(),
    }))
}

fn authorized_for(principal: &Principal, reviewer_id: &UserId) -> bool {
    principal.is_admin() || principal.subject_id() == reviewer_id
}

/// List every review across all movies, decorated with titles. Admin only.
#[utoipa::path(
    get,
    path = "/reviews",
    responses(
        (status = 200, description = "All reviews with movie titles", body = [ModerationReviewResponse]),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listAllReviews",
    security(("BearerToken" = []))
)]
#[get("/reviews")]
pub async fn list_all_reviews(
    state: web::Data<HttpState>,
    ctx: AuthContext,
) -> ApiResult<web::Json<Vec<ModerationReviewResponse>>> {
    let principal = ctx.require_principal().await?;
    let rows = state.reviews_query.list_all(principal).await?;
    Ok(web::Json(rows.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use actix_web::{test as actix_test, App};
    use chrono::Utc;
    use serde_json::{json, Value};

    use super::*;
    use crate::domain::ports::{
        MockCatalogueCommand, MockCatalogueQuery, MockReviewCommand, MockReviewQuery,
        StaticIdentityProvider,
    };
    use crate::domain::{
        Comment, Rating, RatingAggregate, Review, ReviewCapabilities, ReviewKey, ADMIN_GROUP,
    };

    fn ada_id() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id")
    }

    fn identity() -> StaticIdentityProvider {
        StaticIdentityProvider::new()
            .with_token(
                "admin-token",
                Principal::new(UserId::random(), "root", vec![ADMIN_GROUP.to_owned()]),
            )
            .with_token("ada-token", Principal::new(ada_id(), "ada", Vec::new()))
    }

    fn state_with_reviews(
        reviews: MockReviewCommand,
        reviews_query: MockReviewQuery,
    ) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            catalogue: Arc::new(MockCatalogueCommand::new()),
            catalogue_query: Arc::new(MockCatalogueQuery::new()),
            reviews: Arc::new(reviews),
            reviews_query: Arc::new(reviews_query),
            identity: Arc::new(identity()),
        })
    }

    fn sample_review(movie_id: MovieId) -> Review {
        let now = Utc::now();
        Review::write(
            ReviewKey::new(movie_id, ada_id()),
            "ada",
            Rating::new(4).expect("valid rating"),
            Comment::new("fine").expect("valid comment"),
            now,
            now,
        )
    }

    #[actix_web::test]
    async fn upsert_discriminates_create_from_edit_status() {
        let movie_id = MovieId::random();
        let mut reviews = MockReviewCommand::new();
        let mut created = true;
        reviews.expect_upsert_review().times(2).returning(move |request| {
            let review = sample_review(request.movie_id);
            let response = UpsertReviewResponse {
                review,
                aggregate: RatingAggregate::from_parts(4, 1),
                created,
            };
            created = false;
            Ok(response)
        });

        let state = state_with_reviews(reviews, MockReviewQuery::new());
        let app =
            actix_test::init_service(App::new().app_data(state).service(upsert_review)).await;

        let request = || {
            actix_test::TestRequest::post()
                .uri(&format!("/movies/{movie_id}/reviews"))
                .insert_header(("Authorization", "Bearer ada-token"))
                .set_json(json!({ "rating": 4, "comment": "fine" }))
                .to_request()
        };

        let first = actix_test::call_service(&app, request()).await;
        assert_eq!(first.status(), actix_web::http::StatusCode::CREATED);
        let second = actix_test::call_service(&app, request()).await;
        assert_eq!(second.status(), actix_web::http::StatusCode::OK);
    }

    #[actix_web::test]
    async fn upsert_requires_authentication() {
        let state = state_with_reviews(MockReviewCommand::new(), MockReviewQuery::new());
        let app =
            actix_test::init_service(App::new().app_data(state).service(upsert_review)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/movies/{}/reviews", MovieId::random()))
                .set_json(json!({ "rating": 4, "comment": "fine" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn list_with_malformed_movie_id_is_an_empty_page() {
        // The query port must not be consulted for an id no review can have.
        let state = state_with_reviews(MockReviewCommand::new(), MockReviewQuery::new());
        let app =
            actix_test::init_service(App::new().app_data(state).service(list_reviews)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/movies/not-a-uuid/reviews")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn list_serialises_capability_flags() {
        let movie_id = MovieId::random();
        let review = sample_review(movie_id);
        let mut reviews_query = MockReviewQuery::new();
        let row = ReviewWithCapabilities {
            review,
            capabilities: ReviewCapabilities {
                can_edit: true,
                can_delete: true,
            },
        };
        reviews_query
            .expect_list_for_movie()
            .returning(move |_| Ok(vec![row.clone()]));

        let state = state_with_reviews(MockReviewCommand::new(), reviews_query);
        let app =
            actix_test::init_service(App::new().app_data(state).service(list_reviews)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/movies/{movie_id}/reviews"))
                .insert_header(("Authorization", "Bearer ada-token"))
                .to_request(),
        )
        .await;
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");
        let first = body.as_array().and_then(|rows| rows.first()).expect("one row");
        assert_eq!(first.get("canEdit").and_then(Value::as_bool), Some(true));
        assert_eq!(first.get("canDelete").and_then(Value::as_bool), Some(true));
        assert_eq!(
            first.get("reviewId").and_then(Value::as_str),
            first.get("authorId").and_then(Value::as_str),
        );
    }

    #[actix_web::test]
    async fn delete_with_malformed_reviewer_is_forbidden_for_members() {
        let state = state_with_reviews(MockReviewCommand::new(), MockReviewQuery::new());
        let app =
            actix_test::init_service(App::new().app_data(state).service(delete_review)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/movies/{}/reviews/not-a-uuid", MovieId::random()))
                .insert_header(("Authorization", "Bearer ada-token"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn delete_with_malformed_reviewer_is_not_found_for_admins() {
        let state = state_with_reviews(MockReviewCommand::new(), MockReviewQuery::new());
        let app =
            actix_test::init_service(App::new().app_data(state).service(delete_review)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/movies/{}/reviews/not-a-uuid", MovieId::random()))
                .insert_header(("Authorization", "Bearer admin-token"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
