//! Movie catalogue API handlers.
//!
//! ```text
//! GET /movies
//! GET /movies/{id}
//! POST /movies {"title":"Metropolis","year":1927,"posterUrl":"...","description":"..."}
//! DELETE /movies/{id}
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::{CreateMovieRequest, DeleteMovieRequest, MovieSummary};
use crate::domain::{Error, Movie, MovieDraft, MovieId};
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_year, FieldName};
use crate::inbound::http::{iso_timestamp, ApiResult};

const TITLE: FieldName = FieldName::new("title");
const YEAR: FieldName = FieldName::new("year");
const POSTER_URL: FieldName = FieldName::new("posterUrl");
const DESCRIPTION: FieldName = FieldName::new("description");

/// Full movie record, aggregate fields included.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub movie_id: String,
    pub title: String,
    pub year: i32,
    pub poster_url: String,
    pub description: String,
    pub rating_sum: u64,
    pub rating_count: u64,
    /// Cached average; `null` until the first review lands.
    pub average_rating: Option<f64>,
    #[schema(example = "2026-01-15T12:00:00.000Z")]
    pub created_at: String,
    #[schema(example = "2026-01-15T12:00:00.000Z")]
    pub updated_at: String,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        let aggregate = movie.aggregate();
        Self {
            movie_id: movie.id().to_string(),
            title: movie.title().to_owned(),
            year: movie.year().value(),
            poster_url: movie.poster_url().to_owned(),
            description: movie.description().to_owned(),
            rating_sum: aggregate.rating_sum(),
            rating_count: aggregate.rating_count(),
            average_rating: aggregate.average_rating(),
            created_at: iso_timestamp(movie.created_at()),
            updated_at: iso_timestamp(movie.updated_at()),
        }
    }
}

/// Listing projection without the aggregate internals.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummaryResponse {
    pub movie_id: String,
    pub title: String,
    pub year: i32,
    pub poster_url: String,
    /// Cached average; `null` until the first review lands.
    pub average_rating: Option<f64>,
    pub description: String,
}

impl From<MovieSummary> for MovieSummaryResponse {
    fn from(summary: MovieSummary) -> Self {
        Self {
            movie_id: summary.id.to_string(),
            title: summary.title,
            year: summary.year,
            poster_url: summary.poster_url,
            average_rating: summary.average_rating,
            description: summary.description,
        }
    }
}

/// Request body for `POST /movies`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieBody {
    pub title: Option<String>,
    /// Release year as a JSON number or a numeric string.
    #[schema(value_type = Option<serde_json::Value>)]
    pub year: Option<Value>,
    pub poster_url: Option<String>,
    pub description: Option<String>,
}

/// Confirmation payload for delete endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Interpret a movie path segment; anything that is not a canonical UUID
/// behaves as an unknown movie.
pub(crate) fn parse_movie_path(raw: &str) -> Result<MovieId, Error> {
    MovieId::new(raw).map_err(|_| Error::not_found("Movie not found"))
}

async fn movie_listing(state: &HttpState) -> ApiResult<web::Json<Vec<MovieSummaryResponse>>> {
    let movies = state.catalogue_query.list_movies().await?;
    Ok(web::Json(movies.into_iter().map(Into::into).collect()))
}

/// List all movies, newest first.
#[utoipa::path(
    get,
    path = "/movies",
    responses(
        (status = 200, description = "Movie summaries sorted by creation time", body = [MovieSummaryResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "listMovies",
    security([])
)]
#[get("/movies")]
pub async fn list_movies(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<MovieSummaryResponse>>> {
    movie_listing(&state).await
}

/// Root alias for the movie listing.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Movie summaries sorted by creation time", body = [MovieSummaryResponse])
    ),
    tags = ["movies"],
    operation_id = "listMoviesRoot",
    security([])
)]
#[get("/")]
pub async fn list_movies_root(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<MovieSummaryResponse>>> {
    movie_listing(&state).await
}

/// Fetch one movie with its full aggregate.
#[utoipa::path(
    get,
    path = "/movies/{id}",
    params(("id" = String, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "Movie record", body = MovieResponse),
        (status = 404, description = "Movie not found", body = Error)
    ),
    tags = ["movies"],
    operation_id = "getMovie",
    security([])
)]
#[get("/movies/{id}")]
pub async fn get_movie(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MovieResponse>> {
    let movie_id = parse_movie_path(&path.into_inner())?;
    let movie = state.catalogue_query.get_movie(movie_id).await?;
    Ok(web::Json(MovieResponse::from(&movie)))
}

/// Create a movie. Admin only.
#[utoipa::path(
    post,
    path = "/movies",
    request_body = CreateMovieBody,
    responses(
        (status = 201, description = "Movie created", body = MovieResponse),
        (status = 400, description = "Invalid fields", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 409, description = "Duplicate identifier", body = Error)
    ),
    tags = ["movies"],
    operation_id = "createMovie",
    security(("BearerToken" = []))
)]
#[post("/movies")]
pub async fn create_movie(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    payload: web::Json<CreateMovieBody>,
) -> ApiResult<HttpResponse> {
    let principal = ctx.require_principal().await?;
    let body = payload.into_inner();

    let title = body.title.ok_or_else(|| missing_field_error(TITLE))?;
    let year_value = body.year.ok_or_else(|| missing_field_error(YEAR))?;
    let year = parse_year(&year_value, YEAR)?;
    let poster_url = body.poster_url.ok_or_else(|| missing_field_error(POSTER_URL))?;
    let description = body
        .description
        .ok_or_else(|| missing_field_error(DESCRIPTION))?;

    let movie = state
        .catalogue
        .create_movie(CreateMovieRequest {
            principal,
            draft: MovieDraft {
                title,
                year,
                poster_url,
                description,
            },
        })
        .await?;

    Ok(HttpResponse::Created().json(MovieResponse::from(&movie)))
}

/// Delete a movie and all of its reviews. Admin only.
#[utoipa::path(
    delete,
    path = "/movies/{id}",
    params(("id" = String, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "Movie deleted", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Movie not found", body = Error)
    ),
    tags = ["movies"],
    operation_id = "deleteMovie",
    security(("BearerToken" = []))
)]
#[delete("/movies/{id}")]
pub async fn delete_movie(
    state: web::Data<HttpState>,
    ctx: AuthContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let principal = ctx.require_principal().await?;
    let movie_id = parse_movie_path(&path.into_inner())?;

    state
        .catalogue
        .delete_movie(DeleteMovieRequest {
            principal,
            movie_id,
        })
        .await?;

    Ok(web::Json(MessageResponse {
        message: "Movie deleted".to_owned(),
    }))
}
