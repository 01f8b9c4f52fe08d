//! Shared fixtures for the HTTP integration tests.
//!
//! Tests run the real routing table against the in-memory store adapters
//! and a fixture identity provider, so every request crosses the same
//! boundary the production binary wires up.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::{json, Value};

use backend::domain::ports::IdentityProvider;
use backend::domain::ports::StaticIdentityProvider;
use backend::domain::{CatalogueService, Principal, ReviewService, UserId, ADMIN_GROUP};
use backend::inbound::http::{self, HttpState};
use backend::outbound::storage::{MemoryMovieStore, MemoryReviewStore};
use backend::Trace;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const ADA_TOKEN: &str = "ada-token";
pub const BRIAN_TOKEN: &str = "brian-token";

pub fn admin_id() -> UserId {
    UserId::new("00000000-0000-4000-8000-00000000000a").expect("fixture id")
}

pub fn ada_id() -> UserId {
    UserId::new("00000000-0000-4000-8000-00000000000b").expect("fixture id")
}

pub fn brian_id() -> UserId {
    UserId::new("00000000-0000-4000-8000-00000000000c").expect("fixture id")
}

fn identity() -> StaticIdentityProvider {
    StaticIdentityProvider::new()
        .with_token(
            ADMIN_TOKEN,
            Principal::new(admin_id(), "root", vec![ADMIN_GROUP.to_owned()]),
        )
        .with_token(ADA_TOKEN, Principal::new(ada_id(), "ada", Vec::new()))
        .with_token(BRIAN_TOKEN, Principal::new(brian_id(), "brian", Vec::new()))
}

/// Clock handing out strictly increasing timestamps so creation order is
/// deterministic in listings.
pub struct SequenceClock {
    base: DateTime<Utc>,
    ticks: AtomicI64,
}

impl SequenceClock {
    pub fn new() -> Self {
        Self {
            base: Utc
                .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("valid base timestamp"),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SequenceClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.base + Duration::seconds(self.ticks.fetch_add(1, Ordering::SeqCst))
    }
}

/// Build handler state over fresh in-memory stores; the store handles are
/// returned so tests can seed records behind the API's back.
pub fn test_state() -> (
    web::Data<HttpState>,
    Arc<MemoryMovieStore>,
    Arc<MemoryReviewStore>,
) {
    let movie_store = Arc::new(MemoryMovieStore::new());
    let review_store = Arc::new(MemoryReviewStore::new());
    let clock: Arc<dyn Clock> = Arc::new(SequenceClock::new());

    let catalogue = Arc::new(CatalogueService::new(
        Arc::clone(&movie_store),
        Arc::clone(&review_store),
        Arc::clone(&clock),
    ));
    let reviews = Arc::new(ReviewService::new(
        Arc::clone(&movie_store),
        Arc::clone(&review_store),
        clock,
    ));
    let identity: Arc<dyn IdentityProvider> = Arc::new(identity());

    let state = web::Data::new(HttpState {
        catalogue: catalogue.clone(),
        catalogue_query: catalogue,
        reviews: reviews.clone(),
        reviews_query: reviews,
        identity,
    });
    (state, movie_store, review_store)
}

/// Initialise the full application service for one test.
pub async fn spawn_app(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .app_data(http::json_error_config())
            .wrap(Trace)
            .wrap(http::permissive_cors())
            .wrap_fn(|req, srv| {
                let fut = srv.call(req);
                async move { Ok(fut.await?.map_into_boxed_body()) }
            })
            .configure(http::configure),
    )
    .await
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Drive a request and parse the JSON body (or `Null` for empty bodies).
pub async fn send<S>(app: &S, request: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, request).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Create a movie through the API as the admin and return its identifier.
pub async fn create_movie<S>(app: &S, title: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/movies")
            .insert_header(bearer(ADMIN_TOKEN))
            .set_json(json!({
                "title": title,
                "year": 1927,
                "posterUrl": "https://posters.example/poster.jpg",
                "description": "A picture worth reviewing.",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "movie fixture: {body}");
    body.get("movieId")
        .and_then(Value::as_str)
        .expect("created movie has an id")
        .to_owned()
}

/// Create or edit a review through the API.
pub async fn upsert_review<S>(
    app: &S,
    token: &str,
    movie_id: &str,
    rating: i64,
    comment: &str,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri(&format!("/movies/{movie_id}/reviews"))
            .insert_header(bearer(token))
            .set_json(json!({ "rating": rating, "comment": comment }))
            .to_request(),
    )
    .await
}

/// Fetch a movie through the API, asserting it exists.
pub async fn get_movie<S>(app: &S, movie_id: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        test::TestRequest::get()
            .uri(&format!("/movies/{movie_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "movie lookup: {body}");
    body
}
