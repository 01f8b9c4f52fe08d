//! Authentication context for HTTP handlers.
//!
//! Wraps the bearer token (if any) together with the identity provider port
//! so handlers only deal with domain-friendly operations: resolve an
//! optional viewer or require an authenticated principal.

use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::domain::ports::{IdentityError, IdentityProvider};
use crate::domain::{Error, Principal};
use crate::inbound::http::state::HttpState;

fn map_identity_error(error: IdentityError) -> Error {
    match error {
        IdentityError::InvalidCredentials { .. } => Error::unauthorized("invalid credentials"),
        IdentityError::Unavailable { message } => {
            Error::internal(format!("identity provider unavailable: {message}"))
        }
    }
}

/// Extractor capturing the request's bearer token and the identity port.
#[derive(Clone)]
pub struct AuthContext {
    token: Option<String>,
    identity: Arc<dyn IdentityProvider>,
}

impl AuthContext {
    /// Construct a context from a raw token and the identity port.
    pub fn new(token: Option<String>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { token, identity }
    }

    /// Resolve the principal, if credentials were presented.
    ///
    /// Returns `Ok(None)` for anonymous requests and `Unauthorized` when
    /// presented credentials do not verify.
    pub async fn principal(&self) -> Result<Option<Principal>, Error> {
        match self.token.as_deref() {
            None => Ok(None),
            Some(token) => self
                .identity
                .authenticate(token)
                .await
                .map(Some)
                .map_err(map_identity_error),
        }
    }

    /// Require an authenticated principal or fail with `401 Unauthorized`.
    pub async fn require_principal(&self) -> Result<Principal, Error> {
        self.principal()
            .await?
            .ok_or_else(|| Error::unauthorized("authentication required"))
    }

    /// The viewer for open listings: credentials that are absent or do not
    /// verify degrade to anonymous browsing instead of failing the read.
    pub async fn viewer(&self) -> Option<Principal> {
        self.principal().await.ok().flatten()
    }
}

/// Extract the bearer token from the `Authorization` header, if present.
fn bearer_token(req: &HttpRequest) -> Option<String> {
    let raw = req
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .trim();
    let (scheme, token) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_owned())
}

impl FromRequest for AuthContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<actix_web::web::Data<HttpState>>() {
            Some(state) => Ok(AuthContext::new(
                bearer_token(req),
                Arc::clone(&state.identity),
            )),
            None => Err(Error::internal("authentication state not configured").into()),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::test::TestRequest;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::StaticIdentityProvider;
    use crate::domain::{ErrorCode, UserId};

    fn provider() -> Arc<dyn IdentityProvider> {
        Arc::new(
            StaticIdentityProvider::new()
                .with_token("good", Principal::new(UserId::random(), "ada", Vec::new())),
        )
    }

    #[rstest]
    #[case("Bearer tok", Some("tok"))]
    #[case("bearer tok", Some("tok"))]
    #[case("Bearer   tok  ", Some("tok"))]
    #[case("Basic dXNlcg==", None)]
    #[case("Bearer ", None)]
    #[case("Bearer", None)]
    fn bearer_token_parsing(#[case] header_value: &str, #[case] expected: Option<&str>) {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, header_value))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), expected);
    }

    #[test]
    fn missing_header_yields_no_token() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);
    }

    #[tokio::test]
    async fn anonymous_context_resolves_no_principal() {
        let ctx = AuthContext::new(None, provider());
        assert_eq!(ctx.principal().await.expect("anonymous is fine"), None);
        let error = ctx.require_principal().await.expect_err("must require auth");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn valid_token_resolves_principal() {
        let ctx = AuthContext::new(Some("good".to_owned()), provider());
        let principal = ctx.require_principal().await.expect("token verifies");
        assert_eq!(principal.display_name(), "ada");
    }

    #[tokio::test]
    async fn invalid_token_is_unauthorized() {
        let ctx = AuthContext::new(Some("bad".to_owned()), provider());
        let error = ctx.principal().await.expect_err("token must fail");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn invalid_token_degrades_to_anonymous_viewer() {
        let ctx = AuthContext::new(Some("bad".to_owned()), provider());
        assert!(ctx.viewer().await.is_none());
    }
}
