//! Port for the external identity provider.
//!
//! Registration, credential storage, and token issuance all live outside
//! this system; the engine only needs request credentials resolved into a
//! [`Principal`].

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::Principal;

/// Errors raised by identity provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The presented credentials are malformed, expired, or unverifiable.
    #[error("invalid credentials: {message}")]
    InvalidCredentials { message: String },
    /// The provider could not be reached or misbehaved.
    #[error("identity provider unavailable: {message}")]
    Unavailable { message: String },
}

impl IdentityError {
    /// Construct an [`IdentityError::InvalidCredentials`].
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            message: message.into(),
        }
    }

    /// Construct an [`IdentityError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Port resolving bearer credentials into an authenticated principal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate a bearer token.
    async fn authenticate(&self, token: &str) -> Result<Principal, IdentityError>;
}

/// Fixture provider resolving a fixed token-to-principal table.
///
/// Intended for tests and local experiments that need authenticated
/// requests without a token issuer.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentityProvider {
    principals: HashMap<String, Principal>,
}

impl StaticIdentityProvider {
    /// Build an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `principal` under `token`.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.principals.insert(token.into(), principal);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn authenticate(&self, token: &str) -> Result<Principal, IdentityError> {
        self.principals
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::invalid_credentials("unknown token"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::UserId;

    #[tokio::test]
    async fn static_provider_resolves_registered_token() {
        let principal = Principal::new(UserId::random(), "ada", Vec::new());
        let provider = StaticIdentityProvider::new().with_token("tok", principal.clone());

        let resolved = provider.authenticate("tok").await.expect("known token");
        assert_eq!(resolved, principal);
    }

    #[tokio::test]
    async fn static_provider_rejects_unknown_token() {
        let provider = StaticIdentityProvider::new();
        let err = provider.authenticate("nope").await.expect_err("unknown token");
        assert!(matches!(err, IdentityError::InvalidCredentials { .. }));
    }
}
