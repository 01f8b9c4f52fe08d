//! Bearer-JWT identity provider adapter.
//!
//! Token issuance, registration, and credential storage live with the
//! external identity provider; this adapter only verifies the bearer token
//! it minted and maps its claims onto a [`Principal`]. The subject claim
//! must be a UUID, the display name falls back from the preferred username
//! to the email to the subject itself, and the groups claim is accepted
//! either as a JSON array or as a comma-separated string.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::ports::{IdentityError, IdentityProvider};
use crate::domain::{Principal, UserId};

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, deserialize_with = "groups_claim")]
    groups: Vec<String>,
}

/// Accept the groups claim as an array of strings or a comma-separated
/// string; anything else counts as no groups.
fn groups_claim<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => raw
            .split(',')
            .map(|group| group.trim().to_owned())
            .filter(|group| !group.is_empty())
            .collect(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    })
}

/// Identity provider verifying bearer JWTs.
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    /// Verify HS256 tokens signed with a shared secret. Expiry is enforced.
    #[must_use]
    pub fn hs256(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Accept unsigned or arbitrarily-signed tokens. Local development
    /// only: every claim set is trusted as-is.
    #[must_use]
    pub fn unsigned() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);
        Self {
            decoding_key: DecodingKey::from_secret(&[]),
            validation,
        }
    }

    fn principal_from(claims: Claims) -> Result<Principal, IdentityError> {
        let subject_id = UserId::new(&claims.sub)
            .map_err(|_| IdentityError::invalid_credentials("subject claim must be a UUID"))?;
        let display_name = claims
            .preferred_username
            .or(claims.email)
            .unwrap_or_else(|| claims.sub.clone());
        Ok(Principal::new(subject_id, display_name, claims.groups))
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn authenticate(&self, token: &str) -> Result<Principal, IdentityError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| IdentityError::invalid_credentials(error.to_string()))?;
        Self::principal_from(data.claims)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use jsonwebtoken::{encode, EncodingKey, Header};
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn token(claims: Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encode token")
    }

    fn far_future() -> i64 {
        4_102_444_800 // 2100-01-01
    }

    #[tokio::test]
    async fn verifies_and_maps_claims() {
        let provider = JwtIdentityProvider::hs256(SECRET);
        let raw = token(json!({
            "sub": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "preferred_username": "ada",
            "groups": ["Admin"],
            "exp": far_future(),
        }));

        let principal = provider.authenticate(&raw).await.expect("token verifies");
        assert_eq!(
            principal.subject_id().to_string(),
            "3fa85f64-5717-4562-b3fc-2c963f66afa6"
        );
        assert_eq!(principal.display_name(), "ada");
        assert!(principal.is_admin());
    }

    #[tokio::test]
    async fn accepts_comma_separated_groups() {
        let provider = JwtIdentityProvider::hs256(SECRET);
        let raw = token(json!({
            "sub": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "groups": "Admin, Editors",
            "exp": far_future(),
        }));

        let principal = provider.authenticate(&raw).await.expect("token verifies");
        assert!(principal.is_admin());
    }

    #[rstest]
    #[case(json!({ "sub": "uuid-less", "exp": 4_102_444_800_i64 }))]
    #[case(json!({ "sub": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "exp": 1 }))]
    #[tokio::test]
    async fn rejects_bad_subject_or_expired_token(#[case] claims: Value) {
        let provider = JwtIdentityProvider::hs256(SECRET);
        let err = provider
            .authenticate(&token(claims))
            .await
            .expect_err("token must be rejected");
        assert!(matches!(err, IdentityError::InvalidCredentials { .. }));
    }

    #[tokio::test]
    async fn rejects_wrong_signature() {
        let provider = JwtIdentityProvider::hs256(b"other-secret");
        let raw = token(json!({
            "sub": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "exp": far_future(),
        }));

        let err = provider
            .authenticate(&raw)
            .await
            .expect_err("signature mismatch");
        assert!(matches!(err, IdentityError::InvalidCredentials { .. }));
    }

    #[tokio::test]
    async fn display_name_falls_back_to_email_then_subject() {
        let provider = JwtIdentityProvider::unsigned();
        let with_email = token(json!({
            "sub": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "email": "ada@example.com",
        }));
        let principal = provider
            .authenticate(&with_email)
            .await
            .expect("token accepted");
        assert_eq!(principal.display_name(), "ada@example.com");

        let bare = token(json!({ "sub": "3fa85f64-5717-4562-b3fc-2c963f66afa6" }));
        let principal = provider.authenticate(&bare).await.expect("token accepted");
        assert_eq!(
            principal.display_name(),
            "3fa85f64-5717-4562-b3fc-2c963f66afa6"
        );
    }

    #[tokio::test]
    async fn unsigned_mode_skips_signature_checks() {
        let provider = JwtIdentityProvider::unsigned();
        let raw = token(json!({ "sub": "3fa85f64-5717-4562-b3fc-2c963f66afa6" }));
        assert!(provider.authenticate(&raw).await.is_ok());
    }
}
