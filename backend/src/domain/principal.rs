//! Authenticated principals and per-record capability checks.
//!
//! The identity provider is an external collaborator; the domain only sees
//! the [`Principal`] it produces. Capability flags are always computed
//! relative to the requesting principal, never stored.

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use crate::domain::Error;

/// Group name granting administrative rights.
pub const ADMIN_GROUP: &str = "Admin";

/// Authenticated identity plus its group memberships.
///
/// ## Invariants
/// - `subject_id` is the stable identifier issued by the identity provider
///   and doubles as the review identifier for the subject's reviews.
/// - `display_name` is whatever name the identity provider resolved at
///   authentication time; reviews snapshot it at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject_id: UserId,
    display_name: String,
    groups: HashSet<String>,
}

impl Principal {
    /// Build a principal from its identity-provider parts.
    pub fn new(
        subject_id: UserId,
        display_name: impl Into<String>,
        groups: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            subject_id,
            display_name: display_name.into(),
            groups: groups.into_iter().collect(),
        }
    }

    /// Stable subject identifier.
    pub fn subject_id(&self) -> &UserId {
        &self.subject_id
    }

    /// Name shown alongside the principal's reviews.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Whether the principal belongs to the administrative group.
    pub fn is_admin(&self) -> bool {
        self.groups.contains(ADMIN_GROUP)
    }

    /// Require administrative rights or fail with `Forbidden`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Principal, UserId};
    ///
    /// let member = Principal::new(UserId::random(), "ada", Vec::new());
    /// assert!(member.require_admin().is_err());
    /// ```
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("administrative rights required"))
        }
    }
}

/// Per-review capability flags relative to a viewer.
///
/// Computed, never persisted: `can_edit` when the viewer authored the
/// review, `can_delete` when the viewer authored it or is an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewCapabilities {
    pub can_edit: bool,
    pub can_delete: bool,
}

impl ReviewCapabilities {
    /// Capabilities of an anonymous viewer: none.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Compute capabilities for an optional viewer against a review author.
    #[must_use]
    pub fn for_viewer(viewer: Option<&Principal>, author_id: &UserId) -> Self {
        viewer.map_or_else(Self::anonymous, |principal| {
            let can_edit = principal.subject_id() == author_id;
            Self {
                can_edit,
                can_delete: can_edit || principal.is_admin(),
            }
        })
    }
}

/// Validation errors raised when parsing user identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    /// Input was empty or not a canonical UUID.
    InvalidId,
}

impl fmt::Display for UserIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
        }
    }
}

impl std::error::Error for UserIdError {}

/// Stable user identifier stored as a UUID.
///
/// This is the identity provider's subject id; a user's review of a movie is
/// keyed by it, so "review identifier" and "author identifier" are the same
/// value by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserIdError::InvalidId);
        }
        Uuid::parse_str(raw).map(Self).map_err(|_| UserIdError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    fn member(id: UserId) -> Principal {
        Principal::new(id, "ada", Vec::new())
    }

    fn admin(id: UserId) -> Principal {
        Principal::new(id, "root", vec![ADMIN_GROUP.to_owned()])
    }

    #[test]
    fn admin_group_membership_grants_admin() {
        let id = UserId::random();
        assert!(!member(id).is_admin());
        assert!(admin(id).is_admin());
        assert!(admin(id).require_admin().is_ok());
    }

    #[test]
    fn author_can_edit_and_delete_own_review() {
        let author = UserId::random();
        let caps = ReviewCapabilities::for_viewer(Some(&member(author)), &author);
        assert!(caps.can_edit);
        assert!(caps.can_delete);
    }

    #[test]
    fn admin_can_delete_but_not_edit_others_reviews() {
        let author = UserId::random();
        let caps = ReviewCapabilities::for_viewer(Some(&admin(UserId::random())), &author);
        assert!(!caps.can_edit);
        assert!(caps.can_delete);
    }

    #[test]
    fn stranger_has_no_capabilities() {
        let caps =
            ReviewCapabilities::for_viewer(Some(&member(UserId::random())), &UserId::random());
        assert_eq!(caps, ReviewCapabilities::anonymous());
    }

    #[test]
    fn anonymous_viewer_has_no_capabilities() {
        let caps = ReviewCapabilities::for_viewer(None, &UserId::random());
        assert!(!caps.can_edit);
        assert!(!caps.can_delete);
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn rejects_invalid_user_ids(#[case] raw: &str) {
        assert_eq!(UserId::new(raw), Err(UserIdError::InvalidId));
    }

    #[test]
    fn accepts_canonical_uuid() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }
}
