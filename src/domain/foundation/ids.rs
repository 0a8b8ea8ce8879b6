//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Declares a UUID-backed identifier with the standard constructors.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random ", stringify!($name), ".")]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Creates a ", stringify!($name), " from an existing UUID.")]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a presentation (the aggregate root).
    PresentationId
);

uuid_id!(
    /// Unique identifier for a live session of a presentation.
    SessionId
);

uuid_id!(
    /// Unique identifier for a slide within a deck.
    SlideId
);

uuid_id!(
    /// Identifier of an externally defined poll.
    PollId
);

uuid_id!(
    /// Identifier of one activation of a poll within a session.
    PollActivationId
);

uuid_id!(
    /// Identity of one published domain event, for consumer deduplication.
    EventId
);

/// User identifier (issued by the external identity provider).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tenant identifier. Immutable on every presentation and part of every lookup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Maximum accepted length for a tenant identifier.
    pub const MAX_LENGTH: usize = 64;

    /// Creates a new TenantId.
    ///
    /// Tenant ids are slugs: ASCII alphanumerics, `-` and `_`.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("tenant_id"));
        }
        if id.len() > Self::MAX_LENGTH {
            return Err(ValidationError::invalid_format(
                "tenant_id",
                format!("must be at most {} characters", Self::MAX_LENGTH),
            ));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::invalid_format(
                "tenant_id",
                "only ASCII letters, digits, '-' and '_' are allowed",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_generates_unique_values() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn presentation_id_parses_from_string() {
        let id = PresentationId::new();
        let parsed: PresentationId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn poll_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<PollId>().is_err());
    }

    #[test]
    fn slide_id_serializes_as_plain_uuid() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&SlideId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
        assert_eq!(UserId::new("user-1").unwrap().as_str(), "user-1");
    }

    #[test]
    fn tenant_id_accepts_slugs() {
        assert!(TenantId::new("acme-corp_01").is_ok());
    }

    #[test]
    fn tenant_id_rejects_invalid_characters() {
        assert!(TenantId::new("acme corp").is_err());
        assert!(TenantId::new("acme/corp").is_err());
        assert!(TenantId::new("").is_err());
    }

    #[test]
    fn tenant_id_rejects_overlong_values() {
        assert!(TenantId::new("a".repeat(TenantId::MAX_LENGTH + 1)).is_err());
    }
}
