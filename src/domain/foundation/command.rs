//! Command infrastructure for CQRS handlers.
//!
//! `CommandMetadata` carries the acting user, the tenant the command is
//! scoped to and correlation context through every command handler.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EventEnvelope, EventMetadata, TenantId, UserId};

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Tenant every lookup and mutation is scoped to.
    pub tenant_id: TenantId,

    /// The user executing this command.
    pub user_id: UserId,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "http", "test").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for a tenant-scoped user.
    pub fn new(tenant_id: TenantId, user_id: UserId) -> Self {
        Self {
            tenant_id,
            user_id,
            correlation_id: None,
            source: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Stamps an outgoing event envelope with this command's context.
    pub fn stamp(&self, mut envelope: EventEnvelope) -> EventEnvelope {
        envelope.metadata = EventMetadata {
            correlation_id: Some(self.correlation_id()),
            user_id: Some(self.user_id.to_string()),
            tenant_id: Some(self.tenant_id.to_string()),
        };
        envelope
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture for tenant `acme` and user `test-user`.
    pub fn test_fixture() -> Self {
        Self::new(
            TenantId::new("acme").unwrap(),
            UserId::new("test-user").unwrap(),
        )
        .with_correlation_id("test-correlation")
        .with_source("test")
    }
}
