//! Read-only lookup of externally authored poll definitions.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PollId, TenantId};
use crate::domain::poll::PollDefinition;

/// Port to the poll store. The engine never writes through it.
#[async_trait]
pub trait PollDefinitionReader: Send + Sync {
    /// Returns `None` if the poll does not exist for this tenant.
    async fn find(
        &self,
        tenant_id: &TenantId,
        poll_id: PollId,
    ) -> Result<Option<PollDefinition>, DomainError>;
}
