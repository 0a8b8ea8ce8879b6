//! Presentation repository port.
//!
//! One record per presentation, holding the whole aggregate including its
//! sessions. Every method is scoped by tenant: a presentation stored under
//! one tenant is invisible to every other tenant.
//!
//! # Concurrency
//!
//! `update` is a compare-and-swap on the aggregate revision. Callers load,
//! mutate and write back; a concurrent commit in between makes the write fail
//! with `CONCURRENCY_CONFLICT` instead of silently overwriting it.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PresentationId, SessionId, TenantId};
use crate::domain::presentation::{Presentation, PresentationSummary};

#[async_trait]
pub trait PresentationRepository: Send + Sync {
    /// Store a new presentation.
    ///
    /// # Errors
    ///
    /// - `CONCURRENCY_CONFLICT` if the id already exists
    /// - `DATABASE_ERROR` on persistence failure
    async fn save(&self, tenant_id: &TenantId, presentation: &Presentation)
        -> Result<(), DomainError>;

    /// Write back a mutated presentation if nobody committed since it was
    /// loaded. `presentation.revision()` is the revision it was loaded at.
    ///
    /// Returns the new revision.
    ///
    /// # Errors
    ///
    /// - `CONCURRENCY_CONFLICT` if the stored revision moved on
    /// - `PRESENTATION_NOT_FOUND` if there is nothing to update
    /// - `DATABASE_ERROR` on persistence failure
    async fn update(
        &self,
        tenant_id: &TenantId,
        presentation: &Presentation,
    ) -> Result<u64, DomainError>;

    async fn find_by_id(
        &self,
        tenant_id: &TenantId,
        id: PresentationId,
    ) -> Result<Option<Presentation>, DomainError>;

    /// Find the presentation that owns `session_id`.
    async fn find_by_session(
        &self,
        tenant_id: &TenantId,
        session_id: SessionId,
    ) -> Result<Option<Presentation>, DomainError>;

    /// Summaries of the tenant's presentations, most recently updated first.
    async fn list_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<PresentationSummary>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentation_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PresentationRepository) {}
    }
}
