//! Presentation query handlers.

use std::sync::Arc;

use crate::domain::foundation::{PresentationId, TenantId};
use crate::domain::presentation::{Presentation, PresentationError, PresentationSummary, Statistics};
use crate::ports::PresentationRepository;

#[derive(Debug, Clone)]
pub struct GetPresentationQuery {
    pub tenant_id: TenantId,
    pub presentation_id: PresentationId,
}

#[derive(Debug, Clone)]
pub struct ListPresentationsQuery {
    pub tenant_id: TenantId,
}

/// Handler for reading presentations, their listings and statistics.
pub struct GetPresentationHandler {
    repository: Arc<dyn PresentationRepository>,
}

impl GetPresentationHandler {
    pub fn new(repository: Arc<dyn PresentationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetPresentationQuery) -> Result<Presentation, PresentationError> {
        self.repository
            .find_by_id(&query.tenant_id, query.presentation_id)
            .await?
            .ok_or(PresentationError::PresentationNotFound(query.presentation_id))
    }

    pub async fn statistics(&self, query: GetPresentationQuery) -> Result<Statistics, PresentationError> {
        Ok(*self.handle(query).await?.statistics())
    }

    pub async fn list(
        &self,
        query: ListPresentationsQuery,
    ) -> Result<Vec<PresentationSummary>, PresentationError> {
        Ok(self.repository.list_by_tenant(&query.tenant_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;

    #[tokio::test]
    async fn get_is_tenant_scoped() {
        let h = Harness::new();
        let p = h.seed_presentation(1).await;
        let handler = GetPresentationHandler::new(h.repo.clone());

        let found = handler
            .handle(GetPresentationQuery {
                tenant_id: Harness::tenant(),
                presentation_id: p.id(),
            })
            .await
            .unwrap();
        assert_eq!(found.id(), p.id());

        let other = handler
            .handle(GetPresentationQuery {
                tenant_id: TenantId::new("globex").unwrap(),
                presentation_id: p.id(),
            })
            .await;
        assert_eq!(
            other.err(),
            Some(PresentationError::PresentationNotFound(p.id()))
        );
    }

    #[tokio::test]
    async fn list_returns_tenant_summaries() {
        let h = Harness::new();
        h.seed_presentation(2).await;
        h.seed_presentation(0).await;
        let handler = GetPresentationHandler::new(h.repo.clone());

        let summaries = handler
            .list(ListPresentationsQuery {
                tenant_id: Harness::tenant(),
            })
            .await
            .unwrap();
        assert_eq!(summaries.len(), 2);
    }

    #[tokio::test]
    async fn statistics_start_zeroed() {
        let h = Harness::new();
        let p = h.seed_presentation(1).await;
        let handler = GetPresentationHandler::new(h.repo.clone());

        let stats = handler
            .statistics(GetPresentationQuery {
                tenant_id: Harness::tenant(),
                presentation_id: p.id(),
            })
            .await
            .unwrap();
        assert_eq!(stats, Statistics::default());
    }
}
