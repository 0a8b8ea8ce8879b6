//! In-memory implementation of PresentationRepository.
//!
//! Used by tests and by the binary when no database is configured. The
//! compare-and-swap runs under the write lock, so it gives the same
//! guarantees as the PostgreSQL adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PresentationId, SessionId, TenantId};
use crate::domain::presentation::{Presentation, PresentationSummary};
use crate::ports::PresentationRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryPresentationRepository {
    presentations: Arc<RwLock<HashMap<PresentationId, Presentation>>>,
}

impl InMemoryPresentationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored presentations across all tenants.
    pub async fn len(&self) -> usize {
        self.presentations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.presentations.read().await.is_empty()
    }
}

#[async_trait]
impl PresentationRepository for InMemoryPresentationRepository {
    async fn save(
        &self,
        tenant_id: &TenantId,
        presentation: &Presentation,
    ) -> Result<(), DomainError> {
        if !presentation.belongs_to(tenant_id) {
            return Err(DomainError::validation(
                "tenant_id",
                "presentation belongs to a different tenant",
            ));
        }

        let mut presentations = self.presentations.write().await;
        if presentations.contains_key(&presentation.id()) {
            return Err(DomainError::conflict(format!(
                "Presentation {} already exists",
                presentation.id()
            )));
        }
        presentations.insert(presentation.id(), presentation.clone());
        Ok(())
    }

    async fn update(
        &self,
        tenant_id: &TenantId,
        presentation: &Presentation,
    ) -> Result<u64, DomainError> {
        let mut presentations = self.presentations.write().await;
        let stored = presentations
            .get_mut(&presentation.id())
            .filter(|p| p.belongs_to(tenant_id))
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PresentationNotFound,
                    format!("Presentation not found: {}", presentation.id()),
                )
            })?;

        if stored.revision() != presentation.revision() {
            return Err(DomainError::conflict(format!(
                "Presentation {} is at revision {}, update was based on {}",
                presentation.id(),
                stored.revision(),
                presentation.revision()
            )));
        }

        let revision = presentation.revision() + 1;
        let mut next = presentation.clone();
        next.set_revision(revision);
        *stored = next;
        Ok(revision)
    }

    async fn find_by_id(
        &self,
        tenant_id: &TenantId,
        id: PresentationId,
    ) -> Result<Option<Presentation>, DomainError> {
        Ok(self
            .presentations
            .read()
            .await
            .get(&id)
            .filter(|p| p.belongs_to(tenant_id))
            .cloned())
    }

    async fn find_by_session(
        &self,
        tenant_id: &TenantId,
        session_id: SessionId,
    ) -> Result<Option<Presentation>, DomainError> {
        Ok(self
            .presentations
            .read()
            .await
            .values()
            .find(|p| p.belongs_to(tenant_id) && p.has_session(session_id))
            .cloned())
    }

    async fn list_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<PresentationSummary>, DomainError> {
        let presentations = self.presentations.read().await;
        let mut summaries: Vec<PresentationSummary> = presentations
            .values()
            .filter(|p| p.belongs_to(tenant_id))
            .map(Presentation::summary)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::presentation::{NewSlide, PresentationSettings};

    fn tenant(name: &str) -> TenantId {
        TenantId::new(name).unwrap()
    }

    fn presentation(tenant_name: &str, title: &str) -> Presentation {
        Presentation::create(
            tenant(tenant_name),
            UserId::new("author").unwrap(),
            title.to_string(),
            None,
            vec![NewSlide::content("Intro")],
            PresentationSettings::default(),
            Timestamp::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_and_find_within_tenant() {
        let repo = InMemoryPresentationRepository::new();
        let p = presentation("acme", "Roadmap");
        repo.save(&tenant("acme"), &p).await.unwrap();

        let found = repo.find_by_id(&tenant("acme"), p.id()).await.unwrap();
        assert_eq!(found.map(|f| f.id()), Some(p.id()));
    }

    #[tokio::test]
    async fn other_tenant_cannot_see_presentation() {
        let repo = InMemoryPresentationRepository::new();
        let p = presentation("acme", "Roadmap");
        repo.save(&tenant("acme"), &p).await.unwrap();

        assert!(repo
            .find_by_id(&tenant("globex"), p.id())
            .await
            .unwrap()
            .is_none());
        assert!(repo.list_by_tenant(&tenant("globex")).await.unwrap().is_empty());

        let err = repo.update(&tenant("globex"), &p).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PresentationNotFound);
    }

    #[tokio::test]
    async fn save_under_wrong_tenant_is_rejected() {
        let repo = InMemoryPresentationRepository::new();
        let p = presentation("acme", "Roadmap");
        assert!(repo.save(&tenant("globex"), &p).await.is_err());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn update_advances_revision() {
        let repo = InMemoryPresentationRepository::new();
        let p = presentation("acme", "Roadmap");
        repo.save(&tenant("acme"), &p).await.unwrap();

        let revision = repo.update(&tenant("acme"), &p).await.unwrap();
        assert_eq!(revision, 1);

        let stored = repo.find_by_id(&tenant("acme"), p.id()).await.unwrap().unwrap();
        assert_eq!(stored.revision(), 1);
    }

    #[tokio::test]
    async fn stale_update_is_a_conflict() {
        let repo = InMemoryPresentationRepository::new();
        let p = presentation("acme", "Roadmap");
        repo.save(&tenant("acme"), &p).await.unwrap();

        let first = repo.find_by_id(&tenant("acme"), p.id()).await.unwrap().unwrap();
        let second = first.clone();
        repo.update(&tenant("acme"), &first).await.unwrap();

        let err = repo.update(&tenant("acme"), &second).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn find_by_session_locates_owner() {
        let repo = InMemoryPresentationRepository::new();
        let mut p = presentation("acme", "Roadmap");
        let now = Timestamp::now();
        let session_id = p
            .create_session(UserId::new("host").unwrap(), None, now, now)
            .unwrap();
        repo.save(&tenant("acme"), &p).await.unwrap();
        repo.save(&tenant("acme"), &presentation("acme", "Other"))
            .await
            .unwrap();

        let owner = repo
            .find_by_session(&tenant("acme"), session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.id(), p.id());
        assert!(repo
            .find_by_session(&tenant("globex"), session_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn list_orders_by_most_recent_update() {
        let repo = InMemoryPresentationRepository::new();
        let older = presentation("acme", "Older");
        let mut newer = presentation("acme", "Newer");
        newer
            .add_slide(NewSlide::content("Extra"), Timestamp::now().plus_minutes(1))
            .unwrap();
        repo.save(&tenant("acme"), &older).await.unwrap();
        repo.save(&tenant("acme"), &newer).await.unwrap();

        let titles: Vec<String> = repo
            .list_by_tenant(&tenant("acme"))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Newer".to_string(), "Older".to_string()]);
    }
}
