//! In-memory poll definition catalog.
//!
//! Stands in for the external poll store. The binary can seed it from a JSON
//! file shaped as `{ "<tenant>": [<PollDefinition>, ...] }`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PollId, TenantId};
use crate::domain::poll::PollDefinition;
use crate::ports::PollDefinitionReader;

type Catalog = HashMap<TenantId, HashMap<PollId, PollDefinition>>;

#[derive(Debug, Clone, Default)]
pub struct InMemoryPollCatalog {
    polls: Arc<RwLock<Catalog>>,
}

impl InMemoryPollCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog file.
    ///
    /// # Errors
    ///
    /// - `INTERNAL_ERROR` if the file cannot be read or parsed
    pub async fn from_file(path: &Path) -> Result<Self, DomainError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to read poll catalog {}: {}", path.display(), e),
            )
        })?;
        let by_tenant: HashMap<TenantId, Vec<PollDefinition>> = serde_json::from_str(&raw)
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Invalid poll catalog {}: {}", path.display(), e),
                )
            })?;

        let catalog = Self::new();
        for (tenant_id, polls) in by_tenant {
            for poll in polls {
                catalog.insert(&tenant_id, poll).await;
            }
        }
        Ok(catalog)
    }

    pub async fn insert(&self, tenant_id: &TenantId, poll: PollDefinition) {
        self.polls
            .write()
            .await
            .entry(tenant_id.clone())
            .or_default()
            .insert(poll.id, poll);
    }

    /// Drops a definition, returning it if it existed.
    pub async fn remove(&self, tenant_id: &TenantId, poll_id: PollId) -> Option<PollDefinition> {
        self.polls
            .write()
            .await
            .get_mut(tenant_id)
            .and_then(|polls| polls.remove(&poll_id))
    }

    pub async fn len(&self) -> usize {
        self.polls.read().await.values().map(HashMap::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PollDefinitionReader for InMemoryPollCatalog {
    async fn find(
        &self,
        tenant_id: &TenantId,
        poll_id: PollId,
    ) -> Result<Option<PollDefinition>, DomainError> {
        Ok(self
            .polls
            .read()
            .await
            .get(tenant_id)
            .and_then(|polls| polls.get(&poll_id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::poll::AnswerKind;

    fn tenant(name: &str) -> TenantId {
        TenantId::new(name).unwrap()
    }

    #[tokio::test]
    async fn lookups_are_tenant_scoped() {
        let catalog = InMemoryPollCatalog::new();
        let poll = PollDefinition::new(PollId::new(), "Ready?", AnswerKind::FreeText);
        catalog.insert(&tenant("acme"), poll.clone()).await;

        assert_eq!(
            catalog.find(&tenant("acme"), poll.id).await.unwrap(),
            Some(poll.clone())
        );
        assert_eq!(catalog.find(&tenant("globex"), poll.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn removed_definition_is_no_longer_found() {
        let catalog = InMemoryPollCatalog::new();
        let poll = PollDefinition::new(PollId::new(), "Ready?", AnswerKind::FreeText);
        catalog.insert(&tenant("acme"), poll.clone()).await;

        assert_eq!(catalog.remove(&tenant("globex"), poll.id).await, None);
        assert_eq!(catalog.remove(&tenant("acme"), poll.id).await, Some(poll.clone()));
        assert_eq!(catalog.find(&tenant("acme"), poll.id).await.unwrap(), None);
        assert!(catalog.is_empty().await);
    }

    #[tokio::test]
    async fn loads_catalog_file() {
        let poll_id = PollId::new();
        let path = std::env::temp_dir().join(format!("poll-catalog-{}.json", poll_id));
        let body = format!(
            r#"{{"acme": [{{"id": "{}", "question": "Rate us", "answer_kind": {{"kind": "rating", "min": 1, "max": 5}}}}]}}"#,
            poll_id
        );
        tokio::fs::write(&path, body).await.unwrap();

        let catalog = InMemoryPollCatalog::from_file(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        let poll = catalog.find(&tenant("acme"), poll_id).await.unwrap().unwrap();
        assert_eq!(poll.answer_kind, AnswerKind::Rating { min: 1, max: 5 });
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let result = InMemoryPollCatalog::from_file(Path::new("/nonexistent/polls.json")).await;
        assert!(result.is_err());
    }
}
