//! Session query handlers.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, TenantId, Timestamp};
use crate::domain::presentation::PresentationError;
use crate::domain::session::{Session, SessionStatistics};
use crate::ports::PresentationRepository;

#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub tenant_id: TenantId,
    pub session_id: SessionId,
}

pub struct GetSessionHandler {
    repository: Arc<dyn PresentationRepository>,
}

impl GetSessionHandler {
    pub fn new(repository: Arc<dyn PresentationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<Session, PresentationError> {
        let presentation = self
            .repository
            .find_by_session(&query.tenant_id, query.session_id)
            .await?
            .ok_or(PresentationError::SessionNotFound(query.session_id))?;
        Ok(presentation.session(query.session_id)?.clone())
    }

    pub async fn statistics(
        &self,
        query: GetSessionQuery,
    ) -> Result<SessionStatistics, PresentationError> {
        Ok(self.handle(query).await?.statistics(Timestamp::now()))
    }
}
