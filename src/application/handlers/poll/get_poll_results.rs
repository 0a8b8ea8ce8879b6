//! GetPollResultsHandler - Results of a poll's latest activation.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::foundation::{PollId, SessionId, TenantId};
use crate::domain::poll::{PollDefinition, PollResults};
use crate::domain::presentation::PresentationError;
use crate::ports::{PollDefinitionReader, PresentationRepository};

#[derive(Debug, Clone)]
pub struct GetPollResultsQuery {
    pub tenant_id: TenantId,
    pub session_id: SessionId,
    pub poll_id: PollId,
}

/// Results joined with the definition they answer, for display.
#[derive(Debug, Clone, Serialize)]
pub struct PollResultsView {
    /// `None` once the poll store has dropped the definition; the recorded
    /// responses are still reported.
    pub definition: Option<PollDefinition>,
    #[serde(flatten)]
    pub results: PollResults,
}

pub struct GetPollResultsHandler {
    repository: Arc<dyn PresentationRepository>,
    poll_reader: Arc<dyn PollDefinitionReader>,
}

impl GetPollResultsHandler {
    pub fn new(
        repository: Arc<dyn PresentationRepository>,
        poll_reader: Arc<dyn PollDefinitionReader>,
    ) -> Self {
        Self {
            repository,
            poll_reader,
        }
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if the session is unknown to the tenant
    /// - `PollNotFound` if the poll was never activated in the session
    pub async fn handle(
        &self,
        query: GetPollResultsQuery,
    ) -> Result<PollResultsView, PresentationError> {
        let presentation = self
            .repository
            .find_by_session(&query.tenant_id, query.session_id)
            .await?
            .ok_or(PresentationError::SessionNotFound(query.session_id))?;
        let results = presentation.poll_results(query.session_id, query.poll_id)?;
        let definition = self
            .poll_reader
            .find(&query.tenant_id, query.poll_id)
            .await?;
        if definition.is_none() {
            debug!(poll_id = %query.poll_id, "poll definition gone, reporting bare results");
        }

        Ok(PollResultsView {
            definition,
            results,
        })
    }
}
