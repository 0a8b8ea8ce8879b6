//! CreateSessionHandler - Schedules a new live session of a presentation.

use std::sync::Arc;

use tracing::info;

use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{CommandMetadata, EventId, PresentationId, Timestamp};
use crate::domain::presentation::PresentationError;
use crate::domain::session::{Session, SessionCreated};
use crate::ports::EventPublisher;

use super::super::publish::publish;

/// Command to schedule a session. The acting user becomes the host.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub presentation_id: PresentationId,
    pub title: Option<String>,
    /// Defaults to now.
    pub scheduled_for: Option<Timestamp>,
}

#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    pub session: Session,
    pub event: SessionCreated,
}

pub struct CreateSessionHandler {
    mutator: Arc<PresentationMutator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateSessionHandler {
    pub fn new(mutator: Arc<PresentationMutator>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            mutator,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateSessionResult, PresentationError> {
        let (presentation, session_id) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.presentation_id.into(), |p| {
                let now = Timestamp::now();
                let scheduled_for = cmd.scheduled_for.unwrap_or(now);
                p.create_session(metadata.user_id.clone(), cmd.title.clone(), scheduled_for, now)
            })
            .await?;
        let session = presentation.session(session_id)?.clone();

        info!(
            session_id = %session_id,
            presentation_id = %presentation.id(),
            host_id = %metadata.user_id,
            "session scheduled"
        );

        let event = SessionCreated {
            event_id: EventId::new(),
            session_id,
            presentation_id: presentation.id(),
            host_id: metadata.user_id.clone(),
            scheduled_for: session.scheduled_for(),
            created_at: session.created_at(),
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(CreateSessionResult { session, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::domain::session::SessionStatus;

    #[tokio::test]
    async fn creates_scheduled_session_hosted_by_caller() {
        let h = Harness::new();
        let p = h.seed_presentation(2).await;
        let handler = CreateSessionHandler::new(h.mutator.clone(), h.publisher());

        let result = handler
            .handle(
                CreateSessionCommand {
                    presentation_id: p.id(),
                    title: Some("Morning run".to_string()),
                    scheduled_for: None,
                },
                Harness::metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.session.status(), SessionStatus::Scheduled);
        assert_eq!(result.session.current_slide(), 0);
        assert_eq!(result.session.host_id().as_str(), "test-user");
        assert!(h.reload(p.id()).await.has_session(result.session.id()));
        assert!(h.bus.has_event("session.created.v1"));
    }

    #[tokio::test]
    async fn unknown_presentation_is_not_found() {
        let h = Harness::new();
        let handler = CreateSessionHandler::new(h.mutator.clone(), h.publisher());
        let missing = PresentationId::new();

        let result = handler
            .handle(
                CreateSessionCommand {
                    presentation_id: missing,
                    title: None,
                    scheduled_for: None,
                },
                Harness::metadata(),
            )
            .await;

        assert_eq!(
            result.err(),
            Some(PresentationError::PresentationNotFound(missing))
        );
    }
}
