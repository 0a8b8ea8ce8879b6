//! SessionLifecycleHandler - Start, end and cancel a session.

use std::sync::Arc;

use tracing::info;

use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{CommandMetadata, EventId, PollId, SessionId, Timestamp};
use crate::domain::presentation::{PresentationError, Statistics};
use crate::domain::session::{Session, SessionCancelled, SessionEnded, SessionStarted};
use crate::ports::EventPublisher;

use super::super::publish::publish;

#[derive(Debug, Clone, Copy)]
pub struct StartSessionCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Copy)]
pub struct EndSessionCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Copy)]
pub struct CancelSessionCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone)]
pub struct EndSessionResult {
    pub session: Session,
    /// Polls that were still open and got closed at the end time.
    pub closed_polls: Vec<PollId>,
    /// Presentation statistics after folding in this session.
    pub statistics: Statistics,
}

pub struct SessionLifecycleHandler {
    mutator: Arc<PresentationMutator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SessionLifecycleHandler {
    pub fn new(mutator: Arc<PresentationMutator>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            mutator,
            event_publisher,
        }
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if the session is unknown to the tenant
    /// - `InvalidState` unless the session is scheduled
    pub async fn start(
        &self,
        cmd: StartSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, PresentationError> {
        let (presentation, now) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.session_id.into(), |p| {
                let now = Timestamp::now();
                p.start_session(cmd.session_id, now).map(|()| now)
            })
            .await?;
        let session = presentation.session(cmd.session_id)?.clone();

        info!(session_id = %cmd.session_id, "session started");

        let event = SessionStarted {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            presentation_id: presentation.id(),
            started_at: now,
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(session)
    }

    /// Completes the session, closes open polls and updates statistics.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session is unknown to the tenant
    /// - `InvalidState` unless the session is in progress
    pub async fn end(
        &self,
        cmd: EndSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<EndSessionResult, PresentationError> {
        let (presentation, (closed_polls, now)) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.session_id.into(), |p| {
                let now = Timestamp::now();
                p.end_session(cmd.session_id, now)
                    .map(|closed_polls| (closed_polls, now))
            })
            .await?;
        let session = presentation.session(cmd.session_id)?.clone();
        let duration_minutes = session.duration_minutes().unwrap_or_default();

        info!(
            session_id = %cmd.session_id,
            duration_minutes,
            participants = session.participants().len(),
            closed_polls = closed_polls.len(),
            "session ended"
        );

        let event = SessionEnded {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            presentation_id: presentation.id(),
            duration_minutes,
            participant_count: session.participants().len(),
            closed_polls: closed_polls.clone(),
            ended_at: now,
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(EndSessionResult {
            session,
            closed_polls,
            statistics: *presentation.statistics(),
        })
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if the session is unknown to the tenant
    /// - `InvalidState` unless the session is scheduled
    pub async fn cancel(
        &self,
        cmd: CancelSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, PresentationError> {
        let (presentation, now) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.session_id.into(), |p| {
                let now = Timestamp::now();
                p.cancel_session(cmd.session_id, now).map(|()| now)
            })
            .await?;
        let session = presentation.session(cmd.session_id)?.clone();

        info!(session_id = %cmd.session_id, "session cancelled");

        let event = SessionCancelled {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            presentation_id: presentation.id(),
            cancelled_at: now,
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(session)
    }
}
