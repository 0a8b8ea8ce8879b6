//! AdvanceSlideHandler - Moves a running session to another slide.

use std::sync::Arc;

use tracing::debug;

use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{CommandMetadata, EventId, SessionId, Timestamp};
use crate::domain::presentation::PresentationError;
use crate::domain::session::{Session, SlideAdvanced};
use crate::ports::EventPublisher;

use super::super::publish::publish;

#[derive(Debug, Clone, Copy)]
pub struct AdvanceSlideCommand {
    pub session_id: SessionId,
    pub index: usize,
}

pub struct AdvanceSlideHandler {
    mutator: Arc<PresentationMutator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AdvanceSlideHandler {
    pub fn new(mutator: Arc<PresentationMutator>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            mutator,
            event_publisher,
        }
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if the session is unknown to the tenant
    /// - `InvalidState` unless the session is in progress
    /// - `InvalidIndex` if the index is outside the deck
    pub async fn handle(
        &self,
        cmd: AdvanceSlideCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, PresentationError> {
        let (presentation, (previous, now)) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.session_id.into(), |p| {
                let now = Timestamp::now();
                p.advance_slide(cmd.session_id, cmd.index, now)
                    .map(|previous| (previous, now))
            })
            .await?;
        let session = presentation.session(cmd.session_id)?.clone();

        debug!(
            session_id = %cmd.session_id,
            from = previous,
            to = cmd.index,
            "slide advanced"
        );

        let event = SlideAdvanced {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            from_index: previous,
            to_index: cmd.index,
            advanced_at: now,
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(session)
    }
}
