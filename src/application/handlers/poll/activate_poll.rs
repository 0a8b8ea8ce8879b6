//! ActivatePollHandler - Opens a poll in a running session.

use std::sync::Arc;

use tracing::info;

use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{
    CommandMetadata, EventId, PollActivationId, PollId, SessionId, SlideId, Timestamp,
};
use crate::domain::presentation::PresentationError;
use crate::domain::session::PollActivated;
use crate::ports::{EventPublisher, PollDefinitionReader};

use super::super::publish::publish;
use super::resolve_definition;

#[derive(Debug, Clone, Copy)]
pub struct ActivatePollCommand {
    pub session_id: SessionId,
    pub poll_id: PollId,
    /// Slide the poll is shown on. Defaults to the session's current slide.
    pub slide_id: Option<SlideId>,
}

#[derive(Debug, Clone)]
pub struct ActivatePollResult {
    pub activation_id: PollActivationId,
    pub slide_id: SlideId,
    /// Polls closed because only one poll may be open at a time.
    pub closed_polls: Vec<PollId>,
}

pub struct ActivatePollHandler {
    mutator: Arc<PresentationMutator>,
    poll_reader: Arc<dyn PollDefinitionReader>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ActivatePollHandler {
    pub fn new(
        mutator: Arc<PresentationMutator>,
        poll_reader: Arc<dyn PollDefinitionReader>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            mutator,
            poll_reader,
            event_publisher,
        }
    }

    /// # Errors
    ///
    /// - `PollNotFound` if the poll store has no such poll
    /// - `SessionNotFound` if the session is unknown to the tenant
    /// - `InvalidState` if the session is not in progress or polls are disabled
    /// - `SlideNotFound` if the given slide is not in the deck
    pub async fn handle(
        &self,
        cmd: ActivatePollCommand,
        metadata: CommandMetadata,
    ) -> Result<ActivatePollResult, PresentationError> {
        resolve_definition(self.poll_reader.as_ref(), &metadata.tenant_id, cmd.poll_id).await?;

        let (_, (activation, now)) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.session_id.into(), |p| {
                let now = Timestamp::now();
                p.activate_poll(cmd.session_id, cmd.poll_id, cmd.slide_id, now)
                    .map(|activation| (activation, now))
            })
            .await?;

        info!(
            session_id = %cmd.session_id,
            poll_id = %cmd.poll_id,
            closed = activation.closed_polls.len(),
            "poll activated"
        );

        let event = PollActivated {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            activation_id: activation.activation_id,
            poll_id: cmd.poll_id,
            slide_id: activation.slide_id,
            closed_polls: activation.closed_polls.clone(),
            activated_at: now,
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(ActivatePollResult {
            activation_id: activation.activation_id,
            slide_id: activation.slide_id,
            closed_polls: activation.closed_polls,
        })
    }
}
