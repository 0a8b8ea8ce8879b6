//! DeactivatePollHandler - Closes an open poll.

use std::sync::Arc;

use tracing::info;

use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{
    CommandMetadata, EventId, PollActivationId, PollId, SessionId, Timestamp,
};
use crate::domain::presentation::PresentationError;
use crate::domain::session::PollDeactivated;
use crate::ports::EventPublisher;

use super::super::publish::publish;

#[derive(Debug, Clone, Copy)]
pub struct DeactivatePollCommand {
    pub session_id: SessionId,
    pub poll_id: PollId,
}

pub struct DeactivatePollHandler {
    mutator: Arc<PresentationMutator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl DeactivatePollHandler {
    pub fn new(mutator: Arc<PresentationMutator>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            mutator,
            event_publisher,
        }
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if the session is unknown to the tenant
    /// - `PollNotFound` if the poll has no open activation
    pub async fn handle(
        &self,
        cmd: DeactivatePollCommand,
        metadata: CommandMetadata,
    ) -> Result<PollActivationId, PresentationError> {
        let (_, (activation_id, now)) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.session_id.into(), |p| {
                let now = Timestamp::now();
                p.deactivate_poll(cmd.session_id, cmd.poll_id, now)
                    .map(|activation_id| (activation_id, now))
            })
            .await?;

        info!(session_id = %cmd.session_id, poll_id = %cmd.poll_id, "poll deactivated");

        let event = PollDeactivated {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            activation_id,
            poll_id: cmd.poll_id,
            deactivated_at: now,
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(activation_id)
    }
}
