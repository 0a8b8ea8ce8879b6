//! SubmitResponseHandler - Records a participant's answer to the open poll.

use std::sync::Arc;

use tracing::debug;

use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{
    CommandMetadata, EventId, PollActivationId, PollId, SessionId, Timestamp, UserId,
};
use crate::domain::poll::{ResponseValue, SubmissionOutcome};
use crate::domain::presentation::PresentationError;
use crate::domain::session::ResponseSubmitted;
use crate::ports::{EventPublisher, PollDefinitionReader};

use super::super::publish::publish;
use super::resolve_definition;

#[derive(Debug, Clone)]
pub struct SubmitResponseCommand {
    pub session_id: SessionId,
    pub poll_id: PollId,
    pub user_id: UserId,
    pub value: ResponseValue,
}

#[derive(Debug, Clone, Copy)]
pub struct SubmitResponseResult {
    pub activation_id: PollActivationId,
    pub outcome: SubmissionOutcome,
}

pub struct SubmitResponseHandler {
    mutator: Arc<PresentationMutator>,
    poll_reader: Arc<dyn PollDefinitionReader>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SubmitResponseHandler {
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

    /// A second submission by the same user replaces the first.
    ///
    /// # Errors
    ///
    /// - `PollNotFound` if the poll store has no such poll
    /// - `ValidationFailed` if the answer does not fit the poll
    /// - `SessionNotFound` if the session is unknown to the tenant
    /// - `PollNotActive` if the poll is not currently open in the session
    pub async fn handle(
        &self,
        cmd: SubmitResponseCommand,
        metadata: CommandMetadata,
    ) -> Result<SubmitResponseResult, PresentationError> {
        let definition =
            resolve_definition(self.poll_reader.as_ref(), &metadata.tenant_id, cmd.poll_id).await?;
        definition.validate_response(&cmd.value)?;

        let (_, ((activation_id, outcome), now)) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.session_id.into(), |p| {
                let now = Timestamp::now();
                p.submit_response(
                    cmd.session_id,
                    cmd.poll_id,
                    cmd.user_id.clone(),
                    cmd.value.clone(),
                    now,
                )
                .map(|recorded| (recorded, now))
            })
            .await?;

        debug!(
            session_id = %cmd.session_id,
            poll_id = %cmd.poll_id,
            user_id = %cmd.user_id,
            ?outcome,
            "response recorded"
        );

        let event = ResponseSubmitted {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            activation_id,
            poll_id: cmd.poll_id,
            user_id: cmd.user_id,
            outcome,
            submitted_at: now,
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(SubmitResponseResult {
            activation_id,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::poll::{
        ActivatePollCommand, ActivatePollHandler, DeactivatePollCommand, DeactivatePollHandler,
    };
    use crate::application::handlers::test_support::Harness;
    use crate::domain::poll::PollDefinition;

    struct Fixture {
        h: Harness,
        session_id: SessionId,
        poll: PollDefinition,
        handler: SubmitResponseHandler,
    }

    async fn fixture() -> Fixture {
        let h = Harness::new();
        let (_, session_id) = h.seed_running_session(1).await;
        let poll = h.seed_choice_poll().await;
        ActivatePollHandler::new(h.mutator.clone(), h.polls.clone(), h.publisher())
            .handle(
                ActivatePollCommand {
                    session_id,
                    poll_id: poll.id,
                    slide_id: None,
                },
                Harness::metadata(),
            )
            .await
            .unwrap();
        let handler = SubmitResponseHandler::new(h.mutator.clone(), h.polls.clone(), h.publisher());
        Fixture {
            h,
            session_id,
            poll,
            handler,
        }
    }

    fn answer(f: &Fixture, user: &str, option: &str) -> SubmitResponseCommand {
        SubmitResponseCommand {
            session_id: f.session_id,
            poll_id: f.poll.id,
            user_id: Harness::user(user),
            value: ResponseValue::SingleChoice {
                option: option.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn resubmission_replaces_answer() {
        let f = fixture().await;

        let first = f.handler.handle(answer(&f, "ana", "yes"), Harness::metadata()).await.unwrap();
        let second = f.handler.handle(answer(&f, "ana", "no"), Harness::metadata()).await.unwrap();

        assert_eq!(first.outcome, SubmissionOutcome::Created);
        assert_eq!(second.outcome, SubmissionOutcome::Replaced);
        assert_eq!(f.h.bus.events_of_type("session.response_submitted.v1").len(), 2);
    }

    #[tokio::test]
    async fn retried_submission_is_stamped_by_the_committing_attempt() {
        let f = fixture().await;
        f.h.lose_next_commit();

        f.handler.handle(answer(&f, "ana", "yes"), Harness::metadata()).await.unwrap();

        let events = f.h.bus.events_of_type("session.response_submitted.v1");
        assert_eq!(events.len(), 1);
        assert!(events[0].occurred_at > f.h.lost_commit_at());
    }

    #[tokio::test]
    async fn unknown_option_is_validation_failure() {
        let f = fixture().await;

        let result = f.handler.handle(answer(&f, "ana", "maybe"), Harness::metadata()).await;

        assert!(matches!(result, Err(PresentationError::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn closed_poll_rejects_submission() {
        let f = fixture().await;
        DeactivatePollHandler::new(f.h.mutator.clone(), f.h.publisher())
            .handle(
                DeactivatePollCommand {
                    session_id: f.session_id,
                    poll_id: f.poll.id,
                },
                Harness::metadata(),
            )
            .await
            .unwrap();

        let result = f.handler.handle(answer(&f, "ana", "yes"), Harness::metadata()).await;

        assert_eq!(result.err(), Some(PresentationError::PollNotActive(f.poll.id)));
    }
}
