//! RosterHandler - Participants joining and leaving a session.

use std::sync::Arc;

use tracing::debug;

use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{CommandMetadata, EventId, SessionId, Timestamp, UserId};
use crate::domain::presentation::PresentationError;
use crate::domain::session::{
    JoinOutcome, Participant, ParticipantJoined, ParticipantLeft, ParticipantRole,
};
use crate::ports::EventPublisher;

use super::super::publish::publish;

#[derive(Debug, Clone)]
pub struct JoinSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
    /// Defaults to attendee.
    pub role: Option<ParticipantRole>,
}

#[derive(Debug, Clone)]
pub struct LeaveSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct JoinSessionResult {
    pub participant: Participant,
    pub outcome: JoinOutcome,
    pub active_participants: usize,
}

#[derive(Debug, Clone)]
pub struct LeaveSessionResult {
    /// False when the user was never on the roster.
    pub was_participant: bool,
    pub active_participants: usize,
}

pub struct RosterHandler {
    mutator: Arc<PresentationMutator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RosterHandler {
    pub fn new(mutator: Arc<PresentationMutator>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            mutator,
            event_publisher,
        }
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if the session is unknown to the tenant
    /// - `InvalidState` if the session is completed or cancelled
    pub async fn join(
        &self,
        cmd: JoinSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<JoinSessionResult, PresentationError> {
        let role = cmd.role.unwrap_or_default();
        let (presentation, (outcome, now)) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.session_id.into(), |p| {
                let now = Timestamp::now();
                p.join_session(cmd.session_id, cmd.user_id.clone(), role, now)
                    .map(|outcome| (outcome, now))
            })
            .await?;

        let session = presentation.session(cmd.session_id)?;
        let participant = session
            .participants()
            .get(&cmd.user_id)
            .cloned()
            .ok_or_else(|| PresentationError::infrastructure("participant missing after join"))?;

        debug!(
            session_id = %cmd.session_id,
            user_id = %cmd.user_id,
            ?outcome,
            "participant joined"
        );

        let event = ParticipantJoined {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            user_id: cmd.user_id.clone(),
            role: participant.role,
            rejoined: outcome == JoinOutcome::Rejoined,
            joined_at: now,
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(JoinSessionResult {
            participant,
            outcome,
            active_participants: session.participants().active_count(),
        })
    }

    /// Leaving a session the user never joined succeeds and changes nothing.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session is unknown to the tenant
    pub async fn leave(
        &self,
        cmd: LeaveSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<LeaveSessionResult, PresentationError> {
        let (presentation, (was_participant, now)) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.session_id.into(), |p| {
                let now = Timestamp::now();
                p.leave_session(cmd.session_id, &cmd.user_id, now)
                    .map(|was_participant| (was_participant, now))
            })
            .await?;
        let active_participants = presentation
            .session(cmd.session_id)?
            .participants()
            .active_count();

        if was_participant {
            debug!(session_id = %cmd.session_id, user_id = %cmd.user_id, "participant left");
            let event = ParticipantLeft {
                event_id: EventId::new(),
                session_id: cmd.session_id,
                user_id: cmd.user_id.clone(),
                left_at: now,
            };
            publish(self.event_publisher.as_ref(), &metadata, &event).await;
        }

        Ok(LeaveSessionResult {
            was_participant,
            active_participants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;

    fn join(session_id: SessionId, name: &str, role: Option<ParticipantRole>) -> JoinSessionCommand {
        JoinSessionCommand {
            session_id,
            user_id: Harness::user(name),
            role,
        }
    }

    #[tokio::test]
    async fn rejoin_reactivates_single_record() {
        let h = Harness::new();
        let (presentation_id, session_id) = h.seed_running_session(1).await;
        let handler = RosterHandler::new(h.mutator.clone(), h.publisher());

        handler
            .join(join(session_id, "ana", Some(ParticipantRole::Moderator)), Harness::metadata())
            .await
            .unwrap();
        handler
            .leave(
                LeaveSessionCommand {
                    session_id,
                    user_id: Harness::user("ana"),
                },
                Harness::metadata(),
            )
            .await
            .unwrap();
        let rejoined = handler
            .join(join(session_id, "ana", None), Harness::metadata())
            .await
            .unwrap();

        assert_eq!(rejoined.outcome, JoinOutcome::Rejoined);
        assert_eq!(rejoined.participant.role, ParticipantRole::Moderator);
        assert!(rejoined.participant.is_active);

        let stored = h.reload(presentation_id).await;
        assert_eq!(stored.session(session_id).unwrap().participants().len(), 1);
    }

    #[tokio::test]
    async fn leave_unknown_user_is_not_an_error() {
        let h = Harness::new();
        let (_, session_id) = h.seed_running_session(1).await;
        let handler = RosterHandler::new(h.mutator.clone(), h.publisher());

        let result = handler
            .leave(
                LeaveSessionCommand {
                    session_id,
                    user_id: Harness::user("ghost"),
                },
                Harness::metadata(),
            )
            .await
            .unwrap();

        assert!(!result.was_participant);
        assert!(!h.bus.has_event("session.participant_left.v1"));
    }

    #[tokio::test]
    async fn join_defaults_to_attendee() {
        let h = Harness::new();
        let (_, session_id) = h.seed_session(1).await;
        let handler = RosterHandler::new(h.mutator.clone(), h.publisher());

        let result = handler
            .join(join(session_id, "ben", None), Harness::metadata())
            .await
            .unwrap();

        assert_eq!(result.participant.role, ParticipantRole::Attendee);
        assert_eq!(result.active_participants, 1);
    }
}
