//! Session domain events.
//!
//! Published by the session command handlers after a successful commit:
//! - `SessionCreated` / `SessionStarted` / `SessionEnded` / `SessionCancelled`
//! - `SlideAdvanced`
//! - `ParticipantJoined` / `ParticipantLeft`
//! - `PollActivated` / `PollDeactivated` / `ResponseSubmitted`

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, EventId, PollActivationId, PollId, PresentationId, SessionId, SlideId,
    Timestamp, UserId,
};
use crate::domain::poll::SubmissionOutcome;

use super::ParticipantRole;

// ════════════════════════════════════════════════════════════════════════════
// Lifecycle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub presentation_id: PresentationId,
    pub host_id: UserId,
    pub scheduled_for: Timestamp,
    pub created_at: Timestamp,
}

domain_event!(
    SessionCreated,
    event_type = "session.created.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = created_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub presentation_id: PresentationId,
    pub started_at: Timestamp,
}

domain_event!(
    SessionStarted,
    event_type = "session.started.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = started_at,
    event_id = event_id
);

/// Published when a session completes.
///
/// `closed_polls` lists the polls that were still open and got closed
/// implicitly at `ended_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnded {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub presentation_id: PresentationId,
    pub duration_minutes: f64,
    pub participant_count: usize,
    pub closed_polls: Vec<PollId>,
    pub ended_at: Timestamp,
}

domain_event!(
    SessionEnded,
    event_type = "session.ended.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = ended_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCancelled {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub presentation_id: PresentationId,
    pub cancelled_at: Timestamp,
}

domain_event!(
    SessionCancelled,
    event_type = "session.cancelled.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = cancelled_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideAdvanced {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub from_index: usize,
    pub to_index: usize,
    pub advanced_at: Timestamp,
}

domain_event!(
    SlideAdvanced,
    event_type = "session.slide_advanced.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = advanced_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// Roster
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantJoined {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub role: ParticipantRole,
    pub rejoined: bool,
    pub joined_at: Timestamp,
}

domain_event!(
    ParticipantJoined,
    event_type = "session.participant_joined.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = joined_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantLeft {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub left_at: Timestamp,
}

domain_event!(
    ParticipantLeft,
    event_type = "session.participant_left.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = left_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// Polls
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollActivated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub activation_id: PollActivationId,
    pub poll_id: PollId,
    pub slide_id: SlideId,
    /// Polls closed to make room for this one.
    pub closed_polls: Vec<PollId>,
    pub activated_at: Timestamp,
}

domain_event!(
    PollActivated,
    event_type = "session.poll_activated.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = activated_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollDeactivated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub activation_id: PollActivationId,
    pub poll_id: PollId,
    pub deactivated_at: Timestamp,
}

domain_event!(
    PollDeactivated,
    event_type = "session.poll_deactivated.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = deactivated_at,
    event_id = event_id
);

/// Published for every accepted submission. The answer itself is not
/// included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSubmitted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub activation_id: PollActivationId,
    pub poll_id: PollId,
    pub user_id: UserId,
    pub outcome: SubmissionOutcome,
    pub submitted_at: Timestamp,
}

domain_event!(
    ResponseSubmitted,
    event_type = "session.response_submitted.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = submitted_at,
    event_id = event_id
);
