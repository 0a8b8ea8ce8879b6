//! HTTP DTOs for session and poll endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PollId, PresentationId, SlideId, Timestamp};
use crate::domain::poll::{ActivePoll, ResponseValue, SubmissionOutcome};
use crate::domain::session::{
    JoinOutcome, Participant, ParticipantRole, Session, SessionStatistics, SessionStatus,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub presentation_id: PresentationId,
    pub title: Option<String>,
    /// RFC 3339. Defaults to now.
    pub scheduled_for: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AdvanceSlideRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct JoinSessionRequest {
    pub role: Option<ParticipantRole>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ActivatePollRequest {
    pub slide_id: Option<SlideId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponseRequest {
    pub value: ResponseValue,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantResponse {
    pub user_id: String,
    pub role: ParticipantRole,
    pub joined_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_at: Option<Timestamp>,
    pub is_active: bool,
}

impl From<&Participant> for ParticipantResponse {
    fn from(p: &Participant) -> Self {
        Self {
            user_id: p.user_id.to_string(),
            role: p.role,
            joined_at: p.joined_at,
            left_at: p.left_at,
            is_active: p.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PollActivationResponse {
    pub activation_id: String,
    pub poll_id: String,
    pub slide_id: String,
    pub activated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deactivated_at: Option<Timestamp>,
    pub is_active: bool,
    pub response_count: usize,
}

impl From<&ActivePoll> for PollActivationResponse {
    fn from(p: &ActivePoll) -> Self {
        Self {
            activation_id: p.id().to_string(),
            poll_id: p.poll_id().to_string(),
            slide_id: p.slide_id().to_string(),
            activated_at: p.activated_at(),
            deactivated_at: p.state().deactivated_at(),
            is_active: p.is_active(),
            response_count: p.response_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub presentation_id: String,
    pub host_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub status: SessionStatus,
    pub current_slide: usize,
    pub scheduled_for: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<Timestamp>,
    pub participants: Vec<ParticipantResponse>,
    pub polls: Vec<PollActivationResponse>,
    pub created_at: Timestamp,
}

impl From<&Session> for SessionResponse {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id().to_string(),
            presentation_id: s.presentation_id().to_string(),
            host_id: s.host_id().to_string(),
            title: s.title().map(str::to_string),
            status: s.status(),
            current_slide: s.current_slide(),
            scheduled_for: s.scheduled_for(),
            started_at: s.started_at(),
            ended_at: s.ended_at(),
            cancelled_at: s.cancelled_at(),
            participants: s
                .participants()
                .participants()
                .map(ParticipantResponse::from)
                .collect(),
            polls: s
                .polls()
                .activations()
                .iter()
                .map(PollActivationResponse::from)
                .collect(),
            created_at: s.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatisticsResponse {
    pub session_id: String,
    pub status: SessionStatus,
    pub current_slide: usize,
    pub participant_count: usize,
    pub active_participant_count: usize,
    pub poll_activation_count: usize,
    pub total_responses: usize,
    pub duration_minutes: f64,
}

impl From<SessionStatistics> for SessionStatisticsResponse {
    fn from(s: SessionStatistics) -> Self {
        Self {
            session_id: s.session_id.to_string(),
            status: s.status,
            current_slide: s.current_slide,
            participant_count: s.participant_count,
            active_participant_count: s.active_participant_count,
            poll_activation_count: s.poll_activation_count,
            total_responses: s.total_responses,
            duration_minutes: s.duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EndSessionResponse {
    pub session: SessionResponse,
    pub closed_polls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterResponse {
    pub participant: ParticipantResponse,
    pub outcome: JoinOutcome,
    pub active_participants: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LeaveResponse {
    pub was_participant: bool,
    pub active_participants: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivatePollResponse {
    pub activation_id: String,
    pub slide_id: String,
    pub closed_polls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeactivatePollResponse {
    pub activation_id: String,
    pub poll_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponseResponse {
    pub activation_id: String,
    pub outcome: SubmissionOutcome,
}

pub(super) fn poll_ids(ids: &[PollId]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}
