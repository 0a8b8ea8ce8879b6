//! Session entity.
//!
//! A session is one live occurrence of a presentation. It is embedded in the
//! presentation aggregate and only reachable through it, so every mutation
//! here is serialized by the presentation's revision.
//!
//! # Invariants
//!
//! - status moves only along `SessionStatus` transitions
//! - at most one participant record per user
//! - at most one open poll activation

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    PollActivationId, PollId, PresentationId, SessionId, SlideId, StateMachine, Timestamp, UserId,
};
use crate::domain::poll::{PollBoard, PollResults, ResponseValue, SubmissionOutcome};
use crate::domain::presentation::PresentationError;

use super::{JoinOutcome, ParticipantRole, Roster, SessionStatistics, SessionStatus};

/// Maximum length for an optional session title.
pub const MAX_SESSION_TITLE_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    presentation_id: PresentationId,
    host_id: UserId,
    title: Option<String>,
    scheduled_for: Timestamp,
    status: SessionStatus,
    current_slide: usize,
    started_at: Option<Timestamp>,
    ended_at: Option<Timestamp>,
    cancelled_at: Option<Timestamp>,
    participants: Roster,
    polls: PollBoard,
    created_at: Timestamp,
}

impl Session {
    /// Creates a scheduled session positioned on the first slide.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is blank or too long
    pub fn new(
        presentation_id: PresentationId,
        host_id: UserId,
        title: Option<String>,
        scheduled_for: Timestamp,
        now: Timestamp,
    ) -> Result<Self, PresentationError> {
        let title = match title {
            Some(t) => Some(Self::validate_title(t)?),
            None => None,
        };

        Ok(Self {
            id: SessionId::new(),
            presentation_id,
            host_id,
            title,
            scheduled_for,
            status: SessionStatus::Scheduled,
            current_slide: 0,
            started_at: None,
            ended_at: None,
            cancelled_at: None,
            participants: Roster::new(),
            polls: PollBoard::new(),
            created_at: now,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        presentation_id: PresentationId,
        host_id: UserId,
        title: Option<String>,
        scheduled_for: Timestamp,
        status: SessionStatus,
        current_slide: usize,
        started_at: Option<Timestamp>,
        ended_at: Option<Timestamp>,
        cancelled_at: Option<Timestamp>,
        participants: Roster,
        polls: PollBoard,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            presentation_id,
            host_id,
            title,
            scheduled_for,
            status,
            current_slide,
            started_at,
            ended_at,
            cancelled_at,
            participants,
            polls,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn presentation_id(&self) -> PresentationId {
        self.presentation_id
    }

    pub fn host_id(&self) -> &UserId {
        &self.host_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn scheduled_for(&self) -> Timestamp {
        self.scheduled_for
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Timestamp> {
        self.ended_at
    }

    pub fn cancelled_at(&self) -> Option<Timestamp> {
        self.cancelled_at
    }

    pub fn participants(&self) -> &Roster {
        &self.participants
    }

    pub fn polls(&self) -> &PollBoard {
        &self.polls
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Minutes between start and end, once the session has completed.
    pub fn duration_minutes(&self) -> Option<f64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some(end.minutes_since(&start)),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts a scheduled session on its first slide.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the session is scheduled
    pub fn start(&mut self, now: Timestamp) -> Result<(), PresentationError> {
        self.transition(SessionStatus::InProgress)?;
        self.started_at = Some(now);
        self.current_slide = 0;
        Ok(())
    }

    /// Moves the current slide pointer. Returns the previous index.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the session is in progress
    /// - `InvalidIndex` if `index >= slide_count`
    pub fn advance_slide(
        &mut self,
        index: usize,
        slide_count: usize,
    ) -> Result<usize, PresentationError> {
        self.ensure_in_progress("advance slides")?;
        if index >= slide_count {
            return Err(PresentationError::InvalidIndex {
                index,
                len: slide_count,
            });
        }
        let previous = self.current_slide;
        self.current_slide = index;
        Ok(previous)
    }

    /// Completes the session and closes every open poll at `now`.
    ///
    /// Returns the polls that were still open.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the session is in progress
    pub fn end(&mut self, now: Timestamp) -> Result<Vec<PollId>, PresentationError> {
        self.transition(SessionStatus::Completed)?;
        self.ended_at = Some(now);
        Ok(self.polls.close_all(now))
    }

    /// Cancels a session that has not started yet.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the session is scheduled
    pub fn cancel(&mut self, now: Timestamp) -> Result<(), PresentationError> {
        self.transition(SessionStatus::Cancelled)?;
        self.cancelled_at = Some(now);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Roster
    // ─────────────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// - `InvalidState` if the session is completed or cancelled
    pub fn join(
        &mut self,
        user_id: UserId,
        role: ParticipantRole,
        now: Timestamp,
    ) -> Result<JoinOutcome, PresentationError> {
        if self.status.is_terminal() {
            return Err(PresentationError::invalid_state(format!(
                "cannot join a {} session",
                self.status
            )));
        }
        Ok(self.participants.join(user_id, role, now))
    }

    /// Marks the user as gone. Unknown users are ignored.
    pub fn leave(&mut self, user_id: &UserId, now: Timestamp) -> bool {
        self.participants.leave(user_id, now)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Polls
    // ─────────────────────────────────────────────────────────────────────────

    /// Opens a poll from `slide_id`, closing whatever poll was open.
    ///
    /// The caller resolves the slide; this only checks the session state.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the session is in progress
    pub fn activate_poll(
        &mut self,
        poll_id: PollId,
        slide_id: SlideId,
        now: Timestamp,
    ) -> Result<(PollActivationId, Vec<PollId>), PresentationError> {
        self.ensure_in_progress("activate polls")?;
        Ok(self.polls.activate(poll_id, slide_id, now))
    }

    /// # Errors
    ///
    /// - `PollNotFound` if the poll has no open activation
    pub fn deactivate_poll(
        &mut self,
        poll_id: PollId,
        now: Timestamp,
    ) -> Result<PollActivationId, PresentationError> {
        self.polls.deactivate(poll_id, now)
    }

    /// # Errors
    ///
    /// - `PollNotActive` if the poll has no open activation
    pub fn submit_response(
        &mut self,
        poll_id: PollId,
        user_id: UserId,
        value: ResponseValue,
        now: Timestamp,
    ) -> Result<(PollActivationId, SubmissionOutcome), PresentationError> {
        self.polls.submit(poll_id, user_id, value, now)
    }

    pub fn poll_results(&self, poll_id: PollId) -> Result<PollResults, PresentationError> {
        self.polls.results(poll_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot of this session's activity as of `now`.
    ///
    /// A running session reports elapsed minutes so far.
    pub fn statistics(&self, now: Timestamp) -> SessionStatistics {
        let duration_minutes = match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => end.minutes_since(&start),
            (Some(start), None) if self.status.is_in_progress() => now.minutes_since(&start),
            _ => 0.0,
        };

        SessionStatistics {
            session_id: self.id,
            status: self.status,
            current_slide: self.current_slide,
            participant_count: self.participants.len(),
            active_participant_count: self.participants.active_count(),
            poll_activation_count: self.polls.activations().len(),
            total_responses: self.polls.total_responses(),
            duration_minutes,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn transition(&mut self, target: SessionStatus) -> Result<(), PresentationError> {
        self.status = self.status.transition_to(target).map_err(|e| {
            PresentationError::invalid_state(format!(
                "session is {}, cannot move to {}",
                e.from, e.to
            ))
        })?;
        Ok(())
    }

    fn ensure_in_progress(&self, action: &str) -> Result<(), PresentationError> {
        if self.status.is_in_progress() {
            Ok(())
        } else {
            Err(PresentationError::invalid_state(format!(
                "cannot {} while session is {}",
                action, self.status
            )))
        }
    }

    fn validate_title(title: String) -> Result<String, PresentationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(PresentationError::validation("title", "cannot be empty"));
        }
        if trimmed.chars().count() > MAX_SESSION_TITLE_LENGTH {
            return Err(PresentationError::validation(
                "title",
                format!("must be {} characters or less", MAX_SESSION_TITLE_LENGTH),
            ));
        }
        Ok(trimmed.to_string())
    }
}
