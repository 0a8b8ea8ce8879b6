//! Presentation aggregate root.
//!
//! A presentation owns its slide deck and every session run over it. It is
//! the unit of tenant isolation and of optimistic locking: each commit
//! compares and advances `revision`, so all session activity under one
//! presentation is totally ordered.
//!
//! # Invariants
//!
//! - `tenant_id` never changes after creation
//! - `title` is 1-200 characters after trimming
//! - slide positions are contiguous (see `SlideDeck`)
//! - each session belongs to this presentation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    PollActivationId, PollId, PresentationId, SessionId, SlideId, TenantId, Timestamp, UserId,
};
use crate::domain::poll::{PollResults, ResponseValue, SubmissionOutcome};
use crate::domain::session::{
    JoinOutcome, ParticipantRole, Session, SessionStatistics,
};

use super::{
    NewSlide, PresentationError, PresentationSettings, SemanticVersion, Slide, SlideDeck,
    SlidePatch, Statistics, StatisticsAggregator,
};

/// Maximum length for a presentation title.
pub const MAX_TITLE_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    id: PresentationId,
    tenant_id: TenantId,
    author_id: UserId,
    title: String,
    description: Option<String>,
    slides: SlideDeck,
    settings: PresentationSettings,
    version: SemanticVersion,
    is_published: bool,
    statistics: Statistics,
    sessions: BTreeMap<SessionId, Session>,
    /// Optimistic-locking counter, advanced by the repository on every commit.
    revision: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// Where a newly activated poll landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollActivation {
    pub activation_id: PollActivationId,
    pub slide_id: SlideId,
    pub closed_polls: Vec<PollId>,
}

/// Lightweight listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationSummary {
    pub id: PresentationId,
    pub title: String,
    pub version: SemanticVersion,
    pub is_published: bool,
    pub slide_count: usize,
    pub session_count: usize,
    pub updated_at: Timestamp,
}

impl Presentation {
    /// Creates an unpublished presentation at version 1.0.0.
    ///
    /// Initial slides are added in order with the usual deck rules; creating
    /// them does not count as an edit, so the version stays at 1.0.0.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` for a bad title, settings or slide
    /// - `InvalidIndex` if an initial slide asks for an impossible position
    pub fn create(
        tenant_id: TenantId,
        author_id: UserId,
        title: String,
        description: Option<String>,
        slides: Vec<NewSlide>,
        settings: PresentationSettings,
        now: Timestamp,
    ) -> Result<Self, PresentationError> {
        let title = Self::validate_title(&title)?;
        settings.validate()?;

        let mut presentation = Self {
            id: PresentationId::new(),
            tenant_id,
            author_id,
            title,
            description: description.filter(|d| !d.trim().is_empty()),
            slides: SlideDeck::new(),
            settings,
            version: SemanticVersion::INITIAL,
            is_published: false,
            statistics: Statistics::default(),
            sessions: BTreeMap::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        };

        for slide in slides {
            presentation.add_slide(slide, now)?;
        }
        presentation.version = SemanticVersion::INITIAL;

        Ok(presentation)
    }

    /// Reconstitute a presentation from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: PresentationId,
        tenant_id: TenantId,
        author_id: UserId,
        title: String,
        description: Option<String>,
        slides: SlideDeck,
        settings: PresentationSettings,
        version: SemanticVersion,
        is_published: bool,
        statistics: Statistics,
        sessions: BTreeMap<SessionId, Session>,
        revision: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            tenant_id,
            author_id,
            title,
            description,
            slides,
            settings,
            version,
            is_published,
            statistics,
            sessions,
            revision,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> PresentationId {
        self.id
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn slides(&self) -> &[Slide] {
        self.slides.slides()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn settings(&self) -> &PresentationSettings {
        &self.settings
    }

    pub fn version(&self) -> SemanticVersion {
        self.version
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn has_session(&self, session_id: SessionId) -> bool {
        self.sessions.contains_key(&session_id)
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if the session is not part of this presentation
    pub fn session(&self, session_id: SessionId) -> Result<&Session, PresentationError> {
        self.sessions
            .get(&session_id)
            .ok_or(PresentationError::SessionNotFound(session_id))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn belongs_to(&self, tenant_id: &TenantId) -> bool {
        &self.tenant_id == tenant_id
    }

    pub fn summary(&self) -> PresentationSummary {
        PresentationSummary {
            id: self.id,
            title: self.title.clone(),
            version: self.version,
            is_published: self.is_published,
            slide_count: self.slides.len(),
            session_count: self.sessions.len(),
            updated_at: self.updated_at,
        }
    }

    /// Set by the repository after a successful commit.
    pub(crate) fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Slide deck
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a slide and bumps the patch version.
    pub fn add_slide(&mut self, slide: NewSlide, now: Timestamp) -> Result<Slide, PresentationError> {
        let added = self.slides.add(slide)?.clone();
        self.edited(now);
        Ok(added)
    }

    /// Merges `patch` into the slide at `index` and bumps the patch version.
    pub fn update_slide(
        &mut self,
        index: usize,
        patch: SlidePatch,
        now: Timestamp,
    ) -> Result<Slide, PresentationError> {
        let updated = self.slides.update(index, patch)?.clone();
        self.edited(now);
        Ok(updated)
    }

    /// Removes the slide at `index` and bumps the patch version.
    pub fn remove_slide(&mut self, index: usize, now: Timestamp) -> Result<Slide, PresentationError> {
        let removed = self.slides.remove(index)?;
        self.edited(now);
        Ok(removed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Publication
    // ─────────────────────────────────────────────────────────────────────────

    /// Publishes the presentation as a new minor version.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if already published
    pub fn publish(&mut self, now: Timestamp) -> Result<(), PresentationError> {
        if self.is_published {
            return Err(PresentationError::invalid_state(
                "presentation is already published",
            ));
        }
        self.is_published = true;
        self.version = self.version.bump_minor();
        self.updated_at = now;
        Ok(())
    }

    /// # Errors
    ///
    /// - `InvalidState` if not published
    pub fn unpublish(&mut self, now: Timestamp) -> Result<(), PresentationError> {
        if !self.is_published {
            return Err(PresentationError::invalid_state(
                "presentation is not published",
            ));
        }
        self.is_published = false;
        self.updated_at = now;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    pub fn create_session(
        &mut self,
        host_id: UserId,
        title: Option<String>,
        scheduled_for: Timestamp,
        now: Timestamp,
    ) -> Result<SessionId, PresentationError> {
        let session = Session::new(self.id, host_id, title, scheduled_for, now)?;
        let id = session.id();
        self.sessions.insert(id, session);
        self.updated_at = now;
        Ok(id)
    }

    pub fn start_session(
        &mut self,
        session_id: SessionId,
        now: Timestamp,
    ) -> Result<(), PresentationError> {
        self.session_mut(session_id)?.start(now)?;
        self.updated_at = now;
        Ok(())
    }

    /// Returns the previous slide index.
    pub fn advance_slide(
        &mut self,
        session_id: SessionId,
        index: usize,
        now: Timestamp,
    ) -> Result<usize, PresentationError> {
        let slide_count = self.slides.len();
        let previous = self.session_mut(session_id)?.advance_slide(index, slide_count)?;
        self.updated_at = now;
        Ok(previous)
    }

    /// Completes the session and folds it into the statistics.
    ///
    /// Returns the polls that were closed implicitly.
    pub fn end_session(
        &mut self,
        session_id: SessionId,
        now: Timestamp,
    ) -> Result<Vec<PollId>, PresentationError> {
        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(PresentationError::SessionNotFound(session_id))?;
        let closed = session.end(now)?;
        StatisticsAggregator::on_session_end(&mut self.statistics, session);
        self.updated_at = now;
        Ok(closed)
    }

    pub fn cancel_session(
        &mut self,
        session_id: SessionId,
        now: Timestamp,
    ) -> Result<(), PresentationError> {
        self.session_mut(session_id)?.cancel(now)?;
        self.updated_at = now;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Roster
    // ─────────────────────────────────────────────────────────────────────────

    pub fn join_session(
        &mut self,
        session_id: SessionId,
        user_id: UserId,
        role: ParticipantRole,
        now: Timestamp,
    ) -> Result<JoinOutcome, PresentationError> {
        let outcome = self.session_mut(session_id)?.join(user_id, role, now)?;
        self.updated_at = now;
        Ok(outcome)
    }

    /// Returns false if the user was never on the roster.
    pub fn leave_session(
        &mut self,
        session_id: SessionId,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<bool, PresentationError> {
        let left = self.session_mut(session_id)?.leave(user_id, now);
        if left {
            self.updated_at = now;
        }
        Ok(left)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Polls
    // ─────────────────────────────────────────────────────────────────────────

    /// Opens `poll_id` from `slide_id`, or from the current slide when omitted.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session is unknown
    /// - `InvalidState` if the session is not in progress or polls are disabled
    /// - `SlideNotFound` if `slide_id` is not in the deck
    /// - `InvalidIndex` if no slide was given and the deck is empty
    pub fn activate_poll(
        &mut self,
        session_id: SessionId,
        poll_id: PollId,
        slide_id: Option<SlideId>,
        now: Timestamp,
    ) -> Result<PollActivation, PresentationError> {
        let session = self.session(session_id)?;
        if !session.status().is_in_progress() {
            return Err(PresentationError::invalid_state(format!(
                "cannot activate polls while session is {}",
                session.status()
            )));
        }
        if !self.settings.allow_polls {
            return Err(PresentationError::invalid_state(
                "polls are disabled for this presentation",
            ));
        }

        let slide_id = match slide_id {
            Some(id) => {
                self.slides
                    .find(id)
                    .ok_or(PresentationError::SlideNotFound(id))?
                    .id
            }
            None => {
                let index = session.current_slide();
                self.slides
                    .get(index)
                    .ok_or(PresentationError::InvalidIndex {
                        index,
                        len: self.slides.len(),
                    })?
                    .id
            }
        };

        let (activation_id, closed_polls) =
            self.session_mut(session_id)?.activate_poll(poll_id, slide_id, now)?;
        self.updated_at = now;
        Ok(PollActivation {
            activation_id,
            slide_id,
            closed_polls,
        })
    }

    pub fn deactivate_poll(
        &mut self,
        session_id: SessionId,
        poll_id: PollId,
        now: Timestamp,
    ) -> Result<PollActivationId, PresentationError> {
        let activation = self.session_mut(session_id)?.deactivate_poll(poll_id, now)?;
        self.updated_at = now;
        Ok(activation)
    }

    /// Records a participant's answer. The value must already be validated
    /// against the poll definition.
    pub fn submit_response(
        &mut self,
        session_id: SessionId,
        poll_id: PollId,
        user_id: UserId,
        value: ResponseValue,
        now: Timestamp,
    ) -> Result<(PollActivationId, SubmissionOutcome), PresentationError> {
        let result = self
            .session_mut(session_id)?
            .submit_response(poll_id, user_id, value, now)?;
        self.updated_at = now;
        Ok(result)
    }

    pub fn poll_results(
        &self,
        session_id: SessionId,
        poll_id: PollId,
    ) -> Result<PollResults, PresentationError> {
        self.session(session_id)?.poll_results(poll_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statistics
    // ─────────────────────────────────────────────────────────────────────────

    pub fn record_view(&mut self) {
        StatisticsAggregator::record_view(&mut self.statistics);
    }

    /// # Errors
    ///
    /// - `ValidationFailed` unless `1 <= rating <= 5`
    pub fn record_rating(&mut self, rating: u8) -> Result<(), PresentationError> {
        StatisticsAggregator::record_rating(&mut self.statistics, rating)?;
        Ok(())
    }

    pub fn session_statistics(
        &self,
        session_id: SessionId,
        now: Timestamp,
    ) -> Result<SessionStatistics, PresentationError> {
        Ok(self.session(session_id)?.statistics(now))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn session_mut(&mut self, session_id: SessionId) -> Result<&mut Session, PresentationError> {
        self.sessions
            .get_mut(&session_id)
            .ok_or(PresentationError::SessionNotFound(session_id))
    }

    fn edited(&mut self, now: Timestamp) {
        self.version = self.version.bump_patch();
        self.updated_at = now;
    }

    fn validate_title(title: &str) -> Result<String, PresentationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(PresentationError::validation("title", "cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(PresentationError::validation(
                "title",
                format!("must be {} characters or less", MAX_TITLE_LENGTH),
            ));
        }
        Ok(trimmed.to_string())
    }
}
