//! Live poll activations within a session.
//!
//! A session keeps the full history of activations. At most one of them is
//! in the `Active` state at any instant; activating a poll closes whatever
//! was open before it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PollActivationId, PollId, SlideId, Timestamp, UserId};
use crate::domain::presentation::PresentationError;

use super::{Response, ResponseValue, SubmissionOutcome};

/// Lifecycle of a single activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PollState {
    Active,
    Deactivated { at: Timestamp },
}

impl PollState {
    pub fn is_active(&self) -> bool {
        matches!(self, PollState::Active)
    }

    pub fn deactivated_at(&self) -> Option<Timestamp> {
        match self {
            PollState::Active => None,
            PollState::Deactivated { at } => Some(*at),
        }
    }
}

/// One activation of an external poll from a slide of the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePoll {
    id: PollActivationId,
    poll_id: PollId,
    slide_id: SlideId,
    activated_at: Timestamp,
    state: PollState,
    responses: BTreeMap<UserId, Response>,
}

impl ActivePoll {
    fn open(poll_id: PollId, slide_id: SlideId, now: Timestamp) -> Self {
        Self {
            id: PollActivationId::new(),
            poll_id,
            slide_id,
            activated_at: now,
            state: PollState::Active,
            responses: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> PollActivationId {
        self.id
    }

    pub fn poll_id(&self) -> PollId {
        self.poll_id
    }

    pub fn slide_id(&self) -> SlideId {
        self.slide_id
    }

    pub fn activated_at(&self) -> Timestamp {
        self.activated_at
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn response_count(&self) -> usize {
        self.responses.len()
    }

    pub fn response_for(&self, user_id: &UserId) -> Option<&Response> {
        self.responses.get(user_id)
    }

    /// Responses ordered by submission time.
    pub fn responses(&self) -> Vec<&Response> {
        let mut responses: Vec<&Response> = self.responses.values().collect();
        responses.sort_by_key(|r| r.submitted_at);
        responses
    }

    fn close(&mut self, at: Timestamp) -> bool {
        if self.state.is_active() {
            self.state = PollState::Deactivated { at };
            true
        } else {
            false
        }
    }

    fn upsert(&mut self, user_id: UserId, value: ResponseValue, now: Timestamp) -> SubmissionOutcome {
        match self.responses.get_mut(&user_id) {
            Some(existing) => {
                existing.value = value;
                existing.submitted_at = now;
                SubmissionOutcome::Replaced
            }
            None => {
                self.responses.insert(
                    user_id.clone(),
                    Response {
                        user_id,
                        value,
                        submitted_at: now,
                    },
                );
                SubmissionOutcome::Created
            }
        }
    }

    fn tally(&self) -> ResponseTally {
        let mut tally = ResponseTally::default();
        let mut rating_sum = 0u64;
        let mut rating_count = 0u64;

        for response in self.responses.values() {
            match &response.value {
                ResponseValue::SingleChoice { option } => {
                    *tally.choice_counts.entry(option.clone()).or_default() += 1;
                }
                ResponseValue::MultiChoice { options } => {
                    for option in options {
                        *tally.choice_counts.entry(option.clone()).or_default() += 1;
                    }
                }
                ResponseValue::FreeText { .. } => tally.free_text_count += 1,
                ResponseValue::Rating { value } => {
                    rating_sum += u64::from(*value);
                    rating_count += 1;
                }
            }
        }

        if rating_count > 0 {
            tally.rating_mean = Some(rating_sum as f64 / rating_count as f64);
        }
        tally
    }
}

/// Aggregated view of the answers to one activation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseTally {
    pub choice_counts: BTreeMap<String, u32>,
    pub free_text_count: u32,
    pub rating_mean: Option<f64>,
}

/// Results snapshot of the most recent activation of a poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResults {
    pub activation_id: PollActivationId,
    pub poll_id: PollId,
    pub slide_id: SlideId,
    pub activated_at: Timestamp,
    pub deactivated_at: Option<Timestamp>,
    pub is_active: bool,
    pub responses: Vec<Response>,
    pub response_count: usize,
    pub tally: ResponseTally,
}

/// The poll activation controller owned by a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollBoard {
    activations: Vec<ActivePoll>,
}

impl PollBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// All activations, oldest first.
    pub fn activations(&self) -> &[ActivePoll] {
        &self.activations
    }

    /// The currently open activation, if any.
    pub fn active(&self) -> Option<&ActivePoll> {
        self.activations.iter().find(|p| p.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.activations.iter().filter(|p| p.is_active()).count()
    }

    pub fn total_responses(&self) -> usize {
        self.activations.iter().map(ActivePoll::response_count).sum()
    }

    /// Opens a new activation after closing every open one.
    ///
    /// Returns the new activation id and the polls that were closed.
    pub fn activate(
        &mut self,
        poll_id: PollId,
        slide_id: SlideId,
        now: Timestamp,
    ) -> (PollActivationId, Vec<PollId>) {
        let closed = self.close_all(now);
        let activation = ActivePoll::open(poll_id, slide_id, now);
        let id = activation.id;
        self.activations.push(activation);
        (id, closed)
    }

    /// Closes the open activation of `poll_id`.
    ///
    /// # Errors
    ///
    /// - `PollNotFound` if the poll has no open activation
    pub fn deactivate(
        &mut self,
        poll_id: PollId,
        now: Timestamp,
    ) -> Result<PollActivationId, PresentationError> {
        let activation = self
            .activations
            .iter_mut()
            .find(|p| p.poll_id == poll_id && p.is_active())
            .ok_or(PresentationError::PollNotFound(poll_id))?;
        activation.close(now);
        Ok(activation.id)
    }

    /// Closes every open activation, returning the ids of the closed polls.
    pub fn close_all(&mut self, now: Timestamp) -> Vec<PollId> {
        self.activations
            .iter_mut()
            .filter_map(|p| p.close(now).then_some(p.poll_id))
            .collect()
    }

    /// Records or replaces `user_id`'s answer on the open activation of `poll_id`.
    ///
    /// # Errors
    ///
    /// - `PollNotActive` if the poll has no open activation
    pub fn submit(
        &mut self,
        poll_id: PollId,
        user_id: UserId,
        value: ResponseValue,
        now: Timestamp,
    ) -> Result<(PollActivationId, SubmissionOutcome), PresentationError> {
        let activation = self
            .activations
            .iter_mut()
            .find(|p| p.poll_id == poll_id && p.is_active())
            .ok_or(PresentationError::PollNotActive(poll_id))?;
        let outcome = activation.upsert(user_id, value, now);
        Ok((activation.id, outcome))
    }

    /// Results of the most recent activation of `poll_id`, open or closed.
    ///
    /// # Errors
    ///
    /// - `PollNotFound` if the poll was never activated in this session
    pub fn results(&self, poll_id: PollId) -> Result<PollResults, PresentationError> {
        let activation = self
            .activations
            .iter()
            .rev()
            .find(|p| p.poll_id == poll_id)
            .ok_or(PresentationError::PollNotFound(poll_id))?;

        let responses: Vec<Response> = activation.responses().into_iter().cloned().collect();
        Ok(PollResults {
            activation_id: activation.id,
            poll_id: activation.poll_id,
            slide_id: activation.slide_id,
            activated_at: activation.activated_at,
            deactivated_at: activation.state.deactivated_at(),
            is_active: activation.is_active(),
            response_count: responses.len(),
            responses,
            tally: activation.tally(),
        })
    }
}
