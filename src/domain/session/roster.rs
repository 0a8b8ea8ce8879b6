//! Participant roster of a session.
//!
//! Keyed by user, so a user has at most one record no matter how many times
//! they join. Leaving only flips the record to inactive.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// Role a participant plays in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantRole {
    Presenter,
    CoPresenter,
    #[default]
    Attendee,
    Moderator,
}

/// A user's membership record within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub role: ParticipantRole,
    pub joined_at: Timestamp,
    pub left_at: Option<Timestamp>,
    pub is_active: bool,
}

/// Outcome of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    Joined,
    Rejoined,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    participants: BTreeMap<UserId, Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `user_id`, or reactivates their existing record.
    ///
    /// A rejoining user keeps the role recorded on first join.
    pub fn join(&mut self, user_id: UserId, role: ParticipantRole, now: Timestamp) -> JoinOutcome {
        match self.participants.get_mut(&user_id) {
            Some(existing) => {
                existing.is_active = true;
                existing.left_at = None;
                JoinOutcome::Rejoined
            }
            None => {
                self.participants.insert(
                    user_id.clone(),
                    Participant {
                        user_id,
                        role,
                        joined_at: now,
                        left_at: None,
                        is_active: true,
                    },
                );
                JoinOutcome::Joined
            }
        }
    }

    /// Marks `user_id` as gone. Returns false when the user never joined.
    pub fn leave(&mut self, user_id: &UserId, now: Timestamp) -> bool {
        match self.participants.get_mut(user_id) {
            Some(participant) => {
                if participant.is_active {
                    participant.is_active = false;
                    participant.left_at = Some(now);
                }
                true
            }
            None => false,
        }
    }

    pub fn get(&self, user_id: &UserId) -> Option<&Participant> {
        self.participants.get(user_id)
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    /// Distinct users that ever joined.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.participants.values().filter(|p| p.is_active).count()
    }
}
