//! SessionStatus enum for tracking the lifecycle of a live session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a live presentation session.
///
/// ```text
/// Scheduled ──► InProgress ──► Completed
///     │
///     └──────► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, SessionStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::InProgress => "in-progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

impl StateMachine for SessionStatus {
    fn successors(&self) -> &'static [Self] {
        use SessionStatus::*;
        match self {
            Scheduled => &[InProgress, Cancelled],
            InProgress => &[Completed],
            Completed | Cancelled => &[],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
