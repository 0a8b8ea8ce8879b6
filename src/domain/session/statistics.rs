use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;

use super::SessionStatus;

/// Point-in-time activity snapshot of a single session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub current_slide: usize,
    /// Distinct users that ever joined.
    pub participant_count: usize,
    pub active_participant_count: usize,
    pub poll_activation_count: usize,
    pub total_responses: usize,
    /// Elapsed minutes for a running session, total minutes once completed.
    pub duration_minutes: f64,
}
