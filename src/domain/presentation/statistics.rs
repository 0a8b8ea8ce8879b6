//! Rolling presentation-level metrics.
//!
//! Only the aggregator below mutates `Statistics`, and only additively:
//! counters grow and averages fold in one new sample at a time using the
//! incremental mean `new = (old * (n - 1) + sample) / n`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::session::Session;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_sessions: u64,
    pub total_participants: u64,
    /// Rolling mean of completed session durations, in minutes.
    pub average_session_duration: f64,
    pub average_rating: f64,
    pub rating_count: u64,
    pub total_views: u64,
}

/// Folds session outcomes and collaborator-fed signals into `Statistics`.
pub struct StatisticsAggregator;

impl StatisticsAggregator {
    /// Folds a completed session into the rolling metrics.
    pub fn on_session_end(stats: &mut Statistics, session: &Session) {
        stats.total_sessions += 1;
        stats.total_participants += session.participants().len() as u64;

        if let Some(duration) = session.duration_minutes() {
            stats.average_session_duration =
                incremental_mean(stats.average_session_duration, duration, stats.total_sessions);
        }
    }

    pub fn record_view(stats: &mut Statistics) {
        stats.total_views += 1;
    }

    /// Folds one rating into the rolling average.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` unless `1 <= rating <= 5`
    pub fn record_rating(stats: &mut Statistics, rating: u8) -> Result<(), ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ValidationError::out_of_range(
                "rating",
                i64::from(MIN_RATING),
                i64::from(MAX_RATING),
                i64::from(rating),
            ));
        }
        stats.rating_count += 1;
        stats.average_rating =
            incremental_mean(stats.average_rating, f64::from(rating), stats.rating_count);
        Ok(())
    }
}

/// `n` is the sample count including `sample`.
fn incremental_mean(old: f64, sample: f64, n: u64) -> f64 {
    let n = n as f64;
    (old * (n - 1.0) + sample) / n
}
