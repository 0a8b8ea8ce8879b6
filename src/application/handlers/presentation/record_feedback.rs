//! RecordFeedbackHandler - Views and ratings fed in by collaborators.

use std::sync::Arc;

use tracing::debug;

use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{CommandMetadata, EventId, PresentationId, Timestamp};
use crate::domain::presentation::{PresentationError, RatingRecorded, Statistics};
use crate::ports::EventPublisher;

use super::super::publish::publish;

#[derive(Debug, Clone)]
pub struct RecordViewCommand {
    pub presentation_id: PresentationId,
}

#[derive(Debug, Clone)]
pub struct RecordRatingCommand {
    pub presentation_id: PresentationId,
    pub rating: u8,
}

pub struct RecordFeedbackHandler {
    mutator: Arc<PresentationMutator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RecordFeedbackHandler {
    pub fn new(mutator: Arc<PresentationMutator>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            mutator,
            event_publisher,
        }
    }

    pub async fn record_view(
        &self,
        cmd: RecordViewCommand,
        metadata: CommandMetadata,
    ) -> Result<Statistics, PresentationError> {
        let (presentation, ()) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.presentation_id.into(), |p| {
                p.record_view();
                Ok(())
            })
            .await?;
        debug!(presentation_id = %presentation.id(), "view recorded");
        Ok(*presentation.statistics())
    }

    /// # Errors
    ///
    /// - `ValidationFailed` unless `1 <= rating <= 5`
    pub async fn record_rating(
        &self,
        cmd: RecordRatingCommand,
        metadata: CommandMetadata,
    ) -> Result<Statistics, PresentationError> {
        let (presentation, ()) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.presentation_id.into(), |p| {
                p.record_rating(cmd.rating)
            })
            .await?;
        let stats = *presentation.statistics();

        let event = RatingRecorded {
            event_id: EventId::new(),
            presentation_id: presentation.id(),
            rating: cmd.rating,
            average_rating: stats.average_rating,
            rating_count: stats.rating_count,
            recorded_at: Timestamp::now(),
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(stats)
    }
}
