//! SetPublicationHandler - Publish or unpublish a presentation.

use std::sync::Arc;

use tracing::info;

use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{CommandMetadata, EventId, PresentationId, Timestamp};
use crate::domain::presentation::{Presentation, PresentationError, PublicationChanged};
use crate::ports::EventPublisher;

use super::super::publish::publish;

#[derive(Debug, Clone)]
pub struct SetPublicationCommand {
    pub presentation_id: PresentationId,
    pub published: bool,
}

#[derive(Debug, Clone)]
pub struct SetPublicationResult {
    pub presentation: Presentation,
    pub event: PublicationChanged,
}

pub struct SetPublicationHandler {
    mutator: Arc<PresentationMutator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SetPublicationHandler {
    pub fn new(mutator: Arc<PresentationMutator>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            mutator,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SetPublicationCommand,
        metadata: CommandMetadata,
    ) -> Result<SetPublicationResult, PresentationError> {
        let (presentation, ()) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.presentation_id.into(), |p| {
                let now = Timestamp::now();
                if cmd.published {
                    p.publish(now)
                } else {
                    p.unpublish(now)
                }
            })
            .await?;

        info!(
            presentation_id = %presentation.id(),
            published = cmd.published,
            version = %presentation.version(),
            "publication changed"
        );

        let event = PublicationChanged {
            event_id: EventId::new(),
            presentation_id: presentation.id(),
            is_published: presentation.is_published(),
            version: presentation.version(),
            changed_at: presentation.updated_at(),
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(SetPublicationResult {
            presentation,
            event,
        })
    }
}
