//! CreatePresentationHandler - Command handler for authoring a new presentation.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, EventId, Timestamp};
use crate::domain::presentation::{
    NewSlide, Presentation, PresentationCreated, PresentationError, PresentationSettings,
};
use crate::ports::{EventPublisher, PresentationRepository};

use super::super::publish::publish;

/// Command to create a presentation for the acting user's tenant.
#[derive(Debug, Clone, Default)]
pub struct CreatePresentationCommand {
    pub title: String,
    pub description: Option<String>,
    pub slides: Vec<NewSlide>,
    pub settings: PresentationSettings,
}

#[derive(Debug, Clone)]
pub struct CreatePresentationResult {
    pub presentation: Presentation,
    pub event: PresentationCreated,
}

pub struct CreatePresentationHandler {
    repository: Arc<dyn PresentationRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreatePresentationHandler {
    pub fn new(
        repository: Arc<dyn PresentationRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePresentationCommand,
        metadata: CommandMetadata,
    ) -> Result<CreatePresentationResult, PresentationError> {
        let now = Timestamp::now();
        let presentation = Presentation::create(
            metadata.tenant_id.clone(),
            metadata.user_id.clone(),
            cmd.title,
            cmd.description,
            cmd.slides,
            cmd.settings,
            now,
        )?;

        self.repository
            .save(&metadata.tenant_id, &presentation)
            .await?;

        info!(
            presentation_id = %presentation.id(),
            tenant_id = %metadata.tenant_id,
            slides = presentation.slide_count(),
            "presentation created"
        );

        let event = PresentationCreated {
            event_id: EventId::new(),
            presentation_id: presentation.id(),
            tenant_id: metadata.tenant_id.clone(),
            author_id: metadata.user_id.clone(),
            title: presentation.title().to_string(),
            slide_count: presentation.slide_count(),
            created_at: now,
        };
        publish(self.event_publisher.as_ref(), &metadata, &event).await;

        Ok(CreatePresentationResult {
            presentation,
            event,
        })
    }
}
