//! Slide deck command handlers: add, update and remove.
//!
//! Each edit bumps the presentation's patch version and publishes a single
//! `DeckChanged` event.

use std::sync::Arc;

use tracing::info;

use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{CommandMetadata, EventId, PresentationId, Timestamp};
use crate::domain::presentation::{
    DeckChange, DeckChanged, NewSlide, Presentation, PresentationError, Slide, SlidePatch,
};
use crate::ports::EventPublisher;

use super::super::publish::publish;

/// Command to add a slide. `slide.position` of `None` appends.
#[derive(Debug, Clone)]
pub struct AddSlideCommand {
    pub presentation_id: PresentationId,
    pub slide: NewSlide,
}

#[derive(Debug, Clone)]
pub struct UpdateSlideCommand {
    pub presentation_id: PresentationId,
    pub index: usize,
    pub patch: SlidePatch,
}

#[derive(Debug, Clone)]
pub struct RemoveSlideCommand {
    pub presentation_id: PresentationId,
    pub index: usize,
}

/// Result of any deck edit.
#[derive(Debug, Clone)]
pub struct SlideEditResult {
    pub presentation: Presentation,
    /// The added, updated or removed slide.
    pub slide: Slide,
    pub event: DeckChanged,
}

pub struct EditSlidesHandler {
    mutator: Arc<PresentationMutator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl EditSlidesHandler {
    pub fn new(mutator: Arc<PresentationMutator>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            mutator,
            event_publisher,
        }
    }

    pub async fn add(
        &self,
        cmd: AddSlideCommand,
        metadata: CommandMetadata,
    ) -> Result<SlideEditResult, PresentationError> {
        let (presentation, slide) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.presentation_id.into(), |p| {
                p.add_slide(cmd.slide.clone(), Timestamp::now())
            })
            .await?;
        self.finish(presentation, slide, DeckChange::Added, &metadata)
            .await
    }

    pub async fn update(
        &self,
        cmd: UpdateSlideCommand,
        metadata: CommandMetadata,
    ) -> Result<SlideEditResult, PresentationError> {
        let (presentation, slide) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.presentation_id.into(), |p| {
                p.update_slide(cmd.index, cmd.patch.clone(), Timestamp::now())
            })
            .await?;
        self.finish(presentation, slide, DeckChange::Updated, &metadata)
            .await
    }

    pub async fn remove(
        &self,
        cmd: RemoveSlideCommand,
        metadata: CommandMetadata,
    ) -> Result<SlideEditResult, PresentationError> {
        let (presentation, slide) = self
            .mutator
            .mutate(&metadata.tenant_id, cmd.presentation_id.into(), |p| {
                p.remove_slide(cmd.index, Timestamp::now())
            })
            .await?;
        self.finish(presentation, slide, DeckChange::Removed, &metadata)
            .await
    }

    async fn finish(
        &self,
        presentation: Presentation,
        slide: Slide,
        change: DeckChange,
        metadata: &CommandMetadata,
    ) -> Result<SlideEditResult, PresentationError> {
        info!(
            presentation_id = %presentation.id(),
            slide_id = %slide.id,
            ?change,
            version = %presentation.version(),
            "slide deck changed"
        );

        let event = DeckChanged {
            event_id: EventId::new(),
            presentation_id: presentation.id(),
            change,
            slide_id: slide.id,
            position: slide.position,
            slide_count: presentation.slide_count(),
            version: presentation.version(),
            changed_at: presentation.updated_at(),
        };
        publish(self.event_publisher.as_ref(), metadata, &event).await;

        Ok(SlideEditResult {
            presentation,
            slide,
            event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::domain::foundation::{PollId, SlideId};

    fn handler(h: &Harness) -> EditSlidesHandler {
        EditSlidesHandler::new(h.mutator.clone(), h.publisher())
    }

    #[tokio::test]
    async fn add_appends_and_bumps_patch() {
        let h = Harness::new();
        let p = h.seed_presentation(2).await;

        let result = handler(&h)
            .add(
                AddSlideCommand {
                    presentation_id: p.id(),
                    slide: NewSlide::content("Closing"),
                },
                Harness::metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.slide.position, 2);
        assert_eq!(result.presentation.version().to_string(), "1.0.1");
        assert_eq!(h.reload(p.id()).await.slide_count(), 3);
        assert!(h.bus.has_event("presentation.deck_changed.v1"));
    }

    #[tokio::test]
    async fn retried_add_is_applied_once_and_stamped_at_commit() {
        let h = Harness::new();
        let p = h.seed_presentation(1).await;
        h.lose_next_commit();

        let result = handler(&h)
            .add(
                AddSlideCommand {
                    presentation_id: p.id(),
                    slide: NewSlide::content("Retried"),
                },
                Harness::metadata(),
            )
            .await
            .unwrap();

        let stored = h.reload(p.id()).await;
        assert_eq!(stored.slide_count(), 2);
        assert_eq!(stored.revision(), 1);
        assert!(stored.updated_at() > h.lost_commit_at());
        assert_eq!(result.event.changed_at, stored.updated_at());
    }

    #[tokio::test]
    async fn remove_reindexes_and_keeps_identity() {
        let h = Harness::new();
        let p = h.seed_presentation(3).await;
        let original: Vec<SlideId> = p.slides().iter().map(|s| s.id).collect();

        handler(&h)
            .remove(
                RemoveSlideCommand {
                    presentation_id: p.id(),
                    index: 1,
                },
                Harness::metadata(),
            )
            .await
            .unwrap();

        let stored = h.reload(p.id()).await;
        let ids: Vec<SlideId> = stored.slides().iter().map(|s| s.id).collect();
        let positions: Vec<usize> = stored.slides().iter().map(|s| s.position).collect();
        assert_eq!(ids, vec![original[0], original[2]]);
        assert_eq!(positions, vec![0, 1]);
    }

    #[tokio::test]
    async fn update_out_of_range_is_invalid_index() {
        let h = Harness::new();
        let p = h.seed_presentation(1).await;

        let result = handler(&h)
            .update(
                UpdateSlideCommand {
                    presentation_id: p.id(),
                    index: 4,
                    patch: SlidePatch {
                        poll_id: Some(Some(PollId::new())),
                        ..Default::default()
                    },
                },
                Harness::metadata(),
            )
            .await;

        assert_eq!(
            result.err(),
            Some(PresentationError::InvalidIndex { index: 4, len: 1 })
        );
        assert_eq!(h.reload(p.id()).await.revision(), 0);
    }

    #[tokio::test]
    async fn unknown_presentation_is_not_found() {
        let h = Harness::new();
        let missing = PresentationId::new();

        let result = handler(&h)
            .remove(
                RemoveSlideCommand {
                    presentation_id: missing,
                    index: 0,
                },
                Harness::metadata(),
            )
            .await;

        assert_eq!(
            result.err(),
            Some(PresentationError::PresentationNotFound(missing))
        );
    }
}
