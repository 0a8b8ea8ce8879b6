//! Presentation domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, EventId, PresentationId, SlideId, TenantId, Timestamp, UserId,
};

use super::SemanticVersion;

// ════════════════════════════════════════════════════════════════════════════
// PresentationCreated
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationCreated {
    pub event_id: EventId,
    pub presentation_id: PresentationId,
    pub tenant_id: TenantId,
    pub author_id: UserId,
    pub title: String,
    pub slide_count: usize,
    pub created_at: Timestamp,
}

domain_event!(
    PresentationCreated,
    event_type = "presentation.created.v1",
    schema_version = 1,
    aggregate_id = presentation_id,
    aggregate_type = "Presentation",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// DeckChanged
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckChange {
    Added,
    Updated,
    Removed,
}

/// Published after any slide add, update or remove.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckChanged {
    pub event_id: EventId,
    pub presentation_id: PresentationId,
    pub change: DeckChange,
    pub slide_id: SlideId,
    pub position: usize,
    pub slide_count: usize,
    pub version: SemanticVersion,
    pub changed_at: Timestamp,
}

domain_event!(
    DeckChanged,
    event_type = "presentation.deck_changed.v1",
    schema_version = 1,
    aggregate_id = presentation_id,
    aggregate_type = "Presentation",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// PublicationChanged
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationChanged {
    pub event_id: EventId,
    pub presentation_id: PresentationId,
    pub is_published: bool,
    pub version: SemanticVersion,
    pub changed_at: Timestamp,
}

domain_event!(
    PublicationChanged,
    event_type = "presentation.publication_changed.v1",
    schema_version = 1,
    aggregate_id = presentation_id,
    aggregate_type = "Presentation",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// RatingRecorded
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRecorded {
    pub event_id: EventId,
    pub presentation_id: PresentationId,
    pub rating: u8,
    pub average_rating: f64,
    pub rating_count: u64,
    pub recorded_at: Timestamp,
}

domain_event!(
    RatingRecorded,
    event_type = "presentation.rating_recorded.v1",
    schema_version = 1,
    aggregate_id = presentation_id,
    aggregate_type = "Presentation",
    occurred_at = recorded_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SerializableDomainEvent;

    #[test]
    fn deck_changed_serializes_change_kind() {
        let event = DeckChanged {
            event_id: EventId::new(),
            presentation_id: PresentationId::new(),
            change: DeckChange::Removed,
            slide_id: SlideId::new(),
            position: 1,
            slide_count: 2,
            version: SemanticVersion::new(1, 0, 4),
            changed_at: Timestamp::now(),
        };

        let envelope = event.to_envelope();
        assert_eq!(envelope.aggregate_type, "Presentation");
        assert_eq!(envelope.payload["change"], "removed");
        assert_eq!(envelope.payload["version"], "1.0.4");
    }
}
