//! HTTP DTOs for presentation endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::{PollId, Timestamp};
use crate::domain::presentation::{
    NewSlide, Presentation, PresentationSettings, PresentationSummary, Slide, SlidePatch,
    SlideType, Statistics,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePresentationRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub slides: Vec<SlideRequest>,
    #[serde(default)]
    pub settings: SettingsBody,
}

/// A slide to add. Omitting `position` appends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlideRequest {
    #[serde(default)]
    pub slide_type: SlideType,
    pub position: Option<usize>,
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    pub notes: Option<String>,
    pub poll_id: Option<PollId>,
    pub duration_secs: Option<u32>,
}

impl From<SlideRequest> for NewSlide {
    fn from(req: SlideRequest) -> Self {
        NewSlide {
            id: None,
            slide_type: req.slide_type,
            position: req.position,
            title: req.title,
            content: req.content,
            notes: req.notes,
            poll_id: req.poll_id,
            duration_secs: req.duration_secs,
        }
    }
}

/// Partial slide update. A field set to `null` is cleared, an absent field
/// is left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSlideRequest {
    pub slide_type: Option<SlideType>,
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub poll_id: Option<Option<PollId>>,
    #[serde(default, deserialize_with = "present")]
    pub duration_secs: Option<Option<u32>>,
}

impl From<UpdateSlideRequest> for SlidePatch {
    fn from(req: UpdateSlideRequest) -> Self {
        SlidePatch {
            slide_type: req.slide_type,
            title: req.title,
            content: req.content,
            notes: req.notes,
            poll_id: req.poll_id,
            duration_secs: req.duration_secs,
        }
    }
}

/// Marks a field as present, so `null` becomes `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RatingRequest {
    pub rating: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsBody {
    pub max_participants: Option<u32>,
    #[serde(default = "enabled")]
    pub allow_comments: bool,
    #[serde(default = "enabled")]
    pub allow_polls: bool,
    #[serde(default)]
    pub record_session: bool,
}

fn enabled() -> bool {
    true
}

impl Default for SettingsBody {
    fn default() -> Self {
        PresentationSettings::default().into()
    }
}

impl From<SettingsBody> for PresentationSettings {
    fn from(body: SettingsBody) -> Self {
        PresentationSettings {
            max_participants: body.max_participants,
            allow_comments: body.allow_comments,
            allow_polls: body.allow_polls,
            record_session: body.record_session,
        }
    }
}

impl From<PresentationSettings> for SettingsBody {
    fn from(settings: PresentationSettings) -> Self {
        Self {
            max_participants: settings.max_participants,
            allow_comments: settings.allow_comments,
            allow_polls: settings.allow_polls,
            record_session: settings.record_session,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct SlideResponse {
    pub id: String,
    pub slide_type: SlideType,
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
}

impl From<&Slide> for SlideResponse {
    fn from(slide: &Slide) -> Self {
        Self {
            id: slide.id.to_string(),
            slide_type: slide.slide_type,
            position: slide.position,
            title: slide.title.clone(),
            content: slide.content.clone(),
            notes: slide.notes.clone(),
            poll_id: slide.poll_id.map(|p| p.to_string()),
            duration_secs: slide.duration_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatisticsResponse {
    pub total_sessions: u64,
    pub total_participants: u64,
    pub average_session_duration: f64,
    pub average_rating: f64,
    pub rating_count: u64,
    pub total_views: u64,
}

impl From<Statistics> for StatisticsResponse {
    fn from(stats: Statistics) -> Self {
        Self {
            total_sessions: stats.total_sessions,
            total_participants: stats.total_participants,
            average_session_duration: stats.average_session_duration,
            average_rating: stats.average_rating,
            rating_count: stats.rating_count,
            total_views: stats.total_views,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PresentationResponse {
    pub id: String,
    pub tenant_id: String,
    pub author_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    pub is_published: bool,
    pub settings: SettingsBody,
    pub slides: Vec<SlideResponse>,
    pub statistics: StatisticsResponse,
    pub session_ids: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Presentation> for PresentationResponse {
    fn from(p: &Presentation) -> Self {
        Self {
            id: p.id().to_string(),
            tenant_id: p.tenant_id().to_string(),
            author_id: p.author_id().to_string(),
            title: p.title().to_string(),
            description: p.description().map(str::to_string),
            version: p.version().to_string(),
            is_published: p.is_published(),
            settings: (*p.settings()).into(),
            slides: p.slides().iter().map(SlideResponse::from).collect(),
            statistics: (*p.statistics()).into(),
            session_ids: p.sessions().map(|s| s.id().to_string()).collect(),
            created_at: p.created_at(),
            updated_at: p.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PresentationSummaryResponse {
    pub id: String,
    pub title: String,
    pub version: String,
    pub is_published: bool,
    pub slide_count: usize,
    pub session_count: usize,
    pub updated_at: Timestamp,
}

impl From<PresentationSummary> for PresentationSummaryResponse {
    fn from(s: PresentationSummary) -> Self {
        Self {
            id: s.id.to_string(),
            title: s.title,
            version: s.version.to_string(),
            is_published: s.is_published,
            slide_count: s.slide_count,
            session_count: s.session_count,
            updated_at: s.updated_at,
        }
    }
}

/// Result of a slide add, update or remove.
#[derive(Debug, Clone, Serialize)]
pub struct SlideEditResponse {
    pub slide: SlideResponse,
    pub version: String,
    pub slide_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_settings_and_slides() {
        let req: CreatePresentationRequest =
            serde_json::from_str(r#"{"title": "Town hall"}"#).unwrap();
        assert!(req.slides.is_empty());
        assert_eq!(
            PresentationSettings::from(req.settings),
            PresentationSettings::default()
        );
    }

    #[test]
    fn update_request_distinguishes_null_from_absent() {
        let req: UpdateSlideRequest =
            serde_json::from_str(r#"{"poll_id": null, "content": "Body"}"#).unwrap();
        let patch = SlidePatch::from(req);

        assert_eq!(patch.poll_id, Some(None));
        assert_eq!(patch.title, None);
        assert_eq!(patch.content.as_deref(), Some("Body"));
    }

    #[test]
    fn slide_request_parses_type() {
        let req: SlideRequest =
            serde_json::from_str(r#"{"slide_type": "poll", "position": 0}"#).unwrap();
        let slide = NewSlide::from(req);
        assert_eq!(slide.slide_type, SlideType::Poll);
        assert_eq!(slide.position, Some(0));
    }
}
