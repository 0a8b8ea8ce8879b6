//! HTTP handlers for presentation endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::RequestContext;
use crate::application::handlers::presentation::{
    AddSlideCommand, CreatePresentationCommand, CreatePresentationHandler, EditSlidesHandler,
    GetPresentationHandler, GetPresentationQuery, ListPresentationsQuery, RecordFeedbackHandler,
    RecordRatingCommand, RecordViewCommand, RemoveSlideCommand, SetPublicationCommand,
    SetPublicationHandler, SlideEditResult, UpdateSlideCommand,
};
use crate::domain::foundation::PresentationId;

use super::dto::{
    CreatePresentationRequest, PresentationResponse, PresentationSummaryResponse, RatingRequest,
    SlideEditResponse, SlideRequest, SlideResponse, StatisticsResponse, UpdateSlideRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PresentationHandlers {
    create_handler: Arc<CreatePresentationHandler>,
    slides_handler: Arc<EditSlidesHandler>,
    publication_handler: Arc<SetPublicationHandler>,
    feedback_handler: Arc<RecordFeedbackHandler>,
    query_handler: Arc<GetPresentationHandler>,
}

impl PresentationHandlers {
    pub fn new(
        create_handler: Arc<CreatePresentationHandler>,
        slides_handler: Arc<EditSlidesHandler>,
        publication_handler: Arc<SetPublicationHandler>,
        feedback_handler: Arc<RecordFeedbackHandler>,
        query_handler: Arc<GetPresentationHandler>,
    ) -> Self {
        Self {
            create_handler,
            slides_handler,
            publication_handler,
            feedback_handler,
            query_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/presentations
pub async fn create_presentation(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
    Json(req): Json<CreatePresentationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreatePresentationCommand {
        title: req.title,
        description: req.description,
        slides: req.slides.into_iter().map(Into::into).collect(),
        settings: req.settings.into(),
    };

    let result = handlers.create_handler.handle(cmd, ctx.metadata()).await?;
    Ok((
        StatusCode::CREATED,
        Json(PresentationResponse::from(&result.presentation)),
    ))
}

/// GET /api/presentations
pub async fn list_presentations(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = handlers
        .query_handler
        .list(ListPresentationsQuery {
            tenant_id: ctx.tenant_id,
        })
        .await?;
    let items: Vec<PresentationSummaryResponse> = summaries.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

/// GET /api/presentations/:id
pub async fn get_presentation(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let presentation = handlers
        .query_handler
        .handle(GetPresentationQuery {
            tenant_id: ctx.tenant_id,
            presentation_id: parse_id(&id, "presentation")?,
        })
        .await?;
    Ok(Json(PresentationResponse::from(&presentation)))
}

/// GET /api/presentations/:id/statistics
pub async fn get_statistics(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = handlers
        .query_handler
        .statistics(GetPresentationQuery {
            tenant_id: ctx.tenant_id,
            presentation_id: parse_id(&id, "presentation")?,
        })
        .await?;
    Ok(Json(StatisticsResponse::from(stats)))
}

/// POST /api/presentations/:id/slides
pub async fn add_slide(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(req): Json<SlideRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = AddSlideCommand {
        presentation_id: parse_id(&id, "presentation")?,
        slide: req.into(),
    };
    let result = handlers.slides_handler.add(cmd, ctx.metadata()).await?;
    Ok((StatusCode::CREATED, Json(edit_response(result))))
}

/// PATCH /api/presentations/:id/slides/:index
pub async fn update_slide(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
    Path((id, index)): Path<(String, usize)>,
    Json(req): Json<UpdateSlideRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = UpdateSlideCommand {
        presentation_id: parse_id(&id, "presentation")?,
        index,
        patch: req.into(),
    };
    let result = handlers.slides_handler.update(cmd, ctx.metadata()).await?;
    Ok(Json(edit_response(result)))
}

/// DELETE /api/presentations/:id/slides/:index
pub async fn remove_slide(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
    Path((id, index)): Path<(String, usize)>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RemoveSlideCommand {
        presentation_id: parse_id(&id, "presentation")?,
        index,
    };
    let result = handlers.slides_handler.remove(cmd, ctx.metadata()).await?;
    Ok(Json(edit_response(result)))
}

/// POST /api/presentations/:id/publish
pub async fn publish(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    set_publication(&handlers, ctx, &id, true).await
}

/// POST /api/presentations/:id/unpublish
pub async fn unpublish(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    set_publication(&handlers, ctx, &id, false).await
}

/// POST /api/presentations/:id/views
pub async fn record_view(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RecordViewCommand {
        presentation_id: parse_id(&id, "presentation")?,
    };
    let stats = handlers.feedback_handler.record_view(cmd, ctx.metadata()).await?;
    Ok(Json(StatisticsResponse::from(stats)))
}

/// POST /api/presentations/:id/ratings
pub async fn record_rating(
    State(handlers): State<PresentationHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(req): Json<RatingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RecordRatingCommand {
        presentation_id: parse_id(&id, "presentation")?,
        rating: req.rating,
    };
    let stats = handlers
        .feedback_handler
        .record_rating(cmd, ctx.metadata())
        .await?;
    Ok(Json(StatisticsResponse::from(stats)))
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

async fn set_publication(
    handlers: &PresentationHandlers,
    ctx: RequestContext,
    id: &str,
    published: bool,
) -> Result<Json<PresentationResponse>, ApiError> {
    let presentation_id: PresentationId = parse_id(id, "presentation")?;
    let result = handlers
        .publication_handler
        .handle(
            SetPublicationCommand {
                presentation_id,
                published,
            },
            ctx.metadata(),
        )
        .await?;
    Ok(Json(PresentationResponse::from(&result.presentation)))
}

fn edit_response(result: SlideEditResult) -> SlideEditResponse {
    SlideEditResponse {
        slide: SlideResponse::from(&result.slide),
        version: result.presentation.version().to_string(),
        slide_count: result.presentation.slide_count(),
    }
}
