//! HTTP handlers for session, roster and poll endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::RequestContext;
use crate::application::handlers::poll::{
    ActivatePollCommand, ActivatePollHandler, DeactivatePollCommand, DeactivatePollHandler,
    GetPollResultsHandler, GetPollResultsQuery, SubmitResponseCommand, SubmitResponseHandler,
};
use crate::application::handlers::session::{
    AdvanceSlideCommand, AdvanceSlideHandler, CancelSessionCommand, CreateSessionCommand,
    CreateSessionHandler, EndSessionCommand, GetSessionHandler, GetSessionQuery,
    JoinSessionCommand, LeaveSessionCommand, RosterHandler, SessionLifecycleHandler,
    StartSessionCommand,
};
use crate::domain::foundation::{PollId, SessionId};

use super::dto::{
    poll_ids, ActivatePollRequest, ActivatePollResponse, AdvanceSlideRequest,
    CreateSessionRequest, DeactivatePollResponse, EndSessionResponse, JoinSessionRequest,
    LeaveResponse, ParticipantResponse, RosterResponse, SessionResponse,
    SessionStatisticsResponse, SubmitResponseRequest, SubmitResponseResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    pub create_handler: Arc<CreateSessionHandler>,
    pub lifecycle_handler: Arc<SessionLifecycleHandler>,
    pub advance_handler: Arc<AdvanceSlideHandler>,
    pub roster_handler: Arc<RosterHandler>,
    pub query_handler: Arc<GetSessionHandler>,
    pub activate_poll_handler: Arc<ActivatePollHandler>,
    pub deactivate_poll_handler: Arc<DeactivatePollHandler>,
    pub submit_handler: Arc<SubmitResponseHandler>,
    pub results_handler: Arc<GetPollResultsHandler>,
}

fn session_id(raw: &str) -> Result<SessionId, ApiError> {
    parse_id(raw, "session")
}

fn session_and_poll(raw: &(String, String)) -> Result<(SessionId, PollId), ApiError> {
    Ok((session_id(&raw.0)?, parse_id(&raw.1, "poll")?))
}

// ════════════════════════════════════════════════════════════════════════════
// Session lifecycle
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions
pub async fn create_session(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreateSessionCommand {
        presentation_id: req.presentation_id,
        title: req.title,
        scheduled_for: req.scheduled_for,
    };
    let result = handlers.create_handler.handle(cmd, ctx.metadata()).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::from(&result.session)),
    ))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = handlers
        .query_handler
        .handle(GetSessionQuery {
            tenant_id: ctx.tenant_id,
            session_id: session_id(&id)?,
        })
        .await?;
    Ok(Json(SessionResponse::from(&session)))
}

/// GET /api/sessions/:id/statistics
pub async fn get_statistics(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = handlers
        .query_handler
        .statistics(GetSessionQuery {
            tenant_id: ctx.tenant_id,
            session_id: session_id(&id)?,
        })
        .await?;
    Ok(Json(SessionStatisticsResponse::from(stats)))
}

/// POST /api/sessions/:id/start
pub async fn start_session(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = StartSessionCommand {
        session_id: session_id(&id)?,
    };
    let session = handlers.lifecycle_handler.start(cmd, ctx.metadata()).await?;
    Ok(Json(SessionResponse::from(&session)))
}

/// POST /api/sessions/:id/end
pub async fn end_session(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = EndSessionCommand {
        session_id: session_id(&id)?,
    };
    let result = handlers.lifecycle_handler.end(cmd, ctx.metadata()).await?;
    Ok(Json(EndSessionResponse {
        session: SessionResponse::from(&result.session),
        closed_polls: poll_ids(&result.closed_polls),
    }))
}

/// POST /api/sessions/:id/cancel
pub async fn cancel_session(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CancelSessionCommand {
        session_id: session_id(&id)?,
    };
    let session = handlers.lifecycle_handler.cancel(cmd, ctx.metadata()).await?;
    Ok(Json(SessionResponse::from(&session)))
}

/// POST /api/sessions/:id/advance
pub async fn advance_slide(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(req): Json<AdvanceSlideRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = AdvanceSlideCommand {
        session_id: session_id(&id)?,
        index: req.index,
    };
    let session = handlers.advance_handler.handle(cmd, ctx.metadata()).await?;
    Ok(Json(SessionResponse::from(&session)))
}

// ════════════════════════════════════════════════════════════════════════════
// Roster
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions/:id/join - The acting user joins.
pub async fn join_session(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
    req: Option<Json<JoinSessionRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = JoinSessionCommand {
        session_id: session_id(&id)?,
        user_id: ctx.user_id.clone(),
        role: req.and_then(|Json(r)| r.role),
    };
    let result = handlers.roster_handler.join(cmd, ctx.metadata()).await?;
    Ok(Json(RosterResponse {
        participant: ParticipantResponse::from(&result.participant),
        outcome: result.outcome,
        active_participants: result.active_participants,
    }))
}

/// POST /api/sessions/:id/leave - The acting user leaves.
pub async fn leave_session(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = LeaveSessionCommand {
        session_id: session_id(&id)?,
        user_id: ctx.user_id.clone(),
    };
    let result = handlers.roster_handler.leave(cmd, ctx.metadata()).await?;
    Ok(Json(LeaveResponse {
        was_participant: result.was_participant,
        active_participants: result.active_participants,
    }))
}

// ════════════════════════════════════════════════════════════════════════════
// Polls
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions/:id/polls/:poll_id/activate
pub async fn activate_poll(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(ids): Path<(String, String)>,
    req: Option<Json<ActivatePollRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let (session_id, poll_id) = session_and_poll(&ids)?;
    let cmd = ActivatePollCommand {
        session_id,
        poll_id,
        slide_id: req.and_then(|Json(r)| r.slide_id),
    };
    let result = handlers
        .activate_poll_handler
        .handle(cmd, ctx.metadata())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ActivatePollResponse {
            activation_id: result.activation_id.to_string(),
            slide_id: result.slide_id.to_string(),
            closed_polls: poll_ids(&result.closed_polls),
        }),
    ))
}

/// POST /api/sessions/:id/polls/:poll_id/deactivate
pub async fn deactivate_poll(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(ids): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let (session_id, poll_id) = session_and_poll(&ids)?;
    let activation_id = handlers
        .deactivate_poll_handler
        .handle(DeactivatePollCommand { session_id, poll_id }, ctx.metadata())
        .await?;
    Ok(Json(DeactivatePollResponse {
        activation_id: activation_id.to_string(),
        poll_id: poll_id.to_string(),
    }))
}

/// POST /api/sessions/:id/polls/:poll_id/responses - Answer as the acting user.
pub async fn submit_response(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(ids): Path<(String, String)>,
    Json(req): Json<SubmitResponseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (session_id, poll_id) = session_and_poll(&ids)?;
    let cmd = SubmitResponseCommand {
        session_id,
        poll_id,
        user_id: ctx.user_id.clone(),
        value: req.value,
    };
    let result = handlers.submit_handler.handle(cmd, ctx.metadata()).await?;
    Ok(Json(SubmitResponseResponse {
        activation_id: result.activation_id.to_string(),
        outcome: result.outcome,
    }))
}

/// GET /api/sessions/:id/polls/:poll_id/results
pub async fn poll_results(
    State(handlers): State<SessionHandlers>,
    ctx: RequestContext,
    Path(ids): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let (session_id, poll_id) = session_and_poll(&ids)?;
    let view = handlers
        .results_handler
        .handle(GetPollResultsQuery {
            tenant_id: ctx.tenant_id,
            session_id,
            poll_id,
        })
        .await?;
    Ok(Json(view))
}
