//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    activate_poll, advance_slide, cancel_session, create_session, deactivate_poll, end_session,
    get_session, get_statistics, join_session, leave_session, poll_results, start_session,
    submit_response, SessionHandlers,
};

/// Router mounted at `/api/sessions`.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session))
        .route("/:id/statistics", get(get_statistics))
        .route("/:id/start", post(start_session))
        .route("/:id/end", post(end_session))
        .route("/:id/cancel", post(cancel_session))
        .route("/:id/advance", post(advance_slide))
        .route("/:id/join", post(join_session))
        .route("/:id/leave", post(leave_session))
        .route("/:id/polls/:poll_id/activate", post(activate_poll))
        .route("/:id/polls/:poll_id/deactivate", post(deactivate_poll))
        .route("/:id/polls/:poll_id/responses", post(submit_response))
        .route("/:id/polls/:poll_id/results", get(poll_results))
        .with_state(handlers)
}
