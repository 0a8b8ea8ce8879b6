//! HTTP adapters - REST API.
//!
//! One router per resource, mounted under `/api` behind the request context
//! middleware. `/health` stays outside it.

pub mod error;
pub mod middleware;
pub mod presentation;
pub mod session;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};

use crate::application::handlers::poll::{
    ActivatePollHandler, DeactivatePollHandler, GetPollResultsHandler, SubmitResponseHandler,
};
use crate::application::handlers::presentation::{
    CreatePresentationHandler, EditSlidesHandler, GetPresentationHandler, RecordFeedbackHandler,
    SetPublicationHandler,
};
use crate::application::handlers::session::{
    AdvanceSlideHandler, CreateSessionHandler, GetSessionHandler, RosterHandler,
    SessionLifecycleHandler,
};
use crate::application::mutator::PresentationMutator;
use crate::config::TenancyConfig;
use crate::ports::{EventPublisher, PollDefinitionReader, PresentationRepository};

pub use error::{ApiError, ErrorResponse};
pub use middleware::RequestContext;
pub use presentation::{presentation_routes, PresentationHandlers};
pub use session::{session_routes, SessionHandlers};

/// Every HTTP handler, wired to one set of ports.
#[derive(Clone)]
pub struct AppState {
    pub presentations: PresentationHandlers,
    pub sessions: SessionHandlers,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn PresentationRepository>,
        poll_reader: Arc<dyn PollDefinitionReader>,
        publisher: Arc<dyn EventPublisher>,
        max_commit_attempts: u32,
    ) -> Self {
        let mutator = Arc::new(PresentationMutator::new(
            repository.clone(),
            max_commit_attempts,
        ));

        let presentations = PresentationHandlers::new(
            Arc::new(CreatePresentationHandler::new(
                repository.clone(),
                publisher.clone(),
            )),
            Arc::new(EditSlidesHandler::new(mutator.clone(), publisher.clone())),
            Arc::new(SetPublicationHandler::new(mutator.clone(), publisher.clone())),
            Arc::new(RecordFeedbackHandler::new(mutator.clone(), publisher.clone())),
            Arc::new(GetPresentationHandler::new(repository.clone())),
        );

        let sessions = SessionHandlers {
            create_handler: Arc::new(CreateSessionHandler::new(mutator.clone(), publisher.clone())),
            lifecycle_handler: Arc::new(SessionLifecycleHandler::new(
                mutator.clone(),
                publisher.clone(),
            )),
            advance_handler: Arc::new(AdvanceSlideHandler::new(mutator.clone(), publisher.clone())),
            roster_handler: Arc::new(RosterHandler::new(mutator.clone(), publisher.clone())),
            query_handler: Arc::new(GetSessionHandler::new(repository.clone())),
            activate_poll_handler: Arc::new(ActivatePollHandler::new(
                mutator.clone(),
                poll_reader.clone(),
                publisher.clone(),
            )),
            deactivate_poll_handler: Arc::new(DeactivatePollHandler::new(
                mutator.clone(),
                publisher.clone(),
            )),
            submit_handler: Arc::new(SubmitResponseHandler::new(
                mutator,
                poll_reader.clone(),
                publisher,
            )),
            results_handler: Arc::new(GetPollResultsHandler::new(repository, poll_reader)),
        };

        Self {
            presentations,
            sessions,
        }
    }
}

/// Builds the full application router.
pub fn router(state: AppState, tenancy: Arc<TenancyConfig>) -> Router {
    let api = Router::new()
        .nest("/presentations", presentation_routes(state.presentations))
        .nest("/sessions", session_routes(state.sessions))
        .layer(from_fn_with_state(tenancy, middleware::resolve_context));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
