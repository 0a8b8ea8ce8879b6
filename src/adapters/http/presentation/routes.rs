//! HTTP routes for presentation endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    add_slide, create_presentation, get_presentation, get_statistics, list_presentations,
    publish, record_rating, record_view, remove_slide, unpublish, update_slide,
    PresentationHandlers,
};

/// Router mounted at `/api/presentations`.
pub fn presentation_routes(handlers: PresentationHandlers) -> Router {
    Router::new()
        .route("/", post(create_presentation).get(list_presentations))
        .route("/:id", get(get_presentation))
        .route("/:id/statistics", get(get_statistics))
        .route("/:id/slides", post(add_slide))
        .route("/:id/slides/:index", patch(update_slide).delete(remove_slide))
        .route("/:id/publish", post(publish))
        .route("/:id/unpublish", post(unpublish))
        .route("/:id/views", post(record_view))
        .route("/:id/ratings", post(record_rating))
        .with_state(handlers)
}
