//! HTTP adapter for presentation endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreatePresentationRequest, PresentationResponse, PresentationSummaryResponse, RatingRequest,
    SettingsBody, SlideEditResponse, SlideRequest, SlideResponse, StatisticsResponse,
    UpdateSlideRequest,
};
pub use handlers::PresentationHandlers;
pub use routes::presentation_routes;
