//! HTTP adapter for session, roster and poll endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ActivatePollRequest, AdvanceSlideRequest, CreateSessionRequest, JoinSessionRequest,
    SessionResponse, SessionStatisticsResponse, SubmitResponseRequest,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
