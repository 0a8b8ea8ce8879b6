//! Session command and query handlers.

mod advance_slide;
mod create_session;
mod get_session;
mod lifecycle;
mod roster;

pub use advance_slide::{AdvanceSlideCommand, AdvanceSlideHandler};
pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use lifecycle::{
    CancelSessionCommand, EndSessionCommand, EndSessionResult, SessionLifecycleHandler,
    StartSessionCommand,
};
pub use roster::{
    JoinSessionCommand, JoinSessionResult, LeaveSessionCommand, LeaveSessionResult, RosterHandler,
};
