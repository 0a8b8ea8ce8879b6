//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Each
//! command handler loads the owning presentation, applies one domain
//! operation through the [`PresentationMutator`](super::PresentationMutator)
//! and publishes the resulting event.

mod publish;

pub mod poll;
pub mod presentation;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use poll::{
    ActivatePollCommand, ActivatePollHandler, ActivatePollResult, DeactivatePollCommand,
    DeactivatePollHandler, GetPollResultsHandler, GetPollResultsQuery, PollResultsView,
    SubmitResponseCommand, SubmitResponseHandler, SubmitResponseResult,
};
pub use presentation::{
    AddSlideCommand, CreatePresentationCommand, CreatePresentationHandler,
    CreatePresentationResult, EditSlidesHandler, GetPresentationHandler, GetPresentationQuery,
    ListPresentationsQuery, RecordFeedbackHandler, RecordRatingCommand, RecordViewCommand,
    RemoveSlideCommand, SetPublicationCommand, SetPublicationHandler, SetPublicationResult,
    SlideEditResult, UpdateSlideCommand,
};
pub use session::{
    AdvanceSlideCommand, AdvanceSlideHandler, CancelSessionCommand, CreateSessionCommand,
    CreateSessionHandler, CreateSessionResult, EndSessionCommand, EndSessionResult,
    GetSessionHandler, GetSessionQuery, JoinSessionCommand, JoinSessionResult,
    LeaveSessionCommand, LeaveSessionResult, RosterHandler, SessionLifecycleHandler,
    StartSessionCommand,
};
