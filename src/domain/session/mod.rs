//! Session module - live occurrences of a presentation.
//!
//! A session composes the participant roster, the poll board and the
//! current-slide pointer under the `SessionStatus` state machine. Sessions are
//! embedded in their presentation and mutated through it.

mod aggregate;
mod events;
mod roster;
mod statistics;
mod status;

pub use aggregate::{Session, MAX_SESSION_TITLE_LENGTH};
pub use events::{
    ParticipantJoined, ParticipantLeft, PollActivated, PollDeactivated, ResponseSubmitted,
    SessionCancelled, SessionCreated, SessionEnded, SessionStarted, SlideAdvanced,
};
pub use roster::{JoinOutcome, Participant, ParticipantRole, Roster};
pub use statistics::SessionStatistics;
pub use status::SessionStatus;
