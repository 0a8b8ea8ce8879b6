//! Poll module.
//!
//! Live poll activations, participant responses and the read model of the
//! external poll definitions they point at.

mod activation;
mod definition;
mod response;

pub use activation::{ActivePoll, PollBoard, PollResults, PollState, ResponseTally};
pub use definition::{AnswerKind, PollDefinition, PollOption, MAX_FREE_TEXT_LENGTH};
pub use response::{Response, ResponseValue, SubmissionOutcome};
