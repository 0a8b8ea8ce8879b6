//! Presentation command and query handlers.

mod create_presentation;
mod edit_slides;
mod get_presentation;
mod record_feedback;
mod set_publication;

pub use create_presentation::{
    CreatePresentationCommand, CreatePresentationHandler, CreatePresentationResult,
};
pub use edit_slides::{
    AddSlideCommand, EditSlidesHandler, RemoveSlideCommand, SlideEditResult, UpdateSlideCommand,
};
pub use get_presentation::{GetPresentationHandler, GetPresentationQuery, ListPresentationsQuery};
pub use record_feedback::{RecordFeedbackHandler, RecordRatingCommand, RecordViewCommand};
pub use set_publication::{SetPublicationCommand, SetPublicationHandler, SetPublicationResult};
