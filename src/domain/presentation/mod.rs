//! Presentation module - the tenant-scoped aggregate root.
//!
//! Owns the slide deck, the sessions run over it and the rolling statistics
//! folded in as sessions complete.

mod aggregate;
mod errors;
mod events;
mod settings;
mod slide;
mod statistics;
mod version;

pub use aggregate::{Presentation, PresentationSummary, PollActivation, MAX_TITLE_LENGTH};
pub use errors::PresentationError;
pub use events::{DeckChange, DeckChanged, PresentationCreated, PublicationChanged, RatingRecorded};
pub use settings::PresentationSettings;
pub use slide::{NewSlide, Slide, SlideDeck, SlidePatch, SlideType, MAX_SLIDE_TITLE_LENGTH};
pub use statistics::{Statistics, StatisticsAggregator, MAX_RATING, MIN_RATING};
pub use version::SemanticVersion;
