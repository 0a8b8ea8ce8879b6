//! Slides and the ordered deck that owns them.
//!
//! # Invariants
//!
//! - slide positions are exactly `0..len` in deck order
//! - slide ids are unique within a deck

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PollId, SlideId};

use super::PresentationError;

/// Maximum length for a slide title.
pub const MAX_SLIDE_TITLE_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    #[default]
    Content,
    Poll,
    Question,
    Break,
    Video,
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub slide_type: SlideType,
    pub position: usize,
    pub title: Option<String>,
    pub content: String,
    pub notes: Option<String>,
    pub poll_id: Option<PollId>,
    /// Suggested time on the slide.
    pub duration_secs: Option<u32>,
}

/// Input for adding a slide.
///
/// A missing `id` gets a fresh one; a missing `position` appends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSlide {
    pub id: Option<SlideId>,
    pub slide_type: SlideType,
    pub position: Option<usize>,
    pub title: Option<String>,
    pub content: String,
    pub notes: Option<String>,
    pub poll_id: Option<PollId>,
    pub duration_secs: Option<u32>,
}

impl NewSlide {
    pub fn content(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn poll(poll_id: PollId) -> Self {
        Self {
            slide_type: SlideType::Poll,
            poll_id: Some(poll_id),
            ..Default::default()
        }
    }
}

/// Partial update of a slide. `None` leaves a field untouched; the nested
/// options allow clearing a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlidePatch {
    pub slide_type: Option<SlideType>,
    pub title: Option<Option<String>>,
    pub content: Option<String>,
    pub notes: Option<Option<String>>,
    pub poll_id: Option<Option<PollId>>,
    pub duration_secs: Option<Option<u32>>,
}

impl SlidePatch {
    pub fn is_empty(&self) -> bool {
        self == &SlidePatch::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideDeck {
    slides: Vec<Slide>,
}

impl SlideDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn find(&self, id: SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    /// Inserts a slide and reindexes. Returns the stored slide.
    ///
    /// # Errors
    ///
    /// - `InvalidIndex` if the requested position is past the end
    /// - `ValidationFailed` for a duplicate id or an overlong title
    pub fn add(&mut self, new: NewSlide) -> Result<&Slide, PresentationError> {
        let len = self.slides.len();
        let position = new.position.unwrap_or(len);
        if position > len {
            return Err(PresentationError::InvalidIndex {
                index: position,
                len,
            });
        }

        let id = new.id.unwrap_or_default();
        if self.find(id).is_some() {
            return Err(PresentationError::validation(
                "id",
                format!("slide {} already exists in this deck", id),
            ));
        }
        let title = validate_title(new.title)?;

        self.slides.insert(
            position,
            Slide {
                id,
                slide_type: new.slide_type,
                position,
                title,
                content: new.content,
                notes: new.notes,
                poll_id: new.poll_id,
                duration_secs: new.duration_secs,
            },
        );
        self.reindex();
        Ok(&self.slides[position])
    }

    /// Merges `patch` into the slide at `index`.
    ///
    /// # Errors
    ///
    /// - `InvalidIndex` if `index` is out of bounds
    pub fn update(&mut self, index: usize, patch: SlidePatch) -> Result<&Slide, PresentationError> {
        let len = self.slides.len();
        let slide = self
            .slides
            .get_mut(index)
            .ok_or(PresentationError::InvalidIndex { index, len })?;

        if let Some(title) = patch.title {
            slide.title = validate_title(title)?;
        }
        if let Some(slide_type) = patch.slide_type {
            slide.slide_type = slide_type;
        }
        if let Some(content) = patch.content {
            slide.content = content;
        }
        if let Some(notes) = patch.notes {
            slide.notes = notes;
        }
        if let Some(poll_id) = patch.poll_id {
            slide.poll_id = poll_id;
        }
        if let Some(duration) = patch.duration_secs {
            slide.duration_secs = duration;
        }
        Ok(slide)
    }

    /// Removes the slide at `index` and closes the gap.
    ///
    /// # Errors
    ///
    /// - `InvalidIndex` if `index` is out of bounds
    pub fn remove(&mut self, index: usize) -> Result<Slide, PresentationError> {
        let len = self.slides.len();
        if index >= len {
            return Err(PresentationError::InvalidIndex { index, len });
        }
        let removed = self.slides.remove(index);
        self.reindex();
        Ok(removed)
    }

    fn reindex(&mut self) {
        for (position, slide) in self.slides.iter_mut().enumerate() {
            slide.position = position;
        }
    }
}

fn validate_title(title: Option<String>) -> Result<Option<String>, PresentationError> {
    match title {
        Some(t) if t.chars().count() > MAX_SLIDE_TITLE_LENGTH => Err(PresentationError::validation(
            "title",
            format!("must be {} characters or less", MAX_SLIDE_TITLE_LENGTH),
        )),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn deck_of(n: usize) -> SlideDeck {
        let mut deck = SlideDeck::new();
        for i in 0..n {
            deck.add(NewSlide::content(format!("Slide {}", i))).unwrap();
        }
        deck
    }

    fn positions(deck: &SlideDeck) -> Vec<usize> {
        deck.slides().iter().map(|s| s.position).collect()
    }

    #[test]
    fn add_appends_with_next_position_and_fresh_id() {
        let deck = deck_of(3);
        assert_eq!(positions(&deck), vec![0, 1, 2]);
        assert_ne!(deck.slides()[0].id, deck.slides()[1].id);
    }

    #[test]
    fn add_keeps_explicit_id() {
        let mut deck = SlideDeck::new();
        let id = SlideId::new();
        let slide = deck
            .add(NewSlide {
                id: Some(id),
                ..NewSlide::content("Intro")
            })
            .unwrap();
        assert_eq!(slide.id, id);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut deck = deck_of(1);
        let existing = deck.slides()[0].id;
        let result = deck.add(NewSlide {
            id: Some(existing),
            ..Default::default()
        });
        assert!(matches!(result, Err(PresentationError::ValidationFailed { .. })));
    }

    #[test]
    fn add_at_position_inserts_and_reindexes() {
        let mut deck = deck_of(2);
        let first = deck.slides()[0].id;
        let inserted = deck
            .add(NewSlide {
                position: Some(1),
                ..NewSlide::content("Middle")
            })
            .unwrap()
            .id;

        assert_eq!(positions(&deck), vec![0, 1, 2]);
        assert_eq!(deck.slides()[0].id, first);
        assert_eq!(deck.slides()[1].id, inserted);
    }

    #[test]
    fn add_past_end_is_invalid_index() {
        let mut deck = deck_of(2);
        let result = deck.add(NewSlide {
            position: Some(3),
            ..Default::default()
        });
        assert_eq!(result.err(), Some(PresentationError::InvalidIndex { index: 3, len: 2 }));
    }

    #[test]
    fn update_merges_only_provided_fields() {
        let mut deck = deck_of(1);
        let poll = PollId::new();
        deck.update(
            0,
            SlidePatch {
                poll_id: Some(Some(poll)),
                slide_type: Some(SlideType::Poll),
                ..Default::default()
            },
        )
        .unwrap();

        let slide = deck.get(0).unwrap();
        assert_eq!(slide.poll_id, Some(poll));
        assert_eq!(slide.slide_type, SlideType::Poll);
        assert_eq!(slide.title.as_deref(), Some("Slide 0"));
    }

    #[test]
    fn update_can_clear_poll_reference() {
        let mut deck = SlideDeck::new();
        deck.add(NewSlide::poll(PollId::new())).unwrap();
        deck.update(
            0,
            SlidePatch {
                poll_id: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(deck.get(0).unwrap().poll_id, None);
    }

    #[test]
    fn update_out_of_bounds_is_invalid_index() {
        let mut deck = deck_of(2);
        assert_eq!(
            deck.update(2, SlidePatch::default()).err(),
            Some(PresentationError::InvalidIndex { index: 2, len: 2 })
        );
    }

    #[test]
    fn remove_reindexes_remaining_slides() {
        let mut deck = deck_of(3);
        let ids: Vec<SlideId> = deck.slides().iter().map(|s| s.id).collect();

        let removed = deck.remove(1).unwrap();

        assert_eq!(removed.id, ids[1]);
        assert_eq!(positions(&deck), vec![0, 1]);
        assert_eq!(deck.slides()[0].id, ids[0]);
        assert_eq!(deck.slides()[1].id, ids[2]);
    }

    #[test]
    fn remove_from_empty_deck_is_invalid_index() {
        let mut deck = SlideDeck::new();
        assert!(matches!(
            deck.remove(0),
            Err(PresentationError::InvalidIndex { index: 0, len: 0 })
        ));
    }

    proptest! {
        #[test]
        fn remove_preserves_order_and_contiguity(n in 1usize..20, k in 0usize..20) {
            let k = k % n;
            let mut deck = deck_of(n);
            let mut expected: Vec<SlideId> = deck.slides().iter().map(|s| s.id).collect();
            expected.remove(k);

            deck.remove(k).unwrap();

            let ids: Vec<SlideId> = deck.slides().iter().map(|s| s.id).collect();
            prop_assert_eq!(ids, expected);
            prop_assert_eq!(positions(&deck), (0..n - 1).collect::<Vec<_>>());
        }
    }
}
