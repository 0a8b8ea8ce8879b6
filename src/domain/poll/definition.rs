//! Read model of an externally authored poll definition.
//!
//! The engine never mutates poll definitions. It only dereferences them to
//! validate submitted answers and to decorate results for display.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PollId, ValidationError};

use super::ResponseValue;

/// Maximum length accepted for a free-text answer.
pub const MAX_FREE_TEXT_LENGTH: usize = 2_000;

/// One selectable option of a choice poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// Stable option key referenced by responses.
    pub id: String,
    /// Display label.
    pub label: String,
}

impl PollOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The kind of answer a poll accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerKind {
    SingleChoice { options: Vec<PollOption> },
    MultiChoice { options: Vec<PollOption> },
    FreeText,
    Rating { min: u8, max: u8 },
}

impl AnswerKind {
    /// Options for choice polls, empty otherwise.
    pub fn options(&self) -> &[PollOption] {
        match self {
            AnswerKind::SingleChoice { options } | AnswerKind::MultiChoice { options } => options,
            AnswerKind::FreeText | AnswerKind::Rating { .. } => &[],
        }
    }

    fn has_option(&self, id: &str) -> bool {
        self.options().iter().any(|o| o.id == id)
    }
}

/// A poll definition as exposed by the external poll store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDefinition {
    pub id: PollId,
    pub question: String,
    pub answer_kind: AnswerKind,
}

impl PollDefinition {
    pub fn new(id: PollId, question: impl Into<String>, answer_kind: AnswerKind) -> Self {
        Self {
            id,
            question: question.into(),
            answer_kind,
        }
    }

    /// Label for an option key, if the poll defines it.
    pub fn option_label(&self, option_id: &str) -> Option<&str> {
        self.answer_kind
            .options()
            .iter()
            .find(|o| o.id == option_id)
            .map(|o| o.label.as_str())
    }

    /// Checks that `value` is a well-formed answer to this poll.
    ///
    /// # Errors
    ///
    /// `ValidationError` when the answer kind does not match, an option is
    /// unknown or repeated, free text is blank or too long, or a rating is
    /// outside the poll's scale.
    pub fn validate_response(&self, value: &ResponseValue) -> Result<(), ValidationError> {
        match (&self.answer_kind, value) {
            (AnswerKind::SingleChoice { .. }, ResponseValue::SingleChoice { option }) => {
                if !self.answer_kind.has_option(option) {
                    return Err(unknown_option(option));
                }
                Ok(())
            }
            (AnswerKind::MultiChoice { .. }, ResponseValue::MultiChoice { options }) => {
                if options.is_empty() {
                    return Err(ValidationError::empty_field("options"));
                }
                for (i, option) in options.iter().enumerate() {
                    if !self.answer_kind.has_option(option) {
                        return Err(unknown_option(option));
                    }
                    if options[..i].contains(option) {
                        return Err(ValidationError::invalid_format(
                            "options",
                            format!("option '{}' selected more than once", option),
                        ));
                    }
                }
                Ok(())
            }
            (AnswerKind::FreeText, ResponseValue::FreeText { text }) => {
                if text.trim().is_empty() {
                    return Err(ValidationError::empty_field("text"));
                }
                if text.chars().count() > MAX_FREE_TEXT_LENGTH {
                    return Err(ValidationError::invalid_format(
                        "text",
                        format!("must be {} characters or less", MAX_FREE_TEXT_LENGTH),
                    ));
                }
                Ok(())
            }
            (AnswerKind::Rating { min, max }, ResponseValue::Rating { value }) => {
                if value < min || value > max {
                    return Err(ValidationError::out_of_range(
                        "value",
                        i64::from(*min),
                        i64::from(*max),
                        i64::from(*value),
                    ));
                }
                Ok(())
            }
            (expected, got) => Err(ValidationError::invalid_format(
                "value",
                format!(
                    "poll expects a {} answer, got {}",
                    kind_name(expected),
                    got.kind_name()
                ),
            )),
        }
    }
}

fn unknown_option(option: &str) -> ValidationError {
    ValidationError::invalid_format("option", format!("unknown option '{}'", option))
}

fn kind_name(kind: &AnswerKind) -> &'static str {
    match kind {
        AnswerKind::SingleChoice { .. } => "single_choice",
        AnswerKind::MultiChoice { .. } => "multi_choice",
        AnswerKind::FreeText => "free_text",
        AnswerKind::Rating { .. } => "rating",
    }
}
