//! Participant answers to a live poll.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// A participant's answer, shaped by the poll's answer kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseValue {
    SingleChoice { option: String },
    MultiChoice { options: Vec<String> },
    FreeText { text: String },
    Rating { value: u8 },
}

impl ResponseValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ResponseValue::SingleChoice { .. } => "single_choice",
            ResponseValue::MultiChoice { .. } => "multi_choice",
            ResponseValue::FreeText { .. } => "free_text",
            ResponseValue::Rating { .. } => "rating",
        }
    }
}

/// One participant's current answer to one poll activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub user_id: UserId,
    pub value: ResponseValue,
    pub submitted_at: Timestamp,
}

/// Whether a submission created a response or replaced an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Created,
    Replaced,
}
