//! Presentation-level session settings.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Permissions and limits applied to every session of a presentation.
///
/// `max_participants` is advisory; the roster does not enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationSettings {
    pub max_participants: Option<u32>,
    pub allow_comments: bool,
    pub allow_polls: bool,
    pub record_session: bool,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            max_participants: None,
            allow_comments: true,
            allow_polls: true,
            record_session: false,
        }
    }
}

impl PresentationSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(max) = self.max_participants {
            if max == 0 {
                return Err(ValidationError::out_of_range(
                    "max_participants",
                    1,
                    i64::from(u32::MAX),
                    0,
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_allow_comments_and_polls() {
        let settings = PresentationSettings::default();
        assert!(settings.allow_comments);
        assert!(settings.allow_polls);
        assert!(!settings.record_session);
        assert_eq!(settings.max_participants, None);
    }

    #[test]
    fn zero_max_participants_is_invalid() {
        let settings = PresentationSettings {
            max_participants: Some(0),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let settings: PresentationSettings =
            serde_json::from_str(r#"{"record_session": true}"#).unwrap();
        assert!(settings.record_session);
        assert!(settings.allow_polls);
    }
}
