//! Semantic version of a presentation's content.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// `MAJOR.MINOR.PATCH` version. Serialized as its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl SemanticVersion {
    /// Version every new presentation starts at.
    pub const INITIAL: SemanticVersion = SemanticVersion::new(1, 0, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn bump_patch(&self) -> Self {
        Self::new(self.major, self.minor, self.patch + 1)
    }

    /// Next minor release; resets patch.
    pub fn bump_minor(&self) -> Self {
        Self::new(self.major, self.minor + 1, 0)
    }
}

impl Default for SemanticVersion {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemanticVersion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ValidationError::invalid_format("version", format!("'{}' is not MAJOR.MINOR.PATCH", s))
        };

        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u32, ValidationError> {
            parts
                .next()
                .and_then(|p| p.parse::<u32>().ok())
                .ok_or_else(invalid)
        };
        let version = Self::new(next()?, next()?, next()?);

        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_is_one_zero_zero() {
        assert_eq!(SemanticVersion::default().to_string(), "1.0.0");
    }

    #[test]
    fn bumps_follow_semver() {
        let v = SemanticVersion::new(1, 2, 3);
        assert_eq!(v.bump_patch(), SemanticVersion::new(1, 2, 4));
        assert_eq!(v.bump_minor(), SemanticVersion::new(1, 3, 0));
    }

    #[test]
    fn parses_valid_strings() {
        assert_eq!("2.10.7".parse::<SemanticVersion>().unwrap(), SemanticVersion::new(2, 10, 7));
    }

    #[test]
    fn rejects_malformed_strings() {
        for raw in ["", "1", "1.2", "1.2.3.4", "a.b.c", "1.-2.3"] {
            assert!(raw.parse::<SemanticVersion>().is_err(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&SemanticVersion::new(1, 0, 3)).unwrap();
        assert_eq!(json, "\"1.0.3\"");
        let back: SemanticVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back.patch(), 3);
    }
}
