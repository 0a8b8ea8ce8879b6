//! Engine tuning.

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Load-mutate-commit attempts before a write gives up with a conflict.
    #[serde(default = "default_max_commit_attempts")]
    pub max_commit_attempts: u32,

    /// JSON file seeding the in-process poll catalog, keyed by tenant.
    pub poll_catalog_path: Option<PathBuf>,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=50).contains(&self.max_commit_attempts) {
            return Err(ValidationError::InvalidCommitAttempts);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: default_max_commit_attempts(),
            poll_catalog_path: None,
        }
    }
}

fn default_max_commit_attempts() -> u32 {
    5
}
