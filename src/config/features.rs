//! Feature flags configuration (opt-out: default enabled)

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Features {
    /// Append store events to a JSONL journal under `log_dir`
    pub journal: bool,

    /// Start with the demo catalog and demo accounts
    pub seed_catalog: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            journal: true,
            seed_catalog: true,
        }
    }
}

/// Feature flags as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileFeatures {
    pub journal: Option<bool>,
    pub seed_catalog: Option<bool>,
}

impl Features {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileFeatures>) -> Self {
        let file = file.unwrap_or_default();

        Self {
            journal: file.journal.unwrap_or(true),
            seed_catalog: file.seed_catalog.unwrap_or(true),
        }
    }
}
