//! Session token lifetime

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SessionsConfig {
    /// Idle minutes before a bearer token stops being accepted
    pub ttl_minutes: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 12 * 60,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSessions {
    pub ttl_minutes: Option<u64>,
}

impl SessionsConfig {
    pub fn from_file(file: Option<FileSessions>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            ttl_minutes: file.ttl_minutes.unwrap_or(Self::default().ttl_minutes),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }
}
