//! `[logging]` section: stdout level plus the optional JSON trace files

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// How often trace files roll over. Unknown names in the file mean daily.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    fn rotation(self) -> Rotation {
        match self {
            Self::Hourly => Rotation::HOURLY,
            Self::Daily => Rotation::DAILY,
            Self::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for the `petmatch` target; RUST_LOG overrides it
    pub level: String,
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// "petmatch" rolls into "petmatch.2025-01-15" with daily rotation
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs/trace"),
            file_rotation: LogRotation::Daily,
            file_prefix: "petmatch".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let Some(file) = file else {
            return Self::default();
        };
        let mut logging = Self::default();

        if let Some(level) = file.level.filter(|l| !l.trim().is_empty()) {
            logging.level = level.trim().to_ascii_lowercase();
        }
        if let Some(enabled) = file.file_enabled {
            logging.file_enabled = enabled;
        }
        if let Some(dir) = file.file_dir {
            logging.file_dir = PathBuf::from(dir);
        }
        if let Some(rotation) = file.file_rotation {
            logging.file_rotation = LogRotation::parse(&rotation);
        }
        if let Some(prefix) = file.file_prefix {
            logging.file_prefix = prefix;
        }
        logging
    }

    /// EnvFilter directive used when RUST_LOG is unset
    pub fn default_directive(&self) -> String {
        format!("petmatch={},axum=info", self.level)
    }

    /// Rolling appender under `file_dir`, creating the directory first
    pub fn file_appender(&self) -> std::io::Result<RollingFileAppender> {
        std::fs::create_dir_all(&self.file_dir)?;
        Ok(RollingFileAppender::new(
            self.file_rotation.rotation(),
            Path::new(&self.file_dir),
            &self.file_prefix,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_is_normalized() {
        let logging = LoggingConfig::from_file(Some(FileLogging {
            level: Some(" DEBUG ".to_string()),
            ..Default::default()
        }));
        assert_eq!(logging.default_directive(), "petmatch=debug,axum=info");
    }

    #[test]
    fn test_blank_level_keeps_default() {
        let logging = LoggingConfig::from_file(Some(FileLogging {
            level: Some(String::new()),
            ..Default::default()
        }));
        assert_eq!(logging.level, "info");
    }
}
