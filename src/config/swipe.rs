//! Terminal swiper configuration
//!
//! Gesture constants are in pixels so they read the same as on the web page.
//! The terminal front-end converts cell movement to pixels with
//! `px_per_column` / `px_per_row` before feeding the state machine.

use serde::Deserialize;

use crate::swipe::SwipeSettings;

#[derive(Debug, Clone)]
pub struct SwipeConfig {
    /// Horizontal release distance that commits a swipe
    pub threshold_px: f32,
    /// Card rotation in degrees per pixel of drag
    pub rotation_per_px: f32,
    /// Drag distance at which the card is fully transparent
    pub fade_distance_px: f32,
    /// Movement below this still counts as a tap
    pub tap_slop_px: f32,
    /// Fly-out animation length
    pub animation_ms: u64,
    pub px_per_column: f32,
    pub px_per_row: f32,
    /// API the swiper talks to
    pub server_url: String,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        let settings = SwipeSettings::default();
        Self {
            threshold_px: settings.threshold_px,
            rotation_per_px: settings.rotation_per_px,
            fade_distance_px: settings.fade_distance_px,
            tap_slop_px: settings.tap_slop_px,
            animation_ms: 400,
            px_per_column: 8.0,
            px_per_row: 16.0,
            server_url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSwipe {
    pub threshold_px: Option<f32>,
    pub rotation_per_px: Option<f32>,
    pub fade_distance_px: Option<f32>,
    pub tap_slop_px: Option<f32>,
    pub animation_ms: Option<u64>,
    pub px_per_column: Option<f32>,
    pub px_per_row: Option<f32>,
    pub server_url: Option<String>,
}

impl SwipeConfig {
    pub fn from_file(file: Option<FileSwipe>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            threshold_px: file.threshold_px.unwrap_or(defaults.threshold_px),
            rotation_per_px: file.rotation_per_px.unwrap_or(defaults.rotation_per_px),
            fade_distance_px: file.fade_distance_px.unwrap_or(defaults.fade_distance_px),
            tap_slop_px: file.tap_slop_px.unwrap_or(defaults.tap_slop_px),
            animation_ms: file.animation_ms.unwrap_or(defaults.animation_ms),
            px_per_column: file.px_per_column.unwrap_or(defaults.px_per_column),
            px_per_row: file.px_per_row.unwrap_or(defaults.px_per_row),
            server_url: file.server_url.unwrap_or(defaults.server_url),
        }
    }

    /// Gesture parameters for the state machine
    pub fn settings(&self) -> SwipeSettings {
        SwipeSettings {
            threshold_px: self.threshold_px,
            rotation_per_px: self.rotation_per_px,
            fade_distance_px: self.fade_distance_px,
            tap_slop_px: self.tap_slop_px,
        }
    }
}
