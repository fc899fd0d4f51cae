//! Widget configuration.
//!
//! A single value handed to the widget at construction. Every field has a
//! default so a page only needs to spell out what it overrides.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub endpoints: Endpoints,
    pub animation: AnimationConfig,
    /// Where event descriptions come from.
    pub descriptions: DescriptionSource,
    /// Joins the description and the full date in the expanded view.
    pub detail_separator: String,
    /// Text shown in place of the rows when loading fails.
    pub failure_message: String,
    pub link_icon: String,
    /// Hold rendering until the page intro reports completion.
    pub wait_for_intro: bool,
    pub log_level: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            animation: AnimationConfig::default(),
            descriptions: DescriptionSource::Remote,
            detail_separator: "@".into(),
            failure_message: "Не удалось загрузить обновления".into(),
            link_icon: "/static/svg/link_sign.svg".into(),
            wait_for_intro: false,
            log_level: "info".into(),
        }
    }
}

impl WidgetConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    pub fn log_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub updates: String,
    pub event_types: String,
    pub log_error: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            updates: "/api/updates".into(),
            event_types: "/api/event-types".into(),
            log_error: "/api/log-error".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Delay before an expanded row collapses on its own.
    pub duration_ms: u64,
    /// Space reserved to the right of the detail text.
    pub scroll_margin_px: f64,
    /// Overflow tolerated before the detail text starts scrolling.
    pub scroll_threshold_px: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            scroll_margin_px: 70.0,
            scroll_threshold_px: 5.0,
        }
    }
}

impl AnimationConfig {
    pub fn collapse_delay(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Source of the event-type → description table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionSource {
    /// Fetched from `endpoints.event_types` alongside the feed.
    #[default]
    Remote,
    /// Shipped with the page; no extra request.
    Inline(BTreeMap<String, String>),
}
