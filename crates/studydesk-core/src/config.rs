#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every field has a default matching the shipped site, so an empty JSON
//! object (or no configuration block at all) yields the stock behavior.
//!
//! ```ignore
//! let config = SiteConfig::from_json_str(r#"{ "engine_preload_delay_ms": 0 }"#)?;
//! assert_eq!(config.engine_preload_delay(), Duration::ZERO);
//! ```

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::EntryOverride;
use crate::error::SiteError;

/// CDN location the Pyodide runtime loads its packages from.
pub const DEFAULT_ENGINE_INDEX_URL: &str = "https://cdn.jsdelivr.net/pyodide/v0.24.1/full/";

/// Tunables for the page controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// A section counts as current once the scroll position is within this
    /// distance of its top edge.
    pub scroll_spy_offset: f64,
    /// Scroll position past which the navbar switches to its solid style.
    pub navbar_solid_threshold: f64,
    /// Space left above an anchor target when smooth scrolling (fixed navbar).
    pub anchor_offset: f64,
    /// `indexURL` handed to the engine loader.
    pub engine_index_url: String,
    /// Delay after bootstrap before the engine is loaded in the background.
    pub engine_preload_delay_ms: u64,
    pub notification_enter_ms: u64,
    pub notification_hold_ms: u64,
    pub notification_exit_ms: u64,
    pub counter_duration_ms: u64,
    pub counter_frame_ms: u64,
    /// Parallax factor of the hero and of the first floating card.
    pub parallax_base: f64,
    /// Extra parallax factor added per subsequent floating card.
    pub parallax_step: f64,
    /// Service worker script registered once the window has loaded.
    pub service_worker_path: String,
    /// `tracing` filter directive used by the web shell.
    pub log_level: String,
    /// Per-identifier catalog overrides (remote tokens, names, file URLs).
    pub catalog: Vec<EntryOverride>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            scroll_spy_offset: 200.0,
            navbar_solid_threshold: 100.0,
            anchor_offset: 70.0,
            engine_index_url: DEFAULT_ENGINE_INDEX_URL.to_string(),
            engine_preload_delay_ms: 600,
            notification_enter_ms: 100,
            notification_hold_ms: 3000,
            notification_exit_ms: 300,
            counter_duration_ms: 2000,
            counter_frame_ms: 16,
            parallax_base: 0.5,
            parallax_step: 0.1,
            service_worker_path: "/sw.js".to_string(),
            log_level: "info".to_string(),
            catalog: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Decode a configuration block. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SiteError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SiteError> {
        if self.counter_frame_ms == 0 {
            return Err(SiteError::InvalidConfig(
                "counter_frame_ms must be greater than zero".into(),
            ));
        }
        if self.engine_index_url.trim().is_empty() {
            return Err(SiteError::InvalidConfig(
                "engine_index_url must not be empty".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn engine_preload_delay(&self) -> Duration {
        Duration::from_millis(self.engine_preload_delay_ms)
    }

    #[must_use]
    pub fn notification_enter(&self) -> Duration {
        Duration::from_millis(self.notification_enter_ms)
    }

    #[must_use]
    pub fn notification_hold(&self) -> Duration {
        Duration::from_millis(self.notification_hold_ms)
    }

    #[must_use]
    pub fn notification_exit(&self) -> Duration {
        Duration::from_millis(self.notification_exit_ms)
    }

    #[must_use]
    pub fn counter_frame(&self) -> Duration {
        Duration::from_millis(self.counter_frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_yields_defaults() {
        let config = SiteConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.engine_preload_delay(), Duration::from_millis(600));
        assert_eq!(config.engine_index_url, DEFAULT_ENGINE_INDEX_URL);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            SiteConfig::from_json_str(r#"{ "scroll_spy_offset": 120, "log_level": "debug" }"#)
                .unwrap();
        assert_eq!(config.scroll_spy_offset, 120.0);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.anchor_offset, 70.0);
    }

    #[test]
    fn catalog_overrides_are_decoded() {
        let config = SiteConfig::from_json_str(
            r#"{ "catalog": [ { "id": "math", "remote_token": "abc123" } ] }"#,
        )
        .unwrap();
        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.catalog[0].remote_token.as_deref(), Some("abc123"));
    }

    #[test]
    fn zero_counter_frame_is_rejected() {
        let err = SiteConfig::from_json_str(r#"{ "counter_frame_ms": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("counter_frame_ms"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            SiteConfig::from_json_str("{ not json"),
            Err(SiteError::InvalidConfig(_))
        ));
    }
}
