#![forbid(unsafe_code)]

//! Page configuration embedded in the document.
//!
//! A page may carry `<script id="studydesk-config" type="application/json">`
//! with any subset of [`SiteConfig`] fields. Absence, blank content, or a
//! block that fails to parse all yield the defaults; the parse error is handed
//! back so it can be logged once logging is up.

use studydesk_core::{SiteConfig, SiteError};

#[must_use]
pub fn resolve_config(raw: Option<&str>) -> (SiteConfig, Option<SiteError>) {
    match raw.map(str::trim).filter(|text| !text.is_empty()) {
        None => (SiteConfig::default(), None),
        Some(text) => match SiteConfig::from_json_str(text) {
            Ok(config) => (config, None),
            Err(err) => (SiteConfig::default(), Some(err)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_or_blank_block_uses_defaults() {
        for raw in [None, Some(""), Some("  \n ")] {
            let (config, err) = resolve_config(raw);
            assert!(err.is_none());
            assert_eq!(config.engine_preload_delay_ms, 600);
        }
    }

    #[test]
    fn partial_block_overrides_named_fields() {
        let (config, err) =
            resolve_config(Some(r#"{ "log_level": "debug", "engine_preload_delay_ms": 0 }"#));
        assert!(err.is_none());
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.engine_preload_delay_ms, 0);
        assert_eq!(config.scroll_spy_offset, 200.0);
    }

    #[test]
    fn malformed_block_falls_back_and_reports() {
        let (config, err) = resolve_config(Some("{ not json"));
        assert_eq!(config.log_level, "info");
        assert!(matches!(err, Some(SiteError::InvalidConfig(_))));
    }
}
