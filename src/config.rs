use log::Level;
use serde::Deserialize;
use web_sys::Document;

use crate::error::SiteResult;

/// Body attribute carrying a JSON object that overrides any subset of [`SiteConfig`].
pub const CONFIG_ATTRIBUTE: &str = "data-site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Tunables for every controller. Missing keys fall back to the defaults below.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub shadow_threshold: f64,
    pub shadow_flat: String,
    pub shadow_elevated: String,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub active_lookup_offset: f64,
    pub active_link_color: String,
    pub error_border_color: String,
    pub shake_duration_ms: f64,
    pub submit_latency_ms: u32,
    pub indicator_visible_ms: u32,
    pub loading_label: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            shadow_threshold: 20.0,
            shadow_flat: "0 2px 20px rgba(0,0,0,.2)".to_string(),
            shadow_elevated: "0 4px 30px rgba(0,0,0,.35)".to_string(),
            reveal_threshold: 0.12,
            reveal_root_margin: "0px 0px -40px 0px".to_string(),
            active_lookup_offset: 100.0,
            active_link_color: "#FEC422".to_string(),
            error_border_color: "#FC8181".to_string(),
            shake_duration_ms: 300.0,
            submit_latency_ms: 1800,
            indicator_visible_ms: 5000,
            loading_label: "Enviando...".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> SiteResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the body override, keeping the defaults when it is absent or malformed.
    pub fn from_document(document: &Document) -> Self {
        let raw = document
            .body()
            .and_then(|body| body.get_attribute(CONFIG_ATTRIBUTE));
        match raw {
            Some(raw) => match Self::from_json(&raw) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Ignoring {}: {}", CONFIG_ATTRIBUTE, e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = SiteConfig::from_json("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r#"{"submit_latency_ms": 50, "active_link_color": "red"}"#;
        let config = SiteConfig::from_json(json).unwrap();
        assert_eq!(config.submit_latency_ms, 50);
        assert_eq!(config.active_link_color, "red");
        assert_eq!(config.indicator_visible_ms, 5000);
        assert_eq!(config.shadow_threshold, 20.0);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SiteConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::error::SiteError::Config(_)));
    }
}
