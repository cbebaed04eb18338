//! Console Configuration
//!
//! Build-time settings for the admin console. Values come from serde
//! defaults and can be overridden through environment variables read at
//! compile time (the bundle has no filesystem to read from at runtime).

use leptos::*;
use serde::Deserialize;

use crate::validation::{megabytes, MIB};

/// Runtime configuration shared through Leptos context
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL every API path is appended to
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Public endpoint answering `{"ip": "..."}` for the caller
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
    /// Rows per page in the user table
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Upper bound for profile picture uploads
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    /// Viewport width at or below which the layout switches to mobile
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint_px: u32,
    /// How long toast notifications stay on screen
    #[serde(default = "default_toast_duration")]
    pub toast_duration_ms: u64,
    /// Install the illustrative user list when the user fetch fails
    #[serde(default = "default_demo_fallback")]
    pub demo_fallback: bool,
}

fn default_api_base() -> String {
    "/api".to_string()
}

fn default_ip_lookup_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_max_image_bytes() -> u64 {
    5 * MIB
}

fn default_mobile_breakpoint() -> u32 {
    768
}

fn default_toast_duration() -> u64 {
    5000
}

fn default_demo_fallback() -> bool {
    cfg!(debug_assertions)
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            ip_lookup_url: default_ip_lookup_url(),
            page_size: default_page_size(),
            max_image_bytes: default_max_image_bytes(),
            mobile_breakpoint_px: default_mobile_breakpoint(),
            toast_duration_ms: default_toast_duration(),
            demo_fallback: default_demo_fallback(),
        }
    }
}

impl ConsoleConfig {
    /// Defaults overridden by `CONSOLE_*` variables present at build time
    pub fn from_build_env() -> Self {
        Self::default().with_overrides(
            option_env!("CONSOLE_API_BASE"),
            option_env!("CONSOLE_DEMO_FALLBACK"),
        )
    }

    /// Parse a JSON document; missing keys take their defaults
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn with_overrides(mut self, api_base: Option<&str>, demo_fallback: Option<&str>) -> Self {
        if let Some(base) = api_base.map(str::trim).filter(|b| !b.is_empty()) {
            self.api_base = base.to_string();
        }
        if let Some(flag) = demo_fallback {
            self.demo_fallback = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        self
    }

    /// Join an API path onto the configured base
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Largest accepted image, in whole megabytes, for user-facing text
    pub fn max_image_megabytes(&self) -> u64 {
        megabytes(self.max_image_bytes)
    }
}

/// Provide config context
pub fn provide_config(config: ConsoleConfig) -> ConsoleConfig {
    provide_context(config.clone());
    config
}

/// Use config from context
pub fn use_config() -> ConsoleConfig {
    use_context::<ConsoleConfig>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.api_base, "/api");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(config.max_image_megabytes(), 5);
        assert_eq!(config.mobile_breakpoint_px, 768);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ConsoleConfig::from_json(r#"{"api_base": "https://console.example.com/api", "page_size": 25}"#).unwrap();
        assert_eq!(config.api_base, "https://console.example.com/api");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.toast_duration_ms, 5000);
        assert_eq!(config.ip_lookup_url, "https://api.ipify.org?format=json");
    }

    #[test]
    fn test_endpoint_joins_single_slash() {
        let mut config = ConsoleConfig::default();
        assert_eq!(config.endpoint("/user"), "/api/user");

        config.api_base = "http://10.0.0.5/api/".to_string();
        assert_eq!(config.endpoint("user/42/status"), "http://10.0.0.5/api/user/42/status");
    }

    #[test]
    fn test_overrides() {
        let config = ConsoleConfig::default().with_overrides(Some(" https://api.test "), Some("off"));
        assert_eq!(config.api_base, "https://api.test");
        assert!(!config.demo_fallback);

        let config = ConsoleConfig::default().with_overrides(Some(""), Some("TRUE"));
        assert_eq!(config.api_base, "/api");
        assert!(config.demo_fallback);
    }
}
