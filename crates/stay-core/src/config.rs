//! Front-end configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{CoreError, RatingPolicy, ReviewSort};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewsConfig {
    /// Booking API access.
    #[serde(default)]
    pub api: ApiConfig,

    /// Review listing behaviour.
    #[serde(default)]
    pub reviews: ReviewListConfig,

    /// Session detection.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Notification display.
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReviewsConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path))?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), CoreError> {
        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "api.base_url must be an http(s) URL, got {:?}",
                self.api.base_url
            )));
        }
        if !(1..=ReviewListConfig::MAX_PAGE_SIZE).contains(&self.reviews.page_size) {
            return Err(CoreError::Config(format!(
                "reviews.page_size must be between 1 and {}",
                ReviewListConfig::MAX_PAGE_SIZE
            )));
        }
        if self.reviews.preview_size == 0 {
            return Err(CoreError::Config(
                "reviews.preview_size must be at least 1".to_string(),
            ));
        }
        if !(1..=NotificationConfig::MAX_DISMISS_AFTER_MS)
            .contains(&self.notifications.dismiss_after_ms)
        {
            return Err(CoreError::Config(format!(
                "notifications.dismiss_after_ms must be between 1 and {}",
                NotificationConfig::MAX_DISMISS_AFTER_MS
            )));
        }
        if self.auth.cookie_name.trim().is_empty() {
            return Err(CoreError::Config("auth.cookie_name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Replace the API base URL, e.g. from a host variable.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }
}

/// Booking API access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `/reviews` paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Review listing behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewListConfig {
    /// Reviews requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Reviews shown before "show all" is toggled.
    #[serde(default = "default_preview_size")]
    pub preview_size: usize,

    /// Sort key used when none is requested.
    #[serde(default)]
    pub default_sort: ReviewSort,

    /// Handling of out-of-domain ratings.
    #[serde(default)]
    pub rating_policy: RatingPolicy,
}

impl ReviewListConfig {
    pub const MAX_PAGE_SIZE: u32 = 100;
}

fn default_page_size() -> u32 {
    10
}

fn default_preview_size() -> usize {
    6
}

impl Default for ReviewListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            preview_size: default_preview_size(),
            default_sort: ReviewSort::default(),
            rating_policy: RatingPolicy::default(),
        }
    }
}

/// Session detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Cookie holding the bearer token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_cookie_name() -> String {
    "token".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
        }
    }
}

/// Notification display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Delay before a notification is dismissed.
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,
}

impl NotificationConfig {
    /// Longest accepted dismissal delay (ten minutes).
    pub const MAX_DISMISS_AFTER_MS: u64 = 600_000;
}

fn default_dismiss_after_ms() -> u64 {
    3000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: default_dismiss_after_ms(),
        }
    }
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error.
    #[serde(default = "default_level")]
    pub level: String,

    /// `json` or `human`.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

/// Default configuration document, as shipped with the workload.
pub const DEFAULT_CONFIG_TOML: &str = r#"# Accommodation reviews configuration

[api]
base_url = "http://localhost:8080/api"

[reviews]
page_size = 10
preview_size = 6
default_sort = "newest"
rating_policy = "reject"

[auth]
cookie_name = "token"

[notifications]
dismiss_after_ms = 3000

[logging]
level = "info"
format = "json"
"#;
