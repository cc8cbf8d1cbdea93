//! Transport configuration: defaults, YAML files, and `MAIL_API_*` env overrides.

use crate::policy::RetryPolicy;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use url::Url;

pub const DEFAULT_VERSION_HEADER: &str = "x-api-version";
pub const DEFAULT_APP_VERSION_HEADER: &str = "x-app-version";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Absolute http(s) URL every descriptor path is appended to.
    pub base_url: String,
    pub timeout_secs: u64,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout_secs: u64,
    pub proxy_url: Option<String>,
    pub user_agent: String,
    /// Sent as `x-app-version` when set.
    pub app_version: Option<String>,
    /// Header carrying each descriptor's `version()`.
    pub version_header: String,
    pub retry: RetryPolicy,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 30,
            pool_max_idle_per_host: 32,
            pool_idle_timeout_secs: 90,
            proxy_url: None,
            user_agent: concat!("mail-api-route/", env!("CARGO_PKG_VERSION")).to_string(),
            app_version: None,
            version_header: DEFAULT_VERSION_HEADER.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `MAIL_API_*` overrides. Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("MAIL_API_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = env_parse("MAIL_API_TIMEOUT_SECS") {
            self.timeout_secs = v;
        }
        if let Some(v) = env_parse("MAIL_API_POOL_MAX_IDLE_PER_HOST") {
            self.pool_max_idle_per_host = v;
        }
        if let Some(v) = env_parse("MAIL_API_POOL_IDLE_TIMEOUT_SECS") {
            self.pool_idle_timeout_secs = v;
        }
        if let Ok(v) = env::var("MAIL_API_PROXY_URL") {
            self.proxy_url = Some(v);
        }
        if let Ok(v) = env::var("MAIL_API_APP_VERSION") {
            self.app_version = Some(v);
        }
        if let Some(v) = env_parse("MAIL_API_MAX_RETRIES") {
            self.retry.max_retries = v;
        }
        if let Some(v) = env_parse("MAIL_API_MIN_DELAY_MS") {
            self.retry.min_delay_ms = v;
        }
        if let Some(v) = env_parse("MAIL_API_MAX_DELAY_MS") {
            self.retry.max_delay_ms = v;
        }
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = Some(app_version.into());
        self
    }

    /// Check the base URL and header names before a client is built.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base_url {:?}", self.base_url),
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_details(e.to_string())
                    .with_source("config_validator"),
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("unsupported base_url scheme: {}", url.scheme()),
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_source("config_validator"),
            ));
        }
        if reqwest::header::HeaderName::from_bytes(self.version_header.as_bytes()).is_err() {
            return Err(Error::configuration_with_context(
                format!("invalid version_header {:?}", self.version_header),
                ErrorContext::new()
                    .with_field_path("config.version_header")
                    .with_source("config_validator"),
            ));
        }
        let header_values = [
            ("config.user_agent", Some(self.user_agent.as_str())),
            ("config.app_version", self.app_version.as_deref()),
        ];
        for (field, value) in header_values {
            let Some(value) = value else { continue };
            if let Err(e) = reqwest::header::HeaderValue::from_str(value) {
                return Err(Error::configuration_with_context(
                    format!("{} is not a valid header value", field),
                    ErrorContext::new()
                        .with_field_path(field)
                        .with_details(e.to_string())
                        .with_source("config_validator"),
                ));
            }
        }
        Ok(())
    }
}
