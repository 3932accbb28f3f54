use std::env::vars;
use std::num::NonZeroUsize;
use std::time::Duration;

use log::info;
use serde::Deserialize;
use thiserror::Error;
use userdash_states::SettlePolicy;
use ustr::Ustr;

use crate::retry::RetryPolicy;

/// Prefix of every environment variable read by [`BusinessConfig::from_env`].
pub const ENV_PREFIX: &str = "USERDASH_";

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_ITEMS_PER_PAGE: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to read USERDASH_* environment: {0}")]
    Env(String),
    #[error("USERDASH_API_BASE_URL must not be empty")]
    EmptyBaseUrl,
    #[error("USERDASH_MAX_RETRIES must be at least 1")]
    ZeroRetries,
    #[error("USERDASH_ITEMS_PER_PAGE must be at least 1")]
    ZeroPageSize,
}

/// Fixed-at-start configuration of the dashboard core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    api_base_url: Ustr,
    max_retries: u32,
    retry_delay: Duration,
    items_per_page: NonZeroUsize,
    settle_policy: SettlePolicy,
}

// Intermediate struct for deserializing environment variables where every field is optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    max_retries: Option<u32>,
    retry_delay_ms: Option<u64>,
    items_per_page: Option<usize>,
    settle_policy: Option<SettlePolicy>,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: Ustr::from(DEFAULT_API_BASE_URL),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            settle_policy: SettlePolicy::default(),
        }
    }
}

impl BusinessConfig {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            api_base_url: Ustr::from(base_url.as_ref().trim_end_matches('/')),
            ..Self::default()
        }
    }

    /// Reads `USERDASH_*` variables on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading configuration from {ENV_PREFIX}* environment variables");
        Self::from_vars(vars())
    }

    /// Like [`BusinessConfig::from_env`], over an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_owned(), value.into()))
            })
            .collect();

        let raw: RawConfig =
            serde_env::from_iter(scoped).map_err(|e| ConfigError::Env(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let RawConfig {
            api_base_url,
            max_retries,
            retry_delay_ms,
            items_per_page,
            settle_policy,
        } = raw;

        let mut config = Self::default();

        if let Some(url) = api_base_url {
            config = config.with_api_base_url(&url)?;
            info!("Using provided API_BASE_URL: {}", config.api_base_url);
        }
        if let Some(retries) = max_retries {
            config = config.with_max_retries(retries)?;
        }
        if let Some(ms) = retry_delay_ms {
            config.retry_delay = Duration::from_millis(ms);
        }
        if let Some(size) = items_per_page {
            config.items_per_page = NonZeroUsize::new(size).ok_or(ConfigError::ZeroPageSize)?;
        }
        if let Some(policy) = settle_policy {
            config.settle_policy = policy;
        }

        Ok(config)
    }

    /// Replaces the base URL; a trailing `/` is dropped.
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        self.api_base_url = Ustr::from(url);
        Ok(self)
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Result<Self, ConfigError> {
        if max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        self.max_retries = max_retries;
        Ok(self)
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_items_per_page(mut self, items_per_page: NonZeroUsize) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    pub fn with_settle_policy(mut self, settle_policy: SettlePolicy) -> Self {
        self.settle_policy = settle_policy;
        self
    }

    /// Base URL without a trailing slash, e.g. `https://jsonplaceholder.typicode.com`.
    pub fn api_url(&self) -> Ustr {
        self.api_base_url
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn items_per_page(&self) -> NonZeroUsize {
        self.items_per_page
    }

    pub fn settle_policy(&self) -> SettlePolicy {
        self.settle_policy
    }

    /// Fixed-delay policy built from `max_retries` and `retry_delay`.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.max_retries, self.retry_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = BusinessConfig::default();

        assert_eq!(config.api_url(), Ustr::from(DEFAULT_API_BASE_URL));
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.items_per_page().get(), 5);
        assert_eq!(config.settle_policy(), SettlePolicy::LatestOnly);
    }

    #[test]
    fn new_strips_trailing_slash() {
        let config = BusinessConfig::new("http://127.0.0.1:8080/");
        assert_eq!(config.api_url(), Ustr::from("http://127.0.0.1:8080"));
    }

    #[test]
    fn prefixed_vars_override_defaults() {
        let config = BusinessConfig::from_vars(vec![
            ("USERDASH_API_BASE_URL", "https://api.example.com/"),
            ("USERDASH_MAX_RETRIES", "5"),
            ("USERDASH_RETRY_DELAY_MS", "250"),
            ("USERDASH_ITEMS_PER_PAGE", "10"),
            ("USERDASH_SETTLE_POLICY", "last-settled-wins"),
            ("PATH", "/usr/bin"),
        ])
        .expect("config should build");

        assert_eq!(config.api_url(), Ustr::from("https://api.example.com"));
        assert_eq!(config.max_retries(), 5);
        assert_eq!(config.retry_delay(), Duration::from_millis(250));
        assert_eq!(config.items_per_page().get(), 10);
        assert_eq!(config.settle_policy(), SettlePolicy::LastSettledWins);
    }

    #[test]
    fn unprefixed_vars_are_ignored() {
        let config = BusinessConfig::from_vars(vec![("MAX_RETRIES", "9")])
            .expect("config should build");
        assert_eq!(config, BusinessConfig::default());
    }

    #[test]
    fn zero_retries_is_rejected() {
        let result = BusinessConfig::from_vars(vec![("USERDASH_MAX_RETRIES", "0")]);
        assert_eq!(result, Err(ConfigError::ZeroRetries));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let result = BusinessConfig::from_vars(vec![("USERDASH_ITEMS_PER_PAGE", "0")]);
        assert_eq!(result, Err(ConfigError::ZeroPageSize));
    }

    #[test]
    fn blank_base_url_is_rejected() {
        let result = BusinessConfig::from_vars(vec![("USERDASH_API_BASE_URL", "/")]);
        assert_eq!(result, Err(ConfigError::EmptyBaseUrl));
    }

    #[test]
    fn malformed_number_is_an_env_error() {
        let result = BusinessConfig::from_vars(vec![("USERDASH_MAX_RETRIES", "lots")]);
        assert!(matches!(result, Err(ConfigError::Env(_))));
    }

    #[test]
    fn retry_policy_follows_config() {
        let config = BusinessConfig::default()
            .with_max_retries(4)
            .expect("non-zero retries")
            .with_retry_delay(Duration::from_millis(20));

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.delay_for(1), Duration::from_millis(20));
        assert_eq!(policy.delay_for(3), Duration::from_millis(20));
    }
}
