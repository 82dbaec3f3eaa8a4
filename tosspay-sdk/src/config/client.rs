//! API client configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.tosspayments.com";

/// Version segment inserted between the base URL and the endpoint path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V1,
    #[default]
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }

    /// Whether every request must carry an `Idempotency-Key` header.
    pub fn requires_idempotency_key(&self) -> bool {
        matches!(self, ApiVersion::V2)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retry settings: total attempts and a fixed sleep between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one.
    #[serde(default = "default_retry_times")]
    pub times: u32,
    /// Milliseconds to wait between attempts.
    #[serde(default = "default_retry_sleep")]
    pub sleep: u64,
}

fn default_retry_times() -> u32 {
    3
}

fn default_retry_sleep() -> u64 {
    100
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            times: default_retry_times(),
            sleep: default_retry_sleep(),
        }
    }
}

impl RetryConfig {
    pub fn sleep_duration(&self) -> Duration {
        Duration::from_millis(self.sleep)
    }
}

/// Settings for [`TossClient`](crate::client::TossClient).
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API secret key, sent as the Basic auth user name.
    pub secret_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    #[serde(default)]
    pub version: ApiVersion,
    /// Per-attempt timeout, written in seconds (fractions allowed).
    #[serde(default = "default_timeout", with = "seconds_serde")]
    pub timeout: Duration,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Verify the server's TLS certificate.
    #[serde(default = "default_ssl_verify")]
    pub ssl_verify: bool,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("valid default base url")
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_ssl_verify() -> bool {
    true
}

impl ClientConfig {
    /// Create a configuration with the documented defaults.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: default_base_url(),
            version: ApiVersion::default(),
            timeout: default_timeout(),
            retry: RetryConfig::default(),
            ssl_verify: default_ssl_verify(),
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_ssl_verify(mut self, ssl_verify: bool) -> Self {
        self.ssl_verify = ssl_verify;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }
}

/// Serde support for a `Duration` written as seconds.
mod seconds_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_nanos() == 0 {
            duration.as_secs().serialize(serializer)
        } else {
            duration.as_secs_f64().serialize(serializer)
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("secret_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("version", &self.version)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("ssl_verify", &self.ssl_verify)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("test_sk");
        assert_eq!(config.base_url.as_str(), "https://api.tosspayments.com/");
        assert_eq!(config.version, ApiVersion::V2);
        assert_eq!(config.timeout_duration(), Duration::from_secs(30));
        assert_eq!(config.retry, RetryConfig { times: 3, sleep: 100 });
        assert!(config.ssl_verify);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"secret_key":"sk","version":"v1","retry":{"times":5}}"#)
                .unwrap();
        assert_eq!(config.version, ApiVersion::V1);
        assert_eq!(config.retry.times, 5);
        assert_eq!(config.retry.sleep_duration(), Duration::from_millis(100));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_sub_second_timeout_is_kept() {
        let config = ClientConfig::new("sk").with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout_duration(), Duration::from_millis(500));

        let config: ClientConfig =
            serde_json::from_str(r#"{"secret_key":"sk","timeout":0.25}"#).unwrap();
        assert_eq!(config.timeout_duration(), Duration::from_millis(250));
        assert_eq!(serde_json::to_value(&config).unwrap()["timeout"], 0.25);
    }

    #[test]
    fn test_timeout_serializes_whole_seconds_as_integer() {
        let config = ClientConfig::new("sk").with_timeout(Duration::from_secs(10));
        assert_eq!(serde_json::to_value(&config).unwrap()["timeout"], 10);
        assert!(serde_json::from_str::<ClientConfig>(r#"{"secret_key":"sk","timeout":-1}"#).is_err());
    }

    #[test]
    fn test_idempotency_requirement() {
        assert!(ApiVersion::V2.requires_idempotency_key());
        assert!(!ApiVersion::V1.requires_idempotency_key());
        assert_eq!(ApiVersion::V1.to_string(), "v1");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ClientConfig::new("live_sk_very_secret");
        assert!(!format!("{config:?}").contains("live_sk_very_secret"));
    }
}
