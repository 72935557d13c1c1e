//! Static configuration for talking to a Drupal JSON:API backend
//!
//! The configuration is a plain value handed to repositories and transports at
//! construction time. It can be built in code or read from the environment:
//!
//! ```bash
//! export DRUPAL_JSON_API_URL=https://cms.example.com/jsonapi
//! export DRUPAL_JSON_API_CACHE=true
//! export DRUPAL_JSON_API_CACHE_TTL=300
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{ClientError, ClientResult};

pub const ENV_BASE_URL: &str = "DRUPAL_JSON_API_URL";
pub const ENV_CACHE: &str = "DRUPAL_JSON_API_CACHE";
pub const ENV_CACHE_TTL: &str = "DRUPAL_JSON_API_CACHE_TTL";
pub const ENV_TIMEZONE: &str = "DRUPAL_JSON_API_TIMEZONE";
pub const ENV_USER: &str = "DRUPAL_JSON_API_USER";
pub const ENV_PASSWORD: &str = "DRUPAL_JSON_API_PASSWORD";
pub const ENV_CONSUMER_ID: &str = "DRUPAL_JSON_API_CONSUMER_ID";
pub const ENV_LOCALE: &str = "APP_LOCALE";

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Basic auth credentials sent when a repository has auth enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, e.g. `https://cms.example.com/jsonapi`.
    pub base_url: Url,
    #[serde(default)]
    pub cache_enabled: bool,
    #[serde(default = "default_cache_ttl", with = "duration_secs")]
    pub cache_ttl: Duration,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub auth: Option<Credentials>,
    #[serde(default)]
    pub consumer_id: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

fn default_cache_ttl() -> Duration {
    DEFAULT_CACHE_TTL
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            cache_enabled: false,
            cache_ttl: DEFAULT_CACHE_TTL,
            timezone: default_timezone(),
            auth: None,
            consumer_id: None,
            locale: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn parse(base_url: &str) -> ClientResult<Self> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    /// Read the configuration from the process environment.
    ///
    /// `DRUPAL_JSON_API_URL` is required. Everything else falls back to its
    /// default when unset.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ClientError::Config(format!("{} is not set", ENV_BASE_URL)))?;

        let mut config = Self::parse(&base_url)?;

        if let Some(raw) = lookup(ENV_CACHE) {
            config.cache_enabled = parse_flag(&raw);
        }

        if let Some(raw) = lookup(ENV_CACHE_TTL) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("{} must be a number of seconds, got `{}`", ENV_CACHE_TTL, raw))
            })?;
            config.cache_ttl = Duration::from_secs(secs);
        }

        if let Some(timezone) = lookup(ENV_TIMEZONE).filter(|tz| !tz.is_empty()) {
            config.timezone = timezone;
        }

        let user = lookup(ENV_USER).filter(|user| !user.is_empty());
        let password = lookup(ENV_PASSWORD).filter(|password| !password.is_empty());
        if let (Some(user), Some(password)) = (user, password) {
            config.auth = Some(Credentials::new(user, password));
        }

        config.consumer_id = lookup(ENV_CONSUMER_ID).filter(|id| !id.is_empty());
        config.locale = lookup(ENV_LOCALE).filter(|locale| !locale.is_empty());

        debug!(
            base_url = %config.base_url,
            cache_enabled = config.cache_enabled,
            "loaded JSON:API configuration from environment"
        );

        Ok(config)
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Credentials::new(user, password));
        self
    }

    pub fn with_consumer_id(mut self, consumer_id: impl Into<String>) -> Self {
        self.consumer_id = Some(consumer_id.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
