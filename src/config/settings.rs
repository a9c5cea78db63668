//! Fleet settings loaded from the environment.

use std::str::FromStr;
use std::time::Duration;

use super::{AccountCredential, parse_credential_list};
use crate::telegram::RetryPolicy;

/// Default Telegram Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Links shown as buttons in the welcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeLinks {
    /// Target of the "Updates" button.
    pub channel_url: String,

    /// Target of the "Support" button.
    pub group_url: String,
}

impl Default for WelcomeLinks {
    fn default() -> Self {
        Self {
            channel_url: default_channel_url(),
            group_url: default_group_url(),
        }
    }
}

fn default_channel_url() -> String {
    "https://t.me/example".to_owned()
}

fn default_group_url() -> String {
    "https://t.me/example_group".to_owned()
}

/// Timeouts and retry policy for Bot API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Base URL of the Bot API server.
    pub base_url: String,

    /// Client timeout for short calls (getMe, sendMessage, ...).
    pub request_timeout: Duration,

    /// Server-side long-poll wait passed as `timeout` to getUpdates.
    pub long_poll_wait: Duration,

    /// Client timeout for getUpdates.
    pub fetch_timeout: Duration,

    /// Retry policy applied to getUpdates.
    pub fetch_retry: RetryPolicy,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            request_timeout: Duration::from_secs(5),
            // Client timeout equals the server wait, so an idle long-poll
            // often times out on our side and goes through the fetch retry
            // policy. Raising it above the wait changes idle-queue behaviour.
            long_poll_wait: Duration::from_secs(10),
            fetch_timeout: Duration::from_secs(10),
            fetch_retry: RetryPolicy::default(),
        }
    }
}

/// Per-account worker tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Idle sleep between two polling cycles.
    pub poll_interval: Duration,

    /// Maximum reactions in flight at once for one account.
    pub reaction_concurrency: usize,

    /// Reactions that may wait in the queue before new ones are dropped.
    pub reaction_queue_capacity: usize,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            reaction_concurrency: 8,
            reaction_queue_capacity: 256,
        }
    }
}

/// Complete fleet configuration.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// One credential per bot account.
    pub credentials: Vec<AccountCredential>,

    /// Welcome message button targets.
    pub links: WelcomeLinks,

    /// Bot API client settings.
    pub api: ApiSettings,

    /// Worker loop settings.
    pub worker: WorkerSettings,
}

impl FleetConfig {
    /// Creates configuration from environment variables.
    ///
    /// `BOT_TOKENS` is required; everything else has a default.
    ///
    /// # Errors
    ///
    /// Returns an error if `BOT_TOKENS` is missing or empty, or if a numeric
    /// variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_tokens = lookup("BOT_TOKENS").ok_or(ConfigError::MissingEnvVar("BOT_TOKENS"))?;
        let credentials = parse_credential_list(&raw_tokens);
        if credentials.is_empty() {
            return Err(ConfigError::NoCredentials);
        }

        let links = WelcomeLinks {
            channel_url: lookup("CHANNEL_URL").unwrap_or_else(default_channel_url),
            group_url: lookup("GROUP_URL").unwrap_or_else(default_group_url),
        };

        let defaults = ApiSettings::default();
        let base_url = lookup("TELEGRAM_API_URL")
            .map_or_else(|| DEFAULT_API_URL.to_owned(), |u| u.trim_end_matches('/').to_owned());

        let default_retry = defaults.fetch_retry;
        let max_attempts = parse_var(&lookup, "FETCH_MAX_ATTEMPTS")?
            .unwrap_or(default_retry.max_attempts());
        let retry_delay = parse_var(&lookup, "FETCH_RETRY_DELAY_SECS")?
            .map_or(default_retry.delay(), Duration::from_secs);

        let api = ApiSettings {
            base_url,
            fetch_retry: RetryPolicy::new(max_attempts, retry_delay),
            ..defaults
        };

        let worker_defaults = WorkerSettings::default();
        let worker = WorkerSettings {
            poll_interval: parse_var(&lookup, "POLL_INTERVAL_MS")?
                .map_or(worker_defaults.poll_interval, Duration::from_millis),
            reaction_concurrency: parse_var::<usize, _>(&lookup, "REACTION_CONCURRENCY")?
                .unwrap_or(worker_defaults.reaction_concurrency)
                .max(1),
            reaction_queue_capacity: parse_var::<usize, _>(&lookup, "REACTION_QUEUE_CAPACITY")?
                .unwrap_or(worker_defaults.reaction_queue_capacity)
                .max(1),
        };

        Ok(Self {
            credentials,
            links,
            api,
            worker,
        })
    }
}

/// Reads and parses an optional variable.
fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("BOT_TOKENS does not contain any bot token")]
    NoCredentials,

    #[error("Invalid value for {key}: {value:?} (expected a non-negative integer)")]
    InvalidNumber { key: &'static str, value: String },
}
