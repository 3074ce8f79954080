// llm-gateway-rs/src/config.rs
//
// Gateway configuration from environment variables (.env supported):
// - LLM_API_KEY / GROQ_API_KEY: bearer credential (absence fails each call, not startup)
// - LLM_API_URL: chat-completions endpoint
// - LLM_MODEL: default model identifier
// - LLM_MAX_ATTEMPTS: total attempts per call, including the first (default: 2)
// - LLM_INITIAL_RETRY_DELAY_MS: delay before the first retry (default: 1000)
// - LLM_RETRY_MULTIPLIER: backoff growth factor (default: 2.0)
// - LLM_REQUEST_TIMEOUT_SECS: per-attempt total timeout (default: 120)
// - LLM_MAX_CONNECTIONS: simultaneous outbound requests per client (default: 5)

use backoff::{backoff::Backoff, ExponentialBackoff, ExponentialBackoffBuilder};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Retry schedule for transient failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per call; 1 disables retries
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_backoff: Duration,
    /// Growth factor applied after every retry
    pub multiplier: f64,
    /// Upper bound for a single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_backoff: Duration::from_secs(1),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff without jitter: initial, initial*m, initial*m^2, ...
    ///
    /// There is no elapsed-time cap; the attempt bound alone ends the loop.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_backoff)
            .with_multiplier(self.multiplier)
            .with_randomization_factor(0.0)
            .with_max_interval(self.max_backoff)
            .with_max_elapsed_time(None)
            .build()
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Delays slept between consecutive attempts, in order
pub fn backoff_schedule(policy: &RetryPolicy) -> Vec<Duration> {
    let mut backoff = policy.backoff();
    (1..policy.attempts())
        .map(|_| backoff.next_backoff().unwrap_or(policy.max_backoff))
        .collect()
}

/// Everything a [`GatewayClient`](crate::GatewayClient) needs to reach the upstream
#[derive(Clone)]
pub struct GatewayConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub max_connections: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(120),
            max_connections: 5,
        }
    }
}

impl GatewayConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let retry = RetryPolicy {
            max_attempts: config_rs::env_or("LLM_MAX_ATTEMPTS", defaults.retry.max_attempts),
            initial_backoff: config_rs::env_duration_ms(
                "LLM_INITIAL_RETRY_DELAY_MS",
                defaults.retry.initial_backoff,
            ),
            multiplier: config_rs::env_or("LLM_RETRY_MULTIPLIER", defaults.retry.multiplier),
            max_backoff: config_rs::env_duration_ms("LLM_MAX_RETRY_DELAY_MS", defaults.retry.max_backoff),
        };

        let config = Self {
            api_url: config_rs::env_string("LLM_API_URL").unwrap_or(defaults.api_url),
            api_key: config_rs::env_string_any(&["LLM_API_KEY", "GROQ_API_KEY"]),
            model: config_rs::env_string("LLM_MODEL").unwrap_or(defaults.model),
            retry,
            request_timeout: config_rs::env_duration_secs(
                "LLM_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout,
            ),
            max_connections: config_rs::env_or("LLM_MAX_CONNECTIONS", defaults.max_connections)
                .max(1),
        };

        if config.api_key.is_none() {
            tracing::warn!("LLM_API_KEY is not set; gateway calls will fail until it is configured");
        }
        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().map_or(false, |k| !k.is_empty())
    }
}

// The credential never reaches logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("retry", &self.retry)
            .field("request_timeout", &self.request_timeout)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(delays: &[Duration]) -> Vec<u128> {
        delays.iter().map(|d| d.as_millis()).collect()
    }

    #[test]
    fn test_default_policy_values() {
        let config = GatewayConfig::default();
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.max_connections, 5);
        assert!(!config.has_credential());
    }

    #[test]
    fn test_default_schedule_is_single_one_second_delay() {
        assert_eq!(millis(&backoff_schedule(&RetryPolicy::default())), vec![1000]);
    }

    #[test]
    fn test_schedule_doubles_between_attempts() {
        let policy = RetryPolicy {
            max_attempts: 4,
            ..RetryPolicy::default()
        };
        assert_eq!(millis(&backoff_schedule(&policy)), vec![1000, 2000, 4000]);
    }

    #[test]
    fn test_schedule_respects_max_backoff() {
        let policy = RetryPolicy {
            max_attempts: 5,
            max_backoff: Duration::from_secs(3),
            ..RetryPolicy::default()
        };
        assert_eq!(millis(&backoff_schedule(&policy)), vec![1000, 2000, 3000, 3000]);
    }

    #[test]
    fn test_single_attempt_has_no_delays() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.attempts(), 1);
        assert!(backoff_schedule(&policy).is_empty());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GatewayConfig::default().with_api_key("sk-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
