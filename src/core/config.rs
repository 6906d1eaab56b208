//! Service configuration
//!
//! Loaded once from the environment (after `.env`) and passed down explicitly.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Judge0 connection settings
#[derive(Debug, Clone)]
pub struct Judge0Config {
    /// Base URL without trailing slash (default: RapidAPI Judge0 CE)
    pub base_url: String,
    /// Sent as `X-RapidAPI-Key` when set
    pub api_key: Option<String>,
    /// Sent as `X-RapidAPI-Host`
    pub api_host: String,
    /// Send/receive payloads base64-encoded
    pub base64_encoded: bool,
    /// Delay between status polls (default: 1000ms)
    pub poll_interval: Duration,
    /// Polls before giving up on a submission (default: 60)
    pub max_polls: u32,
}

impl Default for Judge0Config {
    fn default() -> Self {
        Self {
            base_url: "https://judge0-ce.p.rapidapi.com".into(),
            api_key: None,
            api_host: "judge0-ce.p.rapidapi.com".into(),
            base64_encoded: false,
            poll_interval: Duration::from_millis(1000),
            max_polls: 60,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen address (default: 0.0.0.0:8080)
    pub bind_addr: String,
    pub judge0: Judge0Config,
    /// Upper bound on submitted source size in bytes
    pub max_source_bytes: usize,
    /// Upper bound on submitted stdin size in bytes
    pub max_stdin_bytes: usize,
    /// Language table override; the embedded table is used when unset
    pub languages_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            judge0: Judge0Config::default(),
            max_source_bytes: 64 * 1024,
            max_stdin_bytes: 64 * 1024,
            languages_path: None,
        }
    }
}

impl AppConfig {
    /// Create config from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let judge0_defaults = Judge0Config::default();

        let parse_number = |key: &str| -> anyhow::Result<Option<u64>> {
            lookup(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .with_context(|| format!("Invalid {}: {}", key, raw))
                })
                .transpose()
        };

        let poll_interval = parse_number("JUDGE0_POLL_INTERVAL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(judge0_defaults.poll_interval);

        let max_polls = match parse_number("JUDGE0_MAX_POLLS")? {
            Some(0) => anyhow::bail!("JUDGE0_MAX_POLLS must be at least 1"),
            Some(n) => u32::try_from(n).context("JUDGE0_MAX_POLLS out of range")?,
            None => judge0_defaults.max_polls,
        };

        let judge0 = Judge0Config {
            base_url: lookup("JUDGE0_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(judge0_defaults.base_url),
            api_key: lookup("RAPIDAPI_KEY").filter(|key| !key.is_empty()),
            api_host: lookup("RAPIDAPI_HOST").unwrap_or(judge0_defaults.api_host),
            base64_encoded: lookup("JUDGE0_BASE64")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(judge0_defaults.base64_encoded),
            poll_interval,
            max_polls,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            judge0,
            max_source_bytes: parse_number("MAX_SOURCE_BYTES")?
                .map(|n| n as usize)
                .unwrap_or(defaults.max_source_bytes),
            max_stdin_bytes: parse_number("MAX_STDIN_BYTES")?
                .map(|n| n as usize)
                .unwrap_or(defaults.max_stdin_bytes),
            languages_path: lookup("LANGUAGES_CONFIG").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.judge0.base_url, "https://judge0-ce.p.rapidapi.com");
        assert_eq!(config.judge0.poll_interval, Duration::from_secs(1));
        assert_eq!(config.judge0.max_polls, 60);
        assert!(config.judge0.api_key.is_none());
        assert!(!config.judge0.base64_encoded);
        assert!(config.languages_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JUDGE0_URL", "http://localhost:2358/"),
            ("RAPIDAPI_KEY", "secret"),
            ("JUDGE0_BASE64", "1"),
            ("JUDGE0_POLL_INTERVAL_MS", "250"),
            ("JUDGE0_MAX_POLLS", "5"),
            ("MAX_SOURCE_BYTES", "1024"),
            ("LANGUAGES_CONFIG", "/etc/languages.toml"),
        ]))
        .unwrap();

        assert_eq!(config.judge0.base_url, "http://localhost:2358");
        assert_eq!(config.judge0.api_key.as_deref(), Some("secret"));
        assert!(config.judge0.base64_encoded);
        assert_eq!(config.judge0.poll_interval, Duration::from_millis(250));
        assert_eq!(config.judge0.max_polls, 5);
        assert_eq!(config.max_source_bytes, 1024);
        assert_eq!(
            config.languages_path,
            Some(PathBuf::from("/etc/languages.toml"))
        );
    }

    #[test]
    fn test_invalid_number_is_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("JUDGE0_MAX_POLLS", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("JUDGE0_MAX_POLLS"));
    }

    #[test]
    fn test_zero_polls_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("JUDGE0_MAX_POLLS", "0")])).is_err());
    }

    #[test]
    fn test_empty_api_key_is_none() {
        let config = AppConfig::from_lookup(lookup_from(&[("RAPIDAPI_KEY", "")])).unwrap();
        assert!(config.judge0.api_key.is_none());
    }
}
