//! Client configuration.
//!
//! Loads settings from `DEMODESK_*` environment variables with local
//! development defaults. Explicit values always win over the environment.

use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`HttpLeadApi`](crate::HttpLeadApi).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `DEMODESK_API_URL` — backend base URL (default: `http://localhost:5000`)
    /// - `DEMODESK_TIMEOUT_SECS` — request timeout in seconds (default: `10`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from any lookup
    /// function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("DEMODESK_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        let timeout = lookup("DEMODESK_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Self::default().with_base_url(base_url).with_timeout(timeout)
    }

    /// Override the base URL. A trailing `/` is trimmed.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.base_url, "http://localhost:5000");
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn environment_overrides_and_trims() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("DEMODESK_API_URL", "https://leads.example.com/"),
            ("DEMODESK_TIMEOUT_SECS", "3"),
        ]));
        assert_eq!(cfg.base_url, "https://leads.example.com");
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn garbage_timeout_falls_back() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("DEMODESK_API_URL", "  "),
            ("DEMODESK_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
    }
}
