//! Gateway configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::client::DEFAULT_BASE_PATH;

const DEFAULT_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Absolute URL of the lessons API, including the `api-lessons` segment.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: format!("{DEFAULT_ORIGIN}/{DEFAULT_BASE_PATH}"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    /// Reads `LESSONS_API_URL` and `LESSONS_API_TIMEOUT_SECS`, falling back
    /// to defaults for anything missing or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("LESSONS_API_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.base_url),
            timeout: lookup("LESSONS_API_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}
