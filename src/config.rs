//! Provider configuration loaded from the environment.

use std::time::Duration;

use crate::client::{AsanaClient, BASE_URL};
use crate::Error;

const TOKEN_VAR: &str = "ASANA_TOKEN";
const BASE_URL_VAR: &str = "ASANA_BASE_URL";
const TIMEOUT_VAR: &str = "ASANA_TIMEOUT_SECS";

/// Settings used to construct the Asana API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Personal access token. Schema and plan requests work without one.
    pub token: Option<String>,
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. `None` leaves reqwest's default in place.
    pub timeout: Option<Duration>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from `ASANA_TOKEN`, `ASANA_BASE_URL` and
    /// `ASANA_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset. An unparsable timeout is ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout = non_empty(TIMEOUT_VAR).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "ignoring invalid {TIMEOUT_VAR}");
                None
            }
        });

        Self {
            token: non_empty(TOKEN_VAR),
            base_url: non_empty(BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| BASE_URL.to_string()),
            timeout,
        }
    }

    /// Build a client from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingToken`] when no token is configured.
    pub fn client(&self) -> Result<AsanaClient, Error> {
        let token = self.token.as_deref().ok_or(Error::MissingToken)?;
        Ok(AsanaClient::with_timeout(token, self.timeout)?.with_base_url(&self.base_url))
    }
}
