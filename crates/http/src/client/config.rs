//! Client configuration

use super::ClientError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for [`BlackHoleClient`](super::BlackHoleClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, including the `/api` path prefix
    pub base_url: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://lnh8imcnw9nw.manus.space/api";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the base URL parses and the timeout is non-zero
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ClientError::Configuration(format!("base_url '{}' is invalid: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Configuration(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("blackhole-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
