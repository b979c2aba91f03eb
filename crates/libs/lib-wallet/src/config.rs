//! # Adapter Configuration
//!
//! [`WalletConfig`] carries the few knobs of the adapter. JavaScript callers pass it as a plain
//! object (`{ detectionTimeoutMs, storageKey, autoConnect }`); every field is optional.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WalletError};

/// How long to wait for `ethereum#initialized` before giving up.
pub const DEFAULT_DETECTION_TIMEOUT_MS: u64 = 10_000;

/// Local storage key of the persisted connection-intent flag.
pub const DEFAULT_STORAGE_KEY: &str = "wallet:accountConnected";

/// Value written under [`DEFAULT_STORAGE_KEY`] after an explicit connect.
pub const ACCOUNT_CONNECTED_VALUE: &str = "true";

/// Wallet adapter configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletConfig {
    /// Detection window in milliseconds
    pub detection_timeout_ms: u64,

    /// Key of the persisted connection flag
    pub storage_key: String,

    /// Default for `init(.., auto_connect)` when the caller does not say otherwise
    pub auto_connect: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            detection_timeout_ms: DEFAULT_DETECTION_TIMEOUT_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            auto_connect: false,
        }
    }
}

impl WalletConfig {
    pub fn detection_timeout(&self) -> Duration {
        Duration::from_millis(self.detection_timeout_ms)
    }

    /// Reject configurations the adapter cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.detection_timeout_ms == 0 {
            return Err(WalletError::Config(
                "detectionTimeoutMs must be greater than 0".to_string(),
            ));
        }

        if self.storage_key.trim().is_empty() {
            return Err(WalletError::Config("storageKey must not be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = WalletConfig::default();
        assert_eq!(config.detection_timeout(), Duration::from_secs(10));
        assert_eq!(config.storage_key, "wallet:accountConnected");
        assert!(!config.auto_connect);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_js_object() {
        let config: WalletConfig =
            serde_json::from_value(json!({ "detectionTimeoutMs": 2500, "autoConnect": true })).unwrap();

        assert_eq!(config.detection_timeout(), Duration::from_millis(2500));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(config.auto_connect);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = WalletConfig {
            detection_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(WalletError::Config(_))));

        let blank = WalletConfig {
            storage_key: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(blank.validate(), Err(WalletError::Config(_))));
    }
}
