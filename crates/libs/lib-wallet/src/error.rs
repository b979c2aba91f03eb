//! # Wallet Error Types
//!
//! Centralized error type [`WalletError`] for every fallible wallet operation.
//!
//! ## Error Policy
//!
//! - **Provider acquisition** ([`MissingDependency`](WalletError::MissingDependency),
//!   [`NoInjectedProvider`](WalletError::NoInjectedProvider),
//!   [`NoWalletDetected`](WalletError::NoWalletDetected)) is always surfaced to the caller of `init`.
//! - **Signer derivation** ([`SignerUnavailable`](WalletError::SignerUnavailable)) is absorbed by the
//!   controller and turned into "not connected".
//! - **User-initiated RPC** ([`RpcRejected`](WalletError::RpcRejected)) is surfaced so the UI can
//!   show feedback (declined prompt, unknown chain).
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_wallet::error::{WalletError, Result};
//!
//! fn require_provider(found: bool) -> Result<()> {
//!     if !found {
//!         return Err(WalletError::NoInjectedProvider);
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(require_provider(false).unwrap_err().to_string(), "No ethereum provider.");
//! ```

use shared::dto::rpc::{error_codes, RpcErrorPayload};
use thiserror::Error;

/// Convenience type alias for `Result<T, WalletError>`.
pub type Result<T> = std::result::Result<T, WalletError>;

/// Wallet adapter error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WalletError {
    /// No provider factory was supplied to `init`.
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    /// The detector resolved but the page holds no injected provider object.
    #[error("No ethereum provider.")]
    NoInjectedProvider,

    /// No injected wallet announced itself before the detection timeout.
    #[error("No injected wallet found.")]
    NoWalletDetected,

    /// No account is currently authorized, or its address could not be resolved.
    #[error("Signer unavailable: {0}")]
    SignerUnavailable(String),

    /// The wallet declined or failed an RPC request.
    #[error("RPC request rejected ({code}): {message}")]
    RpcRejected { code: i64, message: String },

    /// Reading or writing the persisted connection flag failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid adapter configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An RPC response did not have the expected shape.
    #[error("Decoding error: {0}")]
    Decoding(String),
}

impl WalletError {
    /// Stable error code, used when the error crosses into JavaScript.
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::MissingDependency(_) => "MissingDependency",
            WalletError::NoInjectedProvider => "NoInjectedProvider",
            WalletError::NoWalletDetected => "NoWalletDetected",
            WalletError::SignerUnavailable(_) => "SignerUnavailable",
            WalletError::RpcRejected { .. } => "RpcRejected",
            WalletError::Storage(_) => "Storage",
            WalletError::Config(_) => "Config",
            WalletError::Decoding(_) => "Decoding",
        }
    }

    /// The user dismissed the wallet prompt (EIP-1193 code 4001).
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, WalletError::RpcRejected { code, .. } if *code == error_codes::USER_REJECTED_REQUEST)
    }

    /// The wallet does not know the requested chain (EIP-3326 code 4902).
    pub fn is_unrecognized_chain(&self) -> bool {
        matches!(self, WalletError::RpcRejected { code, .. } if *code == error_codes::UNRECOGNIZED_CHAIN)
    }
}

impl From<RpcErrorPayload> for WalletError {
    fn from(payload: RpcErrorPayload) -> Self {
        WalletError::RpcRejected {
            code: payload.code,
            message: payload.message,
        }
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Decoding(err.to_string())
    }
}
