//! # Shared Wallet Types
//!
//! This library defines the contract between the wallet core (`lib-wallet`) and the
//! browser layer (`wallet-web`), including what crosses the wasm boundary into JavaScript.
//! All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::rpc`]**: EIP-1193 request arguments, error payloads and well-known error codes
//!   - **[`dto::wallet`]**: Lifecycle status and connection snapshots
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format account addresses for display
//!   - **[`utils::truncate_address`]**: Truncate addresses with ellipsis
//!   - **[`utils::network_name`]**: Human readable name for well-known chain ids
//!
//! ## Wire Format
//!
//! EIP-1193 payloads follow the JavaScript naming used by injected wallets
//! (`chainId`, `code`, `message`), so those structs use `#[serde(rename_all = "camelCase")]`.
//! Optional fields are omitted from JSON when `None`.
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::rpc::{RequestArguments, SwitchChainParams};
//!
//! let args = RequestArguments::new(
//!     "wallet_switchEthereumChain",
//!     Some(serde_json::json!([SwitchChainParams::new("0x89")])),
//! );
//! assert_eq!(args.method, "wallet_switchEthereumChain");
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
