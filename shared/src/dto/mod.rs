//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged with injected wallets and with JavaScript callers.
//!
//! ## Module Organization
//!
//! - [`rpc`] - EIP-1193 `request()` arguments and error payloads
//! - [`wallet`] - Connection lifecycle status and snapshots
//!
//! ## Example JSON Communication
//!
//! ```text
//! ethereum.request({ "method": "wallet_switchEthereumChain", "params": [{ "chainId": "0x89" }] })
//! ```
//!
//! ```text
//! { "code": 4001, "message": "User rejected the request." }
//! ```

pub mod rpc;
pub mod wallet;

pub use rpc::*;
pub use wallet::*;
