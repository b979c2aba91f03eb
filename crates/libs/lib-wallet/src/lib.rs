//! # Wallet Library
//!
//! Platform-independent core of the injected-wallet adapter: detect the wallet a page was
//! given, wrap it, and publish the connection as observable state.
//!
//! ## Structure
//!
//! - **[`store`]**: observable value cells (`get` / `set` / `subscribe` with replay)
//! - **[`provider`]**: the EIP-1193 [`EthereumProvider`] trait and listener bookkeeping
//! - **[`platform`]**: host capabilities (injected global, notification, timer, spawn)
//! - **[`detector`]**: waits for the injected provider with a timeout
//! - **[`adapter`]**: wraps the raw provider ([`Web3Provider`]) and derives signers
//! - **[`state`]**: the connection cells and snapshots
//! - **[`controller`]**: the lifecycle ([`WalletController`])
//! - **[`storage`]**, **[`config`]**, **[`error`]**
//!
//! Everything runs on one thread: handles are `Rc`, futures are `!Send`, and background work
//! is handed to [`Platform::spawn`].

pub mod adapter;
pub mod config;
pub mod controller;
pub mod detector;
pub mod error;
pub mod platform;
pub mod provider;
pub mod state;
pub mod storage;
pub mod store;

// Re-export commonly used types from root for convenience
pub use adapter::{ProviderFactory, Signer, SignerOrProvider, Web3Provider, Web3ProviderFactory, WrappedProvider};
pub use config::WalletConfig;
pub use controller::WalletController;
pub use error::{Result, WalletError};
pub use platform::Platform;
pub use provider::{EthereumProvider, EventHandler, ListenerId, ProviderEvent};
pub use state::ConnectionState;
pub use storage::{KeyValueStorage, MemoryStorage};
pub use store::{Store, Unsubscribe};
