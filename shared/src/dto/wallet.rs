//! # Wallet Connection DTOs
//!
//! Plain-data views of the connection state, used for JavaScript callers and UI signals.

use serde::{Deserialize, Serialize};

use crate::utils::network_name;

/// Lifecycle of the wallet adapter
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LifecycleStatus {
    #[default]
    Uninitialized,
    Initializing,
    Ready { connected: bool },
}

impl LifecycleStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, LifecycleStatus::Ready { .. })
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, LifecycleStatus::Ready { connected: true })
    }
}

/// Snapshot of the connection state at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSnapshot {
    pub chain_id: Option<String>,
    pub signer_address: Option<String>,
    pub connected: bool,
    pub has_wallet: bool,
    pub status: LifecycleStatus,
}

impl ConnectionSnapshot {
    /// Name of the current network, if the chain id is a well-known one
    pub fn network_name(&self) -> Option<&'static str> {
        self.chain_id.as_deref().and_then(network_name)
    }
}
