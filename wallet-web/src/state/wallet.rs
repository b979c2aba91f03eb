//! Wallet state management
//!
//! Mirrors the controller's connection cells into Leptos signals for UI code.

use leptos::prelude::*;
use lib_wallet::state::SnapshotSubscription;
use lib_wallet::ConnectionState;
use shared::dto::wallet::{ConnectionSnapshot, LifecycleStatus};

use crate::utils::format::format_chain;

/// Global wallet context
#[derive(Clone, Copy)]
pub struct WalletContext {
    pub chain_id: RwSignal<Option<String>>,
    pub signer_address: RwSignal<Option<String>>,
    pub connected: RwSignal<bool>,
    pub has_wallet: RwSignal<bool>,
    pub status: RwSignal<LifecycleStatus>,
}

impl WalletContext {
    pub fn new() -> Self {
        Self {
            chain_id: RwSignal::new(None),
            signer_address: RwSignal::new(None),
            connected: RwSignal::new(false),
            has_wallet: RwSignal::new(false),
            status: RwSignal::new(LifecycleStatus::Uninitialized),
        }
    }

    /// Keep the signals in line with `state` from now on
    pub fn bind(&self, state: &ConnectionState) -> SnapshotSubscription {
        let context = *self;
        state.subscribe_snapshot(move |snapshot| context.apply(snapshot))
    }

    /// Copy `snapshot` into the signals. Signals already disposed with their owner are skipped.
    pub fn apply(&self, snapshot: &ConnectionSnapshot) {
        self.chain_id.try_set(snapshot.chain_id.clone());
        self.signer_address.try_set(snapshot.signer_address.clone());
        self.connected.try_set(snapshot.connected);
        self.has_wallet.try_set(snapshot.has_wallet);
        self.status.try_set(snapshot.status);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    pub fn address(&self) -> Option<String> {
        self.signer_address.get()
    }

    /// `0x1234...abcd` form of the signer address
    pub fn short_address(&self) -> Option<String> {
        self.signer_address
            .with(|address| address.as_deref().map(shared::utils::truncate_address))
    }

    pub fn network_label(&self) -> Option<String> {
        self.chain_id
            .with(|chain_id| chain_id.as_deref().map(format_chain))
    }
}

impl Default for WalletContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the context, bind it to `state` and provide it to the component tree
pub fn provide_wallet_context(state: &ConnectionState) -> WalletContext {
    let context = WalletContext::new();
    // Dropping the handle keeps the binding for the lifetime of the state
    let _binding = context.bind(state);
    provide_context(context);
    context
}

pub fn use_wallet_context() -> WalletContext {
    expect_context::<WalletContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_follows_connection_state() {
        let state = ConnectionState::new();
        let context = WalletContext::new();
        let _binding = context.bind(&state);

        assert_eq!(context.status.get_untracked(), LifecycleStatus::Uninitialized);
        assert!(!context.connected.get_untracked());

        state.chain_id.set(Some("0x89".to_string()));
        state.signer_address.set(Some("0x8ba1f109551bD432803012645Ac136ddd64DBA72".to_string()));
        state.connected.set(true);

        assert_eq!(context.network_label().as_deref(), Some("Polygon"));
        assert_eq!(context.short_address().as_deref(), Some("0x8ba1...BA72"));
        assert!(context.is_connected());
    }
}
