//! # Connection State
//!
//! The set of [`Store`] cells that is the single source of truth for the wallet connection.
//! Each cell can be subscribed to on its own; [`ConnectionState::subscribe_snapshot`] folds
//! the plain-data cells into a [`ConnectionSnapshot`] for consumers that want one value.

use std::cell::Cell;
use std::rc::Rc;

use shared::dto::wallet::{ConnectionSnapshot, LifecycleStatus};

use crate::adapter::{Signer, WrappedProvider};
use crate::provider::EthereumProvider;
use crate::store::{Store, Unsubscribe};

#[derive(Clone)]
pub struct ConnectionState {
    pub ethereum_provider: Store<Option<Rc<dyn EthereumProvider>>>,
    pub provider: Store<Option<Rc<dyn WrappedProvider>>>,
    pub chain_id: Store<Option<String>>,
    pub signer: Store<Option<Rc<dyn Signer>>>,
    pub signer_address: Store<Option<String>>,
    pub connected: Store<bool>,
    pub has_wallet: Store<bool>,
    pub status: Store<LifecycleStatus>,
    account_generation: Rc<Cell<u64>>,
}

impl ConnectionState {
    pub fn new() -> Self {
        let state = Self {
            ethereum_provider: Store::new(None),
            provider: Store::new(None),
            chain_id: Store::new(None),
            signer: Store::new(None),
            signer_address: Store::new(None),
            connected: Store::new(false),
            has_wallet: Store::new(false),
            status: Store::new(LifecycleStatus::Uninitialized),
            account_generation: Rc::new(Cell::new(0)),
        };

        // Ready carries the connection flag along
        let status = state.status.clone();
        let _ = state.connected.subscribe(move |connected| {
            if status.with(LifecycleStatus::is_ready) {
                status.set(LifecycleStatus::Ready {
                    connected: *connected,
                });
            }
        });

        state
    }

    /// Forget the current account; providers and chain id are left alone.
    ///
    /// Signer lookups started before the reset become stale.
    pub fn reset_account(&self) {
        self.begin_account_update();
        self.connected.set(false);
        self.signer.set(None);
        self.signer_address.set(None);
    }

    /// Start an account update; returns its generation. Any later update or reset makes it
    /// stale.
    pub fn begin_account_update(&self) -> u64 {
        let generation = self.account_generation.get() + 1;
        self.account_generation.set(generation);
        generation
    }

    pub fn is_current_account_update(&self, generation: u64) -> bool {
        self.account_generation.get() == generation
    }

    /// Publish a resolved account. `signer_address` is `Some` exactly when `signer` is.
    pub fn set_account(&self, signer: Option<Rc<dyn Signer>>, address: Option<String>) {
        let connected = signer.is_some();
        let address = if connected { address } else { None };

        self.signer.set(signer);
        self.signer_address.set(address);
        self.connected.set(connected);
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            chain_id: self.chain_id.get(),
            signer_address: self.signer_address.get(),
            connected: self.connected.get(),
            has_wallet: self.has_wallet.get(),
            status: self.status.get(),
        }
    }

    /// Call `callback` with a fresh snapshot now and after every change of a plain-data cell.
    pub fn subscribe_snapshot(
        &self,
        callback: impl Fn(&ConnectionSnapshot) + 'static,
    ) -> SnapshotSubscription {
        let callback: Rc<dyn Fn(&ConnectionSnapshot)> = Rc::new(callback);
        // Suppress the five replays while registering; one snapshot is sent afterwards
        let registering = Rc::new(Cell::new(true));

        let notify: Rc<dyn Fn()> = {
            let state = self.clone();
            let callback = Rc::clone(&callback);
            let registering = Rc::clone(&registering);
            Rc::new(move || {
                if !registering.get() {
                    callback(&state.snapshot());
                }
            })
        };

        let handles = vec![
            watch(&self.chain_id, &notify),
            watch(&self.signer_address, &notify),
            watch(&self.connected, &notify),
            watch(&self.has_wallet, &notify),
            watch(&self.status, &notify),
        ];

        registering.set(false);
        callback(&self.snapshot());

        SnapshotSubscription { handles }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

fn watch<T: Clone + 'static>(store: &Store<T>, notify: &Rc<dyn Fn()>) -> Unsubscribe {
    let notify = Rc::clone(notify);
    store.subscribe(move |_| notify())
}

/// Handle returned by [`ConnectionState::subscribe_snapshot`]
pub struct SnapshotSubscription {
    handles: Vec<Unsubscribe>,
}

impl SnapshotSubscription {
    pub fn unsubscribe(self) {
        for handle in self.handles {
            handle.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_initial_state_is_empty() {
        let state = ConnectionState::new();
        let snapshot = state.snapshot();

        assert!(state.ethereum_provider.with(Option::is_none));
        assert!(state.provider.with(Option::is_none));
        assert!(state.signer.with(Option::is_none));
        assert_eq!(snapshot, ConnectionSnapshot::default());
    }

    #[test]
    fn test_ready_status_follows_connected() {
        let state = ConnectionState::new();

        state.connected.set(true);
        assert_eq!(state.status.get(), LifecycleStatus::Uninitialized);

        state.status.set(LifecycleStatus::Ready { connected: true });
        state.connected.set(false);
        assert_eq!(state.status.get(), LifecycleStatus::Ready { connected: false });
    }

    #[test]
    fn test_reset_account_keeps_chain() {
        let state = ConnectionState::new();
        state.chain_id.set(Some("0x1".to_string()));
        state.connected.set(true);
        state.signer_address.set(Some("0xabc".to_string()));

        state.reset_account();

        assert!(!state.connected.get());
        assert_eq!(state.signer_address.get(), None);
        assert_eq!(state.chain_id.get().as_deref(), Some("0x1"));
    }

    #[test]
    fn test_reset_makes_account_update_stale() {
        let state = ConnectionState::new();

        let first = state.begin_account_update();
        assert!(state.is_current_account_update(first));

        let second = state.begin_account_update();
        assert!(!state.is_current_account_update(first));

        state.reset_account();
        assert!(!state.is_current_account_update(second));
    }

    #[test]
    fn test_set_account_without_signer_drops_address() {
        let state = ConnectionState::new();

        state.set_account(None, Some("0xabc".to_string()));

        assert!(!state.connected.get());
        assert_eq!(state.signer_address.get(), None);
    }

    #[test]
    fn test_snapshot_subscription() {
        let state = ConnectionState::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let subscription = state.subscribe_snapshot(move |snapshot| sink.borrow_mut().push(snapshot.clone()));
        assert_eq!(seen.borrow().len(), 1);

        state.chain_id.set(Some("0x89".to_string()));
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1].chain_id.as_deref(), Some("0x89"));

        subscription.unsubscribe();
        state.has_wallet.set(true);
        assert_eq!(seen.borrow().len(), 2);
    }
}
