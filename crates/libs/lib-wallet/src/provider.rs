//! # Injected Provider Interface
//!
//! [`EthereumProvider`] is the EIP-1193 surface of an injected wallet: a JSON-RPC `request`
//! plus `accountsChanged` / `chainChanged` events. The browser binding lives in `wallet-web`;
//! anything else (remote-signing bridges, test doubles) can implement it too.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Wallet events the adapter reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEvent {
    AccountsChanged,
    ChainChanged,
}

impl ProviderEvent {
    /// Event name as emitted by injected wallets
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderEvent::AccountsChanged => "accountsChanged",
            ProviderEvent::ChainChanged => "chainChanged",
        }
    }
}

/// Identifies one registered event handler on one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Event callback; receives the event payload (account list or chain id)
pub type EventHandler = Rc<dyn Fn(Value)>;

/// EIP-1193 provider injected by a wallet.
#[async_trait(?Send)]
pub trait EthereumProvider {
    /// `provider.request({ method, params })`
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value>;

    /// `provider.on(event, handler)`
    fn on(&self, event: ProviderEvent, handler: EventHandler) -> ListenerId;

    /// `provider.removeListener(event, handler)`
    fn remove_listener(&self, event: ProviderEvent, id: ListenerId);
}

/// Listeners registered on one provider object, removed again on drop.
pub struct AttachedListeners {
    provider: Rc<dyn EthereumProvider>,
    ids: Vec<(ProviderEvent, ListenerId)>,
}

impl AttachedListeners {
    pub fn new(provider: Rc<dyn EthereumProvider>) -> Self {
        Self {
            provider,
            ids: Vec::new(),
        }
    }

    pub fn on(&mut self, event: ProviderEvent, handler: EventHandler) {
        let id = self.provider.on(event, handler);
        self.ids.push((event, id));
    }

    /// Whether these listeners belong to `provider` (same object, not just equal)
    pub fn is_attached_to(&self, provider: &Rc<dyn EthereumProvider>) -> bool {
        Rc::ptr_eq(&self.provider, provider)
    }
}

impl Drop for AttachedListeners {
    fn drop(&mut self) {
        for (event, id) in self.ids.drain(..) {
            self.provider.remove_listener(event, id);
        }
    }
}
