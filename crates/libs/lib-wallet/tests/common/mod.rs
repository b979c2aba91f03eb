//! Test doubles: an injected wallet and a tokio-backed platform.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use lib_wallet::{
    EthereumProvider, EventHandler, ListenerId, MemoryStorage, Platform, ProviderEvent,
    ProviderFactory, Result, Signer, WalletConfig, WalletController, WalletError, Web3Provider,
    WrappedProvider,
};
use serde_json::{json, Value};

pub const ACCOUNT: &str = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";
pub const OTHER_ACCOUNT: &str = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";
pub const FLAG_KEY: &str = "wallet:accountConnected";

// ============================================================================
// MOCK WALLET
// ============================================================================

pub struct MockEthereum {
    chain_id: RefCell<String>,
    accounts: RefCell<Vec<String>>,
    authorized: Cell<bool>,
    reject_connect: Cell<bool>,
    latency: Cell<Option<Duration>>,
    requests: RefCell<Vec<String>>,
    listeners: RefCell<Vec<(ListenerId, ProviderEvent, EventHandler)>>,
    next_listener: Cell<u64>,
}

impl MockEthereum {
    /// Wallet on `chain_id` holding one account that is not yet authorized
    pub fn new(chain_id: &str) -> Rc<Self> {
        Rc::new(Self {
            chain_id: RefCell::new(chain_id.to_string()),
            accounts: RefCell::new(vec![ACCOUNT.to_string()]),
            authorized: Cell::new(false),
            reject_connect: Cell::new(false),
            latency: Cell::new(None),
            requests: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        })
    }

    pub fn authorize(&self) {
        self.authorized.set(true);
    }

    pub fn revoke(&self) {
        self.authorized.set(false);
    }

    pub fn set_accounts(&self, accounts: &[&str]) {
        *self.accounts.borrow_mut() = accounts.iter().map(|a| a.to_string()).collect();
    }

    pub fn set_chain(&self, chain_id: &str) {
        *self.chain_id.borrow_mut() = chain_id.to_string();
    }

    pub fn reject_connect(&self, reject: bool) {
        self.reject_connect.set(reject);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.latency.set(Some(latency));
    }

    /// Fire `event` synchronously, like a wallet does
    pub fn emit(&self, event: ProviderEvent, payload: Value) {
        let handlers: Vec<EventHandler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            handler(payload.clone());
        }
    }

    pub fn listener_count(&self, event: ProviderEvent) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .count()
    }

    pub fn request_count(&self, method: &str) -> usize {
        self.requests.borrow().iter().filter(|m| *m == method).count()
    }

    fn visible_accounts(&self) -> Value {
        if self.authorized.get() {
            json!(*self.accounts.borrow())
        } else {
            json!([])
        }
    }
}

#[async_trait(?Send)]
impl EthereumProvider for MockEthereum {
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value> {
        self.requests.borrow_mut().push(method.to_string());

        if let Some(latency) = self.latency.get() {
            tokio::time::sleep(latency).await;
        }

        match method {
            "eth_chainId" => Ok(json!(self.chain_id.borrow().clone())),
            "eth_accounts" => Ok(self.visible_accounts()),
            "eth_requestAccounts" => {
                if self.reject_connect.get() {
                    return Err(WalletError::RpcRejected {
                        code: 4001,
                        message: "User rejected the request.".to_string(),
                    });
                }
                self.authorized.set(true);
                Ok(self.visible_accounts())
            }
            "wallet_switchEthereumChain" => {
                let target = params
                    .as_ref()
                    .and_then(|p| p[0]["chainId"].as_str())
                    .unwrap_or_default()
                    .to_string();

                if ["0x1", "0x89", "0xaa36a7"].contains(&target.as_str()) {
                    self.set_chain(&target);
                    Ok(Value::Null)
                } else {
                    Err(WalletError::RpcRejected {
                        code: 4902,
                        message: format!("Unrecognized chain ID \"{target}\"."),
                    })
                }
            }
            other => Err(WalletError::RpcRejected {
                code: 4200,
                message: format!("The method \"{other}\" is not supported."),
            }),
        }
    }

    fn on(&self, event: ProviderEvent, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, event, handler));
        id
    }

    fn remove_listener(&self, _event: ProviderEvent, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(lid, _, _)| *lid != id);
    }
}

// ============================================================================
// MOCK PLATFORM
// ============================================================================

/// Platform whose wallet is either injected up front, announced after a delay, or absent
pub struct MockPlatform {
    injected: RefCell<Option<Rc<MockEthereum>>>,
    announcement: RefCell<Option<(Duration, Option<Rc<MockEthereum>>)>>,
    live_announce_listeners: Rc<Cell<usize>>,
}

impl MockPlatform {
    pub fn injected(wallet: &Rc<MockEthereum>) -> Rc<Self> {
        let platform = Self::empty();
        *platform.injected.borrow_mut() = Some(Rc::clone(wallet));
        platform
    }

    /// The wallet dispatches `ethereum#initialized` after `delay`
    pub fn announced_after(delay: Duration, wallet: Option<&Rc<MockEthereum>>) -> Rc<Self> {
        let platform = Self::empty();
        *platform.announcement.borrow_mut() = Some((delay, wallet.cloned()));
        platform
    }

    pub fn empty() -> Rc<Self> {
        Rc::new(Self {
            injected: RefCell::new(None),
            announcement: RefCell::new(None),
            live_announce_listeners: Rc::new(Cell::new(0)),
        })
    }

    /// Notification listeners still registered
    pub fn announce_listeners(&self) -> usize {
        self.live_announce_listeners.get()
    }
}

struct ListenerGuard(Rc<Cell<usize>>);

impl ListenerGuard {
    fn register(count: &Rc<Cell<usize>>) -> Self {
        count.set(count.get() + 1);
        Self(Rc::clone(count))
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

#[async_trait(?Send)]
impl Platform for MockPlatform {
    fn injected_provider(&self) -> Option<Rc<dyn EthereumProvider>> {
        self.injected
            .borrow()
            .clone()
            .map(|wallet| wallet as Rc<dyn EthereumProvider>)
    }

    async fn wallet_initialized(&self) -> Option<Rc<dyn EthereumProvider>> {
        let _listener = ListenerGuard::register(&self.live_announce_listeners);

        let announcement = self.announcement.borrow().clone();
        let Some((delay, wallet)) = announcement else {
            return futures::future::pending().await;
        };

        tokio::time::sleep(delay).await;
        *self.injected.borrow_mut() = wallet.clone();
        wallet.map(|wallet| wallet as Rc<dyn EthereumProvider>)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }
}

// ============================================================================
// SIGNER STUBS
// ============================================================================

/// How the wrapped provider answers `get_signer`
#[derive(Debug, Clone, Copy)]
pub enum SignerBehavior {
    /// `Ok(None)`: no account to sign with
    Missing,
    /// `Err(..)` while deriving the signer
    Broken,
}

/// Factory whose providers read like [`Web3Provider`] but never hand out a signer
pub struct StubSignerFactory(pub SignerBehavior);

impl ProviderFactory for StubSignerFactory {
    fn wrap(&self, ethereum: Rc<dyn EthereumProvider>) -> Rc<dyn WrappedProvider> {
        Rc::new(StubSignerProvider {
            inner: Web3Provider::new(ethereum),
            behavior: self.0,
        })
    }
}

struct StubSignerProvider {
    inner: Web3Provider,
    behavior: SignerBehavior,
}

#[async_trait(?Send)]
impl WrappedProvider for StubSignerProvider {
    async fn balance_of(&self, address: &str) -> Result<String> {
        self.inner.balance_of(address).await
    }

    fn get_signer(&self) -> Result<Option<Rc<dyn Signer>>> {
        match self.behavior {
            SignerBehavior::Missing => Ok(None),
            SignerBehavior::Broken => Err(WalletError::SignerUnavailable(
                "signer derivation failed".to_string(),
            )),
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

pub fn controller(platform: &Rc<MockPlatform>, storage: &Rc<MemoryStorage>) -> Rc<WalletController> {
    WalletController::new(platform.clone(), storage.clone(), WalletConfig::default())
        .expect("default config is valid")
}

pub fn storage_with_flag() -> Rc<MemoryStorage> {
    Rc::new(MemoryStorage::with_item(FLAG_KEY, "true"))
}

/// Run `test` inside a `LocalSet` so spawned wallet tasks can make progress
pub async fn run_local<F: Future<Output = ()>>(test: F) {
    tokio::task::LocalSet::new().run_until(test).await;
}

/// Let spawned tasks (event reactions) run to completion
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
