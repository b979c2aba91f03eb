//! # Lifecycle Controller
//!
//! [`WalletController`] drives the connection lifecycle:
//!
//! ```text
//! Uninitialized ──init()──▶ Initializing ──providers acquired──▶ Ready(connected)
//!                                 ▲                                   │
//!                                 └──────────── chainChanged ─────────┘
//!                                      accountsChanged: refresh signer, stays Ready
//! ```
//!
//! ## Phases of `init`
//!
//! 1. **Provider acquisition**: detect the injected provider, wrap it, publish both. Failures
//!    are returned to the caller and leave the provider cells untouched.
//! 2. **Network**: read `eth_chainId`, then connect the account when auto-connect was requested
//!    or the persisted flag is present. Failures of the automatic connection are logged and
//!    absorbed; the account substate is reset.
//!
//! ## Reinitialization
//!
//! `chainChanged` re-runs `init` with the recorded factory and auto-connect flag. A provider
//! pair supplied through [`WalletController::connect_with_external_provider`] is kept; only the
//! network phase is re-run for it. Reinitializations never overlap: events arriving while one
//! runs collapse into a single follow-up run.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, info, warn};
use serde_json::{json, Value};
use shared::dto::rpc::{methods, SwitchChainParams};
use shared::dto::wallet::{ConnectionSnapshot, LifecycleStatus};

use crate::adapter::{adapt, Adapted, ProviderFactory, Signer, SignerOrProvider, WrappedProvider};
use crate::config::{WalletConfig, ACCOUNT_CONNECTED_VALUE};
use crate::detector::detect;
use crate::error::{Result, WalletError};
use crate::platform::Platform;
use crate::provider::{AttachedListeners, EthereumProvider, ProviderEvent};
use crate::state::ConnectionState;
use crate::storage::KeyValueStorage;

/// Where the current provider pair came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProviderSource {
    Injected,
    External,
}

pub struct WalletController {
    platform: Rc<dyn Platform>,
    storage: Rc<dyn KeyValueStorage>,
    config: WalletConfig,
    state: ConnectionState,
    factory: RefCell<Option<Rc<dyn ProviderFactory>>>,
    should_connect_account: Cell<bool>,
    source: Cell<ProviderSource>,
    listeners: RefCell<Option<AttachedListeners>>,
    reinit_in_flight: Cell<bool>,
    reinit_pending: Cell<bool>,
    this: Weak<WalletController>,
}

impl WalletController {
    pub fn new(
        platform: Rc<dyn Platform>,
        storage: Rc<dyn KeyValueStorage>,
        config: WalletConfig,
    ) -> Result<Rc<Self>> {
        config.validate()?;

        let controller = Rc::new_cyclic(|this| Self {
            platform,
            storage,
            config,
            state: ConnectionState::new(),
            factory: RefCell::new(None),
            should_connect_account: Cell::new(false),
            source: Cell::new(ProviderSource::Injected),
            listeners: RefCell::new(None),
            reinit_in_flight: Cell::new(false),
            reinit_pending: Cell::new(false),
            this: this.clone(),
        });
        controller.watch_ethereum_provider();

        Ok(controller)
    }

    // ========== Lifecycle ==========

    /// Detect and wrap the injected provider, then initialize the network.
    ///
    /// `factory` builds the wrapped provider; `None` fails with
    /// [`WalletError::MissingDependency`]. `auto_connect` requests the account even when the
    /// persisted flag is absent, and is reused by `chainChanged` reinitializations.
    ///
    /// The automatic account request does not fail `init`: a declined prompt or an unavailable
    /// signer is logged and leaves the account disconnected, while the providers and chain id
    /// stay usable. Call [`WalletController::connect_account`] directly to see that error.
    pub async fn init(
        &self,
        factory: Option<Rc<dyn ProviderFactory>>,
        auto_connect: bool,
    ) -> Result<()> {
        let factory = factory.ok_or_else(|| {
            WalletError::MissingDependency("Please provide a provider factory".to_string())
        })?;
        *self.factory.borrow_mut() = Some(Rc::clone(&factory));
        self.should_connect_account.set(auto_connect);

        let previous = self.state.status.get();
        self.state.status.set(LifecycleStatus::Initializing);

        let adapted = match self.acquire_provider(factory.as_ref()).await {
            Ok(adapted) => adapted,
            Err(err) => {
                self.state.status.set(previous);
                return Err(err);
            }
        };

        self.source.set(ProviderSource::Injected);
        self.set_providers(adapted.ethereum, adapted.provider);
        info!("Injected provider ready");

        self.init_network().await
    }

    /// Use a caller-supplied provider pair instead of the injected one (WalletConnect and
    /// other bridges). Future `chainChanged` events reconnect the account automatically.
    pub async fn connect_with_external_provider(
        &self,
        ethereum: Rc<dyn EthereumProvider>,
        provider: Rc<dyn WrappedProvider>,
    ) -> Result<()> {
        self.source.set(ProviderSource::External);
        self.set_providers(ethereum, provider);
        self.should_connect_account.set(true);
        info!("External provider ready");

        self.init_network().await
    }

    /// Ask the wallet to authorize an account, then publish the signer and persist the flag.
    ///
    /// Opens the wallet prompt; a declined prompt is returned as [`WalletError::RpcRejected`].
    pub async fn connect_account(&self) -> Result<()> {
        let ethereum = self.require_ethereum()?;
        ethereum
            .request(methods::ETH_REQUEST_ACCOUNTS, None)
            .await?;

        self.refresh_signer().await;

        if let Err(err) = self
            .storage
            .set_item(&self.config.storage_key, ACCOUNT_CONNECTED_VALUE)
        {
            warn!("Could not persist connection flag: {}", err);
        }

        Ok(())
    }

    /// Re-derive signer and address from the current wrapped provider.
    ///
    /// Never fails: when no account is authorized the account substate is reset instead.
    /// Signer, address and connection flag are published together once the address is
    /// resolved; a result overtaken by a later refresh or by `disconnect` is dropped.
    pub async fn refresh_signer(&self) {
        let generation = self.state.begin_account_update();
        let resolved = self.resolve_signer().await;

        if !self.state.is_current_account_update(generation) {
            debug!("Account changed while resolving the signer, dropping result");
            return;
        }

        match resolved {
            Ok((signer, address)) => self.state.set_account(signer, address),
            Err(err) => {
                debug!("No signer available: {}", err);
                self.state.reset_account();
            }
        }
    }

    /// Forget the connected account and the persisted flag.
    ///
    /// The provider connection and chain id stay as they are, and the wallet keeps whatever
    /// authorization it granted.
    pub fn disconnect(&self) {
        if let Err(err) = self.storage.remove_item(&self.config.storage_key) {
            warn!("Could not clear connection flag: {}", err);
        }
        self.state.reset_account();
        info!("Account disconnected");
    }

    /// Ask the wallet to switch to `chain_id` (`wallet_switchEthereumChain`).
    pub async fn change_chain(&self, chain_id: &str) -> Result<()> {
        let ethereum = self.require_ethereum()?;
        ethereum
            .request(
                methods::WALLET_SWITCH_ETHEREUM_CHAIN,
                Some(json!([SwitchChainParams::new(chain_id)])),
            )
            .await?;

        Ok(())
    }

    // ========== Getters ==========

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn chain_id(&self) -> Option<String> {
        self.state.chain_id.get()
    }

    pub fn signer(&self) -> Option<Rc<dyn Signer>> {
        self.state.signer.get()
    }

    pub fn signer_address(&self) -> Option<String> {
        self.state.signer_address.get()
    }

    pub fn provider(&self) -> Option<Rc<dyn WrappedProvider>> {
        self.state.provider.get()
    }

    pub fn ethereum_provider(&self) -> Option<Rc<dyn EthereumProvider>> {
        self.state.ethereum_provider.get()
    }

    pub fn signer_or_provider(&self) -> Option<SignerOrProvider> {
        self.signer()
            .map(SignerOrProvider::Signer)
            .or_else(|| self.provider().map(SignerOrProvider::Provider))
    }

    pub fn is_connected(&self) -> bool {
        self.state.connected.get()
    }

    pub fn has_wallet(&self) -> bool {
        self.state.has_wallet.get()
    }

    pub fn status(&self) -> LifecycleStatus {
        self.state.status.get()
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.state.snapshot()
    }

    // ========== Internals ==========

    async fn acquire_provider(&self, factory: &dyn ProviderFactory) -> Result<Adapted> {
        let raw = detect(self.platform.as_ref(), self.config.detection_timeout()).await?;
        adapt(factory, raw)
    }

    fn set_providers(&self, ethereum: Rc<dyn EthereumProvider>, provider: Rc<dyn WrappedProvider>) {
        self.state.ethereum_provider.set(Some(ethereum));
        self.state.provider.set(Some(provider));
        self.state.status.set(LifecycleStatus::Ready {
            connected: self.state.connected.get(),
        });
    }

    async fn init_network(&self) -> Result<()> {
        let ethereum = self.require_ethereum()?;
        let chain_id = ethereum.request(methods::ETH_CHAIN_ID, None).await?;
        self.state.chain_id.set(Some(chain_id_string(chain_id)));

        if self.should_connect_account.get() || self.has_connection_flag() {
            if let Err(err) = self.connect_account().await {
                warn!("Automatic account connection failed: {}", err);
                self.state.reset_account();
            }
        }

        Ok(())
    }

    async fn resolve_signer(&self) -> Result<(Option<Rc<dyn Signer>>, Option<String>)> {
        let provider = self
            .state
            .provider
            .get()
            .ok_or_else(|| WalletError::SignerUnavailable("no provider".to_string()))?;

        let Some(signer) = provider.get_signer()? else {
            return Ok((None, None));
        };
        let address = signer.address().await?;

        Ok((Some(signer), Some(address)))
    }

    fn has_connection_flag(&self) -> bool {
        match self.storage.get_item(&self.config.storage_key) {
            Ok(value) => value.is_some_and(|value| !value.is_empty()),
            Err(err) => {
                warn!("Could not read connection flag: {}", err);
                false
            }
        }
    }

    fn require_ethereum(&self) -> Result<Rc<dyn EthereumProvider>> {
        self.state
            .ethereum_provider
            .get()
            .ok_or(WalletError::NoInjectedProvider)
    }

    /// Permanent subscriber of the `ethereum_provider` cell: keeps wallet listeners and
    /// `has_wallet` in line with the current provider.
    fn watch_ethereum_provider(&self) {
        let this = self.this.clone();
        let _ = self.state.ethereum_provider.subscribe(move |provider| {
            if let Some(controller) = this.upgrade() {
                controller.on_ethereum_provider(provider.as_ref());
            }
        });
    }

    fn on_ethereum_provider(&self, provider: Option<&Rc<dyn EthereumProvider>>) {
        match provider {
            Some(provider) => {
                let attached = self
                    .listeners
                    .borrow()
                    .as_ref()
                    .is_some_and(|listeners| listeners.is_attached_to(provider));

                if !attached {
                    let previous = self.listeners.borrow_mut().take();
                    drop(previous);

                    let listeners = self.attach_listeners(provider);
                    *self.listeners.borrow_mut() = Some(listeners);
                    debug!("Wallet listeners attached");
                }

                self.state.has_wallet.set(true);
            }
            None => {
                let previous = self.listeners.borrow_mut().take();
                drop(previous);

                self.state.has_wallet.set(false);
            }
        }
    }

    fn attach_listeners(&self, provider: &Rc<dyn EthereumProvider>) -> AttachedListeners {
        let mut listeners = AttachedListeners::new(Rc::clone(provider));

        let this = self.this.clone();
        listeners.on(
            ProviderEvent::AccountsChanged,
            Rc::new(move |_accounts: Value| {
                if let Some(controller) = this.upgrade() {
                    controller.spawn_refresh_signer();
                }
            }),
        );

        let this = self.this.clone();
        listeners.on(
            ProviderEvent::ChainChanged,
            Rc::new(move |chain_id: Value| {
                if let Some(controller) = this.upgrade() {
                    debug!("Chain changed to {}", chain_id);
                    controller.schedule_reinitialize();
                }
            }),
        );

        listeners
    }

    fn spawn_refresh_signer(&self) {
        let Some(this) = self.this.upgrade() else {
            return;
        };
        self.platform.spawn(Box::pin(async move {
            this.refresh_signer().await;
        }));
    }

    fn schedule_reinitialize(&self) {
        if self.reinit_in_flight.get() {
            debug!("Reinitialization running, queueing one more");
            self.reinit_pending.set(true);
            return;
        }

        let Some(this) = self.this.upgrade() else {
            return;
        };
        self.reinit_in_flight.set(true);

        self.platform.spawn(Box::pin(async move {
            loop {
                this.reinit_pending.set(false);
                if let Err(err) = this.reinitialize().await {
                    warn!("Reinitialization after chain change failed: {}", err);
                }
                if !this.reinit_pending.get() {
                    break;
                }
            }
            this.reinit_in_flight.set(false);
        }));
    }

    async fn reinitialize(&self) -> Result<()> {
        match self.source.get() {
            ProviderSource::External => self.init_network().await,
            ProviderSource::Injected => {
                let factory = self.factory.borrow().clone();
                self.init(factory, self.should_connect_account.get()).await
            }
        }
    }
}

/// Chain ids are passed through unvalidated; non-string answers keep their JSON text.
fn chain_id_string(value: Value) -> String {
    match value {
        Value::String(chain_id) => chain_id,
        other => other.to_string(),
    }
}
