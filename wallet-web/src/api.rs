//! JavaScript API
//!
//! `WalletApi` is the object pages use:
//!
//! ```js
//! const wallet = new WalletApi({ detectionTimeoutMs: 10000 });
//! const sub = wallet.subscribe((snapshot) => render(snapshot));
//! await wallet.init(false);
//! await wallet.connectAccount();
//! ```
//!
//! Async methods return Promises that reject with `{ code, message, rpcCode? }`.
//!
//! `getEthereumProvider` hands back the raw EIP-1193 object in use. The wrapped provider,
//! the signer and the signer-or-provider pick are Rust values with no JS counterpart;
//! Rust callers reach them through [`WalletApi::controller`].

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise};
use lib_wallet::state::SnapshotSubscription;
use lib_wallet::{
    ConnectionState, EthereumProvider, Platform, ProviderFactory, WalletConfig, WalletController,
    WalletError, Web3ProviderFactory,
};
use log::warn;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::services::{BrowserPlatform, InjectedEthereum, LocalStorage};
use crate::services::ethereum::to_js;
use crate::utils::format::format_wei_to_eth;

#[wasm_bindgen]
pub struct WalletApi {
    controller: Rc<WalletController>,
    platform: Rc<BrowserPlatform>,
    // Last object passed to `connectWithGivenProvider`
    external: Rc<RefCell<Option<Rc<InjectedEthereum>>>>,
}

#[wasm_bindgen]
impl WalletApi {
    /// `config` is optional; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WalletApi, JsValue> {
        let config: WalletConfig = if config.is_undefined() || config.is_null() {
            WalletConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| js_error(WalletError::Config(e.to_string())))?
        };

        let platform = Rc::new(BrowserPlatform::new().map_err(js_error)?);
        let storage = LocalStorage::new().map_err(js_error)?;
        let controller = WalletController::new(
            Rc::clone(&platform) as Rc<dyn Platform>,
            Rc::new(storage),
            config,
        )
        .map_err(js_error)?;

        Ok(Self {
            controller,
            platform,
            external: Rc::new(RefCell::new(None)),
        })
    }

    /// Detect the injected wallet and initialize. `autoConnect` defaults to the config value.
    pub fn init(&self, auto_connect: Option<bool>) -> Promise {
        let controller = Rc::clone(&self.controller);
        let auto_connect = auto_connect.unwrap_or(controller.config().auto_connect);
        let factory: Rc<dyn ProviderFactory> = Rc::new(Web3ProviderFactory);

        future_to_promise(async move {
            controller.init(Some(factory), auto_connect).await.map_err(js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = connectAccount)]
    pub fn connect_account(&self) -> Promise {
        let controller = Rc::clone(&self.controller);

        future_to_promise(async move {
            controller.connect_account().await.map_err(js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn disconnect(&self) {
        self.controller.disconnect();
    }

    #[wasm_bindgen(js_name = changeChainFor)]
    pub fn change_chain_for(&self, chain_id: String) -> Promise {
        let controller = Rc::clone(&self.controller);

        future_to_promise(async move {
            controller.change_chain(&chain_id).await.map_err(js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Use an EIP-1193 object other than `window.ethereum` (e.g. a WalletConnect provider).
    #[wasm_bindgen(js_name = connectWithGivenProvider)]
    pub fn connect_with_given_provider(&self, eth_provider: JsValue) -> Promise {
        let controller = Rc::clone(&self.controller);
        let external = Rc::clone(&self.external);

        future_to_promise(async move {
            if eth_provider.is_undefined() || eth_provider.is_null() {
                return Err(js_error(WalletError::NoInjectedProvider));
            }

            let injected = Rc::new(InjectedEthereum::new(eth_provider));
            *external.borrow_mut() = Some(Rc::clone(&injected));
            let ethereum: Rc<dyn EthereumProvider> = injected;
            let provider = Web3ProviderFactory.wrap(Rc::clone(&ethereum));
            controller
                .connect_with_external_provider(ethereum, provider)
                .await
                .map_err(js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// The EIP-1193 object the adapter talks to, or `undefined` before `init`
    #[wasm_bindgen(js_name = getEthereumProvider)]
    pub fn get_ethereum_provider(&self) -> JsValue {
        let Some(active) = self.controller.ethereum_provider() else {
            return JsValue::UNDEFINED;
        };

        let external = self.external.borrow().clone();
        let candidates = [self.platform.cached_provider(), external];
        same_allocation(&active, candidates.iter().flatten())
            .map(|injected| injected.as_js().clone())
            .unwrap_or(JsValue::UNDEFINED)
    }

    #[wasm_bindgen(js_name = getChainId)]
    pub fn get_chain_id(&self) -> Option<String> {
        self.controller.chain_id()
    }

    #[wasm_bindgen(js_name = getSignerAddress)]
    pub fn get_signer_address(&self) -> Option<String> {
        self.controller.signer_address()
    }

    #[wasm_bindgen(js_name = isConnected)]
    pub fn is_connected(&self) -> bool {
        self.controller.is_connected()
    }

    #[wasm_bindgen(js_name = hasWallet)]
    pub fn has_wallet(&self) -> bool {
        self.controller.has_wallet()
    }

    /// Balance of the connected account in ETH, formatted (`"1,234.5000"`)
    #[wasm_bindgen(js_name = getBalance)]
    pub fn get_balance(&self) -> Promise {
        let controller = Rc::clone(&self.controller);

        future_to_promise(async move {
            let provider = controller
                .provider()
                .ok_or_else(|| js_error(WalletError::NoInjectedProvider))?;
            let address = controller.signer_address().ok_or_else(|| {
                js_error(WalletError::SignerUnavailable("no connected account".to_string()))
            })?;

            let quantity = provider.balance_of(&address).await.map_err(js_error)?;
            let formatted = format_wei_to_eth(&quantity).ok_or_else(|| {
                js_error(WalletError::Decoding(format!("eth_getBalance returned {}", quantity)))
            })?;

            Ok(JsValue::from_str(&formatted))
        })
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.controller.snapshot()).map_err(js_error)
    }

    /// Call `callback(snapshot)` now and after every connection change.
    pub fn subscribe(&self, callback: Function) -> Subscription {
        let inner = self.controller.state().subscribe_snapshot(move |snapshot| {
            let value = match to_js(snapshot) {
                Ok(value) => value,
                Err(err) => {
                    warn!("Could not convert snapshot: {}", err);
                    return;
                }
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                warn!("Wallet subscriber threw: {:?}", err);
            }
        });

        Subscription { inner: Some(inner) }
    }
}

impl WalletApi {
    /// Connection cells, for binding a Leptos [`crate::state::wallet::WalletContext`]
    pub fn state(&self) -> &ConnectionState {
        self.controller.state()
    }

    /// Wrapped provider, signer and signer-or-provider access
    pub fn controller(&self) -> &WalletController {
        &self.controller
    }
}

/// The candidate sharing `active`'s allocation, whatever trait object `active` is viewed as
fn same_allocation<'a, A: ?Sized, T>(
    active: &Rc<A>,
    candidates: impl IntoIterator<Item = &'a Rc<T>>,
) -> Option<&'a Rc<T>>
where
    T: 'a,
{
    let target = Rc::as_ptr(active).cast::<()>();
    candidates
        .into_iter()
        .find(|candidate| Rc::as_ptr(candidate).cast::<()>() == target)
}

/// Handle returned by [`WalletApi::subscribe`]
#[wasm_bindgen]
pub struct Subscription {
    inner: Option<SnapshotSubscription>,
}

#[wasm_bindgen]
impl Subscription {
    /// Stop receiving snapshots. Calling it twice is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.unsubscribe();
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsWalletError {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rpc_code: Option<i64>,
}

fn js_error(err: WalletError) -> JsValue {
    let rpc_code = match &err {
        WalletError::RpcRejected { code, .. } => Some(*code),
        _ => None,
    };
    let payload = JsWalletError {
        code: err.code(),
        message: err.to_string(),
        rpc_code,
    };

    to_js(&payload).unwrap_or_else(|_| JsValue::from_str(&payload.message))
}
