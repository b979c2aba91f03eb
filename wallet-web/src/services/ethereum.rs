//! EIP-1193 Provider Bindings via wasm-bindgen
//!
//! Wraps the `window.ethereum` object (or any object with the same shape, such as a
//! WalletConnect bridge) so the wallet core can drive it through [`EthereumProvider`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use js_sys::{Promise, Reflect};
use lib_wallet::{EthereumProvider, EventHandler, ListenerId, ProviderEvent, Result, WalletError};
use serde::Serialize;
use serde_json::Value;
use shared::dto::rpc::{RequestArguments, RpcErrorPayload};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

// ============================================================================
// PROVIDER BINDINGS
// ============================================================================

#[wasm_bindgen]
extern "C" {
    /// Any object implementing `request`, `on` and `removeListener`
    pub type Eip1193;

    #[wasm_bindgen(method, catch)]
    fn request(this: &Eip1193, args: &JsValue) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &Eip1193, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = removeListener)]
    fn remove_listener(this: &Eip1193, event: &str, handler: &js_sys::Function);
}

// ============================================================================
// INJECTED PROVIDER
// ============================================================================

/// [`EthereumProvider`] backed by a JavaScript EIP-1193 object
pub struct InjectedEthereum {
    inner: Eip1193,
    handlers: RefCell<HashMap<u64, Closure<dyn Fn(JsValue)>>>,
    next_id: Cell<u64>,
}

impl InjectedEthereum {
    pub fn new(object: JsValue) -> Self {
        Self {
            inner: object.unchecked_into(),
            handlers: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// The wrapped JavaScript object
    pub fn as_js(&self) -> &JsValue {
        self.inner.as_ref()
    }
}

#[async_trait(?Send)]
impl EthereumProvider for InjectedEthereum {
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let args = to_js(&RequestArguments::new(method, params))?;

        let promise = self.inner.request(&args).map_err(rpc_error)?;
        let response = JsFuture::from(promise).await.map_err(rpc_error)?;

        from_js(response)
    }

    fn on(&self, event: ProviderEvent, handler: EventHandler) -> ListenerId {
        let closure = Closure::<dyn Fn(JsValue)>::new(move |payload: JsValue| {
            handler(from_js(payload).unwrap_or(Value::Null));
        });
        self.inner.on(event.as_str(), closure.as_ref().unchecked_ref());

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers.borrow_mut().insert(id, closure);

        ListenerId(id)
    }

    fn remove_listener(&self, event: ProviderEvent, id: ListenerId) {
        let removed = self.handlers.borrow_mut().remove(&id.0);
        if let Some(closure) = removed {
            self.inner
                .remove_listener(event.as_str(), closure.as_ref().unchecked_ref());
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Serialize into plain JS objects (maps as objects, no `Map`/`BigInt`)
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| WalletError::Decoding(e.to_string()))
}

pub fn from_js(value: JsValue) -> Result<Value> {
    serde_wasm_bindgen::from_value(value).map_err(|e| WalletError::Decoding(e.to_string()))
}

/// Read `code` and `message` off whatever the wallet threw
fn rpc_error(error: JsValue) -> WalletError {
    let code = Reflect::get(&error, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64());
    let message = Reflect::get(&error, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{:?}", error));

    let payload = match code {
        Some(code) => RpcErrorPayload::new(code as i64, message),
        None => RpcErrorPayload::internal(message),
    };

    payload.into()
}
