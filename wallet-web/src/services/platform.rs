//! Browser [`Platform`]: `window.ethereum`, the `ethereum#initialized` event, timers and
//! `spawn_local`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use js_sys::{Object, Reflect};
use lib_wallet::{EthereumProvider, Platform, Result, WalletError};
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, Window};

use crate::services::ethereum::InjectedEthereum;
use crate::utils::constants::{ETHEREUM_GLOBAL, INITIALIZED_EVENT};

pub struct BrowserPlatform {
    window: Window,
    // Reused while `window.ethereum` stays the same object, so listeners are not rewired
    cached: RefCell<Option<Rc<InjectedEthereum>>>,
}

impl BrowserPlatform {
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| WalletError::MissingDependency("No global window object".to_string()))?;

        Ok(Self {
            window,
            cached: RefCell::new(None),
        })
    }

    /// Wrapper handed out for the current `window.ethereum`, if any
    pub fn cached_provider(&self) -> Option<Rc<InjectedEthereum>> {
        self.cached.borrow().clone()
    }

    fn ethereum_global(&self) -> Option<JsValue> {
        Reflect::get(&self.window, &JsValue::from_str(ETHEREUM_GLOBAL))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    }
}

#[async_trait(?Send)]
impl Platform for BrowserPlatform {
    fn injected_provider(&self) -> Option<Rc<dyn EthereumProvider>> {
        let Some(global) = self.ethereum_global() else {
            *self.cached.borrow_mut() = None;
            return None;
        };

        let mut cached = self.cached.borrow_mut();
        let provider = match cached.as_ref() {
            Some(provider) if Object::is(provider.as_js(), &global) => Rc::clone(provider),
            _ => {
                let provider = Rc::new(InjectedEthereum::new(global));
                *cached = Some(Rc::clone(&provider));
                provider
            }
        };

        Some(provider)
    }

    async fn wallet_initialized(&self) -> Option<Rc<dyn EthereumProvider>> {
        let (tx, rx) = oneshot::channel::<()>();
        let tx = RefCell::new(Some(tx));
        let closure = Closure::<dyn Fn(Event)>::new(move |_event: Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(());
            }
        });

        let options = AddEventListenerOptions::new();
        options.set_once(true);
        if let Err(err) = self
            .window
            .add_event_listener_with_callback_and_add_event_listener_options(
                INITIALIZED_EVENT,
                closure.as_ref().unchecked_ref(),
                &options,
            )
        {
            warn!("Could not listen for {}: {:?}", INITIALIZED_EVENT, err);
            return futures::future::pending().await;
        }

        // Unregistered when this future completes or is dropped by the timeout
        let _listener = WindowListener {
            window: self.window.clone(),
            closure,
        };

        rx.await.ok()?;
        debug!("Received {}", INITIALIZED_EVENT);

        self.injected_provider()
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

struct WindowListener {
    window: Window,
    closure: Closure<dyn Fn(Event)>,
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback(INITIALIZED_EVENT, self.closure.as_ref().unchecked_ref());
    }
}
