//! # Platform Capabilities
//!
//! What the wallet core needs from its host: the injected provider global, the one-shot
//! "wallet initialized" notification, a timer, and a way to spawn background tasks.
//! The browser implementation is `wallet_web::services::platform::BrowserPlatform`.

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;

use crate::provider::EthereumProvider;

#[async_trait(?Send)]
pub trait Platform {
    /// The injected provider, if the page already has one (`window.ethereum`)
    fn injected_provider(&self) -> Option<Rc<dyn EthereumProvider>>;

    /// Resolves once the wallet announces itself, with whatever the global then holds.
    ///
    /// Dropping the future must unregister the underlying listener.
    async fn wallet_initialized(&self) -> Option<Rc<dyn EthereumProvider>>;

    /// Completes after `duration`; dropping the future cancels the timer.
    async fn sleep(&self, duration: Duration);

    /// Run `task` on the current thread's executor
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
