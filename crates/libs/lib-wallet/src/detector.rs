//! # Injected-Provider Detection
//!
//! Wallets inject `window.ethereum` either before the page scripts run or shortly after, in
//! which case they dispatch `ethereum#initialized` on `window`. [`detect`] covers both: it
//! returns the global when present, otherwise races the notification against a timeout.

use std::rc::Rc;
use std::time::Duration;

use futures::future::{self, Either};
use log::{debug, info, warn};

use crate::error::{Result, WalletError};
use crate::platform::Platform;
use crate::provider::EthereumProvider;

/// Wait for the injected provider.
///
/// The first of notification and timeout wins; the loser's future is dropped, which cancels the
/// timer or unregisters the notification listener. The returned provider can still be `None`
/// when a wallet announced itself without setting the global; the adapter rejects that case.
pub async fn detect(
    platform: &dyn Platform,
    timeout: Duration,
) -> Result<Option<Rc<dyn EthereumProvider>>> {
    if let Some(provider) = platform.injected_provider() {
        debug!("Injected provider already present");
        return Ok(Some(provider));
    }

    info!("Waiting up to {}ms for an injected wallet", timeout.as_millis());

    let announced = platform.wallet_initialized();
    let deadline = platform.sleep(timeout);

    match future::select(announced, deadline).await {
        Either::Left((provider, _deadline)) => {
            info!("Injected wallet announced itself");
            Ok(provider)
        }
        Either::Right(((), _announced)) => {
            warn!("No injected wallet found after {}ms", timeout.as_millis());
            Err(WalletError::NoWalletDetected)
        }
    }
}
