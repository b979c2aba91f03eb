//! # Provider Adapter
//!
//! Wraps the raw injected provider in a [`WrappedProvider`], the higher-level view the rest of
//! the application reads chain state through and derives a [`Signer`] from.
//!
//! The wrapping library is pluggable through [`ProviderFactory`]; [`Web3ProviderFactory`]
//! builds the bundled [`Web3Provider`], a thin JSON-RPC view over any [`EthereumProvider`].

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::dto::rpc::methods;

use crate::error::{Result, WalletError};
use crate::provider::EthereumProvider;

/// Capability for the currently authorized account
#[async_trait(?Send)]
pub trait Signer {
    /// Address of the account this signer acts for
    async fn address(&self) -> Result<String>;
}

/// Higher-level provider built from an injected one
#[async_trait(?Send)]
pub trait WrappedProvider {
    /// Balance in wei as a hex quantity
    async fn balance_of(&self, address: &str) -> Result<String>;

    /// Derive a signer for the default account. `Ok(None)` means no account is available.
    fn get_signer(&self) -> Result<Option<Rc<dyn Signer>>>;
}

/// Constructor handle for wrapped providers (the "provider library" passed to `init`)
pub trait ProviderFactory {
    fn wrap(&self, ethereum: Rc<dyn EthereumProvider>) -> Rc<dyn WrappedProvider>;
}

/// Raw and wrapped provider produced by [`adapt`]
pub struct Adapted {
    pub ethereum: Rc<dyn EthereumProvider>,
    pub provider: Rc<dyn WrappedProvider>,
}

/// Wrap `raw` with `factory`. Pure construction, no RPC.
pub fn adapt(
    factory: &dyn ProviderFactory,
    raw: Option<Rc<dyn EthereumProvider>>,
) -> Result<Adapted> {
    let ethereum = raw.ok_or(WalletError::NoInjectedProvider)?;
    let provider = factory.wrap(Rc::clone(&ethereum));

    Ok(Adapted { ethereum, provider })
}

/// Either the signer (when connected) or the read-only provider
#[derive(Clone)]
pub enum SignerOrProvider {
    Signer(Rc<dyn Signer>),
    Provider(Rc<dyn WrappedProvider>),
}

/// Default [`ProviderFactory`]
#[derive(Debug, Default, Clone, Copy)]
pub struct Web3ProviderFactory;

impl ProviderFactory for Web3ProviderFactory {
    fn wrap(&self, ethereum: Rc<dyn EthereumProvider>) -> Rc<dyn WrappedProvider> {
        Rc::new(Web3Provider::new(ethereum))
    }
}

/// JSON-RPC view over an injected provider
pub struct Web3Provider {
    ethereum: Rc<dyn EthereumProvider>,
}

impl Web3Provider {
    pub fn new(ethereum: Rc<dyn EthereumProvider>) -> Self {
        Self { ethereum }
    }

    async fn request_string(&self, method: &str, params: Option<Value>) -> Result<String> {
        let value = self.ethereum.request(method, params).await?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| WalletError::Decoding(format!("{method} returned {value}")))
    }
}

#[async_trait(?Send)]
impl WrappedProvider for Web3Provider {
    async fn balance_of(&self, address: &str) -> Result<String> {
        self.request_string(methods::ETH_GET_BALANCE, Some(json!([address, "latest"])))
            .await
    }

    fn get_signer(&self) -> Result<Option<Rc<dyn Signer>>> {
        Ok(Some(Rc::new(JsonRpcSigner::new(Rc::clone(&self.ethereum), 0))))
    }
}

/// Signer for the account at `index` of `eth_accounts`
pub struct JsonRpcSigner {
    ethereum: Rc<dyn EthereumProvider>,
    index: usize,
}

impl JsonRpcSigner {
    pub fn new(ethereum: Rc<dyn EthereumProvider>, index: usize) -> Self {
        Self { ethereum, index }
    }
}

#[async_trait(?Send)]
impl Signer for JsonRpcSigner {
    async fn address(&self) -> Result<String> {
        let value = self.ethereum.request(methods::ETH_ACCOUNTS, None).await?;
        let accounts: Vec<String> = serde_json::from_value(value)?;

        accounts
            .into_iter()
            .nth(self.index)
            .ok_or_else(|| WalletError::SignerUnavailable(format!("unknown account #{}", self.index)))
    }
}
