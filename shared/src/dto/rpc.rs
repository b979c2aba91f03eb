//! # EIP-1193 Data Transfer Objects
//!
//! Request arguments and error payloads exchanged with an injected wallet's
//! `request()` method, plus the method, event and error-code names the adapter relies on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC method names used by the adapter
pub mod methods {
    pub const ETH_CHAIN_ID: &str = "eth_chainId";
    pub const ETH_ACCOUNTS: &str = "eth_accounts";
    pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const ETH_GET_BALANCE: &str = "eth_getBalance";
    pub const WALLET_SWITCH_ETHEREUM_CHAIN: &str = "wallet_switchEthereumChain";
}

/// Provider error codes defined by EIP-1193 and EIP-3326
pub mod error_codes {
    /// The user rejected the request.
    pub const USER_REJECTED_REQUEST: i64 = 4001;
    /// `wallet_switchEthereumChain` target is unknown to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// JSON-RPC internal error, used when a wallet throws something without a code.
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Argument object passed to `ethereum.request(args)`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestArguments {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestArguments {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// Error object thrown by `ethereum.request()` (EIP-1193 `ProviderRpcError`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcErrorPayload {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcErrorPayload {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Error for a wallet failure that carried no code (plain string or foreign object)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message)
    }
}

/// Single parameter object for `wallet_switchEthereumChain`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainParams {
    pub chain_id: String,
}

impl SwitchChainParams {
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
        }
    }
}
