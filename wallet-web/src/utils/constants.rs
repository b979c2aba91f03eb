//! Application constants

/// Global the wallet extension injects on `window`
pub const ETHEREUM_GLOBAL: &str = "ethereum";

/// Dispatched on `window` by wallets that inject after page load
pub const INITIALIZED_EVENT: &str = "ethereum#initialized";

// Balance display
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;
pub const BALANCE_DECIMALS: usize = 4;
