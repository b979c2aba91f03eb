//! Browser services backing the wallet core

pub mod ethereum;
pub mod platform;
pub mod storage;

pub use ethereum::InjectedEthereum;
pub use platform::BrowserPlatform;
pub use storage::LocalStorage;
