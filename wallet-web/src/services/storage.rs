//! `window.localStorage` as [`KeyValueStorage`]

use lib_wallet::{KeyValueStorage, Result, WalletError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn new() -> Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| WalletError::Storage("No global window object".to_string()))?
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| WalletError::Storage("localStorage is not available".to_string()))?;

        Ok(Self { storage })
    }
}

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(storage_error)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(storage_error)
    }
}

fn storage_error(err: JsValue) -> WalletError {
    WalletError::Storage(format!("{:?}", err))
}
