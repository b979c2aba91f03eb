//! Browser Wallet Adapter for Injected Ethereum Wallets
//!
//! Detects `window.ethereum`, keeps the connection state observable and exports
//! [`api::WalletApi`] to JavaScript. Leptos UIs can mirror the state with
//! [`state::wallet::provide_wallet_context`].

use wasm_bindgen::prelude::*;

pub mod api;
pub mod services;
pub mod state;
pub mod utils;

pub use api::{Subscription, WalletApi};

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Initialize logger
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Wallet adapter loaded");
}
