//! # Formatting Utilities for Wallet Web
//!
//! Balance and network formatting for display. For address formatting, use
//! [`shared::utils::format_address`] or [`shared::utils::truncate_address`].
//!
//! ## Functions
//!
//! - [`format_wei_to_eth`] - Convert a hex wei quantity to ETH with formatting
//! - [`format_chain`] - Human-readable chain label

use crate::utils::constants::{BALANCE_DECIMALS, WEI_PER_ETHER};

/// Format a `eth_getBalance` quantity (hex wei) as ETH with 4 decimals, truncating.
///
/// Returns `None` for anything that is not a `0x`-prefixed quantity fitting in 128 bits.
///
/// ```rust
/// use wallet_web::utils::format::format_wei_to_eth;
///
/// assert_eq!(format_wei_to_eth("0xde0b6b3a7640000").as_deref(), Some("1.0000"));
/// ```
pub fn format_wei_to_eth(quantity: &str) -> Option<String> {
    let digits = quantity.strip_prefix("0x")?;
    let wei = u128::from_str_radix(digits, 16).ok()?;

    let whole = wei / WEI_PER_ETHER;
    let scale = 10u128.pow(18 - BALANCE_DECIMALS as u32);
    let fraction = (wei % WEI_PER_ETHER) / scale;

    Some(format!(
        "{}.{:0width$}",
        group_thousands(&whole.to_string()),
        fraction,
        width = BALANCE_DECIMALS
    ))
}

/// Network name when known, otherwise the raw chain id
pub fn format_chain(chain_id: &str) -> String {
    shared::utils::network_name(chain_id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Chain {}", chain_id))
}

fn group_thousands(integer: &str) -> String {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", integer),
    };

    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    let grouped: String = result.chars().rev().collect();
    format!("{}{}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_wei_to_eth() {
        assert_eq!(format_wei_to_eth("0x0").as_deref(), Some("0.0000"));
        // 1.5 ETH
        assert_eq!(format_wei_to_eth("0x14d1120d7b160000").as_deref(), Some("1.5000"));
        // 1234 ETH
        assert_eq!(format_wei_to_eth("0x42e530adfce0080000").as_deref(), Some("1,234.0000"));
        assert_eq!(format_wei_to_eth("1000"), None);
        assert_eq!(format_wei_to_eth("0xzz"), None);
        // Thousands grouping on the whole part only
        assert_eq!(
            format_wei_to_eth("0x3635c9adc5dea00000").as_deref(),
            Some("1,000.0000")
        );
    }

    #[test]
    fn test_format_chain() {
        assert_eq!(format_chain("0x1"), "Ethereum Mainnet");
        assert_eq!(format_chain("0x539"), "Chain 0x539");
    }
}
