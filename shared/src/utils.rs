//! # Shared Utility Functions
//!
//! Display helpers used by the wallet core and the browser layer.
//!
//! ## Address Formatting
//!
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`truncate_address`] - `0x1234...abcd` form used for account addresses
//!
//! ## Networks
//!
//! - [`network_name`] - Name of a well-known chain from its hex chain id
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";
//! let formatted = format_address(address, 6, 4);
//! assert_eq!(formatted, "0x8ba1...BA72");
//! ```

/// Format an address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";
/// assert_eq!(format_address(addr, 6, 4), "0x8ba1...BA72");
/// assert_eq!(format_address("0x1234", 6, 4), "0x1234");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if address_len <= prefix_len + suffix_len
        || !address.is_char_boundary(prefix_len)
        || !address.is_char_boundary(address_len - suffix_len)
    {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Format an account address as `0x` plus 4 leading and 4 trailing characters.
///
/// # Examples
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// let addr = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";
/// assert_eq!(truncate_address(addr), "0x8ba1...BA72");
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

/// Name of a well-known network for a hex chain id such as `0x1`.
///
/// The chain id is not validated; unknown or malformed ids return `None`.
pub fn network_name(chain_id: &str) -> Option<&'static str> {
    let name = match chain_id.to_ascii_lowercase().as_str() {
        "0x1" => "Ethereum Mainnet",
        "0xaa36a7" => "Sepolia",
        "0x4268" => "Holesky",
        "0xa" => "OP Mainnet",
        "0x89" => "Polygon",
        "0x2105" => "Base",
        "0xa4b1" => "Arbitrum One",
        "0x38" => "BNB Smart Chain",
        "0x7a69" => "Localhost 8545",
        _ => return None,
    };
    Some(name)
}
