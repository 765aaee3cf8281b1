// src/utils.rs
use ethers::types::Address;
use ethers::utils::to_checksum;
use std::str::FromStr;

/// Parses an account address: optional `0x`, then 40 hex digits.
///
/// Mixed-case input must carry a valid EIP-55 checksum; all-lowercase and
/// all-uppercase input is taken as is.
pub fn parse_address(input: &str) -> Option<Address> {
    let body = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let address = Address::from_str(body).ok()?;

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address, None)[2..] != *body {
        return None;
    }
    Some(address)
}
