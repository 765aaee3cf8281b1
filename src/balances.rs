// src/balances.rs
use crate::format::{format_amount, FormatOptions};
use crate::utils;
use anyhow::Context;
use ethers::providers::Middleware;
use ethers::types::Address;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeMap;

/// Display value used for invalid addresses and unformattable balances.
pub const ZERO_BALANCE: &str = "0";

/// Most `eth_getBalance` calls in flight at once for a single batch.
pub const MAX_CONCURRENT_FETCHES: usize = 8;

/// Native balance of `address` at the latest block, in base units.
pub async fn fetch_raw_balance(
    client: &(impl Middleware + 'static),
    address: Address,
) -> Result<String, anyhow::Error> {
    let balance = client
        .get_balance(address, None)
        .await
        .with_context(|| format!("failed to fetch balance for {address:?}"))?;
    tracing::debug!(?address, %balance, "fetched balance");
    Ok(balance.to_string())
}

async fn balance_for(
    client: &(impl Middleware + 'static),
    input: &str,
    options: &FormatOptions,
) -> Result<String, anyhow::Error> {
    let Some(address) = utils::parse_address(input) else {
        tracing::debug!(address = input, "invalid address, reporting zero");
        return Ok(ZERO_BALANCE.to_string());
    };

    let raw = fetch_raw_balance(client, address).await?;
    match format_amount(&raw, options) {
        Ok(formatted) => Ok(formatted),
        Err(err) => {
            tracing::warn!(address = input, %raw, error = %err, "could not format balance");
            Ok(ZERO_BALANCE.to_string())
        }
    }
}

/// Fetches and formats the balance of every address, keyed by the address
/// exactly as given. Any provider failure fails the whole batch.
pub async fn formatted_balances(
    client: &(impl Middleware + 'static),
    addresses: &[String],
    options: &FormatOptions,
) -> Result<BTreeMap<String, String>, anyhow::Error> {
    let lookups: Vec<_> = addresses
        .iter()
        .map(|address| balance_for(client, address, options))
        .collect();
    let balances: Vec<String> = stream::iter(lookups)
        .buffered(MAX_CONCURRENT_FETCHES)
        .try_collect()
        .await?;

    Ok(addresses.iter().cloned().zip(balances).collect())
}
