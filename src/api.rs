// src/api.rs
use crate::balances;
use crate::error::ApiError;
use crate::format::FormatOptions;
use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use ethers::providers::Middleware;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Largest address list a single request may ask for.
pub const MAX_ADDRESSES: usize = 100;

pub struct AppState<M> {
    pub client: Arc<M>,
    pub format: FormatOptions,
}

#[derive(Debug, Deserialize)]
pub struct BalancesQuery {
    pub addresses: Option<String>,
}

pub fn router<M: Middleware + 'static>(state: Arc<AppState<M>>) -> Router {
    Router::new()
        .route("/balances", get(get_balances::<M>))
        .with_state(state)
}

/// Splits the comma-separated `addresses` parameter, dropping blank entries.
fn requested_addresses(query: &BalancesQuery) -> Vec<String> {
    query
        .addresses
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect()
}

async fn get_balances<M: Middleware + 'static>(
    State(state): State<Arc<AppState<M>>>,
    Query(query): Query<BalancesQuery>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let addresses = requested_addresses(&query);
    if addresses.is_empty() {
        return Err(ApiError::NoAddresses);
    }
    if addresses.len() > MAX_ADDRESSES {
        return Err(ApiError::TooManyAddresses {
            count: addresses.len(),
            max: MAX_ADDRESSES,
        });
    }

    tracing::info!(count = addresses.len(), "fetching balances");
    let balances =
        balances::formatted_balances(state.client.as_ref(), &addresses, &state.format)
            .await
            .inspect_err(|err| tracing::error!(error = ?err, "balance lookup failed"))?;

    Ok(Json(balances))
}
