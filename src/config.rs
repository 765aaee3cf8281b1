// src/config.rs
use crate::format::FormatOptions;
use anyhow::{anyhow, Context};
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rpc_url: String,
    pub port: u16,
    pub format: FormatOptions,
}

impl Settings {
    /// Reads settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    ///
    /// `RPC_URL` (or the legacy `ALCHEMY_RPC_URL`) is required; everything
    /// else falls back to the reference defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let rpc_url = lookup("RPC_URL")
            .or_else(|| lookup("ALCHEMY_RPC_URL"))
            .ok_or_else(|| anyhow!("RPC_URL is not set"))?;

        let defaults = FormatOptions::default();
        let format = FormatOptions {
            decimals: parse_or(&lookup, "BALANCE_DECIMALS", defaults.decimals)?,
            significant_figures: parse_or(
                &lookup,
                "BALANCE_SIG_FIGS",
                defaults.significant_figures,
            )?,
            separator: lookup("BALANCE_SEPARATOR").unwrap_or(defaults.separator),
        };

        Ok(Self {
            rpc_url,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            format,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if self.rpc_url.trim().is_empty() {
            problems.push("RPC_URL must not be empty".to_string());
        }
        if self.format.significant_figures == 0 {
            problems.push("BALANCE_SIG_FIGS must be at least 1".to_string());
        }
        if self
            .format
            .separator
            .chars()
            .any(|c| c.is_ascii_digit() || c == '.')
        {
            problems.push(format!(
                "BALANCE_SEPARATOR {:?} must not contain digits or '.'",
                self.format.separator
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(format!("invalid configuration:\n  {}", problems.join("\n  ")))
        }
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value {value:?}")),
        None => Ok(default),
    }
}
