// src/lib.rs
pub mod api;
pub mod balances;
pub mod config;
pub mod error;
pub mod format;
pub mod utils;

pub use error::{ApiError, FormatError};
pub use format::{format_amount, FormatOptions};
