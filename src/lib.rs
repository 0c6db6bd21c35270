//! azprices - Fast Azure retail price search and region recommendation CLI
//!
//! Queries the Azure Retail Prices API, normalizes SKU naming across VM
//! generations, and ranks regions by price, with optional flat customer
//! discounting applied to every result.

pub mod azure;
pub mod commands;
pub mod config;
pub mod discount;
pub mod error;

#[cfg(test)]
mod test_utils;

pub use azure::models::{PriceRecord, PriceResponse, SavingsPlan};
pub use config::Config;
pub use error::{Error, Result};
