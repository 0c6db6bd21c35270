//! Azure Retail Prices API integration: client, wire models, query building.

pub mod client;
pub mod filter;
pub mod models;
pub mod services;
pub mod sku;

pub use client::{PricingFetch, RetailClient};
pub use filter::{PriceFilter, PriceQuery};
pub use models::{PriceRecord, PriceResponse, SavingsPlan};
pub use sku::{normalize_sku, NormalizedSku};
