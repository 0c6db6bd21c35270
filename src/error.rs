//! Error types for catalog requests and pricing operations.

use thiserror::Error;

/// Errors surfaced by the pricing client and commands.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP 429 from the catalog; consumed by the retry loop and escalated
    /// to [`Error::Upstream`] once all attempts are spent.
    #[error("rate limited by the pricing API (HTTP {status})")]
    RateLimited { status: u16 },

    /// Any other non-2xx response. Never retried.
    #[error("pricing API request failed with HTTP {status}")]
    Upstream { status: u16 },

    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("request to the pricing API failed")]
    Network(#[from] wreq::Error),

    /// The response body was not a valid price envelope.
    #[error("failed to decode pricing API response")]
    Decode(#[from] serde_json::Error),

    #[error("no pricing found for '{}' in service '{}' (search terms tried: {})", .sku_name, .service_name, .attempted_terms.join(", "))]
    SkuNotFound { service_name: String, sku_name: String, attempted_terms: Vec<String> },

    #[error("no regions with valid pricing found for '{sku_name}'")]
    NoPricedRegions { sku_name: String },

    #[error("no pricing found for '{sku_name}' in region '{region}'")]
    PriceDataMissing { sku_name: String, region: String },
}

pub type Result<T> = std::result::Result<T, Error>;
