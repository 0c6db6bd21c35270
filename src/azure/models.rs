//! Wire types for the Azure Retail Prices API.

use serde::{Deserialize, Serialize};

/// One price entry from the retail catalog.
///
/// Deserialized straight off the wire at the request boundary; heterogeneous
/// upstream payloads never travel further as untyped JSON. `original_price`
/// is only ever populated by a discount pass, never by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    #[serde(default)]
    pub service_name: String,

    #[serde(default)]
    pub service_family: String,

    #[serde(default)]
    pub product_name: String,

    #[serde(default)]
    pub sku_name: String,

    #[serde(default)]
    pub arm_sku_name: String,

    /// Region code; `armRegionName` on the wire.
    #[serde(rename = "armRegionName", default)]
    pub region: String,

    /// Human-readable region name (e.g. "East US").
    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub retail_price: f64,

    #[serde(default)]
    pub unit_of_measure: String,

    /// Price type; `type` on the wire (Consumption, Reservation, ...).
    #[serde(rename = "type", default)]
    pub price_type: String,

    #[serde(default)]
    pub meter_name: String,

    /// Multi-year commitment tiers attached to this SKU.
    #[serde(rename = "savingsPlan", default, skip_serializing_if = "Vec::is_empty")]
    pub savings_plans: Vec<SavingsPlan>,

    /// Pre-discount price, present only after a discount pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
}

/// A savings-plan commitment tier on a price record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlan {
    /// Commitment term (e.g. "1 Year", "3 Years").
    #[serde(default)]
    pub term: String,

    #[serde(default)]
    pub retail_price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
}

/// Response envelope returned by the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceResponse {
    #[serde(rename = "Items", default)]
    pub items: Vec<PriceRecord>,

    #[serde(rename = "NextPageLink", default)]
    pub next_page_link: Option<String>,

    #[serde(rename = "Count", default)]
    pub count: Option<u64>,
}

impl PriceResponse {
    /// Returns true if the envelope carries no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
