//! SKU catalog discovery for a service.

use crate::azure::client::{PricingFetch, RetailClient};
use crate::commands::search::{run_search, SearchRequest};
use crate::config::Config;
use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// One distinct SKU with a sample price and the regions offering it.
#[derive(Debug, Clone, Serialize)]
pub struct SkuInfo {
    pub sku_name: String,
    pub arm_sku_name: String,
    pub product_name: String,
    /// Price from the first record seen for this SKU.
    pub sample_price: f64,
    pub unit_of_measure: String,
    pub meter_name: String,
    pub sample_region: String,
    /// Regions offering this SKU, in first-seen order.
    pub available_regions: Vec<String>,
}

/// Deduplicated SKU catalog for one service.
#[derive(Debug, Clone, Serialize)]
pub struct SkuCatalog {
    pub service_name: String,
    pub skus: Vec<SkuInfo>,
    pub total_skus: usize,
    pub price_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_filter: Option<String>,
}

/// Lists the distinct SKUs a service offers.
pub struct DiscoverCommand {
    config: Config,
}

impl DiscoverCommand {
    /// Creates a new discover command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the discovery against the live catalog.
    pub async fn execute(
        &self,
        service_name: &str,
        region: Option<&str>,
        price_type: &str,
        limit: usize,
    ) -> Result<SkuCatalog> {
        let client = RetailClient::new(&self.config)?;
        self.execute_with_client(&client, service_name, region, price_type, limit).await
    }

    /// Runs the discovery with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl PricingFetch,
        service_name: &str,
        region: Option<&str>,
        price_type: &str,
        limit: usize,
    ) -> Result<SkuCatalog> {
        let request = SearchRequest {
            service_name: Some(service_name.to_string()),
            region: region.map(String::from),
            price_type: Some(price_type.to_string()),
            currency: self.config.currency.clone(),
            limit,
            validate_sku: false,
            ..Default::default()
        };
        let result = run_search(client, &request).await?;

        let mut skus: Vec<SkuInfo> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for item in &result.items {
            if item.sku_name.is_empty() {
                continue;
            }

            match index.get(&item.sku_name) {
                Some(&at) => {
                    let known = &mut skus[at];
                    if !item.region.is_empty() && !known.available_regions.contains(&item.region)
                    {
                        known.available_regions.push(item.region.clone());
                    }
                }
                None => {
                    index.insert(item.sku_name.clone(), skus.len());
                    skus.push(SkuInfo {
                        sku_name: item.sku_name.clone(),
                        arm_sku_name: item.arm_sku_name.clone(),
                        product_name: item.product_name.clone(),
                        sample_price: item.retail_price,
                        unit_of_measure: item.unit_of_measure.clone(),
                        meter_name: item.meter_name.clone(),
                        sample_region: item.region.clone(),
                        available_regions: if item.region.is_empty() {
                            Vec::new()
                        } else {
                            vec![item.region.clone()]
                        },
                    });
                }
            }
        }

        skus.sort_by(|a, b| a.sku_name.cmp(&b.sku_name));
        info!("Discovered {} distinct SKUs for {}", skus.len(), service_name);

        Ok(SkuCatalog {
            service_name: service_name.to_string(),
            total_skus: skus.len(),
            skus,
            price_type: price_type.to_string(),
            region_filter: region.map(String::from),
        })
    }
}
