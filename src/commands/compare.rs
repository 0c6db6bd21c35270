//! Price comparison across regions or across SKUs of one service.

use crate::azure::client::{PricingFetch, RetailClient};
use crate::commands::search::{run_search, SearchRequest};
use crate::config::Config;
use crate::discount::{discounted_price, DiscountNote};
use crate::error::Result;
use serde::Serialize;
use tracing::warn;

/// Result cap per region when comparing explicit regions.
const REGION_SAMPLE_LIMIT: usize = 10;
/// Result cap when comparing SKUs within one service.
const SKU_SAMPLE_LIMIT: usize = 20;

/// What was compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    Regions,
    Skus,
}

/// One row of a comparison, cheapest first after sorting.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonEntry {
    pub region: String,
    pub sku_name: String,
    pub retail_price: f64,
    pub unit_of_measure: String,
    pub product_name: String,
    pub meter_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
}

/// Sorted comparison rows with query metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub service_name: String,
    pub currency: String,
    pub comparison_type: ComparisonMode,
    pub comparisons: Vec<ComparisonEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_applied: Option<DiscountNote>,
}

/// Compares prices across regions or SKUs.
pub struct CompareCommand {
    config: Config,
}

impl CompareCommand {
    /// Creates a new compare command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the comparison against the live catalog.
    pub async fn execute(
        &self,
        service_name: &str,
        sku_name: Option<&str>,
        regions: &[String],
        discount: Option<f64>,
    ) -> Result<Comparison> {
        let client = RetailClient::new(&self.config)?;
        self.execute_with_client(&client, service_name, sku_name, regions, discount).await
    }

    /// Runs the comparison with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl PricingFetch,
        service_name: &str,
        sku_name: Option<&str>,
        regions: &[String],
        discount: Option<f64>,
    ) -> Result<Comparison> {
        let mut entries = if regions.is_empty() {
            self.compare_skus(client, service_name, sku_name).await?
        } else {
            self.compare_regions(client, service_name, sku_name, regions).await?
        };

        let discount = discount.filter(|pct| *pct > 0.0);
        if let Some(pct) = discount {
            for entry in &mut entries {
                if entry.retail_price > 0.0 {
                    entry.original_price = Some(entry.retail_price);
                    entry.retail_price = discounted_price(entry.retail_price, pct);
                }
            }
        }

        entries.sort_by(|a, b| a.retail_price.total_cmp(&b.retail_price));

        Ok(Comparison {
            service_name: service_name.to_string(),
            currency: self.config.currency.clone(),
            comparison_type: if regions.is_empty() {
                ComparisonMode::Skus
            } else {
                ComparisonMode::Regions
            },
            comparisons: entries,
            discount_applied: discount.map(DiscountNote::new),
        })
    }

    /// One entry per requested region, from the first record found there.
    ///
    /// Regions that fail upstream are skipped so the rest of the comparison
    /// still comes back.
    async fn compare_regions(
        &self,
        client: &impl PricingFetch,
        service_name: &str,
        sku_name: Option<&str>,
        regions: &[String],
    ) -> Result<Vec<ComparisonEntry>> {
        let mut entries = Vec::new();

        for region in regions {
            let request = SearchRequest {
                service_name: Some(service_name.to_string()),
                sku_contains: sku_name.map(String::from),
                region: Some(region.clone()),
                currency: self.config.currency.clone(),
                limit: REGION_SAMPLE_LIMIT,
                validate_sku: false,
                ..Default::default()
            };

            match run_search(client, &request).await {
                Ok(result) => {
                    if let Some(item) = result.items.first() {
                        entries.push(ComparisonEntry {
                            region: region.clone(),
                            sku_name: item.sku_name.clone(),
                            retail_price: item.retail_price,
                            unit_of_measure: item.unit_of_measure.clone(),
                            product_name: item.product_name.clone(),
                            meter_name: item.meter_name.clone(),
                            original_price: None,
                        });
                    }
                }
                Err(err) => {
                    warn!("Failed to get prices for region {}: {}", region, err);
                }
            }
        }

        Ok(entries)
    }

    /// One entry per distinct SKU of the service, first occurrence wins.
    async fn compare_skus(
        &self,
        client: &impl PricingFetch,
        service_name: &str,
        sku_name: Option<&str>,
    ) -> Result<Vec<ComparisonEntry>> {
        let request = SearchRequest {
            service_name: Some(service_name.to_string()),
            sku_contains: sku_name.map(String::from),
            currency: self.config.currency.clone(),
            limit: SKU_SAMPLE_LIMIT,
            validate_sku: false,
            ..Default::default()
        };
        let result = run_search(client, &request).await?;

        let mut entries: Vec<ComparisonEntry> = Vec::new();
        for item in &result.items {
            if item.sku_name.is_empty()
                || entries.iter().any(|entry| entry.sku_name == item.sku_name)
            {
                continue;
            }
            entries.push(ComparisonEntry {
                region: item.region.clone(),
                sku_name: item.sku_name.clone(),
                retail_price: item.retail_price,
                unit_of_measure: item.unit_of_measure.clone(),
                product_name: item.product_name.clone(),
                meter_name: item.meter_name.clone(),
                original_price: None,
            });
        }

        Ok(entries)
    }
}
