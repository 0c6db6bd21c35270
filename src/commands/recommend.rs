//! Cheapest-region recommendation for a service and SKU.

use crate::azure::client::{PricingFetch, RetailClient};
use crate::azure::sku::normalize_sku;
use crate::commands::search::{run_search, SearchRequest};
use crate::config::Config;
use crate::discount::{discounted_price, round2, DiscountNote};
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Result cap for the region-discovery query; wide enough to see every
/// region a SKU is priced in.
const DISCOVERY_LIMIT: usize = 500;

/// Pricing tier inferred from SKU and meter naming.
///
/// Classification relies on literal markers in current catalog names; a
/// future naming scheme would need new markers here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PricingTier {
    #[serde(rename = "On-Demand")]
    OnDemand,
    #[serde(rename = "Spot")]
    Spot,
    #[serde(rename = "Low Priority")]
    LowPriority,
}

impl PricingTier {
    /// Classifies a record by its SKU and meter names.
    pub fn classify(sku_name: &str, meter_name: &str) -> Self {
        if sku_name.contains("Spot") || meter_name.contains("Spot") {
            PricingTier::Spot
        } else if sku_name.contains("Low Priority") || meter_name.contains("Low Priority") {
            PricingTier::LowPriority
        } else {
            PricingTier::OnDemand
        }
    }

    fn rank(self) -> u8 {
        match self {
            PricingTier::OnDemand => 0,
            PricingTier::Spot => 1,
            PricingTier::LowPriority => 2,
        }
    }
}

/// Best-priced offer found for one region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionCandidate {
    pub region: String,
    pub location: String,
    pub retail_price: f64,
    pub sku_name: String,
    pub product_name: String,
    pub unit_of_measure: String,
    pub meter_name: String,
    pub pricing_tier: PricingTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_vs_most_expensive: Option<f64>,
}

impl RegionCandidate {
    /// Total order used when folding candidates for a region: tier rank
    /// first (On-Demand beats preemptible tiers regardless of price), then
    /// lower price.
    fn outranks(&self, incumbent: &RegionCandidate) -> bool {
        (self.pricing_tier.rank(), self.retail_price)
            < (incumbent.pricing_tier.rank(), incumbent.retail_price)
    }
}

/// Price extremes over the complete ranked set, before top-N truncation.
#[derive(Debug, Clone, Serialize)]
pub struct RegionSummary {
    pub cheapest_region: String,
    pub cheapest_location: String,
    pub cheapest_price: f64,
    pub most_expensive_region: String,
    pub most_expensive_location: String,
    pub most_expensive_price: f64,
    pub max_savings_percentage: f64,
}

/// Ranked region recommendations with summary statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RegionRecommendation {
    pub service_name: String,
    /// Display form of the requested SKU.
    pub sku_name: String,
    /// The SKU exactly as the caller wrote it.
    pub sku_input: String,
    pub currency: String,
    pub total_regions_found: usize,
    pub showing_top: usize,
    pub recommendations: Vec<RegionCandidate>,
    pub summary: RegionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_applied: Option<DiscountNote>,
}

/// Finds the cheapest regions offering a SKU.
pub struct RecommendCommand {
    config: Config,
}

impl RecommendCommand {
    /// Creates a new recommend command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the recommendation against the live catalog.
    pub async fn execute(
        &self,
        service_name: &str,
        sku_name: &str,
        top_n: usize,
        discount: Option<f64>,
    ) -> Result<RegionRecommendation> {
        let client = RetailClient::new(&self.config)?;
        self.execute_with_client(&client, service_name, sku_name, top_n, discount).await
    }

    /// Runs the recommendation with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl PricingFetch,
        service_name: &str,
        sku_name: &str,
        top_n: usize,
        discount: Option<f64>,
    ) -> Result<RegionRecommendation> {
        let normalized = normalize_sku(sku_name);

        // Try each naming variant until one returns pricing.
        let mut items = Vec::new();
        for term in &normalized.search_terms {
            let request = SearchRequest {
                service_name: Some(service_name.to_string()),
                sku_contains: Some(term.clone()),
                currency: self.config.currency.clone(),
                limit: DISCOVERY_LIMIT,
                validate_sku: false,
                ..Default::default()
            };
            let result = run_search(client, &request).await?;
            if !result.items.is_empty() {
                debug!("SKU variant '{}' matched {} items", term, result.items.len());
                items = result.items;
                break;
            }
            debug!("SKU variant '{}' matched nothing", term);
        }

        if items.is_empty() {
            return Err(Error::SkuNotFound {
                service_name: service_name.to_string(),
                sku_name: normalized.display_name,
                attempted_terms: normalized.search_terms,
            });
        }

        // Fold down to the best candidate per region.
        let mut by_region: BTreeMap<String, RegionCandidate> = BTreeMap::new();
        for item in &items {
            if item.region.is_empty() || item.retail_price <= 0.0 {
                continue;
            }

            let candidate = RegionCandidate {
                region: item.region.clone(),
                location: if item.location.is_empty() {
                    item.region.clone()
                } else {
                    item.location.clone()
                },
                retail_price: item.retail_price,
                sku_name: item.sku_name.clone(),
                product_name: item.product_name.clone(),
                unit_of_measure: item.unit_of_measure.clone(),
                meter_name: item.meter_name.clone(),
                pricing_tier: PricingTier::classify(&item.sku_name, &item.meter_name),
                original_price: None,
                savings_vs_most_expensive: None,
            };

            match by_region.get_mut(&candidate.region) {
                Some(incumbent) => {
                    if candidate.outranks(incumbent) {
                        *incumbent = candidate;
                    }
                }
                None => {
                    by_region.insert(candidate.region.clone(), candidate);
                }
            }
        }

        if by_region.is_empty() {
            return Err(Error::NoPricedRegions { sku_name: normalized.display_name });
        }

        let mut ranked: Vec<RegionCandidate> = by_region.into_values().collect();

        let discount = discount.filter(|pct| *pct > 0.0);
        if let Some(pct) = discount {
            for candidate in &mut ranked {
                candidate.original_price = Some(candidate.retail_price);
                candidate.retail_price = discounted_price(candidate.retail_price, pct);
            }
        }

        ranked.sort_by(|a, b| a.retail_price.total_cmp(&b.retail_price));

        // Savings relative to the most expensive region, over the full set.
        let max_price = ranked[ranked.len() - 1].retail_price;
        for candidate in &mut ranked {
            candidate.savings_vs_most_expensive = Some(if max_price > 0.0 {
                round2((max_price - candidate.retail_price) / max_price * 100.0)
            } else {
                0.0
            });
        }

        let cheapest = &ranked[0];
        let priciest = &ranked[ranked.len() - 1];
        let summary = RegionSummary {
            cheapest_region: cheapest.region.clone(),
            cheapest_location: cheapest.location.clone(),
            cheapest_price: cheapest.retail_price,
            most_expensive_region: priciest.region.clone(),
            most_expensive_location: priciest.location.clone(),
            most_expensive_price: priciest.retail_price,
            max_savings_percentage: cheapest.savings_vs_most_expensive.unwrap_or(0.0),
        };

        let total = ranked.len();
        let showing = top_n.min(total);
        ranked.truncate(top_n);

        info!(
            "Found {} priced regions for {} ({}), showing top {}",
            total, normalized.display_name, service_name, showing
        );

        Ok(RegionRecommendation {
            service_name: service_name.to_string(),
            sku_name: normalized.display_name,
            sku_input: sku_name.to_string(),
            currency: self.config.currency.clone(),
            total_regions_found: total,
            showing_top: showing,
            recommendations: ranked,
            summary,
            discount_applied: discount.map(DiscountNote::new),
        })
    }
}
