//! Usage-based cost projection for a SKU in one region.

use crate::azure::client::{PricingFetch, RetailClient};
use crate::commands::search::{run_search, SearchRequest};
use crate::config::Config;
use crate::discount::{round2, round6, DiscountNote};
use crate::error::{Error, Result};
use serde::Serialize;

/// Result cap for the pricing lookup; the first record drives the estimate.
const ESTIMATE_LOOKUP_LIMIT: usize = 5;

/// Average days per month used for the hours-per-day figure.
const DAYS_PER_MONTH: f64 = 30.44;

/// Projected on-demand costs at the assumed usage.
#[derive(Debug, Clone, Serialize)]
pub struct OnDemandCost {
    pub hourly_rate: f64,
    pub daily_cost: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_daily_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_monthly_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_yearly_cost: Option<f64>,
}

/// Usage assumed by the projection.
#[derive(Debug, Clone, Serialize)]
pub struct UsageAssumptions {
    pub hours_per_month: f64,
    pub hours_per_day: f64,
}

/// Projected costs under one savings-plan term.
#[derive(Debug, Clone, Serialize)]
pub struct SavingsPlanCost {
    pub term: String,
    pub hourly_rate: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    /// Percent saved versus the on-demand hourly rate.
    pub savings_percent: f64,
    pub annual_savings: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_monthly_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_yearly_cost: Option<f64>,
}

/// Full cost projection for a SKU in a region.
#[derive(Debug, Clone, Serialize)]
pub struct CostEstimate {
    pub service_name: String,
    pub sku_name: String,
    pub region: String,
    pub product_name: String,
    pub unit_of_measure: String,
    pub currency: String,
    pub on_demand: OnDemandCost,
    pub usage: UsageAssumptions,
    pub savings_plans: Vec<SavingsPlanCost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_applied: Option<DiscountNote>,
}

/// Projects monthly and yearly costs from catalog rates.
pub struct EstimateCommand {
    config: Config,
}

impl EstimateCommand {
    /// Creates a new estimate command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the estimate against the live catalog.
    pub async fn execute(
        &self,
        service_name: &str,
        sku_name: &str,
        region: &str,
        hours_per_month: f64,
        discount: Option<f64>,
    ) -> Result<CostEstimate> {
        let client = RetailClient::new(&self.config)?;
        self.execute_with_client(&client, service_name, sku_name, region, hours_per_month, discount)
            .await
    }

    /// Runs the estimate with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl PricingFetch,
        service_name: &str,
        sku_name: &str,
        region: &str,
        hours_per_month: f64,
        discount: Option<f64>,
    ) -> Result<CostEstimate> {
        let request = SearchRequest {
            service_name: Some(service_name.to_string()),
            sku_contains: Some(sku_name.to_string()),
            region: Some(region.to_string()),
            currency: self.config.currency.clone(),
            limit: ESTIMATE_LOOKUP_LIMIT,
            validate_sku: false,
            ..Default::default()
        };
        let result = run_search(client, &request).await?;

        let Some(item) = result.items.first() else {
            return Err(Error::PriceDataMissing {
                sku_name: sku_name.to_string(),
                region: region.to_string(),
            });
        };

        let discount = discount.filter(|pct| *pct > 0.0);

        let mut hourly = item.retail_price;
        let mut original_hourly = None;
        if let Some(pct) = discount {
            original_hourly = Some(hourly);
            hourly *= 1.0 - pct / 100.0;
        }

        let daily = hourly * 24.0;
        let monthly = hourly * hours_per_month;
        let yearly = monthly * 12.0;

        let on_demand = OnDemandCost {
            hourly_rate: round6(hourly),
            daily_cost: round2(daily),
            monthly_cost: round2(monthly),
            yearly_cost: round2(yearly),
            original_hourly_rate: original_hourly,
            original_daily_cost: original_hourly.map(|rate| round2(rate * 24.0)),
            original_monthly_cost: original_hourly.map(|rate| round2(rate * hours_per_month)),
            original_yearly_cost: original_hourly
                .map(|rate| round2(rate * hours_per_month * 12.0)),
        };

        let mut savings_plans = Vec::new();
        for plan in &item.savings_plans {
            let mut plan_hourly = plan.retail_price;
            let mut original_plan_hourly = None;
            if let Some(pct) = discount {
                original_plan_hourly = Some(plan_hourly);
                plan_hourly *= 1.0 - pct / 100.0;
            }

            let plan_monthly = plan_hourly * hours_per_month;
            let plan_yearly = plan_monthly * 12.0;
            let savings_percent = if hourly > 0.0 {
                (hourly - plan_hourly) / hourly * 100.0
            } else {
                0.0
            };

            savings_plans.push(SavingsPlanCost {
                term: plan.term.clone(),
                hourly_rate: round6(plan_hourly),
                monthly_cost: round2(plan_monthly),
                yearly_cost: round2(plan_yearly),
                savings_percent: round2(savings_percent),
                annual_savings: round2(yearly - plan_yearly),
                original_hourly_rate: original_plan_hourly,
                original_monthly_cost: original_plan_hourly
                    .map(|rate| round2(rate * hours_per_month)),
                original_yearly_cost: original_plan_hourly
                    .map(|rate| round2(rate * hours_per_month * 12.0)),
            });
        }

        Ok(CostEstimate {
            service_name: service_name.to_string(),
            sku_name: item.sku_name.clone(),
            region: region.to_string(),
            product_name: item.product_name.clone(),
            unit_of_measure: item.unit_of_measure.clone(),
            currency: self.config.currency.clone(),
            on_demand,
            usage: UsageAssumptions {
                hours_per_month,
                hours_per_day: round2(hours_per_month / DAYS_PER_MONTH),
            },
            savings_plans,
            discount_applied: discount.map(DiscountNote::new),
        })
    }
}
