//! Shared helpers for unit tests.

use crate::azure::client::PricingFetch;
use crate::azure::filter::PriceQuery;
use crate::azure::models::{PriceRecord, PriceResponse};
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Catalog stub that replays canned outcomes in order and records every
/// query it receives. Runs out of outcomes → returns an empty envelope.
pub(crate) struct MockCatalog {
    outcomes: Mutex<VecDeque<Result<PriceResponse>>>,
    queries: Mutex<Vec<PriceQuery>>,
}

impl MockCatalog {
    pub fn new(responses: Vec<PriceResponse>) -> Self {
        Self::with_outcomes(responses.into_iter().map(Ok).collect())
    }

    pub fn with_outcomes(outcomes: Vec<Result<PriceResponse>>) -> Self {
        Self { outcomes: Mutex::new(outcomes.into()), queries: Mutex::new(Vec::new()) }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<PriceQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PricingFetch for MockCatalog {
    async fn fetch(&self, query: &PriceQuery) -> Result<PriceResponse> {
        self.queries.lock().unwrap().push(query.clone());
        self.outcomes.lock().unwrap().pop_front().unwrap_or_else(|| Ok(PriceResponse::default()))
    }
}

/// Builds a minimal consumption price record.
pub(crate) fn record(sku: &str, region: &str, price: f64) -> PriceRecord {
    PriceRecord {
        service_name: "Virtual Machines".to_string(),
        service_family: "Compute".to_string(),
        product_name: format!("Virtual Machines {} Series", sku),
        sku_name: sku.to_string(),
        arm_sku_name: format!("Standard_{}", sku.replace(' ', "_")),
        region: region.to_string(),
        location: region.to_uppercase(),
        retail_price: price,
        unit_of_measure: "1 Hour".to_string(),
        price_type: "Consumption".to_string(),
        meter_name: sku.to_string(),
        savings_plans: Vec::new(),
        original_price: None,
    }
}

/// Wraps records in a response envelope.
pub(crate) fn response(items: Vec<PriceRecord>) -> PriceResponse {
    PriceResponse { items, next_page_link: None, count: None }
}

/// Config tuned for tests: no retry waits.
pub(crate) fn test_config() -> Config {
    Config { retry_base_wait_ms: 0, ..Config::default() }
}
