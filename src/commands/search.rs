//! Price search with SKU validation and clarification.

use crate::azure::client::{PricingFetch, RetailClient};
use crate::azure::filter::{PriceFilter, PriceQuery};
use crate::azure::models::PriceRecord;
use crate::azure::sku::loose_match;
use crate::config::Config;
use crate::discount::{apply_discount, DiscountNote};
use crate::error::Result;
use serde::Serialize;
use tracing::debug;

/// Raw result counts above this trigger a clarification prompt.
const CLARIFICATION_THRESHOLD: usize = 10;
/// Cap on suggested SKU names in validation and clarification.
const SUGGESTION_LIMIT: usize = 5;
/// Result cap for the broader scan behind SKU validation.
const VALIDATION_SCAN_LIMIT: usize = 100;

/// Catalog search parameters.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub service_name: Option<String>,
    pub service_family: Option<String>,
    pub region: Option<String>,
    /// Substring matched against SKU names.
    pub sku_contains: Option<String>,
    pub price_type: Option<String>,
    pub currency: String,
    pub limit: usize,
    /// Flat percentage applied to every returned price.
    pub discount: Option<f64>,
    /// Suggest alternatives when a SKU filter finds nothing or too much.
    pub validate_sku: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            service_name: None,
            service_family: None,
            region: None,
            sku_contains: None,
            price_type: None,
            currency: "USD".to_string(),
            limit: 50,
            discount: None,
            validate_sku: true,
        }
    }
}

/// Requested SKU not found; closest matches from the same service.
#[derive(Debug, Clone, Serialize)]
pub struct SkuValidation {
    pub original_sku: String,
    pub found: bool,
    pub message: String,
    pub suggestions: Vec<SkuSuggestion>,
}

/// A SKU close to the one requested, with a sample price.
#[derive(Debug, Clone, Serialize)]
pub struct SkuSuggestion {
    pub sku_name: String,
    pub product_name: String,
    pub price: f64,
    pub unit: String,
    pub region: String,
}

/// Too many matches: ask the caller to narrow the query.
#[derive(Debug, Clone, Serialize)]
pub struct SkuClarification {
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Search results with filter and pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub items: Vec<PriceRecord>,
    pub count: usize,
    pub has_more: bool,
    pub currency: String,
    pub filters_applied: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<SkuValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarification: Option<SkuClarification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_applied: Option<DiscountNote>,
}

/// Executes a price search.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search against the live catalog.
    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchResult> {
        let client = RetailClient::new(&self.config)?;
        self.execute_with_client(&client, request).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl PricingFetch,
        request: &SearchRequest,
    ) -> Result<SearchResult> {
        run_search(client, request).await
    }
}

/// Core search routine, shared by the other commands.
pub(crate) async fn run_search(
    client: &impl PricingFetch,
    request: &SearchRequest,
) -> Result<SearchResult> {
    let filter = PriceFilter {
        service_name: request.service_name.clone(),
        service_family: request.service_family.clone(),
        region: request.region.clone(),
        sku_contains: request.sku_contains.clone(),
        price_type: request.price_type.clone(),
    };
    let filters_applied = filter.conditions();
    let query = PriceQuery::new(filter, request.currency.clone()).with_limit(request.limit);

    let response = client.fetch(&query).await?;
    let raw = response.items;
    let raw_count = raw.len();
    debug!("Catalog returned {} items", raw_count);

    let mut validation = None;
    let mut clarification = None;

    if request.validate_sku {
        if let Some(sku) = request.sku_contains.as_deref() {
            if raw_count > CLARIFICATION_THRESHOLD {
                let suggestions: Vec<String> = raw
                    .iter()
                    .map(|item| item.sku_name.clone())
                    .filter(|name| !name.is_empty())
                    .take(SUGGESTION_LIMIT)
                    .collect();
                clarification = Some(SkuClarification {
                    message: format!(
                        "Found {} SKUs matching '{}'. Consider being more specific.",
                        raw_count, sku
                    ),
                    suggestions,
                });
            } else if raw_count == 0 {
                validation = Some(suggest_similar_skus(client, request, sku).await?);
            }
        }
    }

    let mut items = raw;
    items.truncate(request.limit);

    let discount = request.discount.filter(|pct| *pct > 0.0);
    if let Some(pct) = discount {
        apply_discount(&mut items, pct);
    }

    let count = items.len();
    Ok(SearchResult {
        items,
        count,
        has_more: response.next_page_link.is_some(),
        currency: request.currency.clone(),
        filters_applied,
        validation,
        clarification,
        discount_applied: discount.map(DiscountNote::new),
    })
}

/// Scans the requested service for SKUs loosely matching the missing name.
async fn suggest_similar_skus(
    client: &impl PricingFetch,
    request: &SearchRequest,
    sku: &str,
) -> Result<SkuValidation> {
    let mut suggestions = Vec::new();

    if let Some(service) = request.service_name.as_deref() {
        let filter = PriceFilter {
            service_name: Some(service.to_string()),
            ..Default::default()
        };
        let query = PriceQuery::new(filter, request.currency.clone())
            .with_limit(VALIDATION_SCAN_LIMIT);
        let broad = client.fetch(&query).await?;

        let mut seen: Vec<String> = Vec::new();
        for item in &broad.items {
            if item.sku_name.is_empty() || seen.contains(&item.sku_name) {
                continue;
            }
            if loose_match(&item.sku_name, sku) {
                seen.push(item.sku_name.clone());
                suggestions.push(SkuSuggestion {
                    sku_name: item.sku_name.clone(),
                    product_name: item.product_name.clone(),
                    price: item.retail_price,
                    unit: item.unit_of_measure.clone(),
                    region: item.region.clone(),
                });
                if suggestions.len() >= SUGGESTION_LIMIT {
                    break;
                }
            }
        }
    }

    let message = match request.service_name.as_deref() {
        Some(service) => format!("SKU '{}' not found in service '{}'", sku, service),
        None => format!("SKU '{}' not found", sku),
    };

    Ok(SkuValidation {
        original_sku: sku.to_string(),
        found: false,
        message,
        suggestions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{record, response, test_config, MockCatalog};

    fn sku_request(sku: &str) -> SearchRequest {
        SearchRequest {
            service_name: Some("Virtual Machines".to_string()),
            sku_contains: Some(sku.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_basic() {
        let items = vec![record("D4s v5", "eastus", 0.192), record("D4s v5", "westus", 0.21)];
        let catalog = MockCatalog::new(vec![response(items)]);
        let cmd = SearchCommand::new(test_config());

        let result = cmd.execute_with_client(&catalog, &sku_request("D4s v5")).await.unwrap();

        assert_eq!(result.count, 2);
        assert!(!result.has_more);
        assert!(result.validation.is_none());
        assert!(result.clarification.is_none());
        assert!(result.discount_applied.is_none());
        assert_eq!(
            result.filters_applied,
            vec!["serviceName eq 'Virtual Machines'", "contains(skuName, 'D4s v5')"]
        );
    }

    #[tokio::test]
    async fn test_search_truncates_to_limit() {
        let items: Vec<_> = (0..8).map(|i| record("B1s", "eastus", 0.01 + i as f64)).collect();
        let catalog = MockCatalog::new(vec![response(items)]);
        let cmd = SearchCommand::new(test_config());

        let mut request = sku_request("B1s");
        request.limit = 3;
        request.validate_sku = false;
        let result = cmd.execute_with_client(&catalog, &request).await.unwrap();

        assert_eq!(result.count, 3);
        assert_eq!(result.items.len(), 3);
        // Upstream order is preserved through truncation.
        assert_eq!(result.items[0].retail_price, 0.01);
    }

    #[tokio::test]
    async fn test_search_has_more_from_next_page_link() {
        let mut envelope = response(vec![record("B1s", "eastus", 0.01)]);
        envelope.next_page_link = Some("https://example.test/next".to_string());
        let catalog = MockCatalog::new(vec![envelope]);
        let cmd = SearchCommand::new(test_config());

        let result = cmd.execute_with_client(&catalog, &sku_request("B1s")).await.unwrap();
        assert!(result.has_more);
    }

    #[tokio::test]
    async fn test_clarification_on_too_many_matches() {
        let items: Vec<_> =
            (0..15).map(|i| record(&format!("D{}s v5", i), "eastus", 0.1)).collect();
        let catalog = MockCatalog::new(vec![response(items)]);
        let cmd = SearchCommand::new(test_config());

        let result = cmd.execute_with_client(&catalog, &sku_request("D")).await.unwrap();

        let clarification = result.clarification.expect("clarification expected");
        assert_eq!(clarification.suggestions.len(), 5);
        assert_eq!(clarification.suggestions[0], "D0s v5");
        assert!(clarification.message.contains("15 SKUs"));
        assert!(result.validation.is_none());
        // Only the initial query; no broader scan for clarification.
        assert_eq!(catalog.query_count(), 1);
    }

    #[tokio::test]
    async fn test_clarification_counts_raw_results_not_truncated() {
        let items: Vec<_> =
            (0..12).map(|i| record(&format!("E{}s", i), "eastus", 0.1)).collect();
        let catalog = MockCatalog::new(vec![response(items)]);
        let cmd = SearchCommand::new(test_config());

        let mut request = sku_request("E");
        request.limit = 3;
        let result = cmd.execute_with_client(&catalog, &request).await.unwrap();

        assert_eq!(result.count, 3);
        let clarification = result.clarification.expect("clarification expected");
        assert!(clarification.message.contains("12 SKUs"));
        assert_eq!(clarification.suggestions.len(), 5);
    }

    #[tokio::test]
    async fn test_validation_suggests_similar_skus() {
        let broad = vec![
            record("D2s v3", "eastus", 0.096),
            record("D4s v3", "eastus", 0.192),
            record("F8s v2", "eastus", 0.34),
            record("D2s v3", "westus", 0.1), // duplicate SKU, must dedup
            record("D8s v3", "eastus", 0.384),
        ];
        let catalog = MockCatalog::new(vec![response(vec![]), response(broad)]);
        let cmd = SearchCommand::new(test_config());

        let result = cmd.execute_with_client(&catalog, &sku_request("D16s v3")).await.unwrap();

        assert_eq!(result.count, 0);
        let validation = result.validation.expect("validation expected");
        assert!(!validation.found);
        assert_eq!(validation.original_sku, "D16s v3");
        assert!(validation.message.contains("not found in service 'Virtual Machines'"));

        let names: Vec<_> =
            validation.suggestions.iter().map(|s| s.sku_name.as_str()).collect();
        assert_eq!(names, vec!["D2s v3", "D4s v3", "D8s v3"]);

        // Second query is the broader scan: no SKU filter, capped at 100.
        assert_eq!(catalog.query_count(), 2);
        let queries = catalog.queries();
        assert!(queries[1].filter.sku_contains.is_none());
        assert_eq!(queries[1].top, Some(100));
    }

    #[tokio::test]
    async fn test_validation_skipped_when_disabled() {
        let catalog = MockCatalog::new(vec![response(vec![])]);
        let cmd = SearchCommand::new(test_config());

        let mut request = sku_request("D16s v3");
        request.validate_sku = false;
        let result = cmd.execute_with_client(&catalog, &request).await.unwrap();

        assert!(result.validation.is_none());
        assert_eq!(catalog.query_count(), 1);
    }

    #[tokio::test]
    async fn test_validation_skipped_without_sku_filter() {
        let catalog = MockCatalog::new(vec![response(vec![])]);
        let cmd = SearchCommand::new(test_config());

        let request = SearchRequest {
            service_name: Some("Virtual Machines".to_string()),
            ..Default::default()
        };
        let result = cmd.execute_with_client(&catalog, &request).await.unwrap();

        assert!(result.validation.is_none());
        assert!(result.clarification.is_none());
        assert_eq!(catalog.query_count(), 1);
    }

    #[tokio::test]
    async fn test_search_applies_discount() {
        let items = vec![record("D4s v5", "eastus", 0.2)];
        let catalog = MockCatalog::new(vec![response(items)]);
        let cmd = SearchCommand::new(test_config());

        let mut request = sku_request("D4s v5");
        request.discount = Some(10.0);
        let result = cmd.execute_with_client(&catalog, &request).await.unwrap();

        assert_eq!(result.items[0].retail_price, 0.18);
        assert_eq!(result.items[0].original_price, Some(0.2));
        let note = result.discount_applied.expect("discount note expected");
        assert_eq!(note.percentage, 10.0);
    }

    #[tokio::test]
    async fn test_search_ignores_non_positive_discount() {
        let items = vec![record("D4s v5", "eastus", 0.2)];
        let catalog = MockCatalog::new(vec![response(items)]);
        let cmd = SearchCommand::new(test_config());

        let mut request = sku_request("D4s v5");
        request.discount = Some(0.0);
        let result = cmd.execute_with_client(&catalog, &request).await.unwrap();

        assert_eq!(result.items[0].retail_price, 0.2);
        assert!(result.discount_applied.is_none());
    }
}
