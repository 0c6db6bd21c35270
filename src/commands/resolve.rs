//! Free-text service-name resolution against the catalog.

use crate::azure::client::{PricingFetch, RetailClient};
use crate::azure::models::PriceRecord;
use crate::azure::services::{exact_lookup, partial_lookup};
use crate::azure::sku::loose_match;
use crate::commands::search::{run_search, SearchRequest};
use crate::config::Config;
use crate::error::Result;
use serde::Serialize;
use tracing::debug;

/// Result cap when probing a partially-matched canonical name.
const PARTIAL_PROBE_LIMIT: usize = 5;
/// Sample items attached to a partial-match suggestion.
const PARTIAL_SAMPLE_COUNT: usize = 3;
/// Result cap for the family-scoped broad scan.
const BROAD_SCAN_LIMIT: usize = 100;
/// Result cap when re-probing a service found by the broad scan.
const BROAD_PROBE_LIMIT: usize = 3;
/// Sample items attached to a broad-scan suggestion.
const BROAD_SAMPLE_COUNT: usize = 2;
/// Distinct services considered from the broad scan.
const BROAD_SERVICE_LIMIT: usize = 5;

/// How the hint was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactMapping,
    SuggestionsOnly,
}

/// A confirmed service that might be what the caller meant.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceSuggestion {
    pub service_name: String,
    pub match_reason: String,
    pub sample_items: Vec<PriceRecord>,
}

/// Outcome of resolving a free-text service hint.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceResolution {
    pub original_hint: String,
    pub match_type: MatchType,
    /// Canonical name, set only for an exact mapping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Sample records for an exact mapping.
    pub items: Vec<PriceRecord>,
    pub suggestions: Vec<ServiceSuggestion>,
}

/// Maps free-text service hints to canonical catalog names.
pub struct ResolveCommand {
    config: Config,
}

impl ResolveCommand {
    /// Creates a new resolve command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the resolution against the live catalog.
    pub async fn execute(
        &self,
        hint: &str,
        service_family: Option<&str>,
    ) -> Result<ServiceResolution> {
        let client = RetailClient::new(&self.config)?;
        self.execute_with_client(&client, hint, service_family).await
    }

    /// Runs the resolution with a provided client (for testing).
    ///
    /// Strategies escalate and short-circuit: exact mapping, then partial
    /// mapping, then a family-scoped broad scan.
    pub async fn execute_with_client(
        &self,
        client: &impl PricingFetch,
        hint: &str,
        service_family: Option<&str>,
    ) -> Result<ServiceResolution> {
        // Strategy 1: exact hint mapping, confirmed by a probe.
        if let Some(canonical) = exact_lookup(hint) {
            let result = self.probe(client, canonical, self.config.max_results).await?;
            if !result.is_empty() {
                debug!("Hint '{}' mapped exactly to '{}'", hint, canonical);
                return Ok(ServiceResolution {
                    original_hint: hint.to_string(),
                    match_type: MatchType::ExactMapping,
                    service_name: Some(canonical.to_string()),
                    items: result,
                    suggestions: Vec::new(),
                });
            }
        }

        // Strategy 2: hint overlaps a mapping key.
        let mut suggestions = Vec::new();
        for canonical in partial_lookup(hint) {
            let items = self.probe(client, canonical, PARTIAL_PROBE_LIMIT).await?;
            if !items.is_empty() {
                suggestions.push(ServiceSuggestion {
                    service_name: canonical.to_string(),
                    match_reason: format!("partial match for '{}'", hint),
                    sample_items: items.into_iter().take(PARTIAL_SAMPLE_COUNT).collect(),
                });
            }
        }

        // Strategy 3: scan whatever the family offers for name overlap.
        if suggestions.is_empty() {
            suggestions = self.broad_scan(client, hint, service_family).await?;
        }

        Ok(ServiceResolution {
            original_hint: hint.to_string(),
            match_type: MatchType::SuggestionsOnly,
            service_name: None,
            items: Vec::new(),
            suggestions,
        })
    }

    /// Confirms a canonical name by fetching a few of its records.
    async fn probe(
        &self,
        client: &impl PricingFetch,
        service_name: &str,
        limit: usize,
    ) -> Result<Vec<PriceRecord>> {
        let request = SearchRequest {
            service_name: Some(service_name.to_string()),
            currency: self.config.currency.clone(),
            limit,
            validate_sku: false,
            ..Default::default()
        };
        Ok(run_search(client, &request).await?.items)
    }

    /// Scans service and product names across a family for the hint.
    async fn broad_scan(
        &self,
        client: &impl PricingFetch,
        hint: &str,
        service_family: Option<&str>,
    ) -> Result<Vec<ServiceSuggestion>> {
        let request = SearchRequest {
            service_family: service_family.map(String::from),
            currency: self.config.currency.clone(),
            limit: BROAD_SCAN_LIMIT,
            validate_sku: false,
            ..Default::default()
        };
        let broad = run_search(client, &request).await?;

        let mut candidates: Vec<String> = Vec::new();
        for item in &broad.items {
            if item.service_name.is_empty() || candidates.contains(&item.service_name) {
                continue;
            }
            if loose_match(&item.service_name, hint) || loose_match(&item.product_name, hint) {
                candidates.push(item.service_name.clone());
                if candidates.len() >= BROAD_SERVICE_LIMIT {
                    break;
                }
            }
        }

        let mut suggestions = Vec::new();
        for service in candidates {
            let items = self.probe(client, &service, BROAD_PROBE_LIMIT).await?;
            if !items.is_empty() {
                suggestions.push(ServiceSuggestion {
                    service_name: service,
                    match_reason: format!("contains '{}'", hint.to_lowercase()),
                    sample_items: items.into_iter().take(BROAD_SAMPLE_COUNT).collect(),
                });
            }
        }

        Ok(suggestions)
    }
}
