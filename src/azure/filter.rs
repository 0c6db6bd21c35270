//! Query construction for the retail prices endpoint.

/// Upstream cap on items per request; `$top` above this is pointless.
pub const MAX_RESULTS_PER_REQUEST: usize = 1000;

/// Filter predicates understood by the catalog, combined conjunctively.
#[derive(Debug, Clone, Default)]
pub struct PriceFilter {
    pub service_name: Option<String>,
    pub service_family: Option<String>,
    pub region: Option<String>,
    /// Substring match against SKU names (`contains` predicate).
    pub sku_contains: Option<String>,
    pub price_type: Option<String>,
}

impl PriceFilter {
    /// Renders the individual `$filter` conditions, in a fixed order.
    pub fn conditions(&self) -> Vec<String> {
        let mut conditions = Vec::new();

        if let Some(service) = &self.service_name {
            conditions.push(format!("serviceName eq '{}'", service));
        }
        if let Some(family) = &self.service_family {
            conditions.push(format!("serviceFamily eq '{}'", family));
        }
        if let Some(region) = &self.region {
            conditions.push(format!("armRegionName eq '{}'", region));
        }
        if let Some(sku) = &self.sku_contains {
            conditions.push(format!("contains(skuName, '{}')", sku));
        }
        if let Some(price_type) = &self.price_type {
            conditions.push(format!("priceType eq '{}'", price_type));
        }

        conditions
    }

    /// Returns true when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.conditions().is_empty()
    }
}

/// A fully-specified catalog query: filter, currency, and result cap.
#[derive(Debug, Clone)]
pub struct PriceQuery {
    pub filter: PriceFilter,
    pub currency: String,
    pub top: Option<usize>,
}

impl PriceQuery {
    /// Creates an uncapped query.
    pub fn new(filter: PriceFilter, currency: impl Into<String>) -> Self {
        Self { filter, currency: currency.into(), top: None }
    }

    /// Caps the result count. Limits at or above the upstream per-request cap
    /// are left to the server default.
    pub fn with_limit(mut self, limit: usize) -> Self {
        if limit < MAX_RESULTS_PER_REQUEST {
            self.top = Some(limit);
        }
        self
    }

    /// Renders the URL query string for this request.
    pub fn query_string(&self, api_version: &str) -> String {
        let mut query = format!(
            "api-version={}&currencyCode={}",
            urlencoding::encode(api_version),
            urlencoding::encode(&self.currency)
        );

        let conditions = self.filter.conditions();
        if !conditions.is_empty() {
            query.push_str("&$filter=");
            query.push_str(&urlencoding::encode(&conditions.join(" and ")));
        }
        if let Some(top) = self.top {
            query.push_str(&format!("&$top={}", top));
        }

        query
    }
}
