//! HTTP client for the Azure Retail Prices API.

use crate::azure::filter::PriceQuery;
use crate::azure::models::PriceResponse;
use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;

/// Trait for catalog price fetching - enables mocking for tests.
#[async_trait]
pub trait PricingFetch: Send + Sync {
    /// Runs one catalog query, retrying rate-limited responses.
    async fn fetch(&self, query: &PriceQuery) -> Result<PriceResponse>;
}

/// Retail prices client with linear-backoff retry on HTTP 429.
///
/// One client per caller session: the connection pool is acquired on
/// construction, shared by every nested call, and released on drop.
pub struct RetailClient {
    client: Client,
    endpoint: String,
    api_version: String,
    max_retries: u32,
    retry_base_wait: Duration,
}

impl RetailClient {
    /// Creates a new client from the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
            api_version: config.api_version.clone(),
            max_retries: config.max_retries,
            retry_base_wait: Duration::from_millis(config.retry_base_wait_ms),
        })
    }

    /// Performs a single GET and decodes the envelope.
    async fn get_once(&self, url: &str) -> Result<PriceResponse> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 429 {
            return Err(Error::RateLimited { status: 429 });
        }
        if !status.is_success() {
            return Err(Error::Upstream { status: status.as_u16() });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PricingFetch for RetailClient {
    async fn fetch(&self, query: &PriceQuery) -> Result<PriceResponse> {
        let url = format!("{}?{}", self.endpoint, query.query_string(&self.api_version));

        let mut attempt: u32 = 0;
        loop {
            match self.get_once(&url).await {
                Err(Error::RateLimited { .. }) if attempt < self.max_retries => {
                    let wait = self.retry_base_wait * (attempt + 1);
                    warn!(
                        "Rate limited (429). Retrying in {:?} (attempt {}/{})",
                        wait,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(Error::RateLimited { status }) => {
                    warn!("Rate limit retries exhausted after {} attempts", attempt + 1);
                    return Err(Error::Upstream { status });
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::filter::PriceFilter;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config(endpoint: String) -> Config {
        Config {
            endpoint,
            retry_base_wait_ms: 0, // no waiting in tests
            ..Config::default()
        }
    }

    fn vm_query() -> PriceQuery {
        let filter = PriceFilter {
            service_name: Some("Virtual Machines".to_string()),
            ..Default::default()
        };
        PriceQuery::new(filter, "USD").with_limit(5)
    }

    fn items_body() -> String {
        r#"{
            "Items": [{
                "serviceName": "Virtual Machines",
                "skuName": "D4s v5",
                "armRegionName": "eastus",
                "location": "East US",
                "retailPrice": 0.192,
                "unitOfMeasure": "1 Hour",
                "type": "Consumption",
                "meterName": "D4s v5"
            }],
            "NextPageLink": null,
            "Count": 1
        }"#
        .to_string()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(items_body()))
            .mount(&server)
            .await;

        let client = RetailClient::new(&make_test_config(server.uri())).unwrap();
        let response = client.fetch(&vm_query()).await.unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].region, "eastus");
        assert_eq!(response.items[0].price_type, "Consumption");
        assert!(response.next_page_link.is_none());
    }

    #[tokio::test]
    async fn test_fetch_sends_query_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("api-version", "2023-01-01-preview"))
            .and(query_param("currencyCode", "USD"))
            .and(query_param("$filter", "serviceName eq 'Virtual Machines'"))
            .and(query_param("$top", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_string(items_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = RetailClient::new(&make_test_config(server.uri())).unwrap();
        let response = client.fetch(&vm_query()).await.unwrap();
        assert_eq!(response.items.len(), 1);
    }

    #[tokio::test]
    async fn test_retry_after_rate_limit() {
        let server = MockServer::start().await;

        // First request is rate limited, the retry succeeds.
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(items_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = RetailClient::new(&make_test_config(server.uri())).unwrap();
        let response = client.fetch(&vm_query()).await.unwrap();
        assert_eq!(response.items.len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_retries_exhausted() {
        let server = MockServer::start().await;

        // Default config retries 3 times: 4 total attempts, all 429.
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(429))
            .expect(4)
            .mount(&server)
            .await;

        let client = RetailClient::new(&make_test_config(server.uri())).unwrap();
        let err = client.fetch(&vm_query()).await.unwrap_err();

        match err {
            Error::Upstream { status } => assert_eq!(status, 429),
            other => panic!("expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_error_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = RetailClient::new(&make_test_config(server.uri())).unwrap();
        let err = client.fetch(&vm_query()).await.unwrap_err();

        match err {
            Error::Upstream { status } => assert_eq!(status, 500),
            other => panic!("expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_found_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = RetailClient::new(&make_test_config(server.uri())).unwrap();
        let err = client.fetch(&vm_query()).await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: 404 }));
    }

    #[tokio::test]
    async fn test_invalid_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = RetailClient::new(&make_test_config(server.uri())).unwrap();
        let err = client.fetch(&vm_query()).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_empty_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let client = RetailClient::new(&make_test_config(server.uri())).unwrap();
        let response = client.fetch(&vm_query()).await.unwrap();
        assert!(response.is_empty());
    }
}
