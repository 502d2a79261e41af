//! Pyth Hermes REST client.
//!
//! Uses the `/v2/updates/price/latest` endpoint with hex encoding. The
//! binary section is the resolution evidence handed to the ledger; the
//! parsed section backs price quotes and the coverage check.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::response::LatestUpdatesResponse;
use super::settings::HermesConfig;
use crate::domain::{FeedId, ResolutionEvidence};
use crate::error::OracleError;
use crate::port::{PriceOracle, PriceQuote};

/// HTTP client for the Hermes price service.
///
/// Nothing is cached: each call fetches freshly signed updates.
pub struct HermesClient {
    http: HttpClient,
    base_url: String,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl HermesClient {
    /// Create a client for `base_url` with default HTTP settings and no retries.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &HermesConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.hermes_url.trim_end_matches('/').to_string(),
            retry_max_attempts: config.http.retry_max_attempts,
            retry_backoff_ms: config.http.retry_backoff_ms,
        }
    }

    /// Fetch the latest updates for a de-duplicated set of feeds.
    async fn fetch_latest(
        &self,
        feeds: &[FeedId],
    ) -> Result<(Vec<FeedId>, LatestUpdatesResponse), OracleError> {
        let feeds: Vec<FeedId> = feeds
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if feeds.is_empty() {
            return Err(OracleError::NoFeeds);
        }

        let mut query: Vec<(&str, String)> =
            feeds.iter().map(|feed| ("ids[]", feed.to_hex())).collect();
        query.push(("encoding", "hex".to_string()));
        query.push(("parsed", "true".to_string()));

        let url = format!("{}/v2/updates/price/latest", self.base_url);
        let response: LatestUpdatesResponse = self.get_with_retry(&url, &query).await?;
        response.ensure_covers(&feeds)?;
        Ok((feeds, response))
    }

    async fn get_with_retry(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<LatestUpdatesResponse, OracleError> {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = match self.http.get(url).query(query).send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(OracleError::Unreachable(err.to_string()));
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                return Err(OracleError::Status {
                    status: status.as_u16(),
                });
            }

            match response.json::<LatestUpdatesResponse>().await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(OracleError::Malformed(err.to_string()));
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "Hermes request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }
}

#[async_trait]
impl PriceOracle for HermesClient {
    async fn fetch_update_evidence(
        &self,
        feeds: &[FeedId],
    ) -> Result<ResolutionEvidence, OracleError> {
        let (feeds, response) = self.fetch_latest(feeds).await?;
        let updates = response.decode_updates()?;
        debug!(feeds = feeds.len(), updates = updates.len(), "Fetched Hermes updates");
        Ok(ResolutionEvidence::new(feeds, updates))
    }

    async fn latest_prices(&self, feeds: &[FeedId]) -> Result<Vec<PriceQuote>, OracleError> {
        let (_, response) = self.fetch_latest(feeds).await?;
        response.quotes()
    }

    fn oracle_name(&self) -> &'static str {
        "Pyth Hermes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ETH_USD: &str = "ff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace";

    fn eth_usd() -> FeedId {
        ETH_USD.parse().unwrap()
    }

    fn body() -> serde_json::Value {
        serde_json::json!({
            "binary": { "encoding": "hex", "data": ["504e4155"] },
            "parsed": [{
                "id": ETH_USD,
                "price": { "price": "350000000000", "conf": "100000000", "expo": -8, "publish_time": 1_717_000_000 }
            }]
        })
    }

    #[tokio::test]
    async fn fetches_evidence_for_requested_feeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/updates/price/latest"))
            .and(query_param("ids[]", ETH_USD))
            .and(query_param("encoding", "hex"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = HermesClient::new(server.uri());
        let evidence = client
            .fetch_update_evidence(&[eth_usd(), eth_usd()])
            .await
            .unwrap();

        assert_eq!(evidence.feeds(), &[eth_usd()]);
        assert_eq!(evidence.updates(), &[vec![0x50, 0x4e, 0x41, 0x55]]);
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/updates/price/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = HermesClient::new(format!("{}/", server.uri()));
        let evidence = client.fetch_update_evidence(&[eth_usd()]).await.unwrap();
        assert_eq!(evidence.len(), 1);
    }

    #[tokio::test]
    async fn every_call_fetches_again() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/updates/price/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .expect(2)
            .mount(&server)
            .await;

        let client = HermesClient::new(server.uri());
        client.fetch_update_evidence(&[eth_usd()]).await.unwrap();
        client.fetch_update_evidence(&[eth_usd()]).await.unwrap();
    }

    #[tokio::test]
    async fn server_error_is_reported_as_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/updates/price/latest"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = HermesClient::new(server.uri());
        let err = client.fetch_update_evidence(&[eth_usd()]).await.unwrap_err();
        assert_eq!(err, OracleError::Status { status: 503 });
    }

    #[tokio::test]
    async fn unreachable_service_is_reported() {
        let client = HermesClient::new("http://127.0.0.1:9");
        let err = client.fetch_update_evidence(&[eth_usd()]).await.unwrap_err();
        assert!(matches!(err, OracleError::Unreachable(_)));
    }

    #[tokio::test]
    async fn quotes_decode_parsed_prices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/updates/price/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .mount(&server)
            .await;

        let client = HermesClient::new(server.uri());
        let quotes = client.latest_prices(&[eth_usd()]).await.unwrap();
        assert_eq!(quotes[0].price, rust_decimal_macros::dec!(3500));
    }

    #[tokio::test]
    async fn no_feeds_is_rejected_without_a_request() {
        let client = HermesClient::new("http://127.0.0.1:9");
        assert_eq!(
            client.fetch_update_evidence(&[]).await.unwrap_err(),
            OracleError::NoFeeds
        );
    }
}
