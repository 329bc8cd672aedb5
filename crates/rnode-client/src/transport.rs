//! HTTP transport for RNode exploratory deploys.

use anyhow::Context;
use reqwest::Client;
use rev_verify_core::{QueryDescriptor, QueryError, QueryTransport, RawResponse};
use std::time::Duration;

/// Longest part of an error body carried into a transport error.
const MAX_ERROR_BODY: usize = 200;

/// Build the exploratory-deploy URL for an RNode HTTP endpoint.
pub fn explore_deploy_url(endpoint: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    let base = base.strip_suffix("/api").unwrap_or(base);
    format!("{base}/api/explore-deploy")
}

/// Sends terms to `/api/explore-deploy`. One client is shared by all
/// concurrent queries.
#[derive(Debug, Clone)]
pub struct RNodeHttpTransport {
    client: Client,
    url: String,
}

impl RNodeHttpTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build RNode HTTP client")?;
        let url = explore_deploy_url(endpoint);
        tracing::debug!("Using RNode exploratory deploy endpoint {url}");
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl QueryTransport for RNodeHttpTransport {
    async fn submit_query(&self, query: &QueryDescriptor) -> Result<RawResponse, QueryError> {
        // The API expects the term as a JSON string body.
        let response = self
            .client
            .post(&self.url)
            .json(&query.payload)
            .send()
            .await
            .map_err(|e| QueryError::transport(format!("request to {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(QueryError::transport(format!(
                "{} returned status {status}: {body}",
                self.url
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| QueryError::malformed(format!("response is not JSON: {e}")))?;
        Ok(RawResponse::new(body))
    }
}
