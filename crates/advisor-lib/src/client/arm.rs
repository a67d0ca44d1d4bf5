//! ARM REST implementations of the backend traits

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::types::{GraphQueryRequest, GraphQueryResponse, MetricsQuery, MetricsResponse};
use super::{MetricsApi, ResourceGraphApi};
use crate::error::{AdvisorError, Result};

/// Public cloud ARM endpoint.
const DEFAULT_ENDPOINT: &str = "https://management.azure.com";
/// Resource Graph API version.
const GRAPH_API_VERSION: &str = "2021-03-01";
/// Metrics API version.
const METRICS_API_VERSION: &str = "2018-01-01";
/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for the Resource Graph and Metrics endpoints.
///
/// Takes a pre-acquired bearer token; acquiring one is the credential
/// layer's job, not this crate's.
pub struct ArmClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl ArmClient {
    /// Client against the public ARM endpoint.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(token, DEFAULT_ENDPOINT)
    }

    /// Client against a custom endpoint (sovereign clouds, tests).
    pub fn with_endpoint(token: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| AdvisorError::Transport {
                operation: "http client setup",
                source,
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Client authenticated from the `AZURE_ACCESS_TOKEN` environment
    /// variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("AZURE_ACCESS_TOKEN").map_err(|_| {
            AdvisorError::Configuration("AZURE_ACCESS_TOKEN is not set".to_string())
        })?;
        Self::new(token)
    }
}

#[async_trait]
impl ResourceGraphApi for ArmClient {
    async fn resources(&self, request: &GraphQueryRequest) -> Result<Vec<serde_json::Value>> {
        const OPERATION: &str = "resource graph query";

        let url = format!(
            "{}/providers/Microsoft.ResourceGraph/resources?api-version={}",
            self.endpoint, GRAPH_API_VERSION
        );

        let mut rows = Vec::new();
        let mut page = request.clone();

        // The backend pages through $skipToken; callers see one flat row set.
        loop {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.token)
                .json(&page)
                .send()
                .await
                .map_err(|source| AdvisorError::Transport {
                    operation: OPERATION,
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AdvisorError::Api {
                    operation: OPERATION,
                    status: status.as_u16(),
                    body,
                });
            }

            let body: GraphQueryResponse =
                response.json().await.map_err(|source| AdvisorError::Transport {
                    operation: OPERATION,
                    source,
                })?;

            debug!(rows = body.data.len(), total = body.total_records, "graph page received");
            rows.extend(body.data);

            match body.skip_token {
                Some(token) if !token.is_empty() => page.options.skip_token = Some(token),
                _ => break,
            }
        }

        Ok(rows)
    }
}

#[async_trait]
impl MetricsApi for ArmClient {
    async fn list_metrics(&self, query: &MetricsQuery) -> Result<MetricsResponse> {
        const OPERATION: &str = "metrics list";

        let url = format!(
            "{}{}/providers/Microsoft.Insights/metrics",
            self.endpoint, query.resource_uri
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[
                ("api-version", METRICS_API_VERSION),
                ("timespan", query.timespan.as_str()),
                ("interval", query.interval.as_str()),
                ("metricnames", query.metric_names.as_str()),
                ("aggregation", query.aggregation.as_str()),
            ])
            .send()
            .await
            .map_err(|source| AdvisorError::Transport {
                operation: OPERATION,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Api {
                operation: OPERATION,
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|source| AdvisorError::Transport {
            operation: OPERATION,
            source,
        })
    }
}
