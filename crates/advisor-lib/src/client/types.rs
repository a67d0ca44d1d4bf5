//! Wire types for the two ARM backends

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One Resource Graph query request.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQueryRequest {
    pub subscriptions: Vec<String>,
    pub query: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<FacetRequest>,
    pub options: GraphQueryOptions,
}

impl GraphQueryRequest {
    /// Request returning rows as an object array, with no facets.
    pub fn new(subscription_id: &str, query: String) -> Self {
        Self {
            subscriptions: vec![subscription_id.to_string()],
            query,
            facets: Vec::new(),
            options: GraphQueryOptions::default(),
        }
    }

    /// Attach facet expressions evaluated server-side alongside the query.
    pub fn with_facets(mut self, facets: Vec<FacetRequest>) -> Self {
        self.facets = facets;
        self
    }
}

/// Facet expression evaluated server-side alongside the query.
#[derive(Debug, Clone, Serialize)]
pub struct FacetRequest {
    pub expression: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphQueryOptions {
    #[serde(rename = "resultFormat")]
    pub result_format: String,
    #[serde(rename = "$skipToken", skip_serializing_if = "Option::is_none")]
    pub skip_token: Option<String>,
}

impl Default for GraphQueryOptions {
    fn default() -> Self {
        Self {
            result_format: "objectArray".to_string(),
            skip_token: None,
        }
    }
}

/// One page of graph results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQueryResponse {
    #[serde(rename = "totalRecords", default)]
    pub total_records: i64,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(rename = "$skipToken", default)]
    pub skip_token: Option<String>,
}

/// Parameters of one metrics list call.
#[derive(Debug, Clone)]
pub struct MetricsQuery {
    /// Full ARM resource URI the series are keyed by.
    pub resource_uri: String,
    /// `start/end` RFC 3339 timespan, half-open UTC window.
    pub timespan: String,
    /// ISO 8601 sampling interval.
    pub interval: String,
    /// Comma-joined metric names.
    pub metric_names: String,
    /// Aggregation kind requested from the backend.
    pub aggregation: String,
}

/// Metrics backend response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub value: Vec<Metric>,
}

/// One metric with its time series.
#[derive(Debug, Clone, Deserialize)]
pub struct Metric {
    pub name: LocalizedValue,
    #[serde(default)]
    pub timeseries: Vec<TimeseriesElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedValue {
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeseriesElement {
    #[serde(default)]
    pub data: Vec<MetricValue>,
}

/// One aggregated data point.
///
/// The backend only populates the field matching the requested aggregation
/// kind; the rest stay `None`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MetricValue {
    #[serde(rename = "timeStamp", default)]
    pub time_stamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub count: Option<f64>,
}
