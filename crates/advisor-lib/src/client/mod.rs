//! Transport boundary for the Resource Graph and Metrics backends
//!
//! The pipeline talks to Azure through two narrow async traits so every
//! stage can be exercised against stub backends in tests. [`ArmClient`]
//! implements both over the ARM REST endpoints with a pre-acquired bearer
//! token; credential acquisition itself stays outside this crate.

mod arm;
mod types;

#[cfg(test)]
mod tests;

pub use arm::ArmClient;
pub use types::{
    FacetRequest, GraphQueryOptions, GraphQueryRequest, GraphQueryResponse, LocalizedValue,
    Metric, MetricValue, MetricsQuery, MetricsResponse, TimeseriesElement,
};

use async_trait::async_trait;

use crate::error::Result;

/// Query interface of the Resource Graph backend.
#[async_trait]
pub trait ResourceGraphApi: Send + Sync {
    /// Run one graph query and return every matching row, all pages
    /// concatenated in backend return order.
    async fn resources(&self, request: &GraphQueryRequest) -> Result<Vec<serde_json::Value>>;
}

/// Query interface of the Metrics backend.
///
/// The backend enforces a hard ceiling of 20 metric names per call; callers
/// batch accordingly before getting here.
#[async_trait]
pub trait MetricsApi: Send + Sync {
    /// Fetch aggregated time series for one resource.
    async fn list_metrics(&self, query: &MetricsQuery) -> Result<MetricsResponse>;
}
