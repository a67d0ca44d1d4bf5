//! Inventory fetching against the Resource Graph backend

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::{GraphQueryRequest, ResourceGraphApi};
use crate::error::{AdvisorError, Result};

/// Fetch every row matching `query` and decode each into `T`.
///
/// The backend may page internally; all pages are concatenated before
/// decoding, and row order is the backend return order. Each row is decoded
/// independently, but a single row that fails to decode fails the whole
/// call — callers never see partial results.
pub async fn fetch_resources<T>(
    graph: &dyn ResourceGraphApi,
    subscription_id: &str,
    query: String,
) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    debug!(%query, "running graph query");
    let request = GraphQueryRequest::new(subscription_id, query);
    let rows = graph.resources(&request).await?;
    debug!(rows = rows.len(), "decoding graph rows");

    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|source| AdvisorError::Decode {
                target: std::any::type_name::<T>(),
                source,
            })
        })
        .collect()
}
