//! Bounded-concurrency enrichment engine

use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::classify::{classify, Verdict};
use crate::client::MetricsApi;
use crate::error::{AdvisorError, Result};
use crate::metrics::{fetch_metric_data, Aggregation, MetricDataRequest};
use crate::models::MetricSeries;

/// A resource the engine can derive metric coordinates from.
pub trait MeteredResource: Clone + Send + Sync + 'static {
    /// Globally unique resource identifier.
    fn resource_id(&self) -> &str;
    /// Resource group the resource lives in.
    fn resource_group(&self) -> &str;
    /// Resource name within its group.
    fn name(&self) -> &str;
}

/// What to fetch and how to judge it, shared by every task of one run.
#[derive(Debug, Clone)]
pub struct EnrichmentPlan {
    /// Resource provider namespace of the target resources.
    pub namespace: &'static str,
    /// Metric names to request.
    pub metric_names: Vec<String>,
    /// Metric whose presence decides the verdict.
    pub primary_metric: String,
    pub aggregation: Aggregation,
    /// Trailing window length in hours.
    pub window_hours: i64,
}

/// One resource with its fetched series and derived verdict.
#[derive(Debug, Clone)]
pub struct Enriched<T> {
    pub resource: T,
    pub series: MetricSeries,
    pub verdict: Verdict,
    /// Mean of the primary metric's samples, when any exist.
    pub mean: Option<f64>,
}

/// Everything one engine run produced: results in task-completion order
/// plus every error any task raised. A failed task contributes no results,
/// and no task's error is dropped.
#[derive(Debug)]
pub struct EnrichmentOutcome<T> {
    pub results: Vec<Enriched<T>>,
    pub errors: Vec<AdvisorError>,
}

impl<T> EnrichmentOutcome<T> {
    /// Fail-together collapse: all results when no task failed, otherwise
    /// the first error — raised only after the whole batch has completed.
    pub fn into_result(mut self) -> Result<Vec<Enriched<T>>> {
        if self.errors.is_empty() {
            Ok(self.results)
        } else {
            Err(self.errors.remove(0))
        }
    }
}

/// Enrich every resource under a global concurrency cap.
///
/// Launches one task per resource; admission is gated by a semaphore so at
/// most `concurrency` metric fetches are in flight at any instant. All
/// tasks run to completion — a failing task never cancels its siblings —
/// and results are appended to a single mutex-guarded collection in
/// completion order. Callers that need deterministic output sort by
/// resource id afterwards.
pub async fn enrich_all<T>(
    metrics: Arc<dyn MetricsApi>,
    subscription_id: &str,
    resources: Vec<T>,
    plan: &EnrichmentPlan,
    concurrency: usize,
) -> Result<EnrichmentOutcome<T>>
where
    T: MeteredResource,
{
    if concurrency == 0 {
        return Err(AdvisorError::Configuration(
            "enrichment concurrency must be positive".to_string(),
        ));
    }

    info!(
        resources = resources.len(),
        concurrency,
        namespace = plan.namespace,
        "starting enrichment run"
    );

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let results = Arc::new(Mutex::new(Vec::with_capacity(resources.len())));
    let mut tasks = JoinSet::new();

    for resource in resources {
        let semaphore = Arc::clone(&semaphore);
        let results = Arc::clone(&results);
        let metrics = Arc::clone(&metrics);
        let plan = plan.clone();
        let subscription_id = subscription_id.to_string();

        tasks.spawn(async move {
            // The semaphore is never closed; acquisition fails only if the
            // run itself is torn down.
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| AdvisorError::Internal(e.to_string()))?;

            debug!(resource = %resource.name(), "fetching metrics");
            let request = MetricDataRequest {
                subscription_id,
                resource_group: resource.resource_group().to_string(),
                namespace: plan.namespace.to_string(),
                resource: resource.name().to_string(),
                metric_names: plan.metric_names.clone(),
                aggregation: plan.aggregation,
                window_hours: plan.window_hours,
            };
            let series = match fetch_metric_data(metrics.as_ref(), &request).await {
                Ok(series) => series,
                Err(err) => {
                    warn!(resource = %resource.resource_id(), error = %err, "metric fetch failed");
                    return Err(err);
                }
            };

            let verdict = classify(&series, &plan.primary_metric);
            let mean = series.mean(&plan.primary_metric);

            results.lock().await.push(Enriched {
                resource,
                series,
                verdict,
                mean,
            });
            Ok::<(), AdvisorError>(())
        });
    }

    // Join barrier: every task finishes before any error is reported.
    let mut errors = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => errors.push(err),
            Err(join_err) => {
                warn!(error = %join_err, "enrichment task panicked");
                errors.push(AdvisorError::Internal(join_err.to_string()));
            }
        }
    }

    let results = Arc::try_unwrap(results)
        .map_err(|_| AdvisorError::Internal("result accumulator still shared".to_string()))?
        .into_inner();

    Ok(EnrichmentOutcome { results, errors })
}
