//! Metric data fetching against the Metrics backend

use chrono::{Duration, SecondsFormat, Utc};
use tracing::debug;

use crate::chunk::chunked;
use crate::client::{MetricValue, MetricsApi, MetricsQuery};
use crate::error::Result;
use crate::models::{MetricSample, MetricSeries};

/// Hard backend ceiling on metric names per metrics call. Not tunable.
pub const METRIC_NAMES_PER_REQUEST: usize = 20;

/// Fixed sampling interval for aggregated series.
const SAMPLING_INTERVAL: &str = "PT24H";

/// Statistical reduction applied to raw telemetry before return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Average,
    Total,
    Maximum,
    Minimum,
    Count,
}

impl Aggregation {
    /// Wire name of the aggregation kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::Average => "Average",
            Aggregation::Total => "Total",
            Aggregation::Maximum => "Maximum",
            Aggregation::Minimum => "Minimum",
            Aggregation::Count => "Count",
        }
    }

    /// Read the field matching this aggregation kind from a data point.
    pub fn value_of(self, point: &MetricValue) -> Option<f64> {
        match self {
            Aggregation::Average => point.average,
            Aggregation::Total => point.total,
            Aggregation::Maximum => point.maximum,
            Aggregation::Minimum => point.minimum,
            Aggregation::Count => point.count,
        }
    }
}

/// Parameters for one resource's metric fetch.
#[derive(Debug, Clone)]
pub struct MetricDataRequest {
    pub subscription_id: String,
    pub resource_group: String,
    /// Resource provider namespace, e.g. `microsoft.compute/virtualmachines`.
    pub namespace: String,
    pub resource: String,
    /// Requested metric names, ordered and deduplicated by the caller.
    pub metric_names: Vec<String>,
    pub aggregation: Aggregation,
    /// Trailing window length in hours.
    pub window_hours: i64,
}

impl MetricDataRequest {
    /// ARM URI of the target resource. Derived per call, never stored.
    pub fn resource_uri(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}",
            self.subscription_id, self.resource_group, self.namespace, self.resource
        )
    }
}

/// Fetch aggregated series for one resource over its trailing window.
///
/// The window is `[now_utc - window_hours, now_utc]`. Metric names are
/// partitioned into groups of at most [`METRIC_NAMES_PER_REQUEST`], one
/// backend call per group. Data points missing a timestamp or the requested
/// aggregation field are dropped as "no sample", not an error; a backend
/// failure for any group aborts the whole fetch for this resource.
pub async fn fetch_metric_data(
    metrics: &dyn MetricsApi,
    request: &MetricDataRequest,
) -> Result<MetricSeries> {
    let end = Utc::now();
    let start = end - Duration::hours(request.window_hours);
    let timespan = format!(
        "{}/{}",
        start.to_rfc3339_opts(SecondsFormat::Secs, true),
        end.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    let resource_uri = request.resource_uri();
    let mut series = MetricSeries::new();

    for group in chunked(&request.metric_names, METRIC_NAMES_PER_REQUEST)? {
        let query = MetricsQuery {
            resource_uri: resource_uri.clone(),
            timespan: timespan.clone(),
            interval: SAMPLING_INTERVAL.to_string(),
            metric_names: group.join(","),
            aggregation: request.aggregation.as_str().to_string(),
        };

        let response = metrics.list_metrics(&query).await?;

        for metric in response.value {
            let name = metric.name.value;
            for element in metric.timeseries {
                for point in element.data {
                    let (Some(timestamp), Some(value)) =
                        (point.time_stamp, request.aggregation.value_of(&point))
                    else {
                        continue;
                    };
                    series.push(&name, MetricSample { timestamp, value });
                }
            }
        }
    }

    debug!(
        resource = %request.resource,
        metrics = series.len(),
        "metric fetch complete"
    );
    Ok(series)
}
