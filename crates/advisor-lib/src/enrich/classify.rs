//! Used/unused classification from metric presence

use serde::{Deserialize, Serialize};

use crate::models::MetricSeries;

/// Binary classification outcome for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Used,
    Unused,
}

/// Classify a resource from its series for the primary metric.
///
/// Zero samples over the window means Unused; at least one sample means
/// Used regardless of sample magnitude — absence of telemetry is the
/// signal, not low telemetry. Pure function of the series: reclassifying
/// the same series always yields the same verdict.
pub fn classify(series: &MetricSeries, primary_metric: &str) -> Verdict {
    if series.sample_count(primary_metric) == 0 {
        Verdict::Unused
    } else {
        Verdict::Used
    }
}
