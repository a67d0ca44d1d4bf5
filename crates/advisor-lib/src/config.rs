//! Pipeline configuration

use serde::{Deserialize, Serialize};

/// Default global concurrency cap for backend fan-out.
pub const DEFAULT_CONCURRENCY: usize = 20;
/// Default trailing metric window (30 days).
pub const DEFAULT_WINDOW_HOURS: i64 = 24 * 30;

/// Tunables shared by every scan pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Subscription scope all queries run against.
    pub subscription_id: String,

    /// Maximum concurrent backend calls per fan-out.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Trailing metric window length in hours.
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_window_hours() -> i64 {
    DEFAULT_WINDOW_HOURS
}

impl AdvisorConfig {
    /// Config with the default cap and window for one subscription.
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            concurrency: DEFAULT_CONCURRENCY,
            window_hours: DEFAULT_WINDOW_HOURS,
        }
    }
}
