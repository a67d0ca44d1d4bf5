//! Subscription scan pipelines
//!
//! One pipeline per resource family: virtual machines, managed disks, and
//! HDInsight clusters. Each pipeline inventories the subscription through
//! the graph backend, enriches through the metrics backend, and assembles
//! report sections for the renderer.

mod clusters;
mod disks;
mod vm;

#[cfg(test)]
mod tests;

pub use vm::RunningVm;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::client::{MetricsApi, ResourceGraphApi};
use crate::config::AdvisorConfig;

/// Report section labels.
pub mod sections {
    pub const RUNNING_VM: &str = "RunningVM";
    pub const UNATTACHED_DISKS: &str = "UnattachedDisks";
    pub const UNUSED_VM_DISKS: &str = "UnusedVMDisks";
    pub const UNUSED_HDINSIGHT: &str = "UnusedHDInsight";
}

/// Ordered record collections keyed by report section label, ready for
/// rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    pub sections: BTreeMap<String, Vec<T>>,
}

impl<T> Report<T> {
    pub fn new() -> Self {
        Self {
            sections: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, label: &str, records: Vec<T>) {
        self.sections.insert(label.to_string(), records);
    }
}

impl<T> Default for Report<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Facade over the two backends running the scan pipelines.
pub struct Advisor {
    graph: Arc<dyn ResourceGraphApi>,
    metrics: Arc<dyn MetricsApi>,
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(
        graph: Arc<dyn ResourceGraphApi>,
        metrics: Arc<dyn MetricsApi>,
        config: AdvisorConfig,
    ) -> Self {
        Self {
            graph,
            metrics,
            config,
        }
    }
}
