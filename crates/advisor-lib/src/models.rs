//! Typed resource records and metric series shapes
//!
//! Records mirror the rows the Resource Graph backend returns for each
//! resource family; the series types hold what the Metrics backend returned
//! for one resource. Records are immutable once fetched and owned by the
//! caller that fetched them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Virtual machine inventory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vm {
    pub id: String,
    #[serde(rename = "resourceGroup")]
    pub resource_group: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub properties: VmProperties,
    #[serde(default)]
    pub zones: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmProperties {
    #[serde(rename = "storageProfile", default)]
    pub storage_profile: StorageProfile,
    #[serde(rename = "hardwareProfile", default)]
    pub hardware_profile: HardwareProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageProfile {
    #[serde(rename = "osDisk", default)]
    pub os_disk: OsDisk,
    #[serde(rename = "dataDisks", default)]
    pub data_disks: Vec<DataDisk>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsDisk {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "managedDisk", default)]
    pub managed_disk: ManagedDiskRef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataDisk {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "createOption", default)]
    pub create_option: String,
    #[serde(default)]
    pub lun: i32,
    #[serde(rename = "managedDisk", default)]
    pub managed_disk: ManagedDiskRef,
}

/// Reference to a managed disk by resource id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagedDiskRef {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HardwareProfile {
    #[serde(rename = "vmSize", default)]
    pub vm_size: String,
}

/// Managed disk inventory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disk {
    pub id: String,
    #[serde(rename = "resourceGroup")]
    pub resource_group: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub sku: DiskSku,
    #[serde(default)]
    pub properties: DiskProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskSku {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskProperties {
    #[serde(rename = "diskSizeGB", default)]
    pub disk_size_gb: i64,
    #[serde(rename = "timeCreated", default)]
    pub time_created: String,
    #[serde(rename = "diskState", default)]
    pub disk_state: String,
}

/// HDInsight cluster inventory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    #[serde(rename = "resourceGroup")]
    pub resource_group: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub properties: ClusterProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterProperties {
    #[serde(rename = "clusterDefinition", default)]
    pub cluster_definition: ClusterDefinition,
    #[serde(rename = "computeProfile", default)]
    pub compute_profile: ComputeProfile,
    #[serde(rename = "createdDate", default)]
    pub created_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterDefinition {
    #[serde(default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputeProfile {
    #[serde(default)]
    pub roles: Vec<ClusterRole>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterRole {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "hardwareProfile", default)]
    pub hardware_profile: HardwareProfile,
    #[serde(rename = "targetInstanceCount", default)]
    pub target_instance_count: i64,
}

/// One aggregated telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Per-resource time series keyed by metric name.
///
/// A metric name absent from the map means the backend returned no data for
/// it — semantically distinct from a series of zero-valued samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSeries {
    series: BTreeMap<String, Vec<MetricSample>>,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample to a metric's series, preserving arrival order.
    pub fn push(&mut self, metric: &str, sample: MetricSample) {
        self.series.entry(metric.to_string()).or_default().push(sample);
    }

    /// Samples for a metric; empty when the metric returned no data.
    pub fn samples(&self, metric: &str) -> &[MetricSample] {
        self.series.get(metric).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn sample_count(&self, metric: &str) -> usize {
        self.samples(metric).len()
    }

    /// Arithmetic mean of a metric's samples, `None` when there are none.
    pub fn mean(&self, metric: &str) -> Option<f64> {
        let samples = self.samples(metric);
        if samples.is_empty() {
            return None;
        }
        let sum: f64 = samples.iter().map(|s| s.value).sum();
        Some(sum / samples.len() as f64)
    }

    /// Number of metric names with at least one sample.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
