//! Virtual machine scan pipeline

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::{sections, Advisor, Report};
use crate::enrich::{enrich_all, EnrichmentPlan, MeteredResource, Verdict};
use crate::error::Result;
use crate::inventory::fetch_resources;
use crate::metrics::Aggregation;
use crate::models::Vm;
use crate::query::{build_query, ProjectionColumn};

const VM_NAMESPACE: &str = "microsoft.compute/virtualmachines";
const VM_FILTER: &str = r#"resources | where type =~ "microsoft.compute/virtualmachines""#;
const VM_PROJECTION: &[ProjectionColumn] = &[
    ProjectionColumn::new("id", "id"),
    ProjectionColumn::new("resourceGroup", "resourceGroup"),
    ProjectionColumn::new("name", "name"),
    ProjectionColumn::new("location", "location"),
    ProjectionColumn::new("properties", "properties"),
];
const CPU_METRIC: &str = "Percentage CPU";

/// A VM that emitted CPU telemetry over the window, with its mean CPU.
#[derive(Debug, Clone, Serialize)]
pub struct RunningVm {
    #[serde(flatten)]
    pub vm: Vm,
    #[serde(rename = "percentageCpuMean")]
    pub percentage_cpu_mean: f64,
}

impl MeteredResource for Vm {
    fn resource_id(&self) -> &str {
        &self.id
    }

    fn resource_group(&self) -> &str {
        &self.resource_group
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Advisor {
    /// Inventory every VM in the subscription.
    async fn virtual_machines(&self) -> Result<Vec<Vm>> {
        let query = build_query(VM_FILTER, VM_PROJECTION)?;
        let vms: Vec<Vm> =
            fetch_resources(self.graph.as_ref(), &self.config.subscription_id, query).await?;
        info!(vms = vms.len(), "inventoried virtual machines");
        Ok(vms)
    }

    fn vm_plan(&self) -> EnrichmentPlan {
        EnrichmentPlan {
            namespace: VM_NAMESPACE,
            metric_names: vec![CPU_METRIC.to_string()],
            primary_metric: CPU_METRIC.to_string(),
            aggregation: Aggregation::Average,
            window_hours: self.config.window_hours,
        }
    }

    /// VMs that emitted CPU telemetry over the window, with their mean CPU,
    /// sorted by resource id.
    pub async fn running_vms(&self) -> Result<Vec<RunningVm>> {
        let vms = self.virtual_machines().await?;
        let outcome = enrich_all(
            Arc::clone(&self.metrics),
            &self.config.subscription_id,
            vms,
            &self.vm_plan(),
            self.config.concurrency,
        )
        .await?;

        let mut running: Vec<RunningVm> = outcome
            .into_result()?
            .into_iter()
            .filter(|e| e.verdict == Verdict::Used)
            .map(|e| RunningVm {
                percentage_cpu_mean: e.mean.unwrap_or_default(),
                vm: e.resource,
            })
            .collect();
        running.sort_by(|a, b| a.vm.id.cmp(&b.vm.id));
        Ok(running)
    }

    /// VMs with zero CPU samples over the window, sorted by resource id.
    pub async fn unused_vms(&self) -> Result<Vec<Vm>> {
        let vms = self.virtual_machines().await?;
        let outcome = enrich_all(
            Arc::clone(&self.metrics),
            &self.config.subscription_id,
            vms,
            &self.vm_plan(),
            self.config.concurrency,
        )
        .await?;

        let mut unused: Vec<Vm> = outcome
            .into_result()?
            .into_iter()
            .filter(|e| e.verdict == Verdict::Unused)
            .map(|e| e.resource)
            .collect();
        unused.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(unused)
    }

    /// The `RunningVM` report section.
    pub async fn vm_report(&self) -> Result<Report<RunningVm>> {
        let mut report = Report::new();
        report.insert(sections::RUNNING_VM, self.running_vms().await?);
        Ok(report)
    }
}
