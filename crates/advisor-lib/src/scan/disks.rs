//! Managed disk scan pipelines

use std::sync::Arc;

use tracing::info;

use super::{sections, Advisor, Report};
use crate::crossref::resolve_unused_vm_disks;
use crate::error::Result;
use crate::inventory::fetch_resources;
use crate::models::Disk;
use crate::query::{build_query, ProjectionColumn};

/// Unattached-disk filter, excluding Azure Site Recovery replica disks.
const UNATTACHED_FILTER: &str = r#"resources | extend disk_tags = bag_keys(tags) | extend disk_tags_string = tostring(disk_tags) | where type == "microsoft.compute/disks" | where properties.diskState == "Unattached" | where disk_tags_string !contains_cs "ASR-ReplicaDisk""#;

const DISK_PROJECTION: &[ProjectionColumn] = &[
    ProjectionColumn::new("id", "id"),
    ProjectionColumn::new("resourceGroup", "resourceGroup"),
    ProjectionColumn::new("name", "name"),
    ProjectionColumn::new("sku", "sku"),
    ProjectionColumn::new("location", "location"),
    ProjectionColumn::new("properties", "properties"),
];

impl Advisor {
    /// Managed disks in `Unattached` state, sorted by resource id.
    pub async fn unattached_disks(&self) -> Result<Vec<Disk>> {
        let query = build_query(UNATTACHED_FILTER, DISK_PROJECTION)?;
        let mut disks: Vec<Disk> =
            fetch_resources(self.graph.as_ref(), &self.config.subscription_id, query).await?;
        disks.sort_by(|a, b| a.id.cmp(&b.id));
        info!(disks = disks.len(), "inventoried unattached disks");
        Ok(disks)
    }

    /// Disks attached to VMs classified Unused, sorted by resource id.
    pub async fn unused_vm_disks(&self) -> Result<Vec<Disk>> {
        let unused = self.unused_vms().await?;
        info!(vms = unused.len(), "classified unused virtual machines");

        let mut disks = resolve_unused_vm_disks(
            Arc::clone(&self.graph),
            &self.config.subscription_id,
            &unused,
            self.config.concurrency,
        )
        .await?;
        disks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(disks)
    }

    /// The `UnattachedDisks` and `UnusedVMDisks` report sections.
    pub async fn disk_report(&self) -> Result<Report<Disk>> {
        let mut report = Report::new();
        report.insert(sections::UNATTACHED_DISKS, self.unattached_disks().await?);
        report.insert(sections::UNUSED_VM_DISKS, self.unused_vm_disks().await?);
        Ok(report)
    }
}
