//! `disk` subcommand: unattached disks and disks of unused VMs

use advisor_lib::models::Disk;
use advisor_lib::Advisor;
use anyhow::Result;
use tabled::Tabled;

use crate::output::{self, OutputFormat};

#[derive(Tabled)]
struct DiskRow {
    #[tabled(rename = "Resource Group")]
    resource_group: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Sku")]
    sku: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Size GB")]
    size_gb: i64,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&Disk> for DiskRow {
    fn from(disk: &Disk) -> Self {
        Self {
            resource_group: disk.resource_group.clone(),
            name: disk.name.clone(),
            sku: disk.sku.name.clone(),
            location: disk.location.clone(),
            size_gb: disk.properties.disk_size_gb,
            state: disk.properties.disk_state.clone(),
        }
    }
}

pub async fn run(advisor: &Advisor, format: OutputFormat) -> Result<()> {
    let report = advisor.disk_report().await?;

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            for (label, disks) in &report.sections {
                output::print_section(label);
                let rows: Vec<DiskRow> = disks.iter().map(DiskRow::from).collect();
                output::print_table(&rows);
                let total_gb: i64 = disks.iter().map(|d| d.properties.disk_size_gb).sum();
                output::print_summary(&format!("{} disks, {} GB total", disks.len(), total_gb));
            }
        }
    }
    Ok(())
}
