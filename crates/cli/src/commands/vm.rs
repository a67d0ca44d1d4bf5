//! `vm` subcommand: VMs in use and their monthly CPU mean

use advisor_lib::scan::RunningVm;
use advisor_lib::Advisor;
use anyhow::Result;
use tabled::Tabled;

use crate::output::{self, OutputFormat};

#[derive(Tabled)]
struct VmRow {
    #[tabled(rename = "Resource Group")]
    resource_group: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "CPU Mean %")]
    cpu_mean: String,
}

impl From<&RunningVm> for VmRow {
    fn from(running: &RunningVm) -> Self {
        Self {
            resource_group: running.vm.resource_group.clone(),
            name: running.vm.name.clone(),
            location: running.vm.location.clone(),
            size: running.vm.properties.hardware_profile.vm_size.clone(),
            cpu_mean: format!("{:.2}", running.percentage_cpu_mean),
        }
    }
}

pub async fn run(advisor: &Advisor, format: OutputFormat) -> Result<()> {
    let report = advisor.vm_report().await?;

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            for (label, vms) in &report.sections {
                output::print_section(label);
                let rows: Vec<VmRow> = vms.iter().map(VmRow::from).collect();
                output::print_table(&rows);
                output::print_summary(&format!("{} VMs in use", vms.len()));
            }
        }
    }
    Ok(())
}
