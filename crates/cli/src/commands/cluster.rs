//! `cluster` subcommand: HDInsight clusters with no gateway traffic

use advisor_lib::models::Cluster;
use advisor_lib::Advisor;
use anyhow::Result;
use tabled::Tabled;

use crate::output::{self, OutputFormat};

#[derive(Tabled)]
struct ClusterRow {
    #[tabled(rename = "Resource Group")]
    resource_group: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Roles")]
    roles: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Cluster> for ClusterRow {
    fn from(cluster: &Cluster) -> Self {
        let roles = cluster
            .properties
            .compute_profile
            .roles
            .iter()
            .map(|role| format!("{}x{}", role.name, role.target_instance_count))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            resource_group: cluster.resource_group.clone(),
            name: cluster.name.clone(),
            location: cluster.location.clone(),
            kind: cluster.properties.cluster_definition.kind.clone(),
            roles,
            created: cluster.properties.created_date.clone(),
        }
    }
}

pub async fn run(advisor: &Advisor, format: OutputFormat) -> Result<()> {
    let report = advisor.cluster_report().await?;

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            for (label, clusters) in &report.sections {
                output::print_section(label);
                let rows: Vec<ClusterRow> = clusters.iter().map(ClusterRow::from).collect();
                output::print_table(&rows);
                output::print_summary(&format!("{} idle clusters", clusters.len()));
            }
        }
    }
    Ok(())
}
