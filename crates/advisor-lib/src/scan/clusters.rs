//! HDInsight cluster scan pipeline

use std::sync::Arc;

use tracing::info;

use super::{sections, Advisor, Report};
use crate::enrich::{enrich_all, EnrichmentPlan, MeteredResource, Verdict};
use crate::error::Result;
use crate::inventory::fetch_resources;
use crate::metrics::Aggregation;
use crate::models::Cluster;
use crate::query::{build_query, ProjectionColumn};

const CLUSTER_NAMESPACE: &str = "microsoft.hdinsight/clusters";
const CLUSTER_FILTER: &str = r#"resources | where type =~ "microsoft.hdinsight/clusters""#;
const CLUSTER_PROJECTION: &[ProjectionColumn] = &[
    ProjectionColumn::new("id", "id"),
    ProjectionColumn::new("resourceGroup", "resourceGroup"),
    ProjectionColumn::new("name", "name"),
    ProjectionColumn::new("location", "location"),
    ProjectionColumn::new("properties", "properties"),
];

/// Gateway traffic is the liveness signal for a cluster: an idle platform
/// stops producing it entirely.
const GATEWAY_METRIC: &str = "GatewayRequests";

impl MeteredResource for Cluster {
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
    /// Inventory every HDInsight cluster in the subscription.
    async fn clusters(&self) -> Result<Vec<Cluster>> {
        let query = build_query(CLUSTER_FILTER, CLUSTER_PROJECTION)?;
        let clusters: Vec<Cluster> =
            fetch_resources(self.graph.as_ref(), &self.config.subscription_id, query).await?;
        info!(clusters = clusters.len(), "inventoried HDInsight clusters");
        Ok(clusters)
    }

    /// Clusters with zero gateway requests over the window, sorted by
    /// resource id.
    pub async fn unused_clusters(&self) -> Result<Vec<Cluster>> {
        let clusters = self.clusters().await?;
        let plan = EnrichmentPlan {
            namespace: CLUSTER_NAMESPACE,
            metric_names: vec![GATEWAY_METRIC.to_string()],
            primary_metric: GATEWAY_METRIC.to_string(),
            aggregation: Aggregation::Average,
            window_hours: self.config.window_hours,
        };

        let outcome = enrich_all(
            Arc::clone(&self.metrics),
            &self.config.subscription_id,
            clusters,
            &plan,
            self.config.concurrency,
        )
        .await?;

        let mut unused: Vec<Cluster> = outcome
            .into_result()?
            .into_iter()
            .filter(|e| e.verdict == Verdict::Unused)
            .map(|e| e.resource)
            .collect();
        unused.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(unused)
    }

    /// The `UnusedHDInsight` report section.
    pub async fn cluster_report(&self) -> Result<Report<Cluster>> {
        let mut report = Report::new();
        report.insert(sections::UNUSED_HDINSIGHT, self.unused_clusters().await?);
        Ok(report)
    }
}
