//! End-to-end pipeline tests over stub backends

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use super::{sections, Advisor};
use crate::client::{
    GraphQueryRequest, LocalizedValue, Metric, MetricValue, MetricsApi, MetricsQuery,
    MetricsResponse, ResourceGraphApi, TimeseriesElement,
};
use crate::config::AdvisorConfig;
use crate::crossref::DISK_IDS_PER_QUERY;
use crate::error::Result;

/// Graph stub serving a 25-VM inventory and answering `id in~` disk
/// queries with one disk row per requested id.
struct StubGraph {
    queries: StdMutex<Vec<String>>,
}

impl StubGraph {
    fn new() -> Self {
        Self {
            queries: StdMutex::new(Vec::new()),
        }
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn vm_rows() -> Vec<serde_json::Value> {
        (0..25)
            .map(|i| {
                // vm-00, vm-01, vm-02 are the deallocated ones; two of them
                // share a data disk.
                let shared_or_own = if i < 2 { "/disks/shared".to_string() } else { format!("/disks/vm-{i:02}-data") };
                json!({
                    "id": format!("/vms/vm-{i:02}"),
                    "resourceGroup": "rg",
                    "name": format!("vm-{i:02}"),
                    "location": "japaneast",
                    "properties": {
                        "storageProfile": {
                            "osDisk": {"name": format!("vm-{i:02}-os"),
                                       "managedDisk": {"id": format!("/disks/vm-{i:02}-os")}},
                            "dataDisks": [
                                {"name": "data-0", "createOption": "Attach", "lun": 0,
                                 "managedDisk": {"id": shared_or_own}}
                            ]
                        },
                        "hardwareProfile": {"vmSize": "Standard_D2s_v3"}
                    }
                })
            })
            .collect()
    }
}

#[async_trait]
impl ResourceGraphApi for StubGraph {
    async fn resources(&self, request: &GraphQueryRequest) -> Result<Vec<serde_json::Value>> {
        self.queries.lock().unwrap().push(request.query.clone());

        if request.query.contains("virtualmachines") {
            return Ok(Self::vm_rows());
        }
        if request.query.contains("id in~") {
            let rows = request
                .query
                .split('"')
                .skip(1)
                .step_by(2)
                .map(|id| {
                    json!({
                        "id": id,
                        "resourceGroup": "rg",
                        "name": id.rsplit('/').next().unwrap(),
                        "location": "japaneast",
                        "sku": {"name": "Premium_LRS"},
                        "properties": {"diskSizeGB": 128, "diskState": "Attached"}
                    })
                })
                .collect();
            return Ok(rows);
        }
        Ok(Vec::new())
    }
}

/// Metrics stub: VMs named `vm-00..=vm-02` went silent over the window.
struct StubMetrics {
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

impl StubMetrics {
    fn new() -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MetricsApi for StubMetrics {
    async fn list_metrics(&self, query: &MetricsQuery) -> Result<MetricsResponse> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let name = query.resource_uri.rsplit('/').next().unwrap_or_default();
        let silent = matches!(name, "vm-00" | "vm-01" | "vm-02");

        let mut response = MetricsResponse::default();
        if !silent {
            response.value.push(Metric {
                name: LocalizedValue {
                    value: "Percentage CPU".to_string(),
                },
                timeseries: vec![TimeseriesElement {
                    data: vec![
                        MetricValue {
                            time_stamp: Some(Utc::now()),
                            average: Some(2.0),
                            ..Default::default()
                        },
                        MetricValue {
                            time_stamp: Some(Utc::now()),
                            average: Some(4.0),
                            ..Default::default()
                        },
                    ],
                }],
            });
        }
        Ok(response)
    }
}

fn advisor(graph: Arc<StubGraph>, metrics: Arc<StubMetrics>) -> Advisor {
    let config = AdvisorConfig {
        subscription_id: "sub-1".to_string(),
        concurrency: 8,
        window_hours: 24 * 30,
    };
    Advisor::new(graph, metrics, config)
}

#[tokio::test]
async fn silent_vms_form_the_unused_set() {
    let graph = Arc::new(StubGraph::new());
    let metrics = Arc::new(StubMetrics::new());
    let advisor = advisor(graph, metrics.clone());

    let unused = advisor.unused_vms().await.unwrap();

    let names: Vec<&str> = unused.iter().map(|vm| vm.name.as_str()).collect();
    assert_eq!(names, ["vm-00", "vm-01", "vm-02"]);
    assert!(metrics.high_water.load(Ordering::SeqCst) <= 8);
}

#[tokio::test]
async fn running_vms_carry_the_window_mean() {
    let graph = Arc::new(StubGraph::new());
    let metrics = Arc::new(StubMetrics::new());
    let advisor = advisor(graph, metrics);

    let report = advisor.vm_report().await.unwrap();

    let running = &report.sections[sections::RUNNING_VM];
    assert_eq!(running.len(), 22);
    assert!(running.iter().all(|vm| vm.percentage_cpu_mean == 3.0));
    // Sorted post hoc by resource id.
    let ids: Vec<&str> = running.iter().map(|r| r.vm.id.as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn unused_vm_disks_are_cross_referenced_in_bounded_chunks() {
    let graph = Arc::new(StubGraph::new());
    let metrics = Arc::new(StubMetrics::new());
    let advisor = advisor(graph.clone(), metrics);

    let report = advisor.disk_report().await.unwrap();

    // 3 unused VMs x (1 OS + 1 data disk), one data disk shared by two VMs.
    let disks = &report.sections[sections::UNUSED_VM_DISKS];
    assert_eq!(disks.len(), 5);

    let disk_queries: Vec<String> = graph
        .queries()
        .into_iter()
        .filter(|q| q.contains("id in~"))
        .collect();
    assert_eq!(disk_queries.len(), 1);
    assert!(disk_queries[0].matches('"').count() / 2 <= DISK_IDS_PER_QUERY);
}
