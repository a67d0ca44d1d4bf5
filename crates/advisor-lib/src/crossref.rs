//! Cross-referencing unused VMs to their managed disks

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::chunk::chunked;
use crate::client::ResourceGraphApi;
use crate::error::{AdvisorError, Result};
use crate::inventory::fetch_resources;
use crate::models::{Disk, Vm};
use crate::query::{build_query, ProjectionColumn};

/// Backend query-complexity ceiling on ids per `id in~` filter. Distinct
/// from the metric-name ceiling.
pub const DISK_IDS_PER_QUERY: usize = 10;

const DISK_PROJECTION: &[ProjectionColumn] = &[
    ProjectionColumn::new("id", "id"),
    ProjectionColumn::new("resourceGroup", "resourceGroup"),
    ProjectionColumn::new("name", "name"),
    ProjectionColumn::new("sku", "sku"),
    ProjectionColumn::new("properties", "properties"),
    ProjectionColumn::new("location", "location"),
];

/// Collect the managed-disk ids referenced by `vms`: the OS disk plus every
/// data disk, blanks dropped, duplicates removed, first-seen order kept.
pub fn collect_disk_ids(vms: &[Vm]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for vm in vms {
        let profile = &vm.properties.storage_profile;
        let disk_refs = std::iter::once(profile.os_disk.managed_disk.id.as_str())
            .chain(profile.data_disks.iter().map(|d| d.managed_disk.id.as_str()));

        for id in disk_refs {
            if id.trim().is_empty() {
                continue;
            }
            if seen.insert(id.to_string()) {
                ids.push(id.to_string());
            }
        }
    }

    ids
}

/// Quote and join ids into an `id in~ (...)` graph filter.
fn in_filter(ids: &[String]) -> String {
    let quoted = ids
        .iter()
        .map(|id| format!("\"{id}\""))
        .collect::<Vec<_>>()
        .join(",");
    format!("resources | where id in~ ({quoted})")
}

/// Materialize the disk records attached to the given unused VMs.
///
/// Ids are chunked by [`DISK_IDS_PER_QUERY`], one graph query per chunk,
/// with chunk fetches admitted under the same semaphore discipline as the
/// enrichment engine and every chunk running to completion before the first
/// error is raised. An empty id list returns no records without touching
/// the backend — an `id in ()` filter cannot be relied on.
pub async fn resolve_unused_vm_disks(
    graph: Arc<dyn ResourceGraphApi>,
    subscription_id: &str,
    unused_vms: &[Vm],
    concurrency: usize,
) -> Result<Vec<Disk>> {
    if concurrency == 0 {
        return Err(AdvisorError::Configuration(
            "cross-reference concurrency must be positive".to_string(),
        ));
    }

    let ids = collect_disk_ids(unused_vms);
    if ids.is_empty() {
        debug!("no disk ids to cross-reference");
        return Ok(Vec::new());
    }
    info!(
        vms = unused_vms.len(),
        disk_ids = ids.len(),
        "resolving disks of unused VMs"
    );

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let disks = Arc::new(Mutex::new(Vec::with_capacity(ids.len())));
    let mut tasks = JoinSet::new();

    for chunk in chunked(&ids, DISK_IDS_PER_QUERY)? {
        let query = build_query(&in_filter(chunk), DISK_PROJECTION)?;
        let semaphore = Arc::clone(&semaphore);
        let disks = Arc::clone(&disks);
        let graph = Arc::clone(&graph);
        let subscription_id = subscription_id.to_string();

        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| AdvisorError::Internal(e.to_string()))?;

            let batch = fetch_resources::<Disk>(graph.as_ref(), &subscription_id, query).await?;
            disks.lock().await.extend(batch);
            Ok::<(), AdvisorError>(())
        });
    }

    let mut errors = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(error = %err, "disk chunk fetch failed");
                errors.push(err);
            }
            Err(join_err) => errors.push(AdvisorError::Internal(join_err.to_string())),
        }
    }
    if let Some(err) = errors.into_iter().next() {
        return Err(err);
    }

    let disks = Arc::try_unwrap(disks)
        .map_err(|_| AdvisorError::Internal("disk accumulator still shared".to_string()))?
        .into_inner();
    Ok(disks)
}
