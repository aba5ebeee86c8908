//! Latest-request-wins publishing for offloaded clustering.
//!
//! Viewport changes can arrive faster than clustering finishes. Each request
//! takes a generation number when it is issued; a result is only published if
//! no newer generation has been published already, so completion order never
//! lets an old region overwrite a newer one.

use anyhow::{Context, Result};
use courtmap_shared::{ClusterBuilder, Mode, Partition, Point, ViewportRegion};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub struct LatestOnly<T> {
    issued: AtomicU64,
    accepted: Mutex<Option<(u64, T)>>,
}

impl<T> Default for LatestOnly<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestOnly<T> {
    pub fn new() -> Self {
        LatestOnly {
            issued: AtomicU64::new(0),
            accepted: Mutex::new(None),
        }
    }

    /// Reserve the next generation. Generations start at 1.
    pub fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish `value` for `generation`. Returns false if it was stale.
    pub fn publish(&self, generation: u64, value: T) -> bool {
        let mut slot = self.accepted.lock().unwrap_or_else(|e| e.into_inner());
        if matches!(slot.as_ref(), Some((current, _)) if *current >= generation) {
            tracing::debug!(generation, "Discarded stale result");
            return false;
        }
        *slot = Some((generation, value));
        true
    }

    pub fn latest_generation(&self) -> Option<u64> {
        let slot = self.accepted.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map(|(generation, _)| *generation)
    }

    pub fn into_latest(self) -> Option<(u64, T)> {
        self.accepted.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

/// Clustering result for one viewport.
#[derive(Debug, Clone)]
pub struct RegionResult {
    pub generation: u64,
    pub region: ViewportRegion,
    pub partition: Partition,
}

/// Cluster every region on the blocking pool and keep only the newest.
///
/// Regions are issued in slice order; the last region always wins even if
/// an earlier one finishes after it.
pub async fn cluster_latest(
    points: Arc<Vec<Point>>,
    regions: &[ViewportRegion],
    builder: ClusterBuilder,
    mode: Mode,
) -> Result<Option<RegionResult>> {
    let gate: Arc<LatestOnly<(ViewportRegion, Partition)>> = Arc::new(LatestOnly::new());

    let mut handles = Vec::with_capacity(regions.len());
    for &region in regions {
        let generation = gate.ticket();
        let points = Arc::clone(&points);
        let gate = Arc::clone(&gate);
        handles.push(tokio::task::spawn_blocking(move || {
            let partition = builder.build(&points, region, mode);
            gate.publish(generation, (region, partition))
        }));
    }

    let mut stale = 0usize;
    for handle in handles {
        if !handle.await.context("Clustering task failed")? {
            stale += 1;
        }
    }

    let gate = Arc::try_unwrap(gate)
        .map_err(|_| anyhow::anyhow!("Clustering tasks still hold the result gate"))?;
    let generation = gate.latest_generation();
    let latest = gate
        .into_latest()
        .map(|(generation, (region, partition))| RegionResult {
            generation,
            region,
            partition,
        });

    tracing::info!(
        requested = regions.len(),
        stale,
        generation,
        "Replayed viewport changes"
    );
    Ok(latest)
}
