// Deadline-gated snapshot production over the tracked container set

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::Instant;
use tracing::debug;

use crate::collector::registry::ContainerRegistry;
use crate::collector::{RuntimeClient, SourceBackend, normalize, render};
use crate::error::CollectError;
use crate::models::NormalizedMetric;

/// A rendered exposition body. Immutable once produced; a refresh replaces
/// the whole snapshot rather than mutating it.
pub type Snapshot = Arc<str>;

/// Serves the cached snapshot until its TTL lapses, then recomputes it on
/// the pulling request's back. Two deadlines apply: the snapshot TTL and a
/// longer one for re-scanning the container set.
pub struct RefreshScheduler {
    registry: ContainerRegistry,
    refresh_interval: Duration,
    container_refresh_interval: Duration,
    rendered: Option<Snapshot>,
    refresh_deadline: Option<Instant>,
    rescan_deadline: Option<Instant>,
}

impl RefreshScheduler {
    pub fn new(
        backend: SourceBackend,
        refresh_interval: Duration,
        container_refresh_interval: Duration,
    ) -> Self {
        Self {
            registry: ContainerRegistry::new(backend),
            refresh_interval,
            container_refresh_interval,
            rendered: None,
            refresh_deadline: None,
            rescan_deadline: None,
        }
    }

    /// Returns the current snapshot, recomputing only when it has expired.
    ///
    /// A recompute re-scans the container set first if that deadline lapsed
    /// too (the first pull always does both), then reads every tracked
    /// source concurrently, normalizes, and renders. Requests between
    /// deadlines get the cached snapshot back untouched.
    pub async fn pull(&mut self, client: &impl RuntimeClient) -> Result<Snapshot, CollectError> {
        let now = Instant::now();
        if let (Some(snapshot), Some(deadline)) = (self.rendered.as_ref(), self.refresh_deadline) {
            if now < deadline {
                return Ok(snapshot.clone());
            }
        }

        if self.rescan_deadline.is_none_or(|deadline| now >= deadline) {
            let live = client.list_running_containers().await?;
            self.registry.reconcile(live);
            self.rescan_deadline = Some(now + self.container_refresh_interval);
        }

        let reads = self.registry.tracked_mut().map(|tracked| async move {
            let record = tracked.source.read().await;
            normalize(&tracked.handle, &record)
        });
        let metrics: Vec<NormalizedMetric> = join_all(reads).await.into_iter().flatten().collect();
        debug!(metrics = metrics.len(), containers = self.registry.len(), "rendered snapshot");

        let snapshot: Snapshot = Arc::from(render(&metrics));
        self.rendered = Some(snapshot.clone());
        self.refresh_deadline = Some(now + self.refresh_interval);
        Ok(snapshot)
    }
}
