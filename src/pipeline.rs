// Wires config, runtime client, and scheduler into one pull path

use std::time::Duration;

use crate::collector::{RefreshScheduler, Snapshot, SourceBackend};
use crate::config::{AppConfig, StatsBackend};
use crate::docker_client::DockerClient;
use crate::error::CollectError;

/// The full collection path behind `/metrics`: one runtime client plus one
/// scheduler. Built once at startup and rebuilt in place after a failed
/// pull, so a wedged daemon connection never sticks around.
pub struct MetricsPipeline {
    client: DockerClient,
    scheduler: RefreshScheduler,
}

impl MetricsPipeline {
    pub fn from_config(config: &AppConfig) -> Result<Self, CollectError> {
        let client = DockerClient::connect(config.docker.address.as_deref())?;
        let backend = match config.collector.backend {
            StatsBackend::PseudoFiles => SourceBackend::PseudoFiles {
                cgroup_root: config.collector.cgroup_root.clone(),
                proc_root: config.collector.proc_root.clone(),
            },
            StatsBackend::DockerApi => SourceBackend::DockerApi {
                docker: client.docker().clone(),
                read_timeout: Duration::from_millis(config.collector.stats_read_timeout_ms),
            },
        };
        let scheduler = RefreshScheduler::new(
            backend,
            Duration::from_secs(config.collector.refresh_interval_secs),
            Duration::from_secs(config.collector.container_refresh_interval_secs),
        );
        Ok(Self { client, scheduler })
    }

    pub async fn pull(&mut self) -> Result<Snapshot, CollectError> {
        self.scheduler.pull(&self.client).await
    }
}
