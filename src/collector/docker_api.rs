// Docker remote stats API backend: one held stream per container

use std::time::Duration;

use bollard::Docker;
use bollard::models::ContainerStatsResponse;
use bollard::query_parameters::StatsOptions;
use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::models::RawStatRecord;

type FrameReceiver = watch::Receiver<Option<Box<ContainerStatsResponse>>>;

/// Holds a streaming stats subscription for one container.
///
/// A spawned task owns the stream and publishes each decoded frame; reads
/// take the latest frame without touching the daemon. Dropping the source
/// aborts the task, which closes the subscription.
pub struct DockerApiSource {
    docker: Docker,
    container_id: String,
    container_name: String,
    latest: FrameReceiver,
    reader: JoinHandle<()>,
    read_timeout: Duration,
}

impl DockerApiSource {
    pub fn spawn(docker: Docker, id: String, name: String, read_timeout: Duration) -> Self {
        let (latest, reader) = Self::start_reader(&docker, &id, &name);
        Self {
            docker,
            container_id: id,
            container_name: name,
            latest,
            reader,
            read_timeout,
        }
    }

    fn start_reader(docker: &Docker, id: &str, name: &str) -> (FrameReceiver, JoinHandle<()>) {
        let (tx, rx) = watch::channel(None);
        let docker = docker.clone();
        let id = id.to_string();
        let name = name.to_string();
        let reader = tokio::spawn(async move {
            let options = StatsOptions {
                stream: true,
                ..Default::default()
            };
            let mut stream = docker.stats(&id, Some(options));
            while let Some(result) = stream.next().await {
                match result {
                    Ok(frame) => {
                        if tx.send(Some(Box::new(frame))).is_err() {
                            // Source was dropped; nobody is reading anymore.
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(container = %name, error = %e, "stats stream error");
                        break;
                    }
                }
            }
            debug!(container = %name, "stats stream ended");
        });
        (rx, reader)
    }

    /// Latest frame from the held stream. Only a source that has not seen
    /// its first frame yet waits, and no longer than the configured bound.
    pub async fn read(&mut self) -> RawStatRecord {
        if self.reader.is_finished() {
            // The stream task exited (stream error or end). Restart it; a
            // dead stream reads as no data, not as its last frame repeated.
            let (latest, reader) =
                Self::start_reader(&self.docker, &self.container_id, &self.container_name);
            self.latest = latest;
            self.reader = reader;
        }
        if self.latest.borrow().is_none() {
            let _ = timeout(self.read_timeout, self.latest.changed()).await;
        }
        RawStatRecord::Api(self.latest.borrow().clone())
    }
}

impl Drop for DockerApiSource {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
