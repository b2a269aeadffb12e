// Collection pipeline: stat sources, container registry, normalization, rendering

mod docker_api;
mod normalize;
mod pseudo_files;
mod registry;
mod render;
mod scheduler;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bollard::Docker;

use crate::error::CollectError;
use crate::models::{ContainerHandle, RawStatRecord};

pub use docker_api::DockerApiSource;
pub use normalize::normalize;
pub use pseudo_files::PseudoFileSource;
pub use registry::{ContainerRegistry, TrackedContainer};
pub use render::{NAMESPACE, render};
pub use scheduler::{RefreshScheduler, Snapshot};

/// Enumerates the running containers the collector should track.
///
/// The scheduler only needs listing; keeping it behind a trait lets tests
/// drive reconciliation without a daemon.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    async fn list_running_containers(&self) -> Result<Vec<ContainerHandle>, CollectError>;
}

/// Backend the registry builds per-container sources from.
#[derive(Clone)]
pub enum SourceBackend {
    PseudoFiles {
        cgroup_root: PathBuf,
        proc_root: PathBuf,
    },
    DockerApi {
        docker: Docker,
        read_timeout: Duration,
    },
}

impl SourceBackend {
    fn create(&self, handle: &ContainerHandle) -> StatSource {
        match self {
            SourceBackend::PseudoFiles {
                cgroup_root,
                proc_root,
            } => StatSource::PseudoFiles(PseudoFileSource::new(
                cgroup_root.clone(),
                proc_root.clone(),
                handle,
            )),
            SourceBackend::DockerApi {
                docker,
                read_timeout,
            } => StatSource::Api(DockerApiSource::spawn(
                docker.clone(),
                handle.id.clone(),
                handle.name.clone(),
                *read_timeout,
            )),
        }
    }
}

/// A per-container raw stat source. Reads never fail; trouble reading shows
/// up as an empty or partial record.
pub enum StatSource {
    PseudoFiles(PseudoFileSource),
    Api(DockerApiSource),
}

impl StatSource {
    pub async fn read(&mut self) -> RawStatRecord {
        match self {
            StatSource::PseudoFiles(source) => source.read().await,
            StatSource::Api(source) => source.read().await,
        }
    }
}
