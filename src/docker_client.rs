// Container discovery and inspection via bollard

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{InspectContainerOptions, ListContainersOptions};
use tracing::warn;

use crate::collector::RuntimeClient;
use crate::error::CollectError;
use crate::models::{ContainerHandle, HealthState};

const CONNECT_TIMEOUT_SECS: u64 = 120;

/// Thin wrapper over the Docker daemon connection. Listing and inspection
/// go through here; the streaming stats backend borrows the same handle.
#[derive(Clone)]
pub struct DockerClient {
    docker: Docker,
}

impl DockerClient {
    /// Connect over the given unix socket, or bollard's platform default
    /// when no address is configured. A missing socket path fails here;
    /// daemon errors show up on the first call.
    pub fn connect(address: Option<&str>) -> Result<Self, CollectError> {
        let docker = match address {
            Some(addr) => {
                Docker::connect_with_unix(addr, CONNECT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)?
            }
            None => Docker::connect_with_unix_defaults()?,
        };
        Ok(Self { docker })
    }

    pub fn docker(&self) -> &Docker {
        &self.docker
    }

    /// Inspect one container and fold its state into a handle.
    pub async fn inspect(&self, id: &str, name: &str) -> Result<ContainerHandle, CollectError> {
        let detail = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        let state = detail.state.unwrap_or_default();
        let health = state
            .health
            .and_then(|h| h.status)
            .and_then(|status| HealthState::from_docker(&status.to_string()));
        Ok(ContainerHandle {
            id: id.to_string(),
            name: name.to_string(),
            pid: state.pid.unwrap_or(0),
            running: state.running.unwrap_or(false),
            restarting: state.restarting.unwrap_or(false),
            health,
        })
    }
}

#[async_trait]
impl RuntimeClient for DockerClient {
    async fn list_running_containers(&self) -> Result<Vec<ContainerHandle>, CollectError> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let filter = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self.docker.list_containers(Some(filter)).await?;

        let mut handles = Vec::with_capacity(containers.len());
        for c in &containers {
            let id = c.id.as_ref().cloned().unwrap_or_default();
            let name = c
                .names
                .as_ref()
                .and_then(|n| n.first())
                .cloned()
                .unwrap_or_else(|| id.clone());
            let name = name.trim_start_matches('/').to_string();
            match self.inspect(&id, &name).await {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // A container can vanish between list and inspect; skip
                    // it this scan rather than failing the whole refresh.
                    warn!(container = %name, error = %e, "inspect failed, skipping container");
                }
            }
        }
        Ok(handles)
    }
}
