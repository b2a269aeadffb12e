// Container identity and state models

/// Health-check verdict reported by the runtime when a check is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Starting,
    Healthy,
    Unhealthy,
}

impl HealthState {
    /// Parse from Docker API health status string (e.g. "healthy", "starting").
    pub fn from_docker(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "starting" => Some(HealthState::Starting),
            "healthy" => Some(HealthState::Healthy),
            "unhealthy" => Some(HealthState::Unhealthy),
            _ => None,
        }
    }
}

/// Identity and inspect-time state for one tracked container.
///
/// `name` has the runtime's leading slash stripped and keys the tracked set;
/// `pid` locates the container's network namespace under the proc root.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerHandle {
    pub id: String,
    pub name: String,
    pub pid: i64,
    pub running: bool,
    pub restarting: bool,
    pub health: Option<HealthState>,
}

impl ContainerHandle {
    /// Up means running and not mid-restart.
    pub fn is_up(&self) -> bool {
        self.running && !self.restarting
    }

    /// With a configured health check this is the check verdict; without one
    /// it falls back to [`is_up`](Self::is_up).
    pub fn healthy(&self) -> bool {
        match self.health {
            Some(state) => state == HealthState::Healthy,
            None => self.is_up(),
        }
    }
}
