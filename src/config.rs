use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub docker: DockerConfig,
    pub collector: CollectorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockerConfig {
    /// Unix socket the daemon listens on; unset means bollard's platform default.
    #[serde(default)]
    pub address: Option<String>,
}

/// Where raw stats come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatsBackend {
    /// Read cgroup accounting files and /proc net tables directly.
    PseudoFiles,
    /// Hold a streaming stats subscription per container on the Docker API.
    DockerApi,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    #[serde(default = "default_backend")]
    pub backend: StatsBackend,
    /// Seconds a rendered snapshot stays fresh before a scrape recomputes it.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Seconds between re-scans of the running container set.
    #[serde(default = "default_container_refresh_interval_secs")]
    pub container_refresh_interval_secs: u64,
    #[serde(default = "default_cgroup_root")]
    pub cgroup_root: PathBuf,
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,
    /// Upper bound on waiting for a container's first stats API frame.
    #[serde(default = "default_stats_read_timeout_ms")]
    pub stats_read_timeout_ms: u64,
}

fn default_backend() -> StatsBackend {
    StatsBackend::DockerApi
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_container_refresh_interval_secs() -> u64 {
    120
}

fn default_cgroup_root() -> PathBuf {
    PathBuf::from("/sys/fs/cgroup")
}

fn default_proc_root() -> PathBuf {
    PathBuf::from("/proc")
}

fn default_stats_read_timeout_ms() -> u64 {
    2000
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.collector.refresh_interval_secs > 0,
            "collector.refresh_interval_secs must be > 0, got {}",
            self.collector.refresh_interval_secs
        );
        anyhow::ensure!(
            self.collector.container_refresh_interval_secs > 0,
            "collector.container_refresh_interval_secs must be > 0, got {}",
            self.collector.container_refresh_interval_secs
        );
        anyhow::ensure!(
            self.collector.stats_read_timeout_ms > 0,
            "collector.stats_read_timeout_ms must be > 0, got {}",
            self.collector.stats_read_timeout_ms
        );
        anyhow::ensure!(
            !self.collector.cgroup_root.as_os_str().is_empty(),
            "collector.cgroup_root must be non-empty"
        );
        anyhow::ensure!(
            !self.collector.proc_root.as_os_str().is_empty(),
            "collector.proc_root must be non-empty"
        );
        if let Some(address) = &self.docker.address {
            anyhow::ensure!(!address.is_empty(), "docker.address must be non-empty when set");
        }
        Ok(())
    }
}
