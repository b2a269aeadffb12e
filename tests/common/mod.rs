// Shared test helpers

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use docker_stats_exporter::collector::RuntimeClient;
use docker_stats_exporter::error::CollectError;
use docker_stats_exporter::models::ContainerHandle;

pub fn handle(name: &str, id: &str, pid: i64) -> ContainerHandle {
    ContainerHandle {
        id: id.to_string(),
        name: name.to_string(),
        pid,
        running: true,
        restarting: false,
        health: None,
    }
}

/// Scripted runtime client: each listing call pops the next programmed
/// response. Once the script runs out, the last successful listing repeats.
pub struct FakeRuntime {
    script: Mutex<Vec<Result<Vec<ContainerHandle>, CollectError>>>,
    last: Mutex<Vec<ContainerHandle>>,
    calls: Mutex<usize>,
}

impl FakeRuntime {
    pub fn new(script: Vec<Result<Vec<ContainerHandle>, CollectError>>) -> Self {
        Self {
            script: Mutex::new(script),
            last: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn listing_calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl RuntimeClient for FakeRuntime {
    async fn list_running_containers(&self) -> Result<Vec<ContainerHandle>, CollectError> {
        *self.calls.lock().unwrap() += 1;
        let next = {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() { None } else { Some(script.remove(0)) }
        };
        match next {
            Some(Ok(handles)) => {
                *self.last.lock().unwrap() = handles.clone();
                Ok(handles)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

/// Lays out `<root>/<category>/docker/<id>/<file>` for the pseudo-file backend.
pub fn write_cgroup_file(root: &Path, category: &str, id: &str, file: &str, content: &str) {
    let dir = root.join(category).join("docker").join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

/// Lays out `<root>/<pid>/net/dev` for the pseudo-file backend.
pub fn write_net_dev(root: &Path, pid: i64, content: &str) {
    let dir = root.join(pid.to_string()).join("net");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("dev"), content).unwrap();
}
