// Tracked container set, reconciled against runtime listings

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::collector::{SourceBackend, StatSource};
use crate::models::ContainerHandle;

/// A container the registry currently tracks: its latest inspect-time
/// handle plus the stat source built for it.
pub struct TrackedContainer {
    pub handle: ContainerHandle,
    pub source: StatSource,
}

/// Owns the container-name to source map and keeps it consistent with the
/// runtime's view. Sources are created once per tracked container and live
/// until the container vanishes from a listing.
pub struct ContainerRegistry {
    backend: SourceBackend,
    tracked: HashMap<String, TrackedContainer>,
}

impl ContainerRegistry {
    pub fn new(backend: SourceBackend) -> Self {
        Self {
            backend,
            tracked: HashMap::new(),
        }
    }

    /// Aligns the tracked set with a fresh listing: new containers get a
    /// source, known ones keep theirs with the handle refreshed, vanished
    /// ones are dropped (which tears their source down). Empty and
    /// unchanged listings are normal inputs.
    pub fn reconcile(&mut self, live: Vec<ContainerHandle>) {
        let live_names: HashSet<&str> = live.iter().map(|h| h.name.as_str()).collect();
        let before = self.tracked.len();
        self.tracked.retain(|name, _| live_names.contains(name.as_str()));
        let evicted = before - self.tracked.len();

        let mut added = 0usize;
        for handle in live {
            match self.tracked.get_mut(&handle.name) {
                Some(tracked) => tracked.handle = handle,
                None => {
                    let source = self.backend.create(&handle);
                    info!(container = %handle.name, "tracking new container");
                    self.tracked.insert(handle.name.clone(), TrackedContainer { handle, source });
                    added += 1;
                }
            }
        }
        if added > 0 || evicted > 0 {
            debug!(tracked = self.tracked.len(), added, evicted, "reconciled container set");
        }
    }

    pub fn tracked_mut(&mut self) -> impl Iterator<Item = &mut TrackedContainer> {
        self.tracked.values_mut()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tracked.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }
}
