// ContainerRegistry reconcile tests

mod common;

use docker_stats_exporter::collector::{ContainerRegistry, SourceBackend};

use common::handle;

fn backend(root: &std::path::Path) -> SourceBackend {
    SourceBackend::PseudoFiles {
        cgroup_root: root.join("cgroup"),
        proc_root: root.join("proc"),
    }
}

#[tokio::test]
async fn test_reconcile_tracks_new_and_keeps_known() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = ContainerRegistry::new(backend(dir.path()));
    assert!(registry.is_empty());

    registry.reconcile(vec![handle("web", "id-web", 11)]);
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("web"));

    registry.reconcile(vec![handle("web", "id-web", 11), handle("db", "id-db", 22)]);
    assert_eq!(registry.len(), 2);
    assert!(registry.contains("web"));
    assert!(registry.contains("db"));
}

#[tokio::test]
async fn test_reconcile_evicts_vanished_containers() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = ContainerRegistry::new(backend(dir.path()));

    registry.reconcile(vec![handle("web", "id-web", 11), handle("db", "id-db", 22)]);
    registry.reconcile(vec![handle("db", "id-db", 22)]);

    assert_eq!(registry.len(), 1);
    assert!(!registry.contains("web"));
    assert!(registry.contains("db"));
}

#[tokio::test]
async fn test_reconcile_refreshes_handle_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = ContainerRegistry::new(backend(dir.path()));

    registry.reconcile(vec![handle("web", "id-web", 11)]);
    let mut restarted = handle("web", "id-web", 11);
    restarted.restarting = true;
    registry.reconcile(vec![restarted]);

    let tracked: Vec<_> = registry.tracked_mut().collect();
    assert_eq!(tracked.len(), 1);
    assert!(tracked[0].handle.restarting);
    assert!(!tracked[0].handle.is_up());
}

#[tokio::test]
async fn test_reconcile_with_empty_listing_clears_everything() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = ContainerRegistry::new(backend(dir.path()));

    registry.reconcile(vec![handle("web", "id-web", 11)]);
    registry.reconcile(vec![]);
    assert!(registry.is_empty());

    // Reconciling an already-empty set stays a no-op.
    registry.reconcile(vec![]);
    assert!(registry.is_empty());
}
