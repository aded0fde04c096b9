//! Scenario tests across mirror-fs and mirror-core
//!
//! Each test drives a replica through a realistic sequence of source edits
//! and checks the observable mirror properties after every pass: the replica
//! converges, untouched files are not recopied, extraneous entries vanish.

use std::fs;
use std::time::Duration;

use mirror_core::{Scheduler, SchedulerState, SyncReport, synchronize};
use mirror_fs::Fingerprint;
use mirror_test_utils::{TestTree, snapshot};
use pretty_assertions::assert_eq;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Single-pass scenarios
// =============================================================================

#[test]
fn project_directory_lifecycle() {
    let tree = TestTree::new();
    tree.source_file("README.md", "# project");
    tree.source_file("src/main.rs", "fn main() {}");
    tree.source_file("src/lib/mod.rs", "pub mod a;");
    tree.source_dir("target");

    let first = synchronize(&tree.source(), &tree.replica()).unwrap();
    assert_eq!(first.dirs_created, 3);
    assert_eq!(first.files_copied, 3);
    tree.assert_mirrored();

    // Edit one file, delete a subtree, add a new nested file.
    tree.source_file("src/main.rs", "fn main() { println!(\"hi\"); }");
    fs::remove_dir_all(tree.source().join("src/lib")).unwrap();
    tree.source_file("docs/guide/intro.md", "intro");

    let second = synchronize(&tree.source(), &tree.replica()).unwrap();
    assert_eq!(
        second,
        SyncReport {
            dirs_created: 2,
            files_copied: 1,
            files_updated: 1,
            files_unchanged: 1,
            dirs_deleted: 1,
            files_deleted: 0,
        }
    );
    tree.assert_mirrored();

    let third = synchronize(&tree.source(), &tree.replica()).unwrap();
    assert!(third.is_noop());
}

#[test]
fn replica_fingerprints_match_source_after_pass() {
    let tree = TestTree::new();
    let large: Vec<u8> = (0..100_000u32).map(|i| (i * 7 % 256) as u8).collect();
    tree.source_file("blob.bin", &large);
    tree.replica_file("blob.bin", &large[..large.len() - 1]);

    synchronize(&tree.source(), &tree.replica()).unwrap();

    assert_eq!(
        Fingerprint::of_file(&tree.source().join("blob.bin")).unwrap(),
        Fingerprint::of_file(&tree.replica().join("blob.bin")).unwrap()
    );
}

#[test]
fn emptied_source_empties_replica() {
    let tree = TestTree::new();
    tree.replica_file("a/b/c.txt", "c");
    tree.replica_file("d.txt", "d");
    tree.replica_dir("e");

    let report = synchronize(&tree.source(), &tree.replica()).unwrap();

    assert_eq!(report.dirs_deleted, 2);
    assert_eq!(report.files_deleted, 1);
    assert!(snapshot(&tree.replica()).is_empty());
}

#[test]
fn report_serializes_for_tooling() {
    let tree = TestTree::new();
    tree.source_file("a.txt", "a");

    let report = synchronize(&tree.source(), &tree.replica()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["files_copied"], 1);
    assert_eq!(json["dirs_deleted"], 0);
}

// =============================================================================
// Scheduled scenarios
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scheduler_keeps_replica_in_step_with_edits() {
    let tree = TestTree::new();
    tree.source_file("v.txt", "1");
    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(
        Duration::from_millis(25),
        tree.source(),
        tree.replica(),
        cancel.clone(),
    )
    .unwrap();
    let mut state = scheduler.state();
    let handle = scheduler.spawn();

    for version in ["2", "3", "4"] {
        tree.source_file("v.txt", version);
        timeout(Duration::from_secs(10), async {
            while !(tree.replica_exists("v.txt") && tree.read_replica("v.txt") == version) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("version {version} never reached the replica"));
    }

    cancel.cancel();
    let summary = timeout(Duration::from_secs(10), handle).await.unwrap().unwrap();

    assert!(summary.passes >= 3, "got {summary:?}");
    assert_eq!(summary.failed_passes, 0);
    assert_eq!(*state.borrow_and_update(), SchedulerState::Stopped);
    tree.assert_mirrored();
}
