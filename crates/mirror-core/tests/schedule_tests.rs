//! Tests for the periodic scheduler

use std::time::Duration;

use mirror_core::{Error, RunSummary, Scheduler, SchedulerState, run_periodically};
use mirror_test_utils::TestTree;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

const DEADLINE: Duration = Duration::from_secs(10);

#[tokio::test]
async fn cancel_while_waiting_stops_without_another_pass() {
    let tree = TestTree::new();
    tree.source_file("a.txt", "hello");
    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(
        Duration::from_secs(3600),
        tree.source(),
        tree.replica(),
        cancel.clone(),
    )
    .unwrap();
    let mut state = scheduler.state();
    let handle = scheduler.spawn();

    timeout(
        DEADLINE,
        state.wait_for(|s| *s == SchedulerState::WaitingForNextTick),
    )
    .await
    .expect("first pass did not finish")
    .unwrap();
    cancel.cancel();

    let summary = timeout(DEADLINE, handle).await.expect("scheduler hung").unwrap();

    assert_eq!(
        summary,
        RunSummary {
            passes: 1,
            failed_passes: 0
        }
    );
    assert_eq!(*state.borrow(), SchedulerState::Stopped);
    assert_eq!(tree.read_replica("a.txt"), "hello");
}

#[tokio::test]
async fn cancel_during_pass_lets_the_pass_finish() {
    let tree = TestTree::new();
    for i in 0..2000 {
        tree.source_file(&format!("d{}/f{i:04}.txt", i % 20), format!("file {i}"));
    }
    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(
        Duration::from_secs(3600),
        tree.source(),
        tree.replica(),
        cancel.clone(),
    )
    .unwrap();
    let mut state = scheduler.state();
    let handle = scheduler.spawn();

    // Anything past Idle means the first pass has started.
    let observed = *timeout(DEADLINE, state.wait_for(|s| *s != SchedulerState::Idle))
        .await
        .expect("first pass did not start")
        .unwrap();
    assert_eq!(observed, SchedulerState::Running);
    cancel.cancel();

    let summary = timeout(DEADLINE, handle).await.expect("scheduler hung").unwrap();

    assert_eq!(
        summary,
        RunSummary {
            passes: 1,
            failed_passes: 0
        }
    );
    assert_eq!(*state.borrow(), SchedulerState::Stopped);
    tree.assert_mirrored();
}

#[tokio::test]
async fn cancelled_before_start_runs_no_pass() {
    let tree = TestTree::new();
    tree.source_file("a.txt", "hello");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let summary = run_periodically(Duration::from_secs(1), cancel, &tree.source(), &tree.replica())
        .await
        .unwrap();

    assert_eq!(summary.passes, 0);
    assert!(!tree.replica_exists("a.txt"));
}

#[tokio::test]
async fn first_pass_is_not_delayed_by_the_period() {
    let tree = TestTree::new();
    tree.source_file("now.txt", "immediate");
    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(
        Duration::from_secs(3600),
        tree.source(),
        tree.replica(),
        cancel.clone(),
    )
    .unwrap();
    let mut state = scheduler.state();
    assert_eq!(*state.borrow(), SchedulerState::Idle);
    let handle = scheduler.spawn();

    timeout(DEADLINE, state.wait_for(|s| *s == SchedulerState::WaitingForNextTick))
        .await
        .expect("first pass should run right away")
        .unwrap();

    assert_eq!(tree.read_replica("now.txt"), "immediate");
    cancel.cancel();
    timeout(DEADLINE, handle).await.expect("scheduler hung").unwrap();
}

#[tokio::test]
async fn later_passes_pick_up_source_changes() {
    let tree = TestTree::new();
    tree.source_file("first.txt", "1");
    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(
        Duration::from_millis(20),
        tree.source(),
        tree.replica(),
        cancel.clone(),
    )
    .unwrap();
    let mut state = scheduler.state();
    let handle = scheduler.spawn();

    timeout(DEADLINE, state.wait_for(|s| *s == SchedulerState::WaitingForNextTick))
        .await
        .unwrap()
        .unwrap();
    tree.source_file("second/later.txt", "2");

    timeout(DEADLINE, async {
        while !tree.replica_exists("second/later.txt") {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("change was never mirrored");
    cancel.cancel();

    let summary = timeout(DEADLINE, handle).await.unwrap().unwrap();
    assert!(summary.passes >= 2, "got {summary:?}");
    assert_eq!(summary.failed_passes, 0);
}

#[tokio::test]
async fn failing_passes_do_not_stop_the_scheduler() {
    let tree = TestTree::new();
    let missing_replica = tree.root().join("not-there");
    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(
        Duration::from_millis(10),
        tree.source(),
        &missing_replica,
        cancel.clone(),
    )
    .unwrap();
    let handle = scheduler.spawn();

    tokio::time::sleep(Duration::from_millis(150)).await;
    cancel.cancel();

    let summary = timeout(DEADLINE, handle).await.unwrap().unwrap();
    assert!(summary.passes >= 2, "got {summary:?}");
    assert_eq!(summary.failed_passes, summary.passes);
}

#[tokio::test]
async fn replica_created_after_failures_is_mirrored() {
    let tree = TestTree::new();
    tree.source_file("late.txt", "eventually");
    let late_replica = tree.root().join("late-replica");
    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(
        Duration::from_millis(10),
        tree.source(),
        &late_replica,
        cancel.clone(),
    )
    .unwrap();
    let mut state = scheduler.state();
    let handle = scheduler.spawn();

    // The first pass fails because the replica root does not exist yet.
    timeout(DEADLINE, state.wait_for(|s| *s == SchedulerState::WaitingForNextTick))
        .await
        .unwrap()
        .unwrap();
    std::fs::create_dir(&late_replica).unwrap();

    timeout(DEADLINE, async {
        while !late_replica.join("late.txt").exists() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("replica never healed");
    cancel.cancel();

    let summary = timeout(DEADLINE, handle).await.unwrap().unwrap();
    assert!(summary.failed_passes >= 1);
    assert!(summary.passes > summary.failed_passes);
}

#[test]
fn zero_period_is_rejected() {
    let tree = TestTree::new();

    let result = Scheduler::new(
        Duration::ZERO,
        tree.source(),
        tree.replica(),
        CancellationToken::new(),
    );

    assert!(matches!(result, Err(Error::InvalidPeriod { value: 0 })));
}
