/*!
 * Queue Invariant Tests
 * Capacity bounds, single membership, and move round-trips
 */

use commander_kernel::{Difficulty, ProcessManager, QueueKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn manager(difficulty: Difficulty) -> ProcessManager {
    ProcessManager::builder(difficulty).with_seed(42).build()
}

#[test]
fn test_admission_respects_queue_capacity() {
    let pm = manager(Difficulty::Medium);

    // READY holds five
    for i in 0..5 {
        let name = format!("Audio-{}", i);
        assert!(pm.admit(&name, 5, 5_000, 50, QueueKind::Ready).is_some());
    }
    assert!(pm.admit("Audio-5", 5, 5_000, 50, QueueKind::Ready).is_none());
    assert_eq!(pm.queue_len(QueueKind::Ready), 5);
}

#[test]
fn test_move_into_full_queue_is_a_noop() {
    let pm = manager(Difficulty::Medium);

    // RUNNING holds two on medium
    let a = pm.admit("Audio-1", 5, 60_000, 50, QueueKind::Running).unwrap();
    let b = pm.admit("Video-2", 5, 60_000, 50, QueueKind::Running).unwrap();
    let c = pm.admit("Sync-3", 5, 60_000, 50, QueueKind::Ready).unwrap();

    assert!(!pm.move_to(QueueKind::Running, c));
    assert_eq!(pm.location(c), Some(QueueKind::Ready));
    assert_eq!(pm.location(a), Some(QueueKind::Running));
    assert_eq!(pm.location(b), Some(QueueKind::Running));
}

#[test]
fn test_move_round_trip_updates_both_queues() {
    let pm = manager(Difficulty::Medium);
    let pid = pm.admit("Browser-1", 5, 5_000, 50, QueueKind::New).unwrap();

    let new_before = pm.queue_len(QueueKind::New);
    assert!(pm.move_to(QueueKind::Ready, pid));
    assert_eq!(pm.queue_len(QueueKind::New), new_before - 1);
    assert_eq!(pm.queue_len(QueueKind::Ready), 1);
    assert_eq!(pm.location(pid), Some(QueueKind::Ready));

    assert!(pm.move_to(QueueKind::Blocked, pid));
    assert_eq!(pm.queue_len(QueueKind::Ready), 0);
    assert_eq!(pm.queue_len(QueueKind::Blocked), 1);
    assert_eq!(pm.location(pid), Some(QueueKind::Blocked));
}

#[test]
fn test_move_to_current_queue_is_a_noop() {
    let pm = manager(Difficulty::Medium);
    let pid = pm.admit("Backup-1", 5, 5_000, 50, QueueKind::Ready).unwrap();
    assert!(!pm.move_to(QueueKind::Ready, pid));
    assert_eq!(pm.queue_len(QueueKind::Ready), 1);
}

#[test]
fn test_unknown_pid_commands_are_noops() {
    let pm = manager(Difficulty::Medium);
    assert!(!pm.move_to(QueueKind::Ready, 999));
    assert!(!pm.terminate(999));
    pm.increase_priority(999);
    pm.select(Some(999));
    assert_eq!(pm.selected(), None);
}

#[test]
fn test_terminate_removes_from_all_collections() {
    let pm = manager(Difficulty::Medium);
    let pid = pm.admit("Wifi-1", 5, 5_000, 50, QueueKind::Ready).unwrap();
    pm.select(Some(pid));

    assert!(pm.terminate(pid));
    assert_eq!(pm.location(pid), None);
    assert_eq!(pm.selected(), None);
    assert_eq!(pm.total_processes(), 0);
    // Terminating again is a no-op
    assert!(!pm.terminate(pid));
}

#[test]
fn test_priority_adjustment_clamped() {
    let pm = manager(Difficulty::Medium);
    let pid = pm.admit("Kernel-1", 10, 5_000, 50, QueueKind::New).unwrap();
    pm.increase_priority(pid);
    assert_eq!(pm.process(pid).unwrap().priority(), 10);
    for _ in 0..15 {
        pm.decrease_priority(pid);
    }
    assert_eq!(pm.process(pid).unwrap().priority(), 1);
}

proptest! {
    // Easy caps: NEW 6, READY 5, RUNNING 3, BLOCKED 4. Any sequence of
    // operator moves keeps every queue within capacity, keeps each process
    // in exactly one queue, and never loses a process.
    #[test]
    fn prop_moves_preserve_capacity_and_membership(
        commands in prop::collection::vec((0usize..6, 0usize..4), 0..60)
    ) {
        let pm = ProcessManager::builder(Difficulty::Easy).with_seed(7).build();
        let mut pids = Vec::new();
        for i in 0..6 {
            let name = format!("Search-{}", i);
            pids.push(pm.admit(&name, 5, 60_000, 20, QueueKind::New).unwrap());
        }

        for (target, kind_index) in commands {
            let kind = QueueKind::ALL[kind_index];
            pm.move_to(kind, pids[target]);

            let mut total = 0;
            for kind in QueueKind::ALL {
                let len = pm.queue_len(kind);
                prop_assert!(len <= pm.queue_capacity(kind));
                total += len;
            }
            prop_assert_eq!(total, 6);
            for &pid in &pids {
                prop_assert!(pm.location(pid).is_some());
            }
        }
    }
}
