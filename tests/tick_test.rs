/*!
 * Tick Protocol Tests
 * Timer decrement, completion scoring, scheduling, overload, starvation
 */

use commander_kernel::{Difficulty, GameOverReason, ProcessManager, QueueKind};
use pretty_assertions::assert_eq;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

fn manager(difficulty: Difficulty) -> ProcessManager {
    ProcessManager::builder(difficulty).with_seed(42).build()
}

/// Fill BLOCKED to capacity so interrupt rolls cannot fire; multi-tick
/// scenarios stay deterministic regardless of seed.
fn saturate_blocked(pm: &ProcessManager) {
    for i in 0..pm.queue_capacity(QueueKind::Blocked) {
        let name = format!("Bluetooth-{}", i);
        pm.admit(&name, 1, 600_000, 10, QueueKind::Blocked).unwrap();
    }
}

#[test]
fn test_running_timer_decrements_to_zero_and_terminates_same_tick() {
    let pm = manager(Difficulty::Medium);
    saturate_blocked(&pm);
    let pid = pm.admit("Video-1", 5, 1_000, 50, QueueKind::Running).unwrap();

    let mut previous = pm.process(pid).unwrap().remaining_ms();
    for _ in 0..9 {
        pm.tick(TICK);
        let remaining = pm.process(pid).unwrap().remaining_ms();
        assert!(remaining < previous);
        previous = remaining;
    }
    assert_eq!(previous, 100);

    // Final tick exhausts the burst and terminates within the same tick
    pm.tick(TICK);
    assert_eq!(pm.location(pid), None);
    assert_eq!(pm.score(), 500);
    assert_eq!(pm.processes_completed(), 1);
}

#[test]
fn test_tick_delta_clamped_to_maximum() {
    let pm = manager(Difficulty::Medium);
    saturate_blocked(&pm);
    let pid = pm.admit("Video-1", 5, 500, 50, QueueKind::Running).unwrap();

    // A ten-second hitch counts as one 100ms step
    pm.tick(Duration::from_secs(10));
    assert_eq!(pm.process(pid).unwrap().remaining_ms(), 400);
    assert_eq!(pm.elapsed(), Duration::from_millis(100));
}

#[test]
fn test_ready_promotion_prefers_higher_priority() {
    let pm = manager(Difficulty::Easy);
    saturate_blocked(&pm);
    let low = pm.admit("Backup-1", 2, 60_000, 20, QueueKind::Ready).unwrap();
    let high = pm.admit("Kernel-2", 9, 60_000, 20, QueueKind::Ready).unwrap();
    let mid = pm.admit("Audio-3", 5, 60_000, 20, QueueKind::Ready).unwrap();
    let lowest = pm.admit("Search-4", 1, 60_000, 20, QueueKind::Ready).unwrap();

    // Easy runs three at a time
    pm.tick(Duration::from_millis(16));
    assert_eq!(pm.location(high), Some(QueueKind::Running));
    assert_eq!(pm.location(mid), Some(QueueKind::Running));
    assert_eq!(pm.location(low), Some(QueueKind::Running));
    assert_eq!(pm.location(lowest), Some(QueueKind::Ready));
}

#[test]
fn test_ready_promotion_fifo_among_equal_priorities() {
    let pm = manager(Difficulty::Medium);
    saturate_blocked(&pm);
    let first = pm.admit("Audio-1", 4, 60_000, 20, QueueKind::Ready).unwrap();
    let second = pm.admit("Video-2", 4, 60_000, 20, QueueKind::Ready).unwrap();
    let third = pm.admit("Sync-3", 4, 60_000, 20, QueueKind::Ready).unwrap();

    pm.tick(Duration::from_millis(16));
    assert_eq!(pm.location(first), Some(QueueKind::Running));
    assert_eq!(pm.location(second), Some(QueueKind::Running));
    assert_eq!(pm.location(third), Some(QueueKind::Ready));
}

#[test]
fn test_cpu_overload_ends_game_on_medium() {
    let pm = manager(Difficulty::Medium);
    saturate_blocked(&pm);
    // Two running at priority 5: 100 CPU points, at the limit
    pm.admit("Video-1", 5, 60_000, 50, QueueKind::Running).unwrap();
    pm.admit("Kernel-2", 5, 60_000, 50, QueueKind::Running).unwrap();

    pm.tick(Duration::from_millis(16));
    assert_eq!(pm.game_over(), Some(GameOverReason::CpuOverload));
    // Medium does not auto-terminate on overload
    assert_eq!(pm.queue_len(QueueKind::Running), 2);
}

#[test]
fn test_memory_overload_ends_game_on_medium() {
    let pm = manager(Difficulty::Medium);
    saturate_blocked(&pm);
    pm.admit("Video-1", 3, 60_000, 600, QueueKind::Running).unwrap();
    pm.admit("Memory-2", 3, 60_000, 600, QueueKind::Running).unwrap();

    pm.tick(Duration::from_millis(16));
    assert_eq!(pm.game_over(), Some(GameOverReason::MemoryOverload));
    assert_eq!(pm.total_processes(), 6);
}

#[test]
fn test_easy_overload_sheds_two_lowest_priority_running() {
    let pm = manager(Difficulty::Easy);
    saturate_blocked(&pm);
    // 900MB each at 0.4 memory multiplier: 1080 >= 1024
    let low = pm.admit("Backup-1", 2, 60_000, 900, QueueKind::Running).unwrap();
    let high = pm.admit("Kernel-2", 8, 60_000, 900, QueueKind::Running).unwrap();
    let mid = pm.admit("Audio-3", 5, 60_000, 900, QueueKind::Running).unwrap();

    pm.tick(Duration::from_millis(16));
    assert!(pm.game_over().is_none());
    assert_eq!(pm.location(low), None);
    assert_eq!(pm.location(mid), None);
    assert_eq!(pm.location(high), Some(QueueKind::Running));
    // Shed processes earn nothing
    assert_eq!(pm.score(), 0);
    assert_eq!(pm.processes_completed(), 0);
}

#[test]
fn test_selection_is_idempotent() {
    let pm = manager(Difficulty::Medium);
    let a = pm.admit("Audio-1", 5, 5_000, 50, QueueKind::Ready).unwrap();
    let b = pm.admit("Video-2", 5, 5_000, 50, QueueKind::Ready).unwrap();

    pm.select(Some(a));
    pm.select(Some(a));
    assert_eq!(pm.selected(), Some(a));
    assert!(pm.process(a).unwrap().is_selected());

    pm.select(Some(b));
    assert_eq!(pm.selected(), Some(b));
    assert!(!pm.process(a).unwrap().is_selected());

    pm.select(None);
    assert_eq!(pm.selected(), None);
    assert!(!pm.process(b).unwrap().is_selected());
}

#[test]
fn test_ticks_after_game_over_are_frozen() {
    let pm = manager(Difficulty::Medium);
    saturate_blocked(&pm);
    pm.admit("Video-1", 5, 60_000, 50, QueueKind::Running).unwrap();
    pm.admit("Kernel-2", 5, 60_000, 50, QueueKind::Running).unwrap();
    pm.tick(Duration::from_millis(16));
    assert!(pm.is_game_over());

    let clock = pm.elapsed();
    let score = pm.score();
    pm.tick(TICK);
    pm.tick(TICK);
    assert_eq!(pm.elapsed(), clock);
    assert_eq!(pm.score(), score);
}

#[test]
fn test_starved_ready_process_promoted_over_fresher_higher_priority() {
    let pm = manager(Difficulty::Easy);
    // Critical-named processes never roll interrupts, so RUNNING stays full
    // and deterministic while the READY process ages past the threshold
    let r1 = pm.admit("CRITICAL-1", 9, 600_000, 10, QueueKind::Running).unwrap();
    pm.admit("CRITICAL-2", 9, 600_000, 10, QueueKind::Running).unwrap();
    pm.admit("CRITICAL-3", 9, 600_000, 10, QueueKind::Running).unwrap();
    let starved = pm.admit("Backup-4", 1, 60_000, 10, QueueKind::Ready).unwrap();

    for _ in 0..101 {
        pm.tick(TICK);
    }
    assert_eq!(pm.location(starved), Some(QueueKind::Ready));

    let fresh = pm.admit("Kernel-5", 8, 60_000, 10, QueueKind::Ready).unwrap();
    pm.terminate(r1);
    pm.check_starvation();

    assert_eq!(pm.location(starved), Some(QueueKind::Running));
    assert_eq!(pm.location(fresh), Some(QueueKind::Ready));
}

#[test]
fn test_interrupt_round_trip_returns_to_running() {
    let pm = manager(Difficulty::Medium);
    let pid = pm.admit("Network-1", 1, 3_600_000, 20, QueueKind::Running).unwrap();

    // The interrupt and I/O-completion rolls are probabilistic; with a
    // fixed seed the trajectory is deterministic, and the per-second rates
    // make both events certain well within this horizon.
    let mut saw_blocked = false;
    for _ in 0..40_000 {
        pm.tick(TICK);
        match pm.location(pid) {
            Some(QueueKind::Blocked) => {
                saw_blocked = true;
                let p = pm.process(pid).unwrap();
                assert!(p.is_interrupted());
                assert!(p.interrupt_reason().is_some());
            }
            Some(QueueKind::Running) if saw_blocked => {
                assert!(!pm.process(pid).unwrap().is_interrupted());
                return;
            }
            _ => {}
        }
    }
    panic!("process never completed an interrupt round trip");
}
