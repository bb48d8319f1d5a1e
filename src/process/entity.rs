/*!
 * Process Entity
 * Per-process attributes, timers, and interrupt flags
 */

use super::types::{InterruptReason, ProcessState, Vec2};
use crate::core::types::{clamp_priority, Pid, Priority, CRITICAL_PREFIX};
use serde::Serialize;
use std::time::Duration;

/// A unit of simulated work.
///
/// State transitions are driven by the queue manager; the entity only
/// enforces the local invariants: priority stays clamped, the CPU timer
/// never goes negative, and `Terminated` is absorbing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    pid: Pid,
    name: String,
    state: ProcessState,
    priority: Priority,
    burst_ms: u64,
    remaining_ms: u64,
    memory_mb: u32,
    created_at_ms: u64,
    critical: bool,
    interrupted: bool,
    interrupt_reason: Option<InterruptReason>,
    io_completed: bool,
    selected: bool,
    position: Vec2,
    target: Vec2,
}

impl Process {
    pub fn new(
        pid: Pid,
        name: impl Into<String>,
        priority: Priority,
        burst_ms: u64,
        memory_mb: u32,
        created_at: Duration,
    ) -> Self {
        let name = name.into();
        let critical = name.starts_with(CRITICAL_PREFIX);
        Self {
            pid,
            name,
            state: ProcessState::New,
            priority: clamp_priority(priority as i32),
            burst_ms,
            remaining_ms: burst_ms,
            memory_mb,
            created_at_ms: created_at.as_millis() as u64,
            critical,
            interrupted: false,
            interrupt_reason: None,
            io_completed: false,
            selected: false,
            position: Vec2::default(),
            target: Vec2::default(),
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Set the lifecycle state. `Terminated` is absorbing: once reached, no
    /// further transitions are accepted.
    pub fn set_state(&mut self, state: ProcessState) {
        if self.state == ProcessState::Terminated {
            return;
        }
        self.state = state;
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Mutate priority, clamped to the valid range on every call
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = clamp_priority(priority);
    }

    pub fn burst_ms(&self) -> u64 {
        self.burst_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn memory_mb(&self) -> u32 {
        self.memory_mb
    }

    pub fn set_memory_mb(&mut self, memory_mb: u32) {
        self.memory_mb = memory_mb;
    }

    pub fn created_at(&self) -> Duration {
        Duration::from_millis(self.created_at_ms)
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn interrupt_reason(&self) -> Option<InterruptReason> {
        self.interrupt_reason
    }

    pub fn is_io_completed(&self) -> bool {
        self.io_completed
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Burn CPU time while running. Returns true when the burst is exhausted.
    /// The remaining time saturates at zero and never goes negative.
    pub fn consume_cpu(&mut self, delta_ms: u64) -> bool {
        debug_assert_eq!(self.state, ProcessState::Running);
        self.remaining_ms = self.remaining_ms.saturating_sub(delta_ms);
        self.remaining_ms == 0
    }

    /// Flag an interrupt with its cause. The queue manager moves the process
    /// to the blocked queue as part of the same transition.
    pub fn raise_interrupt(&mut self, reason: InterruptReason) {
        self.interrupted = true;
        self.interrupt_reason = Some(reason);
        self.io_completed = false;
    }

    /// Mark the pending I/O as done; the process blinks as promotable until
    /// the manager picks it up.
    pub fn complete_io(&mut self) {
        self.io_completed = true;
    }

    /// Clear interrupt bookkeeping when the process leaves the blocked queue
    pub fn clear_interrupt(&mut self) {
        self.interrupted = false;
        self.interrupt_reason = None;
        self.io_completed = false;
    }

    /// Fraction of the burst still outstanding, for presentation gauges
    pub fn remaining_fraction(&self) -> f32 {
        if self.burst_ms == 0 {
            return 0.0;
        }
        (self.remaining_ms as f32 / self.burst_ms as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(name: &str, priority: Priority, burst_ms: u64) -> Process {
        Process::new(1, name, priority, burst_ms, 100, Duration::ZERO)
    }

    #[test]
    fn test_critical_detection_by_name_prefix() {
        assert!(proc("CRITICAL-42", 9, 3000).is_critical());
        assert!(!proc("Browser-42", 3, 3000).is_critical());
        assert!(!proc("WARNING-7", 4, 8000).is_critical());
    }

    #[test]
    fn test_priority_clamped_on_construction_and_mutation() {
        let mut p = proc("Audio-1", 10, 1000);
        p.set_priority(15);
        assert_eq!(p.priority(), 10);
        p.set_priority(-3);
        assert_eq!(p.priority(), 1);
    }

    #[test]
    fn test_cpu_timer_saturates_at_zero() {
        let mut p = proc("Video-9", 5, 100);
        p.set_state(ProcessState::Running);
        assert!(!p.consume_cpu(60));
        assert_eq!(p.remaining_ms(), 40);
        assert!(p.consume_cpu(500));
        assert_eq!(p.remaining_ms(), 0);
    }

    #[test]
    fn test_terminated_is_absorbing() {
        let mut p = proc("Kernel-3", 5, 1000);
        p.set_state(ProcessState::Terminated);
        p.set_state(ProcessState::Ready);
        assert_eq!(p.state(), ProcessState::Terminated);
    }

    #[test]
    fn test_interrupt_roundtrip_clears_flags() {
        let mut p = proc("Network-5", 5, 1000);
        p.raise_interrupt(InterruptReason::DiskOperation);
        assert!(p.is_interrupted());
        assert_eq!(p.interrupt_reason(), Some(InterruptReason::DiskOperation));
        p.complete_io();
        assert!(p.is_io_completed());
        p.clear_interrupt();
        assert!(!p.is_interrupted());
        assert!(!p.is_io_completed());
        assert_eq!(p.interrupt_reason(), None);
    }
}
