/*!
 * Core Types
 * Common types and tuning constants used across the engine
 */

use std::time::Duration;

/// Process ID type
pub type Pid = u32;

/// Priority level (1-10, higher is more important)
pub type Priority = u8;

/// Score points
pub type Score = u32;

/// Common result type for engine lifecycle operations
pub type EngineResult<T> = Result<T, super::errors::EngineError>;

/// Lowest priority a process can hold
pub const PRIORITY_MIN: Priority = 1;

/// Highest priority a process can hold
pub const PRIORITY_MAX: Priority = 10;

/// Total CPU budget, in percentage points
pub const TOTAL_CPU: f32 = 100.0;

/// Total memory budget, in MB
pub const TOTAL_MEMORY_MB: f32 = 1024.0;

/// CPU cost per priority point for a running process
pub const CPU_WEIGHT_PER_PRIORITY: f32 = 10.0;

/// Memory weight for processes that are admitted but not running
pub const MEMORY_IDLE_WEIGHT: f32 = 0.5;

/// Score awarded per priority point when a process runs to completion
pub const COMPLETION_SCORE_PER_PRIORITY: Score = 100;

/// Chance per second that a running process raises an interrupt
pub const INTERRUPT_CHANCE_PER_SEC: f64 = 0.02;

/// Chance per second that an interrupted process finishes its I/O
pub const IO_COMPLETE_CHANCE_PER_SEC: f64 = 0.10;

/// Upper bound on a single tick delta, to absorb frame hitches
pub const MAX_TICK_DELTA: Duration = Duration::from_millis(100);

/// READY wait time beyond which a process counts as starved
pub const STARVATION_THRESHOLD: Duration = Duration::from_secs(10);

/// How often the starvation checker runs
pub const STARVATION_CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// Fixed capacity of the READY queue
pub const READY_CAPACITY: usize = 5;

/// Fixed capacity of the BLOCKED queue
pub const BLOCKED_CAPACITY: usize = 4;

/// Name prefix that designates an emergency process
pub const CRITICAL_PREFIX: &str = "CRITICAL-";

/// Name prefix for processes spawned as an escalation penalty
pub const WARNING_PREFIX: &str = "WARNING-";

/// Clamp a priority into the valid range
#[inline]
pub fn clamp_priority(value: i32) -> Priority {
    value.clamp(PRIORITY_MIN as i32, PRIORITY_MAX as i32) as Priority
}
