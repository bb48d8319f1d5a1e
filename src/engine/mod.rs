/*!
 * Engine Module
 * Queue manager, background workers, and the collaborator seams
 */

mod manager;
mod workers;

pub use manager::{ProcessManager, ProcessManagerBuilder};
pub use workers::WorkerSet;

use crate::core::types::Pid;
use crate::difficulty::Difficulty;
use crate::queues::QueueKind;
use crate::resources::ResourceLedger;
use crate::session::GameOverReason;
use serde::Serialize;

/// Seam for the external haptic/alert collaborator. The engine signals
/// emergency lifecycle events; implementations vibrate, flash, or do
/// nothing at all.
pub trait AlertSink: Send + Sync {
    fn emergency_raised(&self, pid: Pid);
    fn emergency_escalated(&self, strikes: u8);
    fn emergency_resolved(&self) {}
}

/// Default sink that swallows every alert
#[derive(Debug, Default)]
pub struct NoopAlert;

impl AlertSink for NoopAlert {
    fn emergency_raised(&self, _pid: Pid) {}
    fn emergency_escalated(&self, _strikes: u8) {}
}

/// One queue's contents as seen by the renderer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueSnapshot {
    pub kind: QueueKind,
    pub capacity: usize,
    pub processes: Vec<crate::process::Process>,
}

/// A consistent view of the whole engine, taken once per frame by the
/// rendering collaborator
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineSnapshot {
    pub difficulty: Difficulty,
    pub clock_ms: u64,
    pub queues: Vec<QueueSnapshot>,
    pub resources: ResourceLedger,
    pub score: u32,
    pub processes_completed: u32,
    pub emergencies_handled: u32,
    pub emergency_active: bool,
    pub game_over: Option<GameOverReason>,
    pub selected: Option<Pid>,
}
