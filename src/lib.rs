/*!
 * Commander Kernel Library
 * Process-scheduling simulation engine exposed as a library
 */

pub mod core;
pub mod difficulty;
pub mod emergency;
pub mod engine;
pub mod process;
pub mod queues;
pub mod resources;
pub mod session;

// Re-exports
pub use crate::core::{EngineError, EngineResult, Pid, Priority, Score};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use emergency::{EmergencyProtocol, EmergencyState, StrikeEffect};
pub use engine::{
    AlertSink, EngineSnapshot, NoopAlert, ProcessManager, ProcessManagerBuilder, QueueSnapshot,
    WorkerSet,
};
pub use process::{InterruptReason, Process, ProcessState};
pub use queues::{BoundedQueue, QueueKind, QueueSet};
pub use resources::ResourceLedger;
pub use session::{GameOverReason, SessionState, SessionSummary};
