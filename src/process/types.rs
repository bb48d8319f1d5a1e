/*!
 * Process Types
 * State machine states and interrupt causes
 */

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Freshly created, not yet scheduled
    New,
    /// Eligible to run
    Ready,
    /// Consuming CPU budget
    Running,
    /// Waiting on an interrupt
    Blocked,
    /// Finished or killed; absorbing state
    Terminated,
}

impl ProcessState {
    pub fn label(self) -> &'static str {
        match self {
            ProcessState::New => "New",
            ProcessState::Ready => "Ready",
            ProcessState::Running => "Running",
            ProcessState::Blocked => "Blocked",
            ProcessState::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cause attached to a generated interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptReason {
    IoRequest,
    NetworkAccess,
    DiskOperation,
    UserInput,
    DeviceSignal,
}

impl InterruptReason {
    pub const ALL: [InterruptReason; 5] = [
        InterruptReason::IoRequest,
        InterruptReason::NetworkAccess,
        InterruptReason::DiskOperation,
        InterruptReason::UserInput,
        InterruptReason::DeviceSignal,
    ];

    /// Pick a random cause for a freshly generated interrupt
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn label(self) -> &'static str {
        match self {
            InterruptReason::IoRequest => "I/O Request",
            InterruptReason::NetworkAccess => "Network Access",
            InterruptReason::DiskOperation => "Disk Operation",
            InterruptReason::UserInput => "User Input",
            InterruptReason::DeviceSignal => "Device Signal",
        }
    }
}

impl fmt::Display for InterruptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Logical screen coordinate, owned by presentation but assigned by the core
/// when it lays processes out into queue slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
