/*!
 * Emergency Protocol
 * Critical-process lifecycle: grace period, timeout escalation, and the
 * three-strike game-over rule
 */

use crate::core::types::Score;
use serde::Serialize;
use std::time::Duration;

/// Window after activation during which no penalty can fire, even when the
/// nominal timeout has elapsed
pub const GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Strikes before the session ends unconditionally
pub const MAX_STRIKES: u8 = 3;

/// Priority boost applied to a critical process on each escalation
pub const ESCALATION_PRIORITY_BOOST: i32 = 2;

/// Memory inflation factor applied to a critical process on each escalation
pub const ESCALATION_MEMORY_FACTOR: f32 = 1.5;

/// Score bonus when the operator gets a critical process running
pub const EMERGENCY_RUN_BONUS: Score = 500;

/// Score bonus when a critical process runs to completion
pub const EMERGENCY_COMPLETE_BONUS: Score = 1000;

/// Whether an emergency is in flight, keyed to the session's simulated clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyState {
    Inactive,
    Active {
        /// Sim-clock time the current timeout window opened
        since_ms: u64,
        timeout_ms: u64,
    },
}

/// Concrete consequences of one escalation strike, applied by the manager
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrikeEffect {
    /// Flat resource penalties (fractions of total) plus a score deduction
    Penalty {
        cpu_fraction: f32,
        memory_fraction: f32,
        score_deduction: Score,
        /// Second strike also spawns warning processes into RUNNING
        spawn_warnings: bool,
    },
    /// Third strike: unconditional game over
    GameOver,
}

/// Emergency/failure state machine. Owns the strike counter; the queue
/// manager routes every activation, resolution, and timeout through here.
#[derive(Debug, Clone, Copy)]
pub struct EmergencyProtocol {
    state: EmergencyState,
    strikes: u8,
}

impl Default for EmergencyProtocol {
    fn default() -> Self {
        Self {
            state: EmergencyState::Inactive,
            strikes: 0,
        }
    }
}

impl EmergencyProtocol {
    pub fn state(&self) -> EmergencyState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, EmergencyState::Active { .. })
    }

    pub fn strikes(&self) -> u8 {
        self.strikes
    }

    /// Activate on emergency generation
    pub fn activate(&mut self, now: Duration, timeout: Duration) {
        self.state = EmergencyState::Active {
            since_ms: now.as_millis() as u64,
            timeout_ms: timeout.as_millis() as u64,
        };
    }

    /// Successful handling: back to inactive, strikes forgiven
    pub fn resolve(&mut self) {
        self.state = EmergencyState::Inactive;
        self.strikes = 0;
    }

    /// Deactivate without forgiveness (operator killed the critical process,
    /// or it vanished unhandled)
    pub fn deactivate(&mut self) {
        self.state = EmergencyState::Inactive;
    }

    /// Whether the timeout has elapsed and the grace period is over. Both
    /// checks gate the penalty: inside the grace window nothing fires.
    pub fn timed_out(&self, now: Duration) -> bool {
        match self.state {
            EmergencyState::Inactive => false,
            EmergencyState::Active { since_ms, timeout_ms } => {
                let elapsed = now.as_millis() as u64 - since_ms;
                elapsed > timeout_ms && elapsed > GRACE_PERIOD.as_millis() as u64
            }
        }
    }

    /// Restart the timeout window after an escalation, so each miss fires
    /// exactly once
    pub fn restart_window(&mut self, now: Duration) {
        if let EmergencyState::Active { timeout_ms, .. } = self.state {
            self.state = EmergencyState::Active {
                since_ms: now.as_millis() as u64,
                timeout_ms,
            };
        }
    }

    /// Record one unresolved strike and return the effect to apply. The
    /// protocol only counts; score deductions, ledger penalties, and spawns
    /// are the manager's to carry out.
    pub fn record_strike(&mut self) -> StrikeEffect {
        self.strikes = self.strikes.saturating_add(1);
        match self.strikes {
            1 => StrikeEffect::Penalty {
                cpu_fraction: 0.20,
                memory_fraction: 0.15,
                score_deduction: 300,
                spawn_warnings: false,
            },
            2 => StrikeEffect::Penalty {
                cpu_fraction: 0.30,
                memory_fraction: 0.25,
                score_deduction: 500,
                spawn_warnings: true,
            },
            _ => StrikeEffect::GameOver,
        }
    }
}
