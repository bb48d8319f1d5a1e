/*!
 * Session State
 * Score, counters, the simulated clock, and game-over bookkeeping
 */

use crate::core::types::{Pid, Score};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Fixed enumeration of terminal failure reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    CpuOverload,
    MemoryOverload,
    CriticalFailure,
    SystemCrash,
}

impl GameOverReason {
    pub fn message(self) -> &'static str {
        match self {
            GameOverReason::CpuOverload => "CPU OVERLOAD: System resources exhausted!",
            GameOverReason::MemoryOverload => "MEMORY OVERLOAD: Out of memory!",
            GameOverReason::CriticalFailure => {
                "CRITICAL FAILURE: Too many critical system processes ignored!"
            }
            GameOverReason::SystemCrash => "SYSTEM CRASH: Kernel panic!",
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Mutable per-session bookkeeping. All writes flow through the queue
/// manager's methods; this struct never leaves its lock.
#[derive(Debug, Default)]
pub struct SessionState {
    score: Score,
    completed: u32,
    emergencies_handled: u32,
    /// Simulated clock, advanced only by tick deltas. Grace periods,
    /// timeouts, and difficulty progression all read this clock.
    clock: Duration,
    game_over: Option<GameOverReason>,
    selected: Option<Pid>,
}

impl SessionState {
    pub fn score(&self) -> Score {
        self.score
    }

    pub fn add_score(&mut self, points: Score) {
        self.score = self.score.saturating_add(points);
    }

    /// Deduct points, floored at zero
    pub fn deduct_score(&mut self, points: Score) {
        self.score = self.score.saturating_sub(points);
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn record_completion(&mut self) {
        self.completed += 1;
    }

    pub fn emergencies_handled(&self) -> u32 {
        self.emergencies_handled
    }

    pub fn record_emergency_handled(&mut self) {
        self.emergencies_handled += 1;
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn advance_clock(&mut self, delta: Duration) {
        self.clock += delta;
    }

    pub fn game_over(&self) -> Option<GameOverReason> {
        self.game_over
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    /// Set the terminal state. The first reason wins; later calls are
    /// ignored so the reported cause stays stable.
    pub fn end_game(&mut self, reason: GameOverReason) {
        if self.game_over.is_none() {
            self.game_over = Some(reason);
        }
    }

    pub fn selected(&self) -> Option<Pid> {
        self.selected
    }

    pub fn set_selected(&mut self, pid: Option<Pid>) {
        self.selected = pid;
    }
}

/// Final results handed to the external score-persistence collaborator at
/// game over
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionSummary {
    pub score: Score,
    pub processes_completed: u32,
    pub emergencies_handled: u32,
    pub reason: String,
}

impl SessionSummary {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            score: state.score(),
            processes_completed: state.completed(),
            emergencies_handled: state.emergencies_handled(),
            reason: state
                .game_over()
                .map(|r| r.message().to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_floors_at_zero() {
        let mut state = SessionState::default();
        state.add_score(200);
        state.deduct_score(500);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_first_game_over_reason_wins() {
        let mut state = SessionState::default();
        state.end_game(GameOverReason::MemoryOverload);
        state.end_game(GameOverReason::CpuOverload);
        assert_eq!(state.game_over(), Some(GameOverReason::MemoryOverload));
    }

    #[test]
    fn test_summary_carries_reason_string() {
        let mut state = SessionState::default();
        state.add_score(700);
        state.record_completion();
        state.end_game(GameOverReason::CriticalFailure);
        let summary = SessionSummary::from_state(&state);
        assert_eq!(summary.score, 700);
        assert_eq!(summary.processes_completed, 1);
        assert!(summary.reason.starts_with("CRITICAL FAILURE"));
    }
}
