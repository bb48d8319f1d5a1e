/*!
 * Difficulty Model
 * Per-tier resource multipliers, caps, intervals, and progression curves
 *
 * Easy and hard ramp their difficulty multiplier with elapsed session time
 * (capped); medium has no progression. Arrival attribute ranges also widen
 * or tighten as a function of elapsed minutes, per tier.
 */

use crate::core::errors::EngineError;
use crate::core::types::Priority;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Session difficulty, supplied at construction from external settings and
/// immutable for the session lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(EngineError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Fixed per-tier tuning
#[derive(Debug, Clone, Copy)]
pub struct DifficultyProfile {
    pub cpu_usage_multiplier: f32,
    pub memory_usage_multiplier: f32,
    pub max_processes: usize,
    pub max_running: usize,
    /// Min/max wait between emergency events
    pub emergency_interval_min: Duration,
    pub emergency_interval_max: Duration,
    /// How long an active emergency may sit unhandled before escalating
    pub emergency_timeout: Duration,
    pub emergency_priority: Priority,
    pub emergency_burst_ms: (u64, u64),
    pub emergency_memory_mb: (u32, u32),
    /// Wait between arrival-generator cycles
    pub arrival_interval: Duration,
    /// Difficulty multiplier growth per elapsed minute
    pub ramp_per_minute: f32,
    /// Ceiling on the difficulty multiplier
    pub ramp_cap: f32,
}

const EASY: DifficultyProfile = DifficultyProfile {
    cpu_usage_multiplier: 0.3,
    memory_usage_multiplier: 0.4,
    max_processes: 6,
    max_running: 3,
    emergency_interval_min: Duration::from_secs(45),
    emergency_interval_max: Duration::from_secs(90),
    emergency_timeout: Duration::from_secs(20),
    emergency_priority: 8,
    emergency_burst_ms: (5_000, 9_000),
    emergency_memory_mb: (50, 100),
    arrival_interval: Duration::from_secs(7),
    ramp_per_minute: 0.05,
    ramp_cap: 2.0,
};

const MEDIUM: DifficultyProfile = DifficultyProfile {
    cpu_usage_multiplier: 1.0,
    memory_usage_multiplier: 1.0,
    max_processes: 15,
    max_running: 2,
    emergency_interval_min: Duration::from_secs(15),
    emergency_interval_max: Duration::from_secs(45),
    emergency_timeout: Duration::from_secs(15),
    emergency_priority: 9,
    emergency_burst_ms: (2_000, 5_000),
    emergency_memory_mb: (50, 150),
    arrival_interval: Duration::from_secs(5),
    ramp_per_minute: 0.0,
    ramp_cap: 1.0,
};

const HARD: DifficultyProfile = DifficultyProfile {
    cpu_usage_multiplier: 1.2,
    memory_usage_multiplier: 1.1,
    max_processes: 15,
    max_running: 2,
    emergency_interval_min: Duration::from_secs(12),
    emergency_interval_max: Duration::from_secs(30),
    emergency_timeout: Duration::from_secs(10),
    emergency_priority: 10,
    emergency_burst_ms: (1_000, 4_000),
    emergency_memory_mb: (100, 250),
    arrival_interval: Duration::from_secs(4),
    ramp_per_minute: 0.1,
    ramp_cap: 2.5,
};

impl Difficulty {
    pub fn profile(self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }

    /// Progressive difficulty multiplier at the given elapsed session time
    pub fn multiplier_at(self, elapsed: Duration) -> f32 {
        let profile = self.profile();
        let minutes = elapsed.as_secs_f32() / 60.0;
        (1.0 + minutes * profile.ramp_per_minute).min(profile.ramp_cap)
    }

    /// Effective cap on total admitted processes. Easy mode grows the cap by
    /// one every five minutes after minute five, up to four extra.
    pub fn max_processes_at(self, elapsed: Duration) -> usize {
        let base = self.profile().max_processes;
        if self != Difficulty::Easy {
            return base;
        }
        let minutes = elapsed.as_secs_f32() / 60.0;
        if minutes > 5.0 {
            base + ((minutes / 5.0) as usize).min(4)
        } else {
            base
        }
    }

    /// Effective cap on concurrently running processes. Easy mode shrinks it
    /// by one every five minutes after minute ten, floored at two.
    pub fn max_running_at(self, elapsed: Duration) -> usize {
        let base = self.profile().max_running;
        if self != Difficulty::Easy {
            return base;
        }
        let minutes = elapsed.as_secs_f32() / 60.0;
        if minutes > 10.0 {
            let reduction = ((minutes - 10.0) / 5.0) as usize;
            base.saturating_sub(reduction).max(2)
        } else {
            base
        }
    }
}

/// Name pool for generated processes
pub const PROCESS_NAMES: [&str; 15] = [
    "Browser", "FileSystem", "Network", "Audio", "Video", "SystemUI", "Kernel", "Memory",
    "Update", "Security", "Backup", "Search", "Sync", "Bluetooth", "Wifi",
];

/// Randomized attributes for a generated arrival
#[derive(Debug, Clone)]
pub struct ArrivalPlan {
    pub name: String,
    pub priority: Priority,
    pub burst_ms: u64,
    pub memory_mb: u32,
}

/// Roll arrival attributes from difficulty-dependent and
/// elapsed-time-dependent ranges
pub fn roll_arrival<R: Rng + ?Sized>(
    difficulty: Difficulty,
    elapsed: Duration,
    rng: &mut R,
) -> ArrivalPlan {
    let minutes = elapsed.as_secs_f32() / 60.0;
    let name = format!(
        "{}-{}",
        PROCESS_NAMES[rng.gen_range(0..PROCESS_NAMES.len())],
        rng.gen_range(0..100)
    );

    let priority = match difficulty {
        Difficulty::Easy if minutes < 3.0 => rng.gen_range(1..=3),
        Difficulty::Easy if minutes < 8.0 => rng.gen_range(1..=4),
        Difficulty::Easy => rng.gen_range(1..=5),
        Difficulty::Hard if minutes < 2.0 => rng.gen_range(1..=6),
        Difficulty::Hard if minutes < 5.0 => rng.gen_range(2..=8),
        Difficulty::Hard => rng.gen_range(3..=8),
        Difficulty::Medium => rng.gen_range(1..=8),
    };

    let burst_secs = match difficulty {
        Difficulty::Easy if minutes < 5.0 => rng.gen_range(7..=12),
        Difficulty::Easy => rng.gen_range(5..=10),
        Difficulty::Hard if minutes < 3.0 => rng.gen_range(4..=8),
        Difficulty::Hard => rng.gen_range(3..=7),
        Difficulty::Medium => rng.gen_range(3..=10),
    };

    let memory_mb = match difficulty {
        Difficulty::Easy if minutes < 5.0 => rng.gen_range(40..=120),
        Difficulty::Easy => rng.gen_range(50..=150),
        Difficulty::Hard if minutes < 3.0 => rng.gen_range(70..=170),
        Difficulty::Hard => rng.gen_range(100..=250),
        Difficulty::Medium => rng.gen_range(75..=225),
    };

    ArrivalPlan {
        name,
        priority,
        burst_ms: burst_secs * 1000,
        memory_mb,
    }
}

/// Roll attributes for an emergency (critical) process
pub fn roll_emergency<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> ArrivalPlan {
    let profile = difficulty.profile();
    let (burst_min, burst_max) = profile.emergency_burst_ms;
    let (mem_min, mem_max) = profile.emergency_memory_mb;
    ArrivalPlan {
        name: format!("CRITICAL-{}", rng.gen_range(0..100)),
        priority: profile.emergency_priority,
        burst_ms: rng.gen_range(burst_min..=burst_max),
        memory_mb: rng.gen_range(mem_min..=mem_max),
    }
}

/// Roll the wait before the next emergency event
pub fn roll_emergency_interval<R: Rng + ?Sized>(
    difficulty: Difficulty,
    rng: &mut R,
) -> Duration {
    let profile = difficulty.profile();
    let min = profile.emergency_interval_min.as_millis() as u64;
    let max = profile.emergency_interval_max.as_millis() as u64;
    Duration::from_millis(rng.gen_range(min..=max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_medium_has_no_progression() {
        assert_eq!(Difficulty::Medium.multiplier_at(Duration::ZERO), 1.0);
        assert_eq!(
            Difficulty::Medium.multiplier_at(Duration::from_secs(3600)),
            1.0
        );
    }

    #[test]
    fn test_easy_ramp_capped_at_two() {
        let m5 = Difficulty::Easy.multiplier_at(Duration::from_secs(300));
        assert!((m5 - 1.25).abs() < 1e-4);
        let m60 = Difficulty::Easy.multiplier_at(Duration::from_secs(3600));
        assert_eq!(m60, 2.0);
    }

    #[test]
    fn test_hard_ramp_capped_at_two_and_a_half() {
        let m10 = Difficulty::Hard.multiplier_at(Duration::from_secs(600));
        assert!((m10 - 2.0).abs() < 1e-4);
        let m60 = Difficulty::Hard.multiplier_at(Duration::from_secs(3600));
        assert_eq!(m60, 2.5);
    }

    #[test]
    fn test_easy_process_cap_growth() {
        assert_eq!(Difficulty::Easy.max_processes_at(Duration::ZERO), 6);
        assert_eq!(Difficulty::Easy.max_processes_at(Duration::from_secs(6 * 60)), 7);
        assert_eq!(Difficulty::Easy.max_processes_at(Duration::from_secs(60 * 60)), 10);
    }

    #[test]
    fn test_easy_running_cap_shrinks_after_ten_minutes() {
        assert_eq!(Difficulty::Easy.max_running_at(Duration::from_secs(60)), 3);
        assert_eq!(Difficulty::Easy.max_running_at(Duration::from_secs(16 * 60)), 2);
        // Floored at two no matter how long the session runs
        assert_eq!(Difficulty::Easy.max_running_at(Duration::from_secs(120 * 60)), 2);
    }

    #[test]
    fn test_arrival_ranges_respect_tier_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let plan = roll_arrival(Difficulty::Medium, Duration::ZERO, &mut rng);
            assert!((1..=8).contains(&plan.priority));
            assert!((3_000..=10_000).contains(&plan.burst_ms));
            assert!((75..=225).contains(&plan.memory_mb));
        }
    }

    #[test]
    fn test_emergency_plan_is_critical_tagged() {
        let mut rng = StdRng::seed_from_u64(7);
        let plan = roll_emergency(Difficulty::Hard, &mut rng);
        assert!(plan.name.starts_with("CRITICAL-"));
        assert_eq!(plan.priority, 10);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!("nightmare".parse::<Difficulty>().is_err());
    }
}
