/*!
 * Resource Accountant
 * Derived CPU and memory usage, recomputed every tick from queue contents
 */

use crate::core::types::{CPU_WEIGHT_PER_PRIORITY, MEMORY_IDLE_WEIGHT, TOTAL_CPU, TOTAL_MEMORY_MB};
use crate::difficulty::DifficultyProfile;
use crate::queues::{QueueKind, QueueSet};
use serde::Serialize;

/// CPU and memory ledger. `used_*` is a derived value, recomputed from
/// current queue membership on every tick.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourceLedger {
    pub total_cpu: f32,
    pub used_cpu: f32,
    pub total_memory_mb: f32,
    pub used_memory_mb: f32,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self {
            total_cpu: TOTAL_CPU,
            used_cpu: 0.0,
            total_memory_mb: TOTAL_MEMORY_MB,
            used_memory_mb: 0.0,
        }
    }
}

impl ResourceLedger {
    /// Recompute usage from current queue membership.
    ///
    /// CPU is charged only for running processes, scaled by priority. Memory
    /// is charged for every admitted process; running processes count at
    /// full weight, the rest at a reduced fraction since they are not yet
    /// consuming their full footprint.
    pub fn recompute(
        &mut self,
        queues: &QueueSet,
        profile: &DifficultyProfile,
        difficulty_multiplier: f32,
    ) {
        let mut cpu = 0.0;
        for process in queues.queue(QueueKind::Running).iter() {
            cpu += process.priority() as f32
                * CPU_WEIGHT_PER_PRIORITY
                * profile.cpu_usage_multiplier
                * difficulty_multiplier;
        }

        let mut memory = 0.0;
        for kind in QueueKind::ALL {
            let weight = if kind == QueueKind::Running {
                1.0
            } else {
                MEMORY_IDLE_WEIGHT
            };
            for process in queues.queue(kind).iter() {
                memory += process.memory_mb() as f32
                    * profile.memory_usage_multiplier
                    * difficulty_multiplier
                    * weight;
            }
        }

        self.used_cpu = cpu;
        self.used_memory_mb = memory;
    }

    /// Escalation penalty as fractions of each total, added to the current
    /// usage. Overwritten by the next recompute; it never feeds the
    /// overload evaluation, which runs after recomputation.
    pub fn apply_penalty(&mut self, cpu_fraction: f32, memory_fraction: f32) {
        self.used_cpu += cpu_fraction * self.total_cpu;
        self.used_memory_mb += memory_fraction * self.total_memory_mb;
    }

    pub fn cpu_overloaded(&self) -> bool {
        self.used_cpu >= self.total_cpu
    }

    pub fn memory_overloaded(&self) -> bool {
        self.used_memory_mb >= self.total_memory_mb
    }

    /// Usage fraction helpers for the emergency generator's back-off check
    pub fn cpu_fraction(&self) -> f32 {
        self.used_cpu / self.total_cpu
    }

    pub fn memory_fraction(&self) -> f32 {
        self.used_memory_mb / self.total_memory_mb
    }
}
