/*!
 * Queue Manager
 * Owns the four process queues, the wait-time map, and all session state
 *
 * Every mutation - operator commands, background generators, and the
 * per-tick update pass - flows through methods on `ProcessManager`, which
 * guard a single lock around the queues and session. Workers never touch
 * fields directly, so one synchronization boundary covers the whole engine.
 */

use super::workers::WorkerSet;
use super::{AlertSink, EngineSnapshot, NoopAlert, QueueSnapshot};
use crate::core::types::{
    EngineResult, Pid, Priority, Score, COMPLETION_SCORE_PER_PRIORITY, INTERRUPT_CHANCE_PER_SEC,
    IO_COMPLETE_CHANCE_PER_SEC, MAX_TICK_DELTA, STARVATION_THRESHOLD, WARNING_PREFIX,
};
use crate::core::EngineError;
use crate::difficulty::{self, Difficulty};
use crate::emergency::{
    EmergencyProtocol, StrikeEffect, EMERGENCY_COMPLETE_BONUS, EMERGENCY_RUN_BONUS,
    ESCALATION_MEMORY_FACTOR, ESCALATION_PRIORITY_BOOST,
};
use crate::process::{InterruptReason, Process, ProcessState};
use crate::queues::{layout, QueueKind, QueueSet};
use crate::resources::ResourceLedger;
use crate::session::{GameOverReason, SessionState, SessionSummary};
use dashmap::DashMap;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Attributes a warning process spawned by the second escalation strike
const WARNING_PRIORITY: Priority = 4;
const WARNING_BURST_MS: u64 = 8_000;
const WARNING_MEMORY_MB: u32 = 120;

/// Everything behind the single lock
struct Inner {
    queues: QueueSet,
    session: SessionState,
    emergency: EmergencyProtocol,
    ledger: ResourceLedger,
    difficulty_multiplier: f32,
}

/// The scheduling/resource-simulation engine.
///
/// Cheap to clone: clones share the same underlying state, which is how the
/// background workers and the tick driver all reach the same session.
pub struct ProcessManager {
    difficulty: Difficulty,
    inner: Arc<RwLock<Inner>>,
    /// Pid -> sim-clock time of entry into READY, read by the starvation
    /// checker concurrently with moves
    wait_since: Arc<DashMap<Pid, Duration>>,
    rng: Arc<Mutex<StdRng>>,
    next_pid: Arc<AtomicU32>,
    alert: Arc<dyn AlertSink>,
    workers: Arc<Mutex<Option<WorkerSet>>>,
}

impl Clone for ProcessManager {
    fn clone(&self) -> Self {
        Self {
            difficulty: self.difficulty,
            inner: Arc::clone(&self.inner),
            wait_since: Arc::clone(&self.wait_since),
            rng: Arc::clone(&self.rng),
            next_pid: Arc::clone(&self.next_pid),
            alert: Arc::clone(&self.alert),
            workers: Arc::clone(&self.workers),
        }
    }
}

/// Builder for ProcessManager
pub struct ProcessManagerBuilder {
    difficulty: Difficulty,
    seed: Option<u64>,
    alert: Arc<dyn AlertSink>,
}

impl ProcessManagerBuilder {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            seed: None,
            alert: Arc::new(NoopAlert),
        }
    }

    /// Seed the generator RNG for deterministic sessions (tests)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Attach the haptic/alert collaborator
    pub fn with_alert(mut self, alert: Arc<dyn AlertSink>) -> Self {
        self.alert = alert;
        self
    }

    pub fn build(self) -> ProcessManager {
        let profile = self.difficulty.profile();
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "Queue manager initialized: difficulty={:?}, max_processes={}, max_running={}",
            self.difficulty, profile.max_processes, profile.max_running
        );

        ProcessManager {
            difficulty: self.difficulty,
            inner: Arc::new(RwLock::new(Inner {
                queues: QueueSet::new(profile.max_processes, profile.max_running),
                session: SessionState::default(),
                emergency: EmergencyProtocol::default(),
                ledger: ResourceLedger::default(),
                difficulty_multiplier: 1.0,
            })),
            wait_since: Arc::new(DashMap::new()),
            rng: Arc::new(Mutex::new(rng)),
            next_pid: Arc::new(AtomicU32::new(1)),
            alert: self.alert,
            workers: Arc::new(Mutex::new(None)),
        }
    }
}

impl ProcessManager {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::builder(difficulty).build()
    }

    pub fn builder(difficulty: Difficulty) -> ProcessManagerBuilder {
        ProcessManagerBuilder::new(difficulty)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn allocate_pid(&self) -> Pid {
        self.next_pid.fetch_add(1, Ordering::SeqCst)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Spawn the three background workers (arrival, emergency, starvation).
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> EngineResult<()> {
        let mut slot = self.workers.lock();
        if slot.is_some() {
            return Err(EngineError::AlreadyRunning);
        }
        *slot = Some(WorkerSet::spawn(self.clone()));
        Ok(())
    }

    /// Signal all workers to stop and join them. Idempotent: calling twice,
    /// or without a prior start, is a no-op.
    pub async fn shutdown(&self) {
        let set = self.workers.lock().take();
        if let Some(set) = set {
            set.shutdown().await;
        }
    }

    // ------------------------------------------------------------------
    // Operator commands
    // ------------------------------------------------------------------

    /// Move a process to the named queue. Removes it from whichever queue
    /// holds it and inserts into the target only when below capacity;
    /// otherwise no-op. Unknown pids are no-ops, never errors. Recomputes
    /// slot targets for all queues after a successful move.
    pub fn move_to(&self, kind: QueueKind, pid: Pid) -> bool {
        let mut guard = self.inner.write();
        self.move_to_locked(&mut guard, kind, pid)
    }

    fn move_to_locked(&self, inner: &mut Inner, kind: QueueKind, pid: Pid) -> bool {
        if inner.queues.location(pid) == Some(kind) {
            return false;
        }
        if inner.queues.queue(kind).is_full() {
            debug!("move of pid {} rejected: {} is full", pid, kind);
            return false;
        }
        let Some((from, mut process)) = inner.queues.take(pid) else {
            return false;
        };

        // Any exit from BLOCKED ends the interrupt, including operator
        // moves straight to RUNNING; stale flags would exclude the process
        // from future interrupt rolls.
        if from == QueueKind::Blocked {
            process.clear_interrupt();
        }
        process.set_state(kind.state());

        if from == QueueKind::Ready {
            self.wait_since.remove(&pid);
        }
        if kind == QueueKind::Ready {
            self.wait_since.insert(pid, inner.session.clock());
        }

        if let Err(process) = inner.queues.queue_mut(kind).push(process) {
            // Capacity was checked above; restore and report the failed move
            self.wait_since.remove(&pid);
            inner.queues.queue_mut(from).push_reserved(process);
            return false;
        }
        layout::assign_targets(&mut inner.queues);
        debug!("pid {} moved {} -> {}", pid, from, kind);
        true
    }

    /// Select a process (or deselect with None). Re-selecting the same
    /// process leaves the selection unchanged.
    pub fn select(&self, pid: Option<Pid>) {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        if let Some(previous) = inner.session.selected() {
            if let Some((_, p)) = inner.queues.find_mut(previous) {
                p.set_selected(false);
            }
        }
        let selected = pid.and_then(|pid| {
            let (_, p) = inner.queues.find_mut(pid)?;
            p.set_selected(true);
            Some(pid)
        });
        inner.session.set_selected(selected);
    }

    pub fn increase_priority(&self, pid: Pid) {
        self.adjust_priority(pid, 1);
    }

    pub fn decrease_priority(&self, pid: Pid) {
        self.adjust_priority(pid, -1);
    }

    fn adjust_priority(&self, pid: Pid, delta: i32) {
        let mut guard = self.inner.write();
        if let Some((_, p)) = guard.queues.find_mut(pid) {
            p.set_priority(p.priority() as i32 + delta);
        }
    }

    /// Explicit operator termination. Removes the process from all
    /// collections; killing a critical process during an active emergency
    /// counts as an unresolved strike.
    pub fn terminate(&self, pid: Pid) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let Some((from, mut process)) = inner.queues.take(pid) else {
            return false;
        };
        process.set_state(ProcessState::Terminated);
        self.wait_since.remove(&pid);
        if inner.session.selected() == Some(pid) {
            inner.session.set_selected(None);
        }
        info!("pid {} ({}) terminated by operator from {}", pid, process.name(), from);

        if process.is_critical() && inner.emergency.is_active() {
            warn!("critical process {} killed during active emergency", pid);
            inner.emergency.deactivate();
            self.apply_strike(inner);
        }
        layout::assign_targets(&mut inner.queues);
        true
    }

    /// Place a process with the given attributes straight into a queue,
    /// respecting its capacity. This is the creation-time placement path;
    /// it also serves embedders that build synthetic populations.
    pub fn admit(
        &self,
        name: &str,
        priority: Priority,
        burst_ms: u64,
        memory_mb: u32,
        kind: QueueKind,
    ) -> Option<Pid> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let pid = self.allocate_pid();
        let mut process = Process::new(pid, name, priority, burst_ms, memory_mb, inner.session.clock());
        process.set_state(kind.state());
        match inner.queues.queue_mut(kind).push(process) {
            Ok(()) => {
                if kind == QueueKind::Ready {
                    self.wait_since.insert(pid, inner.session.clock());
                }
                layout::assign_targets(&mut inner.queues);
                Some(pid)
            }
            Err(_) => None,
        }
    }

    // ------------------------------------------------------------------
    // Background generators (invoked by the workers)
    // ------------------------------------------------------------------

    /// Create a new randomized process in the NEW collection. No-op when
    /// the session is over or the population is at its cap.
    pub fn generate_arrival(&self) -> Option<Pid> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        if inner.session.is_game_over() {
            return None;
        }
        let now = inner.session.clock();
        let cap = self.difficulty.max_processes_at(now);
        inner.queues.queue_mut(QueueKind::New).set_capacity(cap);
        if inner.queues.total_len() >= cap {
            return None;
        }

        let plan = difficulty::roll_arrival(self.difficulty, now, &mut *self.rng.lock());
        let pid = self.allocate_pid();
        let process = Process::new(pid, &plan.name, plan.priority, plan.burst_ms, plan.memory_mb, now);
        match inner.queues.queue_mut(QueueKind::New).push(process) {
            Ok(()) => {
                layout::assign_targets(&mut inner.queues);
                debug!(
                    "arrival: pid {} {} (priority {}, burst {}ms, {}MB)",
                    pid, plan.name, plan.priority, plan.burst_ms, plan.memory_mb
                );
                Some(pid)
            }
            Err(_) => None,
        }
    }

    /// Create a critical process in the emergency area (forced BLOCKED,
    /// reserved placement) and activate the emergency protocol. No-op when
    /// one is already active or the session is over.
    pub fn generate_emergency(&self) -> Option<Pid> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        if inner.session.is_game_over() || inner.emergency.is_active() {
            return None;
        }
        let now = inner.session.clock();
        let plan = difficulty::roll_emergency(self.difficulty, &mut *self.rng.lock());
        let pid = self.allocate_pid();
        let mut process = Process::new(pid, &plan.name, plan.priority, plan.burst_ms, plan.memory_mb, now);
        process.set_state(ProcessState::Blocked);
        process.set_position(layout::emergency_spawn());
        process.set_target(layout::emergency_spawn());
        inner.queues.queue_mut(QueueKind::Blocked).push_reserved(process);
        inner
            .emergency
            .activate(now, self.difficulty.profile().emergency_timeout);
        warn!(
            "EMERGENCY: pid {} {} spawned (priority {}, timeout {:?})",
            pid,
            plan.name,
            plan.priority,
            self.difficulty.profile().emergency_timeout
        );
        self.alert.emergency_raised(pid);
        Some(pid)
    }

    /// Promote READY processes that have waited past the starvation
    /// threshold, through the standard move path (capacity-bounded).
    pub fn check_starvation(&self) {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        if inner.session.is_game_over() {
            return;
        }
        let now = inner.session.clock();
        let starved: Vec<Pid> = self
            .wait_since
            .iter()
            .filter(|entry| now.saturating_sub(*entry.value()) > STARVATION_THRESHOLD)
            .map(|entry| *entry.key())
            .collect();
        for pid in starved {
            if inner.queues.location(pid) != Some(QueueKind::Ready) {
                // Stale wait entry; moves keep the map in sync but a
                // terminated process may race the checker
                self.wait_since.remove(&pid);
                continue;
            }
            if self.move_to_locked(inner, QueueKind::Running, pid) {
                info!("pid {} starved in READY, force-promoted to RUNNING", pid);
            }
        }
    }

    // ------------------------------------------------------------------
    // Tick protocol
    // ------------------------------------------------------------------

    /// The single per-frame entry point. Step ordering is load-bearing;
    /// see the inline numbering.
    pub fn tick(&self, delta: Duration) {
        let delta = delta.min(MAX_TICK_DELTA);
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        if inner.session.is_game_over() {
            return;
        }

        // 1. Advance the clock; recompute the difficulty multiplier and the
        //    caps it drives.
        inner.session.advance_clock(delta);
        let now = inner.session.clock();
        inner.difficulty_multiplier = self.difficulty.multiplier_at(now);
        inner
            .queues
            .queue_mut(QueueKind::Running)
            .set_capacity(self.difficulty.max_running_at(now));
        inner
            .queues
            .queue_mut(QueueKind::New)
            .set_capacity(self.difficulty.max_processes_at(now));

        // 2. Emergency timeout, gated by the grace period.
        if inner.emergency.timed_out(now) {
            self.escalate_emergency(inner, now);
        }

        // 3. Advance RUNNING processes: burn CPU, roll interrupts.
        let delta_ms = delta.as_millis() as u64;
        let dt = delta.as_secs_f64();
        let mut completed: Vec<Pid> = Vec::new();
        let mut interrupts: Vec<(Pid, InterruptReason)> = Vec::new();
        {
            let mut blocked_room = {
                let blocked = inner.queues.queue(QueueKind::Blocked);
                blocked.capacity().saturating_sub(blocked.len())
            };
            let interrupt_chance =
                (INTERRUPT_CHANCE_PER_SEC * inner.difficulty_multiplier as f64 * dt).min(1.0);
            let mut rng = self.rng.lock();
            for process in inner.queues.queue_mut(QueueKind::Running).iter_mut() {
                if process.consume_cpu(delta_ms) {
                    completed.push(process.pid());
                    continue;
                }
                if !process.is_critical()
                    && !process.is_interrupted()
                    && blocked_room > 0
                    && rng.gen_bool(interrupt_chance)
                {
                    interrupts.push((process.pid(), InterruptReason::random(&mut *rng)));
                    blocked_room -= 1;
                }
            }
        }
        for (pid, reason) in interrupts {
            if let Some((_, process)) = inner.queues.find_mut(pid) {
                process.raise_interrupt(reason);
                debug!("pid {} interrupted: {}", pid, reason);
            }
            if !self.move_to_locked(inner, QueueKind::Blocked, pid) {
                if let Some((_, process)) = inner.queues.find_mut(pid) {
                    process.clear_interrupt();
                }
            }
        }

        // 4. Terminate completed processes and award their score.
        let mut critical_completed = false;
        for pid in completed {
            if let Some((_, mut process)) = inner.queues.take(pid) {
                process.set_state(ProcessState::Terminated);
                inner
                    .session
                    .add_score(process.priority() as Score * COMPLETION_SCORE_PER_PRIORITY);
                inner.session.record_completion();
                self.wait_since.remove(&pid);
                if inner.session.selected() == Some(pid) {
                    inner.session.set_selected(None);
                }
                if process.is_critical() {
                    critical_completed = true;
                }
                info!(
                    "pid {} ({}) completed, +{} points",
                    pid,
                    process.name(),
                    process.priority() as Score * COMPLETION_SCORE_PER_PRIORITY
                );
            }
        }
        layout::assign_targets(&mut inner.queues);

        // 5. Roll I/O completion for interrupted BLOCKED processes.
        let mut promotions: Vec<Pid> = Vec::new();
        {
            let io_chance = (IO_COMPLETE_CHANCE_PER_SEC * dt).min(1.0);
            let mut rng = self.rng.lock();
            for process in inner.queues.queue_mut(QueueKind::Blocked).iter_mut() {
                if process.is_interrupted() && !process.is_io_completed() && rng.gen_bool(io_chance)
                {
                    process.complete_io();
                    debug!("pid {} I/O complete", process.pid());
                }
                if process.is_interrupted() && process.is_io_completed() {
                    promotions.push(process.pid());
                }
            }
        }

        // 6. Auto-promote I/O-complete processes, then fill RUNNING from
        //    READY by priority.
        for pid in promotions {
            self.move_to_locked(inner, QueueKind::Ready, pid);
        }
        self.schedule_ready(inner);

        // 7. Recompute the resource ledger from current membership.
        let multiplier = inner.difficulty_multiplier;
        inner
            .ledger
            .recompute(&inner.queues, self.difficulty.profile(), multiplier);

        // 8. Emergency resolution.
        if inner.emergency.is_active() {
            if critical_completed {
                inner.emergency.resolve();
                inner.session.add_score(EMERGENCY_COMPLETE_BONUS);
                inner.session.record_emergency_handled();
                self.alert.emergency_resolved();
                info!("emergency resolved: critical process completed, +{}", EMERGENCY_COMPLETE_BONUS);
            } else if inner
                .queues
                .queue(QueueKind::Running)
                .iter()
                .any(|p| p.is_critical())
            {
                inner.emergency.resolve();
                inner.session.add_score(EMERGENCY_RUN_BONUS);
                inner.session.record_emergency_handled();
                self.alert.emergency_resolved();
                info!("emergency resolved: critical process running, +{}", EMERGENCY_RUN_BONUS);
            } else if !inner.queues.any_critical() {
                // Emergency flagged active but no critical process exists
                // anywhere. Only reachable through a race between workers
                // and operator commands; counts as an unhandled failure.
                warn!("emergency active but no critical process found; counting as unhandled");
                inner.emergency.deactivate();
                self.apply_strike(inner);
            }
        }

        // 9. Game-over evaluation.
        if inner.ledger.cpu_overloaded() || inner.ledger.memory_overloaded() {
            if self.difficulty == Difficulty::Easy {
                self.shed_lowest_priority_running(inner);
            } else if inner.ledger.cpu_overloaded() {
                inner.session.end_game(GameOverReason::CpuOverload);
                warn!("game over: {}", GameOverReason::CpuOverload);
            } else {
                inner.session.end_game(GameOverReason::MemoryOverload);
                warn!("game over: {}", GameOverReason::MemoryOverload);
            }
        }
    }

    /// Fill RUNNING from READY, highest priority first (FIFO among ties),
    /// while capacity allows
    fn schedule_ready(&self, inner: &mut Inner) {
        while !inner.queues.queue(QueueKind::Running).is_full() {
            let next = inner
                .queues
                .queue(QueueKind::Ready)
                .iter()
                .enumerate()
                .max_by_key(|(index, p)| (p.priority(), std::cmp::Reverse(*index)))
                .map(|(_, p)| p.pid());
            match next {
                Some(pid) => {
                    if !self.move_to_locked(inner, QueueKind::Running, pid) {
                        break;
                    }
                }
                None => break,
            }
        }
    }

    /// Escalation on emergency timeout: harden the critical process,
    /// restart its window so each miss fires exactly once, and apply the
    /// strike ladder.
    fn escalate_emergency(&self, inner: &mut Inner, now: Duration) {
        for process in inner
            .queues
            .queue_mut(QueueKind::Blocked)
            .iter_mut()
            .filter(|p| p.is_critical())
        {
            process.set_priority(process.priority() as i32 + ESCALATION_PRIORITY_BOOST);
            process.set_memory_mb((process.memory_mb() as f32 * ESCALATION_MEMORY_FACTOR) as u32);
        }
        inner.emergency.restart_window(now);
        self.apply_strike(inner);
        if inner.emergency.is_active() {
            self.alert.emergency_escalated(inner.emergency.strikes());
        }
    }

    /// Apply one strike's consequences: score deduction, a one-shot ledger
    /// penalty, warning spawns, or game over on the third miss.
    fn apply_strike(&self, inner: &mut Inner) {
        match inner.emergency.record_strike() {
            StrikeEffect::Penalty {
                cpu_fraction,
                memory_fraction,
                score_deduction,
                spawn_warnings,
            } => {
                inner.session.deduct_score(score_deduction);
                inner.ledger.apply_penalty(cpu_fraction, memory_fraction);
                warn!(
                    "emergency strike {}: +{:.0}% CPU, +{:.0}% memory, -{} points",
                    inner.emergency.strikes(),
                    cpu_fraction * 100.0,
                    memory_fraction * 100.0,
                    score_deduction
                );
                if spawn_warnings {
                    let mut rng = self.rng.lock();
                    for _ in 0..2 {
                        let pid = self.allocate_pid();
                        let name = format!("{}{}", WARNING_PREFIX, rng.gen_range(0..100));
                        let mut process = Process::new(
                            pid,
                            &name,
                            WARNING_PRIORITY,
                            WARNING_BURST_MS,
                            WARNING_MEMORY_MB,
                            inner.session.clock(),
                        );
                        process.set_state(ProcessState::Running);
                        inner.queues.queue_mut(QueueKind::Running).push_reserved(process);
                        warn!("penalty spawn: pid {} {} forced into RUNNING", pid, name);
                    }
                    layout::assign_targets(&mut inner.queues);
                }
            }
            StrikeEffect::GameOver => {
                inner.session.end_game(GameOverReason::CriticalFailure);
                warn!("game over: {}", GameOverReason::CriticalFailure);
            }
        }
    }

    /// Easy-mode overload leniency: kill the two lowest-priority RUNNING
    /// processes instead of ending the game. No completion score is
    /// awarded for shed processes.
    fn shed_lowest_priority_running(&self, inner: &mut Inner) {
        let mut running: Vec<(Pid, Priority)> = inner
            .queues
            .queue(QueueKind::Running)
            .iter()
            .map(|p| (p.pid(), p.priority()))
            .collect();
        running.sort_by_key(|&(_, priority)| priority);
        for (pid, _) in running.into_iter().take(2) {
            if let Some((_, mut process)) = inner.queues.take(pid) {
                process.set_state(ProcessState::Terminated);
                self.wait_since.remove(&pid);
                if inner.session.selected() == Some(pid) {
                    inner.session.set_selected(None);
                }
                warn!("overload: pid {} ({}) auto-terminated", pid, process.name());
            }
        }
        layout::assign_targets(&mut inner.queues);
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn queue_snapshot(&self, kind: QueueKind) -> Vec<Process> {
        self.inner.read().queues.queue(kind).iter().cloned().collect()
    }

    pub fn queue_len(&self, kind: QueueKind) -> usize {
        self.inner.read().queues.queue(kind).len()
    }

    pub fn queue_capacity(&self, kind: QueueKind) -> usize {
        self.inner.read().queues.queue(kind).capacity()
    }

    pub fn total_processes(&self) -> usize {
        self.inner.read().queues.total_len()
    }

    pub fn process(&self, pid: Pid) -> Option<Process> {
        self.inner.read().queues.find(pid).map(|(_, p)| p.clone())
    }

    pub fn location(&self, pid: Pid) -> Option<QueueKind> {
        self.inner.read().queues.location(pid)
    }

    pub fn resources(&self) -> ResourceLedger {
        self.inner.read().ledger
    }

    pub fn score(&self) -> Score {
        self.inner.read().session.score()
    }

    pub fn processes_completed(&self) -> u32 {
        self.inner.read().session.completed()
    }

    pub fn emergencies_handled(&self) -> u32 {
        self.inner.read().session.emergencies_handled()
    }

    pub fn emergency_active(&self) -> bool {
        self.inner.read().emergency.is_active()
    }

    pub fn emergency_strikes(&self) -> u8 {
        self.inner.read().emergency.strikes()
    }

    pub fn game_over(&self) -> Option<GameOverReason> {
        self.inner.read().session.game_over()
    }

    pub fn is_game_over(&self) -> bool {
        self.inner.read().session.is_game_over()
    }

    pub fn selected(&self) -> Option<Pid> {
        self.inner.read().session.selected()
    }

    /// Elapsed simulated session time
    pub fn elapsed(&self) -> Duration {
        self.inner.read().session.clock()
    }

    /// Final results for the score-persistence collaborator
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_state(&self.inner.read().session)
    }

    /// A consistent full-engine view for the renderer, taken under a single
    /// read lock
    pub fn snapshot(&self) -> EngineSnapshot {
        let inner = self.inner.read();
        EngineSnapshot {
            difficulty: self.difficulty,
            clock_ms: inner.session.clock().as_millis() as u64,
            queues: QueueKind::ALL
                .iter()
                .map(|&kind| QueueSnapshot {
                    kind,
                    capacity: inner.queues.queue(kind).capacity(),
                    processes: inner.queues.queue(kind).iter().cloned().collect(),
                })
                .collect(),
            resources: inner.ledger,
            score: inner.session.score(),
            processes_completed: inner.session.completed(),
            emergencies_handled: inner.session.emergencies_handled(),
            emergency_active: inner.emergency.is_active(),
            game_over: inner.session.game_over(),
            selected: inner.session.selected(),
        }
    }

    /// Randomized wait before the next emergency event (worker timing)
    pub(crate) fn next_emergency_delay(&self) -> Duration {
        difficulty::roll_emergency_interval(self.difficulty, &mut *self.rng.lock())
    }
}
