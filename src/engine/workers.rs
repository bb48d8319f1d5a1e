/*!
 * Background Workers
 * Arrival generator, emergency scheduler, and starvation checker
 *
 * Each worker is a tokio task holding a clone of the manager and a watch
 * receiver for the stop signal. Workers only time their calls; all state
 * changes happen inside the manager under its lock.
 */

use super::manager::ProcessManager;
use crate::core::types::STARVATION_CHECK_INTERVAL;
use crate::difficulty::Difficulty;
use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Easy mode skips an emergency when the system is already loaded past
/// this fraction of either resource
const EASY_EMERGENCY_SKIP_THRESHOLD: f32 = 0.70;

/// Handles for the three background tasks plus their stop channel
pub struct WorkerSet {
    stop: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerSet {
    /// Spawn the arrival, emergency, and starvation workers. Requires a
    /// tokio runtime.
    pub fn spawn(manager: ProcessManager) -> Self {
        let (stop, _) = watch::channel(false);
        let handles = vec![
            tokio::spawn(arrival_loop(manager.clone(), stop.subscribe())),
            tokio::spawn(emergency_loop(manager.clone(), stop.subscribe())),
            tokio::spawn(starvation_loop(manager, stop.subscribe())),
        ];
        info!("Background workers started");
        Self { stop, handles }
    }

    /// Signal all workers and wait for them to exit. Join errors are
    /// swallowed: a worker cancelled at shutdown is not a failure.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
        info!("Background workers stopped");
    }
}

/// Wait for either the interval to elapse or the stop signal. Returns false
/// when the worker should exit.
async fn interruptible_sleep(
    stop: &mut watch::Receiver<bool>,
    interval: std::time::Duration,
) -> bool {
    tokio::select! {
        _ = sleep(interval) => true,
        _ = stop.changed() => false,
    }
}

async fn arrival_loop(manager: ProcessManager, mut stop: watch::Receiver<bool>) {
    let interval = manager.difficulty().profile().arrival_interval;
    loop {
        if !interruptible_sleep(&mut stop, interval).await {
            break;
        }
        if manager.is_game_over() {
            break;
        }
        manager.generate_arrival();
    }
    debug!("arrival worker exiting");
}

async fn emergency_loop(manager: ProcessManager, mut stop: watch::Receiver<bool>) {
    loop {
        let delay = manager.next_emergency_delay();
        if !interruptible_sleep(&mut stop, delay).await {
            break;
        }
        if manager.is_game_over() {
            break;
        }
        if manager.difficulty() == Difficulty::Easy {
            let resources = manager.resources();
            if resources.cpu_fraction() >= EASY_EMERGENCY_SKIP_THRESHOLD
                || resources.memory_fraction() >= EASY_EMERGENCY_SKIP_THRESHOLD
            {
                debug!("emergency skipped: system already loaded");
                continue;
            }
        }
        manager.generate_emergency();
    }
    debug!("emergency worker exiting");
}

async fn starvation_loop(manager: ProcessManager, mut stop: watch::Receiver<bool>) {
    loop {
        if !interruptible_sleep(&mut stop, STARVATION_CHECK_INTERVAL).await {
            break;
        }
        if manager.is_game_over() {
            break;
        }
        manager.check_starvation();
    }
    debug!("starvation worker exiting");
}
