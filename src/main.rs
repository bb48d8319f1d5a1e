/*!
 * Commander Kernel - Main Entry Point
 *
 * Headless session driver:
 * - Builds the queue manager at the configured difficulty
 * - Starts the background workers
 * - Drives the tick loop at ~60Hz until game over or Ctrl-C
 * - Prints the session summary as JSON
 */

use std::error::Error;
use std::str::FromStr;
use std::time::Duration;

use commander_kernel::{Difficulty, ProcessManager, QueueKind};
use log::info;
use tokio::time::{interval, Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_millis(16);
const STATUS_EVERY: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let difficulty = match std::env::var("COMMANDER_DIFFICULTY") {
        Ok(value) => Difficulty::from_str(&value)?,
        Err(_) => Difficulty::Medium,
    };

    info!("Commander kernel starting...");
    info!("================================================");
    info!("Difficulty: {:?}", difficulty);

    let manager = ProcessManager::new(difficulty);
    manager.start()?;

    let mut ticker = interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();
    let mut last_status = Instant::now();

    loop {
        tokio::select! {
            now = ticker.tick() => {
                manager.tick(now.duration_since(last));
                last = now;

                if manager.is_game_over() {
                    break;
                }
                if now.duration_since(last_status) >= STATUS_EVERY {
                    last_status = now;
                    let resources = manager.resources();
                    info!(
                        "t={:?} score={} procs={} (N:{} R:{} X:{} B:{}) cpu={:.0}% mem={:.0}%",
                        manager.elapsed(),
                        manager.score(),
                        manager.total_processes(),
                        manager.queue_len(QueueKind::New),
                        manager.queue_len(QueueKind::Ready),
                        manager.queue_len(QueueKind::Running),
                        manager.queue_len(QueueKind::Blocked),
                        resources.cpu_fraction() * 100.0,
                        resources.memory_fraction() * 100.0,
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down");
                break;
            }
        }
    }

    manager.shutdown().await;

    if let Some(reason) = manager.game_over() {
        info!("Session over: {}", reason);
    }
    println!("{}", serde_json::to_string_pretty(&manager.summary())?);
    Ok(())
}
