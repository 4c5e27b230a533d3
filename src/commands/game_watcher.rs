use crate::utils::process_utils;
use log::{debug, info};
use std::time::Duration;

/// Image name of the game process as the process table reports it.
pub const GAME_PROCESS_NAME: &str = if cfg!(windows) { "RA3.exe" } else { "RA3" };

/// Fixed delay before the first process-table lookup. The game's own
/// wrapper forks and re-execs, so the real process can take a few seconds
/// to appear under its final image name.
const SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Interval between liveness polls once the game process was found.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Sleeps out the settle delay, then looks the game process up by exact
/// image name. `None` means the game is treated as already exited; the
/// caller must proceed to teardown rather than hang waiting for it.
pub async fn locate_game(image_name: &str) -> Option<u32> {
    tokio::time::sleep(SETTLE_DELAY).await;

    match process_utils::find_process_by_name(image_name) {
        Some(pid) => {
            info!("Watcher: game process '{}' running with PID {}", image_name, pid);
            Some(pid)
        }
        None => {
            debug!(
                "Watcher: process '{}' not found after settle delay; treating as exited",
                image_name
            );
            None
        }
    }
}

/// Polls once per interval until the PID disappears from the process
/// table. Async throughout, so no interactive thread is ever blocked.
pub async fn wait_until_exit(pid: u32) {
    loop {
        tokio::time::sleep(POLL_INTERVAL).await;
        if !process_utils::is_process_running(pid) {
            info!("Watcher: game process {} terminated", pid);
            return;
        }
    }
}
