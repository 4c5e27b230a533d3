use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::utils::process_utils;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// Candidate locations of the bundled server executable, relative to the
/// launcher's own directory, in search order. Name and extension variants
/// cover release archives built on different platforms.
pub const SERVER_CANDIDATES: [&str; 6] = [
    "kirov_server.exe",
    "kirov_server",
    "kirov-server.exe",
    "kirov-server",
    "server/kirov_server.exe",
    "server/kirov_server",
];

/// How long a freshly spawned server gets before it is declared running.
///
/// This is a heuristic liveness window, not a readiness handshake: under
/// Wine/Proton an early exit is not reliably observable, so surviving the
/// spawn call is the strongest signal available.
const STARTUP_GRACE: Duration = Duration::from_secs(3);

/// Result of a server start attempt that did not hit an OS error.
#[derive(Debug)]
pub enum StartOutcome {
    /// No candidate executable exists; the user must install the server.
    NotFound,
    /// The process was spawned and survived the grace period. Its handle
    /// already sits in the shared state.
    Running,
}

/// Returns the first existing server executable under `launcher_dir`.
pub fn find_server_executable(launcher_dir: &Path) -> Option<PathBuf> {
    SERVER_CANDIDATES
        .iter()
        .map(|candidate| launcher_dir.join(candidate))
        .find(|path| path.is_file())
}

/// Starts the bundled server as a detached child process.
///
/// The child runs with its own directory as working directory, no visible
/// console window and no inherited stdio. The handle is parked in `state`
/// the moment the spawn succeeds, before the grace sleep: an application
/// exit during the grace window must still find a handle to tear down.
/// A missing executable is `NotFound`, not an error; an OS spawn refusal
/// is `ServerStart`.
pub async fn start(state: &AppState) -> Result<StartOutcome> {
    let launcher_dir = &state.launcher_dir;
    let Some(server_path) = find_server_executable(launcher_dir) else {
        info!(
            "Supervisor: no server executable found under {}",
            launcher_dir.display()
        );
        return Ok(StartOutcome::NotFound);
    };

    let work_dir = server_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| launcher_dir.to_path_buf());

    let mut command = Command::new(&server_path);
    command
        .current_dir(&work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    let child = command.spawn().map_err(AppError::ServerStart)?;
    info!(
        "Supervisor: started {} with PID {}",
        server_path.display(),
        child.id()
    );
    state.store_server_process(child);

    // Give the server time to bind its sockets before the game connects.
    tokio::time::sleep(STARTUP_GRACE).await;

    Ok(StartOutcome::Running)
}

/// Tears the server process down: kills its descendant tree, then the
/// process itself, and reaps the handle.
///
/// Idempotent and infallible by contract. Callable when no server was ever
/// started, after the server already exited, and repeatedly; termination
/// errors are logged and consciously discarded, never propagated.
pub fn shutdown(state: &AppState) {
    let Some(mut child) = state.take_server_process() else {
        return;
    };

    let pid = child.id();
    info!("Supervisor: stopping server process {}", pid);

    // Children first, in case the server spawned workers of its own.
    process_utils::kill_process_tree(pid);

    if let Err(e) = child.kill() {
        // Already exited is the common case here.
        warn!("Supervisor: kill of PID {} failed: {}", pid, e);
    }
    if let Err(e) = child.wait() {
        warn!("Supervisor: reaping PID {} failed: {}", pid, e);
    }
}
