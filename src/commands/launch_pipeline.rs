use crate::api::events;
use crate::app_state::{AppState, GAME_EXECUTABLE};
use crate::commands::{game_watcher, server_supervisor};
use crate::commands::server_supervisor::StartOutcome;
use crate::config::{cd_key, proxy_config, settings_store};
use crate::error::{AppError, Result};
use crate::models::launch_status::{LaunchMode, LaunchStatus};
use crate::utils::net;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Connection target used in host mode.
const LOOPBACK: &str = "127.0.0.1";

/// Runs one complete launch session: preflight, config, server (host mode),
/// game, exit watch, teardown.
///
/// Reentrancy-guarded; a second call while a session is in flight fails with
/// `LaunchInProgress` and touches nothing. Every failure path releases the
/// guard, resets the status to Idle and tears down a server that may already
/// have been started, leaving the application retryable.
pub async fn launch(
    state: Arc<AppState>,
    mode: LaunchMode,
    host_ip: Option<String>,
) -> Result<()> {
    let _guard = LaunchGuard::acquire(&state.launch_active)?;

    let result = run_session(&state, mode, host_ip).await;
    if let Err(ref e) = result {
        warn!("Pipeline: launch attempt failed: {}", e);
        server_supervisor::shutdown(&state);
        set_status(&state, LaunchStatus::Idle);
    }
    result
}

async fn run_session(
    state: &Arc<AppState>,
    mode: LaunchMode,
    host_ip: Option<String>,
) -> Result<()> {
    // Preflight: the game executable must exist before any side effect.
    let game_dir = state
        .game_dir()
        .ok_or_else(|| AppError::GameNotFound(PathBuf::from(GAME_EXECUTABLE)))?;
    let game_exe = game_dir.join(GAME_EXECUTABLE);
    if !game_exe.is_file() {
        return Err(AppError::GameNotFound(game_exe));
    }

    let target = resolve_target(state, mode, host_ip)?;
    info!("Pipeline: launching in {:?} mode against {}", mode, target);

    // Best-effort by contract; a locked-down registry must not stop a launch.
    if let Err(e) = cd_key::write_cd_key() {
        warn!("Pipeline: CD key write failed (ignored): {}", e);
    }

    proxy_config::write_proxy_config(&game_dir, &target)?;
    set_status(state, LaunchStatus::ConfigWritten);

    if mode == LaunchMode::Host {
        set_status(state, LaunchStatus::ServerStarting);
        // The supervisor parks the child handle in `state` before its grace
        // sleep, so teardown can reach it even if the app exits mid-grace.
        match server_supervisor::start(state).await? {
            StartOutcome::NotFound => return Err(AppError::ServerNotFound),
            StartOutcome::Running => {}
        }
        set_status(state, LaunchStatus::ServerRunning);
    }

    launch_game(&game_dir)?;
    set_status(state, LaunchStatus::GameLaunched);

    // The address that just produced a working launch is worth remembering.
    if let Err(e) = settings_store::save_settings(
        &state.settings_path(),
        &state.settings.lock().expect("settings mutex poisoned"),
    ) {
        warn!("Pipeline: settings save failed (ignored): {}", e);
    }

    if let Some(pid) = game_watcher::locate_game(game_watcher::GAME_PROCESS_NAME).await {
        set_status(state, LaunchStatus::GameRunning);
        game_watcher::wait_until_exit(pid).await;
    }

    if mode == LaunchMode::Host {
        server_supervisor::shutdown(state);
    }
    set_status(state, LaunchStatus::Idle);
    info!("Pipeline: session complete, back to idle");
    Ok(())
}

/// Resolves the connection target for the session. Host mode is always
/// loopback; join mode validates the supplied address and remembers it as
/// the last-used host. Validation failure happens before any side effect.
fn resolve_target(
    state: &AppState,
    mode: LaunchMode,
    host_ip: Option<String>,
) -> Result<String> {
    match mode {
        LaunchMode::Host => Ok(LOOPBACK.to_string()),
        LaunchMode::Join => {
            let supplied = host_ip.unwrap_or_default().trim().to_string();
            if supplied.is_empty() || !net::is_valid_ipv4(&supplied) {
                return Err(AppError::InvalidAddress(supplied));
            }
            state
                .settings
                .lock()
                .expect("settings mutex poisoned")
                .last_host_ip = Some(supplied.clone());
            Ok(supplied)
        }
    }
}

/// Starts the game through the platform shell rather than a raw spawn:
/// some installations depend on UAC elevation and file-association
/// behavior a direct start would bypass. The game must run with the
/// installation directory as its working directory, or it fails to find
/// its own data files.
#[cfg(windows)]
fn launch_game(game_dir: &Path) -> Result<()> {
    use std::os::windows::ffi::OsStrExt;
    use windows::core::PCWSTR;
    use windows::Win32::UI::Shell::{ShellExecuteExW, SHELLEXECUTEINFOW};

    let game_exe = game_dir.join(GAME_EXECUTABLE);
    info!("Pipeline: launching game via shell: {}", game_exe.display());

    let wide = |s: &std::ffi::OsStr| -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    };
    let file_w = wide(game_exe.as_os_str());
    let dir_w = wide(game_dir.as_os_str());
    let verb_w: Vec<u16> = "open".encode_utf16().chain(std::iter::once(0)).collect();

    let mut exec_info = SHELLEXECUTEINFOW {
        cbSize: std::mem::size_of::<SHELLEXECUTEINFOW>() as u32,
        lpVerb: PCWSTR(verb_w.as_ptr()),
        lpFile: PCWSTR(file_w.as_ptr()),
        // lpDirectory becomes the child's working directory.
        lpDirectory: PCWSTR(dir_w.as_ptr()),
        nShow: 1, // SW_SHOWNORMAL
        ..Default::default()
    };
    unsafe { ShellExecuteExW(&mut exec_info) }
        .map_err(|e| AppError::GameLaunch(e.to_string()))
}

/// Off Windows the shell opener carries no working-directory control; the
/// game only ships for Windows anyway, so this path exists for development
/// hosts and the Wine case, where the Windows build is the one in play.
#[cfg(not(windows))]
fn launch_game(game_dir: &Path) -> Result<()> {
    let game_exe = game_dir.join(GAME_EXECUTABLE);
    info!("Pipeline: launching game via shell: {}", game_exe.display());
    tauri_plugin_opener::open_path(&game_exe, None::<&str>)
        .map_err(|e| AppError::GameLaunch(e.to_string()))
}

fn set_status(state: &AppState, status: LaunchStatus) {
    state.set_status(status.clone());
    events::emit_status_change(status);
}

/// Holds the in-flight flag for the lifetime of a session and releases it
/// on every exit path, including early error returns.
struct LaunchGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LaunchGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| AppError::LaunchInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for LaunchGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::LauncherSettings;
    use tempfile::tempdir;

    fn state_with_game(game_dir: &Path, launcher_dir: &Path) -> Arc<AppState> {
        std::fs::write(game_dir.join(GAME_EXECUTABLE), b"stub").unwrap();
        let settings = LauncherSettings {
            game_path: Some(game_dir.to_string_lossy().into_owned()),
            ..Default::default()
        };
        Arc::new(AppState::new(launcher_dir.to_path_buf(), settings))
    }

    #[tokio::test]
    async fn unconfigured_game_path_fails_before_any_side_effect() {
        let launcher = tempdir().unwrap();
        let state = Arc::new(AppState::new(
            launcher.path().to_path_buf(),
            LauncherSettings::default(),
        ));
        let err = launch(state.clone(), LaunchMode::Host, None).await.unwrap_err();
        assert!(matches!(err, AppError::GameNotFound(_)));
        assert_eq!(state.current_status(), LaunchStatus::Idle);
        assert!(!state.launch_active.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn invalid_join_address_is_rejected_with_no_config_written() {
        let launcher = tempdir().unwrap();
        let game = tempdir().unwrap();
        let state = state_with_game(game.path(), launcher.path());

        let err = launch(state.clone(), LaunchMode::Join, Some("999.1.1.1".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidAddress(_)));
        assert!(!game.path().join(proxy_config::CONFIG_FILE_NAME).exists());
        assert!(state.take_server_process().is_none());
        assert_eq!(state.current_status(), LaunchStatus::Idle);
    }

    #[tokio::test]
    async fn concurrent_launch_is_refused() {
        let launcher = tempdir().unwrap();
        let game = tempdir().unwrap();
        let state = state_with_game(game.path(), launcher.path());

        state.launch_active.store(true, Ordering::SeqCst);
        let err = launch(state.clone(), LaunchMode::Host, None).await.unwrap_err();
        assert!(matches!(err, AppError::LaunchInProgress));
        // The refused attempt must not release the active session's flag.
        assert!(state.launch_active.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn host_mode_without_a_server_reports_not_found_after_writing_config() {
        let launcher = tempdir().unwrap();
        let game = tempdir().unwrap();
        let state = state_with_game(game.path(), launcher.path());

        let err = launch(state.clone(), LaunchMode::Host, None).await.unwrap_err();
        assert!(matches!(err, AppError::ServerNotFound));
        // Config was already written for loopback; only the server step failed.
        let raw =
            std::fs::read_to_string(game.path().join(proxy_config::CONFIG_FILE_NAME)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["hostnames"]["host"], LOOPBACK);
        assert_eq!(state.current_status(), LaunchStatus::Idle);
        assert!(!state.launch_active.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn join_target_is_remembered_as_last_host_ip() {
        let launcher = tempdir().unwrap();
        let game = tempdir().unwrap();
        let state = state_with_game(game.path(), launcher.path());

        let _ = resolve_target(&state, LaunchMode::Join, Some(" 26.105.90.12 ".into())).unwrap();
        assert_eq!(
            state.settings.lock().unwrap().last_host_ip.as_deref(),
            Some("26.105.90.12")
        );
    }
}
