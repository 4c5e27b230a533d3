use serde::Serialize;
use std::sync::Arc;
use tauri::{command, State};

use crate::api::events;
use crate::app_state::AppState;
use crate::commands::launch_pipeline;
use crate::config::{proxy_installer, settings_store};
use crate::models::launch_status::LaunchMode;
use crate::models::settings::LauncherSettings;

/// What the frontend needs to render the "Ready to Play"/"Setup Required"
/// status card.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentReport {
    pub game_found: bool,
    pub proxy_installed: bool,
    pub game_path: Option<String>,
}

#[command]
pub async fn get_launch_status(state: State<'_, Arc<AppState>>) -> Result<String, String> {
    Ok(state.current_status().to_string())
}

#[command]
pub async fn get_settings(state: State<'_, Arc<AppState>>) -> Result<LauncherSettings, String> {
    Ok(state
        .settings
        .lock()
        .map_err(|e| e.to_string())?
        .clone())
}

/// Replaces the stored settings and persists them. Called when the settings
/// panel closes, matching the load-once/save-on-close lifecycle.
#[command]
pub async fn update_settings(
    settings: LauncherSettings,
    state: State<'_, Arc<AppState>>,
) -> Result<(), String> {
    {
        let mut guard = state.settings.lock().map_err(|e| e.to_string())?;
        *guard = settings;
    }
    let guard = state.settings.lock().map_err(|e| e.to_string())?;
    settings_store::save_settings(&state.settings_path(), &guard).map_err(|e| e.to_string())
}

#[command]
pub async fn check_environment(
    state: State<'_, Arc<AppState>>,
) -> Result<EnvironmentReport, String> {
    let game_path = state
        .settings
        .lock()
        .map_err(|e| e.to_string())?
        .game_path
        .clone();
    let game_found = state
        .game_executable_path()
        .map(|p| p.is_file())
        .unwrap_or(false);
    let proxy_installed = state
        .game_dir()
        .map(|dir| proxy_installer::is_proxy_installed(&dir))
        .unwrap_or(false);

    Ok(EnvironmentReport {
        game_found,
        proxy_installed,
        game_path,
    })
}

/// Runs a full launch session. Resolves when the session ends (the game
/// exited and any hosted server was torn down), so the frontend keeps the
/// launch control disabled for the whole session.
#[command]
pub async fn launch(
    mode: LaunchMode,
    host_ip: Option<String>,
    state: State<'_, Arc<AppState>>,
) -> Result<(), String> {
    launch_pipeline::launch(state.inner().clone(), mode, host_ip)
        .await
        .map_err(|e| {
            events::emit_app_error(&e);
            e.to_string()
        })
}

/// Copies the bundled proxy DLLs into the game directory. Returns the
/// number of files copied.
#[command]
pub async fn install_proxy(state: State<'_, Arc<AppState>>) -> Result<u32, String> {
    let game_dir = state
        .game_dir()
        .ok_or_else(|| "Game path is not configured".to_string())?;
    proxy_installer::install_proxy(&state.launcher_dir, &game_dir).map_err(|e| e.to_string())
}
