pub mod api;
pub mod app_state;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

use crate::api::events::{self, Event, TAURI_BACKEND_EVENT};
use crate::app_state::AppState;
use crate::commands::server_supervisor;
use crate::config::settings_store;
use crate::error::{AppError, Result};
use log::{debug, error, info, warn};
use std::sync::{mpsc, Arc};
use std::thread;
use tauri::{AppHandle, Emitter, Manager};

/// Sets up and runs the MPSC -> Tauri event bridge.
///
/// Runs in a separate thread, listening for internal backend events and
/// emitting them to the Tauri frontend.
fn setup_event_bridge(app_handle: AppHandle, event_receiver: mpsc::Receiver<Event>) {
    thread::spawn(move || {
        info!("Event bridge MPSC -> Tauri started.");
        while let Ok(event) = event_receiver.recv() {
            debug!("Event bridge received: {:?}", event);
            if let Err(e) = app_handle.emit(TAURI_BACKEND_EVENT, &event) {
                warn!("Failed to emit Tauri event '{}': {}", TAURI_BACKEND_EVENT, e);
            }
        }
        // recv() erroring means the sender dropped: the app is shutting down.
        info!("Event bridge MPSC -> Tauri stopped (sender closed).");
    });
}

/// Initializes application state and the event bridge. Called from within
/// Tauri's `setup` closure.
fn initialize_app(app: &mut tauri::App) -> Result<()> {
    info!("Initializing launcher backend...");
    let app_handle = app.handle().clone();

    // The launcher is portable: settings, the proxy bundle and the server
    // candidates all sit next to the executable.
    let launcher_dir = std::env::current_exe()?
        .parent()
        .map(std::path::Path::to_path_buf)
        .ok_or_else(|| {
            AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "launcher executable has no parent directory",
            ))
        })?;
    info!("Launcher directory: {}", launcher_dir.display());

    let settings = settings_store::load_settings(&launcher_dir.join(
        settings_store::SETTINGS_FILE_NAME,
    ));
    let app_state = Arc::new(AppState::new(launcher_dir, settings));
    app.manage(app_state);

    let (event_sender, event_receiver) = events::create_event_channel();
    events::set_event_sender(event_sender);
    setup_event_bridge(app_handle, event_receiver);

    info!("Backend initialization complete.");
    Ok(())
}

/// Tears down any running server child and persists settings. Runs on every
/// exit path; both steps tolerate being called more than once.
fn shutdown_backend(app_handle: &AppHandle) {
    let state = app_handle.state::<Arc<AppState>>();
    server_supervisor::shutdown(&state);

    let settings_path = state.settings_path();
    match state.settings.lock() {
        Ok(settings) => {
            if let Err(e) = settings_store::save_settings(&settings_path, &settings) {
                warn!("Shutdown: settings save failed (ignored): {}", e);
            }
        }
        Err(e) => warn!("Shutdown: settings mutex poisoned, skipping save: {}", e),
    };
}

/// Main entry point for the Tauri application setup and run.
pub fn run() {
    // Logger is initialized in main.rs before this runs.
    info!("Starting Tauri application setup...");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            if let Err(e) = initialize_app(app) {
                error!("Critical error during application initialization: {}", e);
                return Err(Box::new(e) as Box<dyn std::error::Error>);
            }
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            api::rest::get_launch_status,
            api::rest::get_settings,
            api::rest::update_settings,
            api::rest::check_environment,
            api::rest::launch,
            api::rest::install_proxy,
        ])
        .build(tauri::generate_context!())
        .unwrap_or_else(|e| {
            error!("Failed to build Tauri application: {}", e);
            panic!("Failed to build Tauri application: {}", e);
        });

    app.run(|app_handle, event| match event {
        tauri::RunEvent::ExitRequested { .. } => {
            // Window close, the close button and programmatic exits all pass
            // through here: the server child must die before the process does.
            info!("Exit requested; tearing down backend.");
            shutdown_backend(app_handle);
        }
        tauri::RunEvent::Exit => {
            info!("Tauri application exiting.");
            shutdown_backend(app_handle);
        }
        _ => {}
    });
}
