use crate::config::settings_store::SETTINGS_FILE_NAME;
use crate::models::launch_status::LaunchStatus;
use crate::models::settings::LauncherSettings;
use std::path::PathBuf;
use std::process::Child;
use std::sync::atomic::AtomicBool;
use std::sync::Mutex;

/// Name of the game's main executable inside the installation directory.
pub const GAME_EXECUTABLE: &str = "RA3.exe";

/// Holds the shared state of the application.
///
/// There is exactly one launch session in flight at a time and exactly one
/// server child process reference; no further locking discipline is needed
/// beyond the per-field mutexes.
#[derive(Debug)]
pub struct AppState {
    /// Directory containing the launcher executable; the server candidates,
    /// the proxy bundle and the settings file all live relative to it.
    pub launcher_dir: PathBuf,
    /// Persisted user configuration, loaded once at startup.
    pub settings: Mutex<LauncherSettings>,
    /// Current lifecycle state of the launch session, as shown to the user.
    pub status: Mutex<LaunchStatus>,
    /// Handle to the running server process, if one was started this
    /// session. Managed exclusively by the server supervisor.
    pub server_process: Mutex<Option<Child>>,
    /// Reentrancy guard for the launch action.
    pub launch_active: AtomicBool,
}

impl AppState {
    pub fn new(launcher_dir: PathBuf, settings: LauncherSettings) -> Self {
        Self {
            launcher_dir,
            settings: Mutex::new(settings),
            status: Mutex::new(LaunchStatus::Idle),
            server_process: Mutex::new(None),
            launch_active: AtomicBool::new(false),
        }
    }

    /// Full path of the settings file next to the launcher.
    pub fn settings_path(&self) -> PathBuf {
        self.launcher_dir.join(SETTINGS_FILE_NAME)
    }

    /// The configured game installation directory, if any.
    pub fn game_dir(&self) -> Option<PathBuf> {
        self.settings
            .lock()
            .expect("settings mutex poisoned")
            .game_path
            .as_ref()
            .map(PathBuf::from)
    }

    /// Full path RA3.exe would have under the configured installation.
    pub fn game_executable_path(&self) -> Option<PathBuf> {
        self.game_dir().map(|dir| dir.join(GAME_EXECUTABLE))
    }

    pub fn current_status(&self) -> LaunchStatus {
        self.status.lock().expect("status mutex poisoned").clone()
    }

    pub fn set_status(&self, status: LaunchStatus) {
        *self.status.lock().expect("status mutex poisoned") = status;
    }

    /// Stores the server handle after a successful start. The previous
    /// handle must already be gone; a session never holds two servers.
    pub fn store_server_process(&self, child: Child) {
        let mut guard = self
            .server_process
            .lock()
            .expect("server process mutex poisoned");
        debug_assert!(guard.is_none(), "server handle overwritten mid-session");
        *guard = Some(child);
    }

    /// Takes the server handle out, leaving None. Used only by teardown.
    pub fn take_server_process(&self) -> Option<Child> {
        self.server_process
            .lock()
            .expect("server process mutex poisoned")
            .take()
    }
}
