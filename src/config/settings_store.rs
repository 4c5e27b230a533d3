use crate::error::{AppError, Result};
use crate::models::settings::LauncherSettings;
use crate::utils::fs_utils;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// File name of the persisted settings, kept next to the launcher binary.
pub const SETTINGS_FILE_NAME: &str = "launcher_settings.json";

/// Loads settings from disk, defaulting on any problem.
///
/// A missing file is the normal first-run case; a corrupt file is treated
/// as absence (logged, then discarded) rather than surfaced as an error.
pub fn load_settings(path: &Path) -> LauncherSettings {
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(settings) => {
                debug!("Settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                warn!(
                    "Settings file {} is corrupt ({}); using defaults",
                    path.display(),
                    e
                );
                LauncherSettings::default()
            }
        },
        Err(_) => {
            debug!("No settings file at {}; using defaults", path.display());
            LauncherSettings::default()
        }
    }
}

/// Writes settings to disk, pretty-printed.
///
/// Callers on shutdown paths discard this Result deliberately; a failed
/// save must never block teardown or exit.
pub fn save_settings(path: &Path, settings: &LauncherSettings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Io(e.into()))?;
    fs_utils::write_string_to_file(path, &json)?;
    debug!("Settings saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join(SETTINGS_FILE_NAME));
        assert!(settings.game_path.is_none());
        assert!(settings.minimize_to_tray);
    }

    #[test]
    fn corrupt_file_is_silently_discarded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "{not json at all").unwrap();
        let settings = load_settings(&path);
        assert!(settings.game_path.is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        let mut settings = LauncherSettings::default();
        settings.game_path = Some("/games/ra3".to_string());
        settings.last_host_ip = Some("26.1.2.3".to_string());
        save_settings(&path, &settings).unwrap();

        let loaded = load_settings(&path);
        assert_eq!(loaded.game_path.as_deref(), Some("/games/ra3"));
        assert_eq!(loaded.last_host_ip.as_deref(), Some("26.1.2.3"));
    }
}
