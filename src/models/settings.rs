use serde::{Deserialize, Serialize};

/// Persisted user configuration, stored as `launcher_settings.json` next to
/// the launcher executable.
///
/// Field names stay PascalCase on disk so settings files written by earlier
/// launcher builds keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LauncherSettings {
    /// Directory containing RA3.exe, if configured.
    pub game_path: Option<String>,
    /// Last address used in join mode, kept as a convenience default.
    pub last_host_ip: Option<String>,
    pub minimize_to_tray: bool,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            game_path: None,
            last_host_ip: None,
            minimize_to_tray: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_format_uses_pascal_case_keys() {
        let settings = LauncherSettings {
            game_path: Some("C:\\Games\\RA3".to_string()),
            last_host_ip: Some("26.105.90.12".to_string()),
            minimize_to_tray: false,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"GamePath\""));
        assert!(json.contains("\"LastHostIp\""));
        assert!(json.contains("\"MinimizeToTray\""));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: LauncherSettings = serde_json::from_str("{}").unwrap();
        assert!(settings.game_path.is_none());
        assert!(settings.last_host_ip.is_none());
        assert!(settings.minimize_to_tray);
    }
}
