use crate::error::{AppError, Result};
use crate::utils::fs_utils;
use log::info;
use serde::Serialize;
use std::path::Path;

/// File name the proxy DLL reads from the game directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Fixed port the proxy forwards GameSpy traffic to.
const PROXY_DESTINATION_PORT: u16 = 18800;

/// The `config.json` document consumed by the game-proxy DLL.
///
/// The schema is the DLL's wire format; field names and the fixed values
/// below must not drift. Only the hostname targets vary per launch.
#[derive(Debug, Serialize)]
pub struct ProxyConfig {
    debug: DebugOptions,
    patches: PatchOptions,
    proxy: ProxySettings,
    game: GameOptions,
    hostnames: Hostnames,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugOptions {
    show_console: bool,
    create_log: bool,
    log_decryption: bool,
    log_level_console: u8,
    log_level_file: u8,
}

#[derive(Debug, Serialize)]
struct PatchOptions {
    #[serde(rename = "SSL")]
    ssl: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxySettings {
    enable: bool,
    destination_port: u16,
    secure: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameOptions {
    game_key: String,
}

/// Server-discovery hostname map. Every GameSpy discovery field points at
/// the same target; `detour` is always the literal "localhost" because the
/// proxy resolves it against its own forwarding table.
#[derive(Debug, Serialize)]
struct Hostnames {
    host: String,
    login: String,
    gpcm: String,
    peerchat: String,
    master: String,
    natneg: String,
    stats: String,
    sake: String,
    server: String,
    register: String,
    website: String,
    detour: String,
    mac: String,
    tos: String,
}

impl ProxyConfig {
    /// Builds the document for a connection target: the loopback address in
    /// host mode, or a validated remote address in join mode.
    pub fn for_target(target_ip: &str) -> Self {
        let target = || target_ip.to_string();
        Self {
            debug: DebugOptions {
                show_console: false,
                create_log: true,
                log_decryption: false,
                log_level_console: 0,
                log_level_file: 0,
            },
            patches: PatchOptions { ssl: true },
            proxy: ProxySettings {
                enable: true,
                destination_port: PROXY_DESTINATION_PORT,
                secure: false,
            },
            game: GameOptions {
                game_key: String::new(),
            },
            hostnames: Hostnames {
                host: target(),
                login: target(),
                gpcm: target(),
                peerchat: target(),
                master: target(),
                natneg: target(),
                stats: target(),
                sake: target(),
                server: target(),
                register: String::new(),
                website: String::new(),
                detour: "localhost".to_string(),
                mac: "mac".to_string(),
                tos: String::new(),
            },
        }
    }
}

/// Serializes the proxy config and overwrites `<game_dir>/config.json`.
///
/// Any I/O failure is fatal to the launch attempt: the remaining pipeline
/// steps must not run against a stale or partial config.
pub fn write_proxy_config(game_dir: &Path, target_ip: &str) -> Result<()> {
    let config = ProxyConfig::for_target(target_ip);
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| AppError::ConfigWrite(e.into()))?;

    let config_path = game_dir.join(CONFIG_FILE_NAME);
    fs_utils::write_string_to_file(&config_path, &json).map_err(|e| match e {
        AppError::Io(io_err) => AppError::ConfigWrite(io_err),
        other => other,
    })?;

    info!(
        "ConfigWriter: wrote {} targeting {}",
        config_path.display(),
        target_ip
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DISCOVERY_FIELDS: [&str; 9] = [
        "host", "login", "gpcm", "peerchat", "master", "natneg", "stats", "sake", "server",
    ];

    fn written_config(target: &str) -> serde_json::Value {
        let dir = tempdir().unwrap();
        write_proxy_config(dir.path(), target).unwrap();
        let raw = std::fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn every_discovery_hostname_equals_the_target() {
        let doc = written_config("26.105.90.12");
        for field in DISCOVERY_FIELDS {
            assert_eq!(
                doc["hostnames"][field], "26.105.90.12",
                "field '{}' should carry the target verbatim",
                field
            );
        }
    }

    #[test]
    fn detour_is_always_localhost_and_blank_fields_stay_blank() {
        let doc = written_config("10.0.0.7");
        assert_eq!(doc["hostnames"]["detour"], "localhost");
        assert_eq!(doc["hostnames"]["register"], "");
        assert_eq!(doc["hostnames"]["website"], "");
        assert_eq!(doc["hostnames"]["tos"], "");
        assert_eq!(doc["hostnames"]["mac"], "mac");
    }

    #[test]
    fn fixed_sections_match_the_proxy_contract() {
        let doc = written_config("127.0.0.1");
        assert_eq!(doc["debug"]["showConsole"], false);
        assert_eq!(doc["debug"]["createLog"], true);
        assert_eq!(doc["debug"]["logDecryption"], false);
        assert_eq!(doc["debug"]["logLevelConsole"], 0);
        assert_eq!(doc["debug"]["logLevelFile"], 0);
        assert_eq!(doc["patches"]["SSL"], true);
        assert_eq!(doc["proxy"]["enable"], true);
        assert_eq!(doc["proxy"]["destinationPort"], 18800);
        assert_eq!(doc["proxy"]["secure"], false);
        assert_eq!(doc["game"]["gameKey"], "");
    }

    #[test]
    fn rewrite_overwrites_the_previous_target() {
        let dir = tempdir().unwrap();
        write_proxy_config(dir.path(), "1.2.3.4").unwrap();
        write_proxy_config(dir.path(), "127.0.0.1").unwrap();
        let raw = std::fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["hostnames"]["host"], "127.0.0.1");
    }
}
