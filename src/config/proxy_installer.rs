use crate::error::{AppError, Result};
use crate::utils::fs_utils;
use log::{info, warn};
use std::path::Path;

/// Proxy DLL files bundled with a launcher release, expected in a `proxy`
/// directory next to the launcher executable.
pub const PROXY_FILES: [&str; 6] = [
    "winmm.dll",
    "libeay32.dll",
    "ssleay32.dll",
    "boost_filesystem-vc143-mt-x32-1_86.dll",
    "boost_log-vc143-mt-x32-1_86.dll",
    "boost_thread-vc143-mt-x32-1_86.dll",
];

/// The file whose presence in the game directory marks the proxy installed.
pub const PROXY_MARKER_FILE: &str = "winmm.dll";

/// Whether the proxy DLL sits next to the game executable.
pub fn is_proxy_installed(game_dir: &Path) -> bool {
    game_dir.join(PROXY_MARKER_FILE).is_file()
}

/// Copies the bundled proxy files into the game directory, overwriting any
/// previous install. Returns how many files were copied.
///
/// Files missing from the bundle (the boost DLLs vary between releases) are
/// skipped with a warning; a bundle without `winmm.dll` is rejected outright
/// since the proxy cannot work without it.
pub fn install_proxy(launcher_dir: &Path, game_dir: &Path) -> Result<u32> {
    let source_dir = launcher_dir.join("proxy");
    if !source_dir.is_dir() || !source_dir.join(PROXY_MARKER_FILE).is_file() {
        return Err(AppError::ProxyFilesMissing(source_dir));
    }

    let mut copied = 0;
    for file_name in PROXY_FILES {
        let source = source_dir.join(file_name);
        if source.is_file() {
            fs_utils::copy_file_overwrite(&source, &game_dir.join(file_name))?;
            copied += 1;
        } else {
            warn!(
                "ProxyInstaller: bundled file missing, skipping: {}",
                source.display()
            );
        }
    }

    info!(
        "ProxyInstaller: copied {} file(s) into {}",
        copied,
        game_dir.display()
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_bundle_is_a_distinct_error() {
        let launcher = tempdir().unwrap();
        let game = tempdir().unwrap();
        let err = install_proxy(launcher.path(), game.path()).unwrap_err();
        assert!(matches!(err, AppError::ProxyFilesMissing(_)));
        assert!(!is_proxy_installed(game.path()));
    }

    #[test]
    fn copies_present_files_and_skips_absent_ones() {
        let launcher = tempdir().unwrap();
        let game = tempdir().unwrap();
        let bundle = launcher.path().join("proxy");
        std::fs::create_dir(&bundle).unwrap();
        std::fs::write(bundle.join("winmm.dll"), b"proxy").unwrap();
        std::fs::write(bundle.join("libeay32.dll"), b"ssl").unwrap();

        let copied = install_proxy(launcher.path(), game.path()).unwrap();
        assert_eq!(copied, 2);
        assert!(is_proxy_installed(game.path()));
        assert!(game.path().join("libeay32.dll").is_file());
    }

    #[test]
    fn reinstall_overwrites_existing_files() {
        let launcher = tempdir().unwrap();
        let game = tempdir().unwrap();
        let bundle = launcher.path().join("proxy");
        std::fs::create_dir(&bundle).unwrap();
        std::fs::write(bundle.join("winmm.dll"), b"v2").unwrap();
        std::fs::write(game.path().join("winmm.dll"), b"v1").unwrap();

        install_proxy(launcher.path(), game.path()).unwrap();
        assert_eq!(std::fs::read(game.path().join("winmm.dll")).unwrap(), b"v2");
    }
}
