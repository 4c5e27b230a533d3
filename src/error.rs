use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the application.
///
/// Every fatal variant aborts only the current launch attempt; none of them
/// crash the application. Teardown and license-key failures are never
/// represented here because their callers discard them deliberately.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The supplied join target is not a dotted-quad IPv4 address.
    #[error("'{0}' is not a valid IPv4 address")]
    InvalidAddress(String),

    /// RA3.exe is missing from the configured installation directory.
    #[error("game executable not found at {0}")]
    GameNotFound(PathBuf),

    /// Writing config.json failed; the proxy DLL would read stale data.
    #[error("failed to write proxy config: {0}")]
    ConfigWrite(io::Error),

    /// None of the bundled server executable candidates exist. Distinct
    /// from a start failure so the user knows to install/build the server.
    #[error("server executable not found next to the launcher (kirov_server.exe)")]
    ServerNotFound,

    /// The OS refused to start the server process.
    #[error("server failed to start: {0}")]
    ServerStart(io::Error),

    /// Shell-integrated start of the game executable failed.
    #[error("failed to launch the game: {0}")]
    GameLaunch(String),

    /// A launch session is already in flight; the action is not reentrant.
    #[error("a launch is already in progress")]
    LaunchInProgress,

    /// The bundled proxy directory or winmm.dll inside it is missing.
    #[error("proxy files not found at {0}")]
    ProxyFilesMissing(PathBuf),
}

/// Type alias for Result using the application's custom error type.
pub type Result<T> = std::result::Result<T, AppError>;
