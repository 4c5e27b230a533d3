use serde::{Deserialize, Serialize};
use std::fmt;

/// Which connection mode the user picked for a launch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Run the bundled server locally and point the game at loopback.
    Host,
    /// Connect to a remote host; requires a validated IPv4 target.
    Join,
}

/// Lifecycle states of a launch session, as shown to the user.
///
/// A session walks Idle -> ConfigWritten -> (ServerStarting -> ServerRunning,
/// host mode only) -> GameLaunched -> GameRunning -> Idle. Failures return
/// straight to Idle; there is no retry within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchStatus {
    /// No session in flight; ready to launch.
    Idle,
    /// config.json has been written for the current target.
    ConfigWritten,
    /// The server process was spawned and is inside its grace period.
    ServerStarting,
    /// The server survived the grace period and is treated as live.
    ServerRunning,
    /// The game executable has been handed to the shell.
    GameLaunched,
    /// The game process was found in the process table; waiting for exit.
    GameRunning,
}

impl fmt::Display for LaunchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchStatus::Idle => write!(f, "Ready to Play"),
            LaunchStatus::ConfigWritten => write!(f, "Preparing"),
            LaunchStatus::ServerStarting => write!(f, "Starting Server"),
            LaunchStatus::ServerRunning => write!(f, "Server Running"),
            LaunchStatus::GameLaunched => write!(f, "Launching Game"),
            LaunchStatus::GameRunning => write!(f, "Game Running"),
        }
    }
}

impl Default for LaunchStatus {
    fn default() -> Self {
        LaunchStatus::Idle
    }
}
