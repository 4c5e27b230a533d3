use crate::error::AppError;
use crate::models::launch_status::LaunchStatus;
use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, SendError, Sender};
use std::sync::RwLock;

/// The name of the event emitted to the Tauri frontend.
pub const TAURI_BACKEND_EVENT: &str = "backend-event";

/// Type alias for the sender part of the internal event channel.
pub type EventSender = Sender<Event>;

/// Type alias for the receiver part of the internal event channel.
pub type EventReceiver = std::sync::mpsc::Receiver<Event>;

/// Global static storage for the event sender. Uses RwLock for safe access.
static EVENT_SENDER: Lazy<RwLock<Option<EventSender>>> = Lazy::new(|| RwLock::new(None));

/// Backend events bridged to the Tauri frontend.
///
/// `tag = "type", content = "payload"` keeps the JSON structure predictable
/// for the JS side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    /// The launch session moved to a new lifecycle state.
    StatusChanged(LaunchStatus),
    /// A recoverable error the frontend should surface to the user.
    Error(String),
}

/// Sets the global event sender. Should only be called once during setup.
pub fn set_event_sender(sender: EventSender) {
    let mut writer = EVENT_SENDER
        .write()
        .expect("Failed to lock EVENT_SENDER for writing");
    if writer.is_some() {
        warn!("Attempted to set event sender after it was already set.");
        return;
    }
    *writer = Some(sender);
    debug!("Global event sender set successfully.");
}

fn get_event_sender() -> Option<EventSender> {
    EVENT_SENDER
        .read()
        .expect("Failed to lock EVENT_SENDER for reading")
        .clone()
}

/// Emits an event onto the internal MPSC channel. Logs a warning if the
/// sender hasn't been set or the receiver disconnected; the pipeline never
/// fails because the UI stopped listening.
pub fn emit_event(event: Event) {
    if let Some(sender) = get_event_sender() {
        if let Err(SendError(failed_event)) = sender.send(event) {
            warn!(
                "Failed to send internal event (receiver disconnected): {:?}",
                failed_event
            );
        }
    } else {
        debug!("Event emitted before sender was set: {:?}", event);
    }
}

/// Emits a launch status change event.
pub fn emit_status_change(status: LaunchStatus) {
    emit_event(Event::StatusChanged(status));
}

/// Emits a general application error event based on AppError.
pub fn emit_app_error(error: &AppError) {
    log::error!("Application Error: {}", error);
    emit_event(Event::Error(error.to_string()));
}

/// Creates a new MPSC channel for internal events.
pub fn create_event_channel() -> (EventSender, EventReceiver) {
    channel::<Event>()
}
