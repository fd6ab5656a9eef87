//! On-screen diagnostic console
//!
//! A [`FauxConsole`] stands in for a host's logging facility. While enabled it
//! owns the environment's logging and uncaught-error slots, renders every
//! message as a sanitized, timestamped entry on a scrollable surface, and
//! remembers its settings across sessions in durable key-value storage.
//!
//! The free functions in this module operate on the shared process-wide
//! console, creating it on first use.

pub mod bridge;
pub mod console;
pub mod environment;
pub mod error;
pub mod installer;
pub mod message;
pub mod render;
pub mod settings;
pub mod surface;
pub mod view;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use console::{FauxConsole, MessageDelegate};
pub use environment::{Environment, ErrorHook, ErrorReport, Facility};
pub use error::ConsoleError;
pub use message::Message;
pub use settings::{Settings, SettingsStore};
pub use surface::{Document, LogEntry, RenderSurface, SurfaceHandle};

/// Flip the shared console between enabled and disabled
pub fn toggle() {
    FauxConsole::shared().toggle();
}

pub fn enable() {
    FauxConsole::shared().enable();
}

pub fn disable() {
    FauxConsole::shared().disable();
}

pub fn enabled() -> bool {
    FauxConsole::shared().enabled()
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
