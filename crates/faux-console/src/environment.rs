//! The host environment the console plugs into
//!
//! An [`Environment`] owns the two process-global slots the console swaps
//! itself into (the logging facility and the uncaught-error hook) and the
//! document its render surface is attached to.

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::message::Message;
use crate::surface::Document;

/// Something that accepts `log`, `warn` and `error` calls
pub trait Facility: Send + Sync {
    fn log(&self, message: Message);
    fn warn(&self, message: Message);
    fn error(&self, message: Message);
}

/// An uncaught error as reported by the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    pub source: String,
    pub line: u32,
    pub column: u32,
    pub error: Option<String>,
}

impl ErrorReport {
    pub fn new(
        message: impl Into<String>,
        source: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            message: message.into(),
            source: source.into(),
            line,
            column,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on line {} column {} of {}",
            self.message, self.line, self.column, self.source
        )
    }
}

/// Receives uncaught errors; returns `true` when the error was handled
pub trait ErrorHook: Send + Sync {
    fn report(&self, report: &ErrorReport) -> bool;
}

/// Process-wide context holding the facility slot, error slot and document
pub struct Environment {
    console: RwLock<Option<Arc<dyn Facility>>>,
    onerror: RwLock<Option<Arc<dyn ErrorHook>>>,
    document: Option<Document>,
}

static GLOBAL: OnceLock<Arc<Environment>> = OnceLock::new();

impl Environment {
    /// Environment with empty slots and an empty document
    pub fn new() -> Self {
        Self {
            console: RwLock::new(None),
            onerror: RwLock::new(None),
            document: Some(Document::new()),
        }
    }

    /// Environment without a document; nothing can ever be displayed
    pub fn headless() -> Self {
        Self {
            document: None,
            ..Self::new()
        }
    }

    /// The shared process-wide environment
    pub fn global() -> Arc<Environment> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Environment::new())))
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The currently installed logging facility
    pub fn console(&self) -> Option<Arc<dyn Facility>> {
        self.console
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_console(&self, facility: Option<Arc<dyn Facility>>) {
        *self
            .console
            .write()
            .unwrap_or_else(PoisonError::into_inner) = facility;
    }

    /// The currently installed error hook
    pub fn onerror(&self) -> Option<Arc<dyn ErrorHook>> {
        self.onerror
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_onerror(&self, hook: Option<Arc<dyn ErrorHook>>) {
        *self
            .onerror
            .write()
            .unwrap_or_else(PoisonError::into_inner) = hook;
    }

    /// Route `message` to the installed facility's `log`, if any
    pub fn log(&self, message: impl Into<Message>) {
        if let Some(console) = self.console() {
            console.log(message.into());
        }
    }

    pub fn warn(&self, message: impl Into<Message>) {
        if let Some(console) = self.console() {
            console.warn(message.into());
        }
    }

    pub fn error(&self, message: impl Into<Message>) {
        if let Some(console) = self.console() {
            console.error(message.into());
        }
    }

    /// Hand an uncaught error to the installed hook
    ///
    /// Returns whether the hook handled it; `false` when no hook is set.
    pub fn report_error(&self, report: &ErrorReport) -> bool {
        self.onerror()
            .map(|hook| hook.report(report))
            .unwrap_or(false)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("console", &self.console().is_some())
            .field("onerror", &self.onerror().is_some())
            .field("document", &self.document)
            .finish()
    }
}
