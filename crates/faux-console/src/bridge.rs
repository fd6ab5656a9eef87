//! Hooks the process-level `log` facade and panics into an [`Environment`]
//!
//! The `log` crate allows a single logger per process, so instead of
//! swapping loggers the bridge is installed once and forwards every record
//! to whatever facility currently sits in the environment's logging slot.
//! Panics are forwarded to the environment's error slot the same way.

use std::any::Any;
use std::panic::{self, Location, PanicHookInfo};
use std::sync::Arc;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::environment::{Environment, ErrorReport};
use crate::error::ConsoleError;
use crate::message::Message;

/// Records from these targets never reach the console
const OWN_TARGET_PREFIX: &str = "faux_console";

/// `log` implementation forwarding to the environment's logging slot
pub struct EnvironmentLogger {
    env: Arc<Environment>,
    level: LevelFilter,
}

impl EnvironmentLogger {
    pub fn new(env: Arc<Environment>, level: LevelFilter) -> Self {
        Self { env, level }
    }
}

impl Log for EnvironmentLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && !metadata.target().starts_with(OWN_TARGET_PREFIX)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let Some(console) = self.env.console() else {
            return;
        };

        let message = Message::Text(record.args().to_string());
        match record.level() {
            Level::Error => console.error(message),
            Level::Warn => console.warn(message),
            Level::Info | Level::Debug | Level::Trace => console.log(message),
        }
    }

    fn flush(&self) {}
}

/// Install the process logger that feeds `env`
///
/// Fails when another logger was installed first.
pub fn install_logger(env: Arc<Environment>, level: LevelFilter) -> Result<(), ConsoleError> {
    log::set_boxed_logger(Box::new(EnvironmentLogger::new(env, level)))?;
    log::set_max_level(level);
    Ok(())
}

/// Report panics to the environment's error hook
///
/// The previously installed panic hook still runs when no error hook is set
/// or the error hook does not handle the report.
pub fn install_panic_hook(env: Arc<Environment>) {
    let previous = panic::take_hook();

    panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
        let report = panic_report(info.payload(), info.location());
        if !env.report_error(&report) {
            previous(info);
        }
    }));
}

/// Describe a panic payload and location as an uncaught-error report
pub fn panic_report(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> ErrorReport {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unspecified panic".to_string()
    };

    let thread = std::thread::current();
    let error = format!("panic in thread '{}'", thread.name().unwrap_or("<unnamed>"));

    let report = match location {
        Some(location) => {
            ErrorReport::new(message, location.file(), location.line(), location.column())
        }
        None => ErrorReport::new(message, "<unknown>", 0, 0),
    };

    report.with_error(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::FauxConsole;
    use crate::environment::tests::RecordingFacility;
    use crate::lock;
    use crate::settings::SettingsStore;

    fn logger_with_recorder(level: LevelFilter) -> (EnvironmentLogger, Arc<RecordingFacility>) {
        let env = Arc::new(Environment::new());
        let facility = Arc::new(RecordingFacility::default());
        env.set_console(Some(facility.clone()));
        (EnvironmentLogger::new(env, level), facility)
    }

    #[test]
    fn test_levels_map_to_facility_methods() {
        let (logger, facility) = logger_with_recorder(LevelFilter::Trace);

        for level in [Level::Error, Level::Warn, Level::Info, Level::Debug] {
            logger.log(
                &Record::builder()
                    .args(format_args!("{}", level))
                    .level(level)
                    .target("app")
                    .build(),
            );
        }

        assert_eq!(
            facility.calls(),
            ["error:ERROR", "warn:WARN", "log:INFO", "log:DEBUG"]
        );
    }

    #[test]
    fn test_level_filter_applies() {
        let (logger, facility) = logger_with_recorder(LevelFilter::Warn);

        logger.log(
            &Record::builder()
                .args(format_args!("chatty"))
                .level(Level::Info)
                .target("app")
                .build(),
        );

        assert!(facility.calls().is_empty());
    }

    #[test]
    fn test_own_records_are_not_forwarded() {
        let (logger, facility) = logger_with_recorder(LevelFilter::Trace);

        logger.log(
            &Record::builder()
                .args(format_args!("internal"))
                .level(Level::Error)
                .target("faux_console::console")
                .build(),
        );

        assert!(facility.calls().is_empty());
    }

    #[test]
    fn test_records_reach_enabled_console() {
        let env = Arc::new(Environment::new());
        let console = FauxConsole::new(Arc::clone(&env), SettingsStore::in_memory());
        console.enable();
        let logger = EnvironmentLogger::new(env, LevelFilter::Info);

        logger.log(
            &Record::builder()
                .args(format_args!("from {}", "log"))
                .level(Level::Info)
                .target("app")
                .build(),
        );

        let surface = console.surface().unwrap();
        assert_eq!(lock(&surface).entries()[0].text, "from log");
    }

    #[test]
    fn test_panic_report_from_str_payload() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        let location = Location::caller();

        let report = panic_report(payload.as_ref(), Some(location));

        assert_eq!(report.message, "boom");
        assert_eq!(report.source, location.file());
        assert_eq!(report.line, location.line());
        assert_eq!(report.column, location.column());
        assert!(report.error.unwrap().starts_with("panic in thread"));
    }

    #[test]
    fn test_panic_report_from_other_payloads() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("formatted boom"));
        assert_eq!(
            panic_report(payload.as_ref(), None).message,
            "formatted boom"
        );

        let payload: Box<dyn Any + Send> = Box::new(7u8);
        let report = panic_report(payload.as_ref(), None);
        assert_eq!(report.message, "unspecified panic");
        assert_eq!(
            report.to_string(),
            "unspecified panic on line 0 column 0 of <unknown>"
        );
    }
}
