//=========================================================================
// Logging Bridge
//=========================================================================
//
// Routes the `log` facade to a platform logger.
//
//   info!(target: "engine", ..) ──► LogBridge (log::Log) ──► dyn Logger
//                                                            ├─ ConsoleLogger (stderr)
//                                                            └─ platform sinks (logcat, ..)
//
// The record target becomes the platform log tag.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io::Write;

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

//=== Logger ==============================================================

/// Platform log sink.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, tag: &str, message: &str);

    fn flush(&self) {}
}

//=== LogBridge ===========================================================

/// Adapts a [`Logger`] to the `log` facade.
pub struct LogBridge<L> {
    logger: L,
    level: LevelFilter,
}

impl<L: Logger> LogBridge<L> {
    pub fn new(logger: L, level: LevelFilter) -> Self {
        Self { logger, level }
    }
}

impl<L: Logger> log::Log for LogBridge<L> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.logger
            .log(record.level(), record.target(), &record.args().to_string());
    }

    fn flush(&self) {
        self.logger.flush();
    }
}

//=== ConsoleLogger =======================================================

/// Writes `LEVEL [tag] message` lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, level: Level, tag: &str, message: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{:<5} [{}] {}", level, tag, message);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

//=== Installation ========================================================

/// Installs `logger` as the global `log` backend.
///
/// Fails if a logger was already installed for this process.
pub fn init<L: Logger + 'static>(logger: L, level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(logger, level)))?;
    log::set_max_level(level);
    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================
