// Leveled logging capability handed to the store at construction

use chrono::Local;
use log::{Level, LevelFilter};
use std::fmt;
use std::io::Write;

/// Target used when store messages are routed through the `log` facade.
pub const LOG_TARGET: &str = "shelfdb";

/// A leveled logger the store writes its lifecycle messages to.
///
/// Implementations must be shareable across threads since a single store
/// is typically used from many of them at once.
pub trait Logger: Send + Sync {
    /// Whether a message at `level` would be emitted.
    fn enabled(&self, level: Level) -> bool;

    /// Emit a message. Callers are expected to have checked `enabled` already.
    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warn, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args);
    }

    fn trace(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Trace, args);
    }

    #[doc(hidden)]
    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            self.log(level, args);
        }
    }
}

/// Writes timestamped lines to stderr. This is the store's default logger,
/// filtering at `Info`.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        ConsoleLogger { level }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        ConsoleLogger::new(LevelFilter::Info)
    }
}

impl Logger for ConsoleLogger {
    fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let mut stderr = std::io::stderr().lock();
        // Nowhere left to report a failed write to stderr
        let _ = writeln!(
            stderr,
            "{} {:<5} {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            args
        );
    }
}

/// Forwards to the `log` crate, so whatever backend the application installed
/// (`env_logger` and friends) decides filtering and output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeLogger;

impl Logger for FacadeLogger {
    fn enabled(&self, level: Level) -> bool {
        log::log_enabled!(target: LOG_TARGET, level)
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: LOG_TARGET, level, "{}", args);
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn log(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}

/// Collects messages in memory so tests can assert on them.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryLogger {
    pub(crate) lines: std::sync::Mutex<Vec<(Level, String)>>,
}

#[cfg(test)]
impl MemoryLogger {
    pub(crate) fn messages(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[cfg(test)]
impl Logger for MemoryLogger {
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        self.lines.lock().unwrap().push((level, args.to_string()));
    }
}
