//! Internal logging system for the Galaxy3D vertex array core
//!
//! This module provides:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Diagnostic categories (`Verbosity`) for the chatty per-call and per-chunk traces
//! - File and line information for detailed ERROR logs

use bitflags::bitflags;
use chrono::{DateTime, Local};
use colored::*;
use std::time::SystemTime;

/// Environment variable read by [`Verbosity::from_env`]
pub const VERBOSE_ENV_VAR: &str = "GALAXY3D_VERBOSE";

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_vertex_array::galaxy3d::log::{Logger, LogEntry};
///
/// struct CaptureLogger;
///
/// impl Logger for CaptureLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}: {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "galaxy3d::ArrayStore", "galaxy3d::Cva")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose debug information (per chunk, per element)
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (potential issues)
    Warn,

    /// Error messages (rejected calls, with file:line details)
    Error,
}

bitflags! {
    /// Diagnostic categories
    ///
    /// Messages logged through `engine_verbose!` are only emitted when their
    /// category is enabled on the [`Engine`](crate::galaxy3d::Engine).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Verbosity: u32 {
        /// Every client array entry point call
        const API = 1 << 0;
        /// Draw-range and indexed draw batching (one line per chunk)
        const VARRAY = 1 << 1;
        /// Pipeline rebuild decisions
        const PIPELINE = 1 << 2;
        /// Compiled vertex array lock transitions
        const CVA = 1 << 3;
    }
}

impl Verbosity {
    /// Parse a comma separated category list (`"api,varray"`, `"all"`)
    ///
    /// Unknown names are ignored.
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(|name| name.trim().to_ascii_lowercase())
            .fold(Verbosity::empty(), |acc, name| {
                acc | match name.as_str() {
                    "api" => Verbosity::API,
                    "varray" => Verbosity::VARRAY,
                    "pipeline" => Verbosity::PIPELINE,
                    "cva" => Verbosity::CVA,
                    "all" => Verbosity::all(),
                    _ => Verbosity::empty(),
                }
            })
    }

    /// Read the categories from the `GALAXY3D_VERBOSE` environment variable
    pub fn from_env() -> Self {
        std::env::var(VERBOSE_ENV_VAR)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            eprintln!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            eprintln!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
///
/// # Example
///
/// ```ignore
/// engine_debug!("galaxy3d::Context", "pipeline rebuilt, inputs {:?}", inputs);
/// ```
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log a DEBUG message only when the given diagnostic category is enabled
///
/// The message is not formatted at all when the category is off.
///
/// # Example
///
/// ```ignore
/// engine_verbose!(Verbosity::VARRAY, "galaxy3d::DrawArrays", "chunk {} vertices", n);
/// ```
#[macro_export]
macro_rules! engine_verbose {
    ($category:expr, $source:expr, $($arg:tt)*) => {
        if $crate::galaxy3d::Engine::verbosity().contains($category) {
            $crate::engine_debug!($source, $($arg)*);
        }
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
