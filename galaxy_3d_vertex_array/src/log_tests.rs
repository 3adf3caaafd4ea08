//! Unit tests for log.rs
//!
//! Tests Logger trait, LogEntry, LogSeverity, Verbosity parsing, and DefaultLogger.

use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger, Verbosity};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "galaxy3d::ArrayStore".to_string(),
        message: format!("{:?} message", severity),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_with_file_line() {
    let entry = entry(LogSeverity::Error, Some("array_store.rs"), Some(42));

    assert_eq!(entry.severity, LogSeverity::Error);
    assert_eq!(entry.source, "galaxy3d::ArrayStore");
    assert_eq!(entry.file, Some("array_store.rs"));
    assert_eq!(entry.line, Some(42));
}

#[test]
fn test_log_entry_clone() {
    let entry1 = entry(LogSeverity::Warn, None, None);
    let entry2 = entry1.clone();

    assert_eq!(entry1.severity, entry2.severity);
    assert_eq!(entry1.message, entry2.message);
    assert!(entry2.file.is_none());
}

// ============================================================================
// VERBOSITY TESTS
// ============================================================================

#[test]
fn test_verbosity_parse_single() {
    assert_eq!(Verbosity::parse("api"), Verbosity::API);
    assert_eq!(Verbosity::parse("cva"), Verbosity::CVA);
}

#[test]
fn test_verbosity_parse_list_is_case_and_space_insensitive() {
    assert_eq!(
        Verbosity::parse(" VArray , pipeline"),
        Verbosity::VARRAY | Verbosity::PIPELINE
    );
}

#[test]
fn test_verbosity_parse_all() {
    assert_eq!(Verbosity::parse("all"), Verbosity::all());
}

#[test]
fn test_verbosity_parse_ignores_unknown() {
    assert_eq!(Verbosity::parse("texture,api,bogus"), Verbosity::API);
    assert_eq!(Verbosity::parse(""), Verbosity::empty());
}

#[test]
fn test_verbosity_default_is_empty() {
    assert!(Verbosity::default().is_empty());
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;

    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        // Both branches (with and without file:line) must not panic
        logger.log(&entry(severity, None, None));
        logger.log(&entry(severity, Some("draw_arrays.rs"), Some(7)));
    }
}

// ============================================================================
// LOGGER TRAIT TESTS
// ============================================================================

struct CountingLogger {
    logged_count: std::sync::Mutex<usize>,
}

impl Logger for CountingLogger {
    fn log(&self, _entry: &LogEntry) {
        *self.logged_count.lock().unwrap() += 1;
    }
}

#[test]
fn test_custom_logger_implementation() {
    let logger = CountingLogger {
        logged_count: std::sync::Mutex::new(0),
    };

    logger.log(&entry(LogSeverity::Info, None, None));
    logger.log(&entry(LogSeverity::Info, None, None));

    assert_eq!(*logger.logged_count.lock().unwrap(), 2);
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}
