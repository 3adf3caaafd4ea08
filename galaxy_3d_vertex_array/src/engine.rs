/// Galaxy3D Engine - process-wide diagnostics
///
/// Rendering state (array descriptors, working buffer, lock state) is owned by
/// each [`Context`](crate::galaxy3d::Context). The only global state is the
/// logger and the enabled diagnostic categories, shared by every context.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger, Verbosity};

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Enabled diagnostic categories (`Verbosity` bits)
static VERBOSITY: AtomicU32 = AtomicU32::new(0);

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

// ===== PUBLIC API =====

/// Diagnostics entry point
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_vertex_array::galaxy3d::Engine;
/// use galaxy_3d_vertex_array::galaxy3d::log::Verbosity;
///
/// Engine::set_verbosity(Verbosity::API | Verbosity::CVA);
/// ```
pub struct Engine;

impl Engine {
    // ===== LOGGING API =====

    /// Replace the default logger with a custom implementation
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! (and therefore engine_bail!) to include the source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }

    // ===== VERBOSITY API =====

    /// Enabled diagnostic categories
    pub fn verbosity() -> Verbosity {
        Verbosity::from_bits_truncate(VERBOSITY.load(Ordering::Relaxed))
    }

    /// Replace the enabled diagnostic categories
    pub fn set_verbosity(verbosity: Verbosity) {
        VERBOSITY.store(verbosity.bits(), Ordering::Relaxed);
    }

    /// Load the diagnostic categories from `GALAXY3D_VERBOSE`
    ///
    /// Returns the categories now in effect.
    pub fn init_verbosity_from_env() -> Verbosity {
        let verbosity = Verbosity::from_env();
        Self::set_verbosity(verbosity);
        verbosity
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
