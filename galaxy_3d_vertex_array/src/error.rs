//! Error types for the Galaxy3D vertex array core
//!
//! Every entry point validates its arguments before touching any state, so an
//! `Err` always means "the call was skipped, nothing changed".

use std::fmt;

/// Result type for vertex array operations
pub type Result<T> = std::result::Result<T, Error>;

/// GL error code reported for [`Error::InvalidEnum`]
pub const GL_INVALID_ENUM: u32 = 0x0500;
/// GL error code reported for [`Error::InvalidValue`]
pub const GL_INVALID_VALUE: u32 = 0x0501;
/// GL error code reported for [`Error::InvalidOperation`]
pub const GL_INVALID_OPERATION: u32 = 0x0502;

/// Vertex array errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A numeric argument is out of its legal domain (negative stride or count, end < start)
    InvalidValue(String),

    /// An enumerated argument is not in the supported set for that call
    InvalidEnum(String),

    /// The call is not allowed in the current context state (e.g. inside begin/end)
    InvalidOperation(String),

    /// Context creation failed (invalid configuration)
    InitializationFailed(String),
}

impl Error {
    /// GL error code for the host's error channel
    ///
    /// Returns `None` for errors that have no GL classification.
    pub fn gl_code(&self) -> Option<u32> {
        match self {
            Error::InvalidValue(_) => Some(GL_INVALID_VALUE),
            Error::InvalidEnum(_) => Some(GL_INVALID_ENUM),
            Error::InvalidOperation(_) => Some(GL_INVALID_OPERATION),
            Error::InitializationFailed(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            Error::InvalidEnum(msg) => write!(f, "Invalid enum: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an [`Error`] of the given kind and log it at ERROR severity
///
/// # Example
///
/// ```ignore
/// let unit = units.get(i).ok_or_else(|| engine_err!("galaxy3d::ArrayStore",
///     InvalidEnum, "texture unit {} out of range", i))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $kind:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::$kind(message)
    }};
}

/// Log an error and return it from the enclosing function
///
/// # Example
///
/// ```ignore
/// if stride < 0 {
///     engine_bail!("galaxy3d::ArrayStore", InvalidValue, "glVertexPointer(stride={})", stride);
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $kind:ident, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $kind, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
