//! Error types for the Galaxy3D engine
//!
//! This module defines the error type shared by the engine core and every
//! render-system backend, plus the `engine_err!` family of macros that log an
//! error through the engine logger before handing it back to the caller.

use std::fmt;

/// Result type for Galaxy3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (OpenGL ES driver, EGL, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (render texture, surface, pixel format, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, render system, context)
    InitializationFailed(String),

    /// API used in a configuration the backend cannot honor
    InvalidUsage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidUsage(msg) => write!(f, "Invalid usage: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_engine::engine_err;
///
/// let err = engine_err!("galaxy3d::gles2", "glCreateFramebuffer failed: {}", "no context");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::galaxy3d::Engine::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return `Err(Error::BackendError)` from the
/// enclosing function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Log a WARN message and build an `Error::BackendError` from it
#[macro_export]
macro_rules! engine_warn_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Warn,
            $source,
            message.clone()
        );
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log a WARN message and return `Err(Error::BackendError)` from the
/// enclosing function
#[macro_export]
macro_rules! engine_bail_warn {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_warn_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
