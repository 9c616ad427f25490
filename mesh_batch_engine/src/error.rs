//! Error types for the MeshBatch engine
//!
//! This module defines the error type used throughout the engine, covering
//! backend failures, malformed model assets, texture resolution and pipeline
//! creation. Errors are logged where they are created (see `engine_err!`).

use std::fmt;

/// Result type for MeshBatch engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// MeshBatch engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan, wgpu, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (buffer, binding group, pipeline, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, renderer registry)
    InitializationFailed(String),

    /// Model asset is internally inconsistent (counts, ranges, ids)
    DataIntegrity(String),

    /// Model asset exceeds a fixed format limit (16-bit indices, texture slots)
    SizeLimit(String),

    /// A referenced texture could not be resolved
    TextureNotFound(String),

    /// The backend refused a pipeline state
    PipelineCreation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::DataIntegrity(msg) => write!(f, "Data integrity error: {}", msg),
            Error::SizeLimit(msg) => write!(f, "Size limit exceeded: {}", msg),
            Error::TextureNotFound(msg) => write!(f, "Texture not found: {}", msg),
            Error::PipelineCreation(msg) => write!(f, "Pipeline creation failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR entry and build the matching `Error`
///
/// The optional leading identifier selects the `Error` variant (defaults to
/// `BackendError`). The message is logged with file:line before being wrapped.
///
/// # Example
///
/// ```text
/// let err = engine_err!(DataIntegrity, "meshbatch::Mesh", "bad index {}", 7);
/// let err = engine_err!("meshbatch::Mesh", "backend said no");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::meshbatch::Error::$variant(message)
    }};
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_err!(BackendError, $source, $($arg)*)
    };
}

/// Log an ERROR entry and return early with the matching `Error`
///
/// Same argument forms as `engine_err!`.
#[macro_export]
macro_rules! engine_bail {
    ($($arg:tt)*) => {
        return Err($crate::engine_err!($($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
