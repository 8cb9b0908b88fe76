//! Error types for Bigsby
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using BigsbyError
pub type Result<T> = std::result::Result<T, BigsbyError>;

/// Unified error type for Bigsby operations
#[derive(Debug, Error)]
pub enum BigsbyError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Segment Errors
    // -------------------------------------------------------------------------
    #[error("bad segment: {0}")]
    BadSegment(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("short read: needed {needed} bytes, had {had}")]
    ShortRead { needed: usize, had: usize },

    #[error("decode error: {0}")]
    Decode(String),

    // -------------------------------------------------------------------------
    // Shell Errors
    // -------------------------------------------------------------------------
    #[error("bad arguments: {0}")]
    BadArguments(String),
}
