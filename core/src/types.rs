use thiserror::Error;

use crate::utils::status_name;

/// Unified error for every facade, backend and resolver operation.
/// - Validation variants are raised before any native call.
/// - Native failures carry the raw status so callers can log or match it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZipperError {
    /// Bad level, ratio or retry count at construction.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Hardware could not be acquired (Hardware mode only).
    #[error("{codec}: hardware resources unavailable ({})", status_name(.code))]
    ResourceAcquisition { codec: &'static str, code: i32 },

    /// Malformed call: empty range, zero-capacity destination, unsupported algorithm.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Offset/length arithmetic violates a buffer's bounds.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// Destination buffer is read-only.
    #[error("destination buffer is read-only")]
    ReadOnlyTarget,

    /// Operation after `end()`.
    #[error("session has been closed")]
    InvalidSession,

    /// Negative status from the codec boundary, e.g. corrupt input.
    #[error("{codec} failed with {}: {msg}", status_name(.code))]
    NativeCodec {
        codec: &'static str,
        code: i32,
        msg: String,
    },
}

pub type Result<T> = std::result::Result<T, ZipperError>;
