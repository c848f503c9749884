//! native/status.rs
//! Status codes, transfer counts and entry-point tags of the codec boundary.
use std::fmt;
use num_enum::TryFromPrimitive;

use crate::types::ZipperError;
use crate::utils::status_name;

/// FFI-safe status codes, numbered like the QATzip header.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum StatusCode {
    Success          = 0,
    Params           = -1,
    Fail             = -2,
    BufError         = -3,
    DataError        = -4,
    NoSwNoHw         = -101,
    NoSwNoInstAttach = -103,
}

/// Failure reported by a native entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeStatus {
    pub code: StatusCode,
    pub msg: String,
}

impl NativeStatus {
    pub fn new(code: StatusCode, msg: impl Into<String>) -> Self {
        Self { code, msg: msg.into() }
    }

    /// True for the statuses that mean "no hardware could be used".
    pub fn is_hw_unavailable(&self) -> bool {
        matches!(self.code, StatusCode::NoSwNoHw | StatusCode::NoSwNoInstAttach)
    }

    /// Map onto the crate error, tagging it with the codec name.
    pub fn into_error(self, codec: &'static str) -> ZipperError {
        let code = self.code as i32;
        if self.is_hw_unavailable() {
            ZipperError::ResourceAcquisition { codec, code }
        } else {
            ZipperError::NativeCodec { codec, code, msg: self.msg }
        }
    }
}

impl fmt::Display for NativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", status_name(&(self.code as i32)), self.msg)
    }
}

/// Bytes consumed from the source and produced into the destination by one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transfer {
    pub bytes_read: usize,
    pub bytes_written: usize,
}

impl Transfer {
    pub fn new(bytes_read: usize, bytes_written: usize) -> Self {
        Self { bytes_read, bytes_written }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Compress,
    Decompress,
}

/// Native entry points. Every compress/decompress call lands on exactly one.
/// The sessions share a single code path across them; the variant is kept
/// for tracing and dispatch assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// `(de)compressByteArray`: caller-supplied offset/length ranges.
    ByteArray,
    /// `(de)compressByteBuffer`: both sides array-backed.
    ByteBuffer,
    /// `(de)compressDirectByteBuffer`: both sides direct.
    DirectByteBuffer,
    /// `(de)compressDirectByteBufferSrc`: direct source, array destination.
    DirectByteBufferSrc,
    /// `(de)compressDirectByteBufferDst`: array source, direct destination.
    DirectByteBufferDst,
}
