//! qat-core
//!
//! Codec session and buffer-marshalling layer over the QAT compression
//! boundary: DEFLATE/LZ4 offload, zstd with accelerated sequence
//! production, and a placeholder dummy codec.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Codec boundary and the layers above it
pub mod native;
pub mod buffer;
pub mod backend;
pub mod cleaner;
pub mod telemetry;

// Facade
pub mod zipper;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::buffer::{ByteBuf, DispatchShape};
    pub use crate::config::{Algorithm, CodecConfig, Mode};
    pub use crate::native::Device;
    pub use crate::types::{Result, ZipperError};
    pub use crate::zipper::QatZipper;
}
