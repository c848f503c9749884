//! native/mod.rs
//! The codec boundary: session types whose entry points mirror the native
//! QATzip/zstd library, backed by the Rust codec crates and the in-process
//! device model.
//!
//! Each session runs one code path per engine for all `EntryPoint`s. The
//! entry point records which buffer shape the call came from.
pub mod device;
pub mod dummy;
pub mod qatzip;
pub mod status;
pub mod zstd;

pub use device::{Device, DeviceLease, DeviceStats, InstanceGuard};
pub use dummy::DummySession;
pub use qatzip::QzSession;
pub use status::{Direction, EntryPoint, NativeStatus, StatusCode, Transfer};
pub use self::zstd::ZstdContexts;
