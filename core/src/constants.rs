//! constants.rs
//! Defaults, level bounds and environment keys shared by the facade,
//! the backends and the native boundary.

/// Default compression level (balanced).
pub const DEFAULT_COMPRESS_LEVEL: u32 = 6;

/// Default number of extra attempts to attach a hardware instance.
pub const DEFAULT_RETRY_COUNT: u32 = 0;

/// Level range honoured by the DEFLATE, LZ4 and ZSTD variants.
pub const MIN_COMPRESS_LEVEL: u32 = 1;
pub const MAX_COMPRESS_LEVEL: u32 = 9;

/// The dummy codec expands its input by this factor unless told otherwise.
pub const DEFAULT_INVERSE_RATIO: u32 = 2;
pub const MIN_INVERSE_RATIO: u32 = 1;
pub const MAX_INVERSE_RATIO: u32 = 9;

/// Instances exposed by `Device::global()` when the environment is silent.
pub const DEFAULT_HW_INSTANCES: usize = 8;

/// Slack appended to every DEFLATE/LZ4 bound (block headers, trailer, skid pad).
pub const QZ_SKID_PAD_SZ: usize = 48;

/// Environment keys read by `CodecConfig::from_env` and `Device::global`.
pub mod env_keys {
    pub const ALGORITHM: &str = "QAT_ZIPPER_ALGORITHM";
    pub const LEVEL: &str = "QAT_ZIPPER_LEVEL";
    pub const MODE: &str = "QAT_ZIPPER_MODE";
    pub const RETRY_COUNT: &str = "QAT_ZIPPER_RETRY_COUNT";
    pub const INVERSE_RATIO: &str = "QAT_ZIPPER_INVERSE_RATIO";
    pub const HW_INSTANCES: &str = "QAT_ZIPPER_HW_INSTANCES";
}
