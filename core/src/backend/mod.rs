//! backend/mod.rs
//! Backend variants behind the facade and the validation/dispatch logic
//! they share.
pub mod dummy;
pub mod qatzip;
pub mod session;
pub mod zstd;

use std::sync::Arc;

pub use dummy::DummyBackend;
pub use qatzip::QatZipBackend;
pub use session::{Session, Teardown};
pub use self::zstd::ZstdBackend;

use crate::buffer::{resolve, ByteBuf, Resolved};
use crate::config::{Algorithm, CodecConfig};
use crate::native::{Device, Direction, EntryPoint, Transfer};
use crate::types::{Result, ZipperError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    HardwareOffload,
    Software,
    Test,
}

impl BackendKind {
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Deflate | Algorithm::Lz4 => BackendKind::HardwareOffload,
            Algorithm::Zstd => BackendKind::Software,
            Algorithm::Dummy | Algorithm::Dummy2 => BackendKind::Test,
        }
    }
}

/// Common contract of every backend variant.
pub trait ZipperBackend: Send {
    fn kind(&self) -> BackendKind;

    /// Name used in errors and logs.
    fn codec_name(&self) -> &'static str;

    fn is_valid(&self) -> bool;

    fn max_compressed_size(&self, len: usize) -> Result<usize>;

    /// One native call on already validated ranges.
    fn invoke(
        &mut self,
        direction: Direction,
        entry: EntryPoint,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<Transfer>;

    /// Invalidate and tear down. Fails with `InvalidSession` when already ended.
    fn end(&mut self) -> Result<()>;

    fn teardown_handle(&self) -> Arc<dyn Teardown>;
}

/// Build the backend variant selected by `config.algorithm`.
pub fn open(config: &CodecConfig, device: &Arc<Device>) -> Result<Box<dyn ZipperBackend>> {
    config.validate()?;
    Ok(match BackendKind::for_algorithm(config.algorithm) {
        BackendKind::HardwareOffload => Box::new(QatZipBackend::new(config, device)?),
        BackendKind::Software => Box::new(ZstdBackend::new(config, device)?),
        BackendKind::Test => Box::new(DummyBackend::new(config)?),
    })
}

fn ensure_live(backend: &dyn ZipperBackend) -> Result<()> {
    if backend.is_valid() {
        Ok(())
    } else {
        Err(ZipperError::InvalidSession)
    }
}

/// Argument checks for the offset/length form, in the order the caller sees them.
pub fn validate_range(
    src_len_total: usize,
    src_off: usize,
    src_len: usize,
    dst_len_total: usize,
    dst_off: usize,
    dst_len: usize,
) -> Result<()> {
    if src_len == 0 || dst_len_total == 0 {
        return Err(ZipperError::Argument(
            "source length and destination capacity must be non-zero".into(),
        ));
    }
    if src_off >= src_len_total || src_len > src_len_total {
        return Err(ZipperError::OutOfBounds(format!(
            "source range {src_off}+{src_len} in {src_len_total} bytes"
        )));
    }
    if src_off.checked_add(src_len).map_or(true, |end| end > src_len_total) {
        return Err(ZipperError::OutOfBounds(format!(
            "source range {src_off}+{src_len} ends past {src_len_total} bytes"
        )));
    }
    if dst_off.checked_add(dst_len).map_or(true, |end| end > dst_len_total) {
        return Err(ZipperError::OutOfBounds(format!(
            "destination range {dst_off}+{dst_len} ends past {dst_len_total} bytes"
        )));
    }
    Ok(())
}

pub fn max_compressed_length(backend: &dyn ZipperBackend, len: usize) -> Result<usize> {
    ensure_live(backend)?;
    backend.max_compressed_size(len)
}

/// Offset/length form. Returns the bytes consumed from the source range
/// and written into the destination range.
#[allow(clippy::too_many_arguments)]
pub fn process_range(
    backend: &mut dyn ZipperBackend,
    direction: Direction,
    src: &[u8],
    src_off: usize,
    src_len: usize,
    dst: &mut [u8],
    dst_off: usize,
    dst_len: usize,
) -> Result<Transfer> {
    ensure_live(backend)?;
    validate_range(src.len(), src_off, src_len, dst.len(), dst_off, dst_len)?;
    backend.invoke(
        direction,
        EntryPoint::ByteArray,
        &src[src_off..src_off + src_len],
        &mut dst[dst_off..dst_off + dst_len],
    )
}

/// Buffer form; positions advance on success.
pub fn process_buffer(
    backend: &mut dyn ZipperBackend,
    direction: Direction,
    src: &mut ByteBuf,
    dst: &mut ByteBuf,
) -> Result<Resolved> {
    ensure_live(backend)?;
    resolve(src, dst, |entry, s, d| backend.invoke(direction, entry, s, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lengths_are_argument_errors() {
        assert!(matches!(validate_range(4, 0, 0, 4, 0, 4), Err(ZipperError::Argument(_))));
        assert!(matches!(validate_range(4, 0, 4, 0, 0, 0), Err(ZipperError::Argument(_))));
    }

    #[test]
    fn offsets_past_the_end_are_out_of_bounds() {
        assert!(matches!(validate_range(4, 4, 1, 4, 0, 4), Err(ZipperError::OutOfBounds(_))));
        assert!(matches!(validate_range(4, 0, 5, 4, 0, 4), Err(ZipperError::OutOfBounds(_))));
        assert!(matches!(validate_range(4, 2, 3, 4, 0, 4), Err(ZipperError::OutOfBounds(_))));
        assert!(matches!(validate_range(4, 0, 4, 4, 1, 4), Err(ZipperError::OutOfBounds(_))));
        assert!(validate_range(4, 1, 3, 8, 2, 6).is_ok());
    }

    #[test]
    fn algorithm_selects_variant() {
        assert_eq!(BackendKind::for_algorithm(Algorithm::Zstd), BackendKind::Software);
        assert_eq!(BackendKind::for_algorithm(Algorithm::Lz4), BackendKind::HardwareOffload);
        assert_eq!(BackendKind::for_algorithm(Algorithm::Dummy2), BackendKind::Test);
    }
}
