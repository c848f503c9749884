//! zipper.rs
//! `QatZipper`: the single entry point. Picks a backend variant from the
//! configuration, forwards calls to it and keeps its session registered
//! with the cleanup registry until `end()` or drop.
use std::sync::Arc;

use log::{debug, info};

use crate::backend::{self, BackendKind, ZipperBackend};
use crate::buffer::ByteBuf;
use crate::cleaner::{Cleanable, Cleaner};
use crate::config::{Algorithm, CodecConfig, Mode};
use crate::native::{Device, Direction};
use crate::telemetry::ZipperCounters;
use crate::types::Result;

pub struct QatZipper {
    config: CodecConfig,
    backend: Box<dyn ZipperBackend>,
    counters: ZipperCounters,
    cleanable: Cleanable,
}

impl QatZipper {
    /// DEFLATE, level 6, hardware mode, no retries.
    pub fn new() -> Result<Self> {
        Self::with_config(CodecConfig::default())
    }

    pub fn with_algorithm(algorithm: Algorithm) -> Result<Self> {
        Self::with_config(CodecConfig::default().with_algorithm(algorithm))
    }

    pub fn with_mode(mode: Mode) -> Result<Self> {
        Self::with_config(CodecConfig::default().with_mode(mode))
    }

    pub fn with_algorithm_and_mode(algorithm: Algorithm, mode: Mode) -> Result<Self> {
        Self::with_config(CodecConfig::default().with_algorithm(algorithm).with_mode(mode))
    }

    pub fn with_level(algorithm: Algorithm, level: u32) -> Result<Self> {
        Self::with_config(CodecConfig::default().with_algorithm(algorithm).with_level(level))
    }

    pub fn with_config(config: CodecConfig) -> Result<Self> {
        Self::with_device(config, Device::global())
    }

    pub fn with_device(config: CodecConfig, device: Arc<Device>) -> Result<Self> {
        Self::open(config, &device, Cleaner::global())
    }

    /// Validate, set up the backend session and register its teardown.
    pub fn open(config: CodecConfig, device: &Arc<Device>, cleaner: &Cleaner) -> Result<Self> {
        let backend = backend::open(&config, device)?;
        let teardown = backend.teardown_handle();
        let cleanable = cleaner.register(move || {
            teardown.teardown();
        });
        info!(
            "[SETUP] {} {:?} level={} mode={} retry={}",
            config.algorithm,
            backend.kind(),
            config.level,
            config.mode,
            config.retry_count
        );
        Ok(Self { config, backend, counters: ZipperCounters::default(), cleanable })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn is_valid(&self) -> bool {
        self.backend.is_valid()
    }

    pub fn counters(&self) -> &ZipperCounters {
        &self.counters
    }

    pub fn max_compressed_length(&self, len: usize) -> Result<usize> {
        backend::max_compressed_length(self.backend.as_ref(), len)
    }

    pub fn compress(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        let (src_len, dst_len) = (src.len(), dst.len());
        self.range(Direction::Compress, src, 0, src_len, dst, 0, dst_len)
    }

    pub fn compress_range(
        &mut self,
        src: &[u8],
        src_off: usize,
        src_len: usize,
        dst: &mut [u8],
        dst_off: usize,
        dst_len: usize,
    ) -> Result<usize> {
        self.range(Direction::Compress, src, src_off, src_len, dst, dst_off, dst_len)
    }

    /// Compresses `src`'s remaining bytes into `dst`'s remaining space.
    /// On success both positions advance.
    pub fn compress_buffer(&mut self, src: &mut ByteBuf, dst: &mut ByteBuf) -> Result<usize> {
        self.buffer(Direction::Compress, src, dst)
    }

    pub fn decompress(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        let (src_len, dst_len) = (src.len(), dst.len());
        self.range(Direction::Decompress, src, 0, src_len, dst, 0, dst_len)
    }

    pub fn decompress_range(
        &mut self,
        src: &[u8],
        src_off: usize,
        src_len: usize,
        dst: &mut [u8],
        dst_off: usize,
        dst_len: usize,
    ) -> Result<usize> {
        self.range(Direction::Decompress, src, src_off, src_len, dst, dst_off, dst_len)
    }

    pub fn decompress_buffer(&mut self, src: &mut ByteBuf, dst: &mut ByteBuf) -> Result<usize> {
        self.buffer(Direction::Decompress, src, dst)
    }

    /// Invalidate the session and release its native resources.
    /// A second call fails with `InvalidSession`.
    pub fn end(&mut self) -> Result<()> {
        self.backend.end()?;
        self.cleanable.clean();
        debug!("[TEARDOWN] {} session ended", self.backend.codec_name());
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn range(
        &mut self,
        direction: Direction,
        src: &[u8],
        src_off: usize,
        src_len: usize,
        dst: &mut [u8],
        dst_off: usize,
        dst_len: usize,
    ) -> Result<usize> {
        let res = backend::process_range(
            self.backend.as_mut(),
            direction,
            src,
            src_off,
            src_len,
            dst,
            dst_off,
            dst_len,
        );
        match res {
            Ok(transfer) => {
                self.counters.record(direction, &transfer);
                Ok(transfer.bytes_written)
            }
            Err(e) => {
                self.counters.record_failure();
                Err(e)
            }
        }
    }

    fn buffer(
        &mut self,
        direction: Direction,
        src: &mut ByteBuf,
        dst: &mut ByteBuf,
    ) -> Result<usize> {
        match backend::process_buffer(self.backend.as_mut(), direction, src, dst) {
            Ok(resolved) => {
                self.counters.record(direction, &resolved.transfer);
                self.counters.record_shape(resolved.shape);
                Ok(resolved.transfer.bytes_written)
            }
            Err(e) => {
                self.counters.record_failure();
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for QatZipper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QatZipper")
            .field("config", &self.config)
            .field("backend", &self.backend.kind())
            .field("valid", &self.is_valid())
            .field("registration", &self.cleanable.id())
            .finish()
    }
}
