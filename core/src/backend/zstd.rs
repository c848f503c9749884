//! backend/zstd.rs
//! Software zstd variant. Both contexts and the sequence producer are one
//! handle, so they are created and released together.
use std::sync::Arc;

use super::session::{Session, Teardown};
use super::{BackendKind, ZipperBackend};
use crate::config::CodecConfig;
use crate::native::{zstd as native_zstd, Device, Direction, EntryPoint, Transfer, ZstdContexts};
use crate::types::Result;

const CODEC: &str = "zstd";

pub struct ZstdBackend {
    retry_count: u32,
    session: Session<ZstdContexts>,
}

impl ZstdBackend {
    pub fn new(config: &CodecConfig, device: &Arc<Device>) -> Result<Self> {
        config.validate()?;
        let ctx = ZstdContexts::setup(device, config.mode, config.level)
            .map_err(|s| s.into_error(CODEC))?;
        Ok(Self { retry_count: config.retry_count, session: Session::open(CODEC, ctx) })
    }
}

impl ZipperBackend for ZstdBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Software
    }

    fn codec_name(&self) -> &'static str {
        CODEC
    }

    fn is_valid(&self) -> bool {
        self.session.is_valid()
    }

    /// Independent of the contexts.
    fn max_compressed_size(&self, len: usize) -> Result<usize> {
        self.session.ensure_valid()?;
        Ok(native_zstd::max_compressed_size(len))
    }

    fn invoke(
        &mut self,
        direction: Direction,
        entry: EntryPoint,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<Transfer> {
        let retry = self.retry_count;
        self.session.with_handle(|ctx| {
            match direction {
                Direction::Compress => ctx.compress(entry, src, dst, retry),
                Direction::Decompress => ctx.decompress(entry, src, dst, retry),
            }
            .map_err(|s| s.into_error(CODEC))
        })
    }

    fn end(&mut self) -> Result<()> {
        self.session.end()
    }

    fn teardown_handle(&self) -> Arc<dyn Teardown> {
        self.session.teardown_handle()
    }
}
