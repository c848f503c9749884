//! backend/qatzip.rs
//! Hardware-offload variant: DEFLATE and LZ4 through a QATzip session.
use std::sync::Arc;

use log::debug;

use super::session::{Session, Teardown};
use super::{BackendKind, ZipperBackend};
use crate::config::{Algorithm, CodecConfig};
use crate::native::{Device, Direction, EntryPoint, QzSession, Transfer};
use crate::types::Result;

pub struct QatZipBackend {
    algorithm: Algorithm,
    retry_count: u32,
    session: Session<QzSession>,
}

impl QatZipBackend {
    pub fn new(config: &CodecConfig, device: &Arc<Device>) -> Result<Self> {
        config.validate()?;
        let codec = codec_name(config.algorithm);
        let qz = QzSession::setup(device, config.mode, config.algorithm, config.level)
            .map_err(|s| s.into_error(codec))?;
        debug!("[SETUP] {codec} backend ready (retry_count={})", config.retry_count);
        Ok(Self {
            algorithm: config.algorithm,
            retry_count: config.retry_count,
            session: Session::open(codec, qz),
        })
    }
}

fn codec_name(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::Lz4 => "qatzip-lz4",
        _ => "qatzip-deflate",
    }
}

impl ZipperBackend for QatZipBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::HardwareOffload
    }

    fn codec_name(&self) -> &'static str {
        codec_name(self.algorithm)
    }

    fn is_valid(&self) -> bool {
        self.session.is_valid()
    }

    fn max_compressed_size(&self, len: usize) -> Result<usize> {
        self.session.with_handle(|qz| Ok(qz.max_compressed_size(len)))
    }

    fn invoke(
        &mut self,
        direction: Direction,
        entry: EntryPoint,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<Transfer> {
        let (codec, retry) = (self.codec_name(), self.retry_count);
        self.session.with_handle(|qz| {
            match direction {
                Direction::Compress => qz.compress(entry, src, dst, retry),
                Direction::Decompress => qz.decompress(entry, src, dst, retry),
            }
            .map_err(|s| s.into_error(codec))
        })
    }

    fn end(&mut self) -> Result<()> {
        self.session.end()
    }

    fn teardown_handle(&self) -> Arc<dyn Teardown> {
        self.session.teardown_handle()
    }
}
