//! backend/dummy.rs
//! Test variant. No levels, no retries, no hardware.
//!
//! NOTE: decompression runs the same expanding entry point as compression.
//! It is a placeholder and does not invert `compress`.
use std::sync::Arc;

use log::trace;

use super::session::{Session, Teardown};
use super::{BackendKind, ZipperBackend};
use crate::config::{Algorithm, CodecConfig};
use crate::native::{dummy as native_dummy, Direction, DummySession, EntryPoint, Transfer};
use crate::types::{Result, ZipperError};

const CODEC: &str = "dummy";

pub struct DummyBackend {
    algorithm: Algorithm,
    session: Session<DummySession>,
}

impl DummyBackend {
    pub fn new(config: &CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            algorithm: config.algorithm,
            session: Session::open(CODEC, DummySession::setup(config.inverse_ratio)),
        })
    }
}

impl ZipperBackend for DummyBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Test
    }

    fn codec_name(&self) -> &'static str {
        CODEC
    }

    fn is_valid(&self) -> bool {
        self.session.is_valid()
    }

    fn max_compressed_size(&self, len: usize) -> Result<usize> {
        self.session.with_handle(|d| Ok(native_dummy::max_compressed_size(d.ratio(), len)))
    }

    fn invoke(
        &mut self,
        direction: Direction,
        entry: EntryPoint,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<Transfer> {
        if self.algorithm != Algorithm::Dummy {
            return Err(ZipperError::Argument(format!(
                "Algorithm {} is not supported by DummyBackend",
                self.algorithm
            )));
        }
        trace!("[DUMMY] {direction:?} via {entry:?}, same kernel both ways");
        self.session.with_handle(|d| Ok(d.compress_byte_array(src, dst)))
    }

    fn end(&mut self) -> Result<()> {
        self.session.end()
    }

    fn teardown_handle(&self) -> Arc<dyn Teardown> {
        self.session.teardown_handle()
    }
}
