//! native/qatzip.rs
//! QATzip session: DEFLATE or LZ4 block compression on an attached
//! accelerator instance, with the software path as backup in `Auto` mode.
//!
//! Every `EntryPoint` runs the same code here: the resolver has already
//! reduced each buffer shape to a pair of byte slices. The entry point is
//! carried for tracing only.
use std::sync::Arc;

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use log::{debug, trace};

use crate::config::{Algorithm, Mode};
use crate::constants::QZ_SKID_PAD_SZ;
use crate::native::device::{Device, DeviceLease, InstanceGuard};
use crate::native::status::{EntryPoint, NativeStatus, StatusCode, Transfer};

/// Largest input `lz4_flex::block::get_maximum_output_size` can size
/// without overflowing.
const LZ4_MAX_BOUNDED_INPUT: usize = usize::MAX / 110;

/// Upper bound of the QATzip output for `len` input bytes.
/// Saturates at `usize::MAX`, so it never decreases as `len` grows.
pub fn max_compressed_size(algorithm: Algorithm, len: usize) -> usize {
    match algorithm {
        Algorithm::Lz4 if len > LZ4_MAX_BOUNDED_INPUT => usize::MAX,
        Algorithm::Lz4 => {
            lz4_flex::block::get_maximum_output_size(len).saturating_add(QZ_SKID_PAD_SZ)
        }
        _ => len.div_ceil(8).saturating_mul(9).saturating_add(QZ_SKID_PAD_SZ),
    }
}

enum Engine {
    Deflate { deflater: Compress, inflater: Decompress },
    Lz4,
}

pub struct QzSession {
    algorithm: Algorithm,
    sw_backup: bool,
    engine: Engine,
    instance: Option<InstanceGuard>,
    lease: DeviceLease,
}

impl QzSession {
    /// `qzInit` + `qzSetupSession`. Attaches an instance if one is free;
    /// a host without any hardware only gets a session in `Auto` mode.
    pub fn setup(
        device: &Arc<Device>,
        mode: Mode,
        algorithm: Algorithm,
        level: u32,
    ) -> Result<Self, NativeStatus> {
        let engine = match algorithm {
            Algorithm::Deflate => Engine::Deflate {
                deflater: Compress::new(Compression::new(level), false),
                inflater: Decompress::new(false),
            },
            Algorithm::Lz4 => Engine::Lz4,
            other => {
                return Err(NativeStatus::new(
                    StatusCode::Params,
                    format!("algorithm {other} is not handled by QATzip"),
                ))
            }
        };

        let sw_backup = mode == Mode::Auto;
        if !device.has_hardware() && !sw_backup {
            return Err(NativeStatus::new(StatusCode::NoSwNoHw, "Initializing QAT HW failed."));
        }

        let lease = device.lease();
        let instance = device.try_attach();
        debug!(
            "[SETUP] qatzip {algorithm} level={level} mode={mode} attached={}",
            instance.is_some()
        );
        Ok(Self { algorithm, sw_backup, engine, instance, lease })
    }

    pub fn max_compressed_size(&self, len: usize) -> usize {
        max_compressed_size(self.algorithm, len)
    }

    pub fn compress(
        &mut self,
        entry: EntryPoint,
        src: &[u8],
        dst: &mut [u8],
        retry_count: u32,
    ) -> Result<Transfer, NativeStatus> {
        let on_hw = self.acquire(retry_count)?;
        trace!("[QZ] compress via {entry:?} on {}", if on_hw { "hw" } else { "sw" });
        let transfer = match &mut self.engine {
            Engine::Deflate { deflater, .. } => deflate(deflater, src, dst)?,
            Engine::Lz4 => {
                let n = lz4_flex::block::compress_into(src, dst)
                    .map_err(|e| NativeStatus::new(StatusCode::BufError, e.to_string()))?;
                Transfer::new(src.len(), n)
            }
        };
        self.lease.device().record_job(on_hw);
        Ok(transfer)
    }

    pub fn decompress(
        &mut self,
        entry: EntryPoint,
        src: &[u8],
        dst: &mut [u8],
        retry_count: u32,
    ) -> Result<Transfer, NativeStatus> {
        let on_hw = self.acquire(retry_count)?;
        trace!("[QZ] decompress via {entry:?} on {}", if on_hw { "hw" } else { "sw" });
        let transfer = match &mut self.engine {
            Engine::Deflate { inflater, .. } => inflate(inflater, src, dst)?,
            Engine::Lz4 => {
                let n = lz4_flex::block::decompress_into(src, dst).map_err(|e| match e {
                    lz4_flex::block::DecompressError::OutputTooSmall { .. } => {
                        NativeStatus::new(StatusCode::BufError, e.to_string())
                    }
                    _ => NativeStatus::new(StatusCode::DataError, e.to_string()),
                })?;
                Transfer::new(src.len(), n)
            }
        };
        self.lease.device().record_job(on_hw);
        Ok(transfer)
    }

    /// Ensure an instance is attached. Returns `false` when the software
    /// path will run instead.
    fn acquire(&mut self, retry_count: u32) -> Result<bool, NativeStatus> {
        if self.instance.is_some() {
            return Ok(true);
        }
        if let Some(guard) = self.lease.device().attach_with_retry(retry_count) {
            debug!("[SETUP] qatzip late-attached an instance");
            self.instance = Some(guard);
            return Ok(true);
        }
        if self.sw_backup {
            debug!("[FALLBACK] no instance after {} attempt(s), using software", retry_count + 1);
            return Ok(false);
        }
        Err(NativeStatus::new(
            StatusCode::NoSwNoInstAttach,
            format!("no instance attached after {} attempt(s)", retry_count + 1),
        ))
    }
}

fn deflate(deflater: &mut Compress, src: &[u8], dst: &mut [u8]) -> Result<Transfer, NativeStatus> {
    deflater.reset();
    match deflater.compress(src, dst, FlushCompress::Finish) {
        Ok(Status::StreamEnd) => Ok(Transfer::new(
            deflater.total_in() as usize,
            deflater.total_out() as usize,
        )),
        Ok(_) => Err(NativeStatus::new(
            StatusCode::BufError,
            "destination too small for deflate stream",
        )),
        Err(e) => Err(NativeStatus::new(StatusCode::Fail, e.to_string())),
    }
}

fn inflate(
    inflater: &mut Decompress,
    src: &[u8],
    dst: &mut [u8],
) -> Result<Transfer, NativeStatus> {
    inflater.reset(false);
    match inflater.decompress(src, dst, FlushDecompress::Finish) {
        Ok(Status::StreamEnd) => Ok(Transfer::new(
            inflater.total_in() as usize,
            inflater.total_out() as usize,
        )),
        Ok(_) => Err(NativeStatus::new(
            StatusCode::BufError,
            "destination too small or truncated input",
        )),
        Err(e) => Err(NativeStatus::new(StatusCode::DataError, e.to_string())),
    }
}
