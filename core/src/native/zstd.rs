//! native/zstd.rs
//! zstd contexts with QAT sequence production. Compression and
//! decompression contexts are independent; both live and die together.
//!
//! Every `EntryPoint` shares the same context calls; the entry point is
//! carried for tracing only.
use std::sync::Arc;

use log::{debug, trace};
use zstd_safe::{CCtx, CParameter, DCtx, ErrorCode};

use crate::config::Mode;
use crate::native::device::{Device, DeviceLease, InstanceGuard};
use crate::native::status::{EntryPoint, NativeStatus, StatusCode, Transfer};

/// `ZSTD_MAX_INPUT_SIZE` from zstd.h. `ZSTD_compressBound` has no answer
/// at or above it.
#[cfg(target_pointer_width = "64")]
const ZSTD_MAX_INPUT_SIZE: usize = 0xFF00_FF00_FF00_FF00;
#[cfg(not(target_pointer_width = "64"))]
const ZSTD_MAX_INPUT_SIZE: usize = 0xFF00_FF00;

/// `ZSTD_error_dstSize_tooSmall` from zstd_errors.h.
const ZSTD_ERROR_DST_SIZE_TOO_SMALL: usize = 70;

/// Worst-case zstd frame size for `len` input bytes. Saturates at
/// `usize::MAX` past the largest input zstd accepts.
pub fn max_compressed_size(len: usize) -> usize {
    if len >= ZSTD_MAX_INPUT_SIZE {
        return usize::MAX;
    }
    zstd_safe::compress_bound(len)
}

/// Sequence producer registered on the compression context.
struct SequenceProducer {
    instance: Option<InstanceGuard>,
    fallback: bool,
}

pub struct ZstdContexts {
    cctx: CCtx<'static>,
    dctx: DCtx<'static>,
    seq_producer: SequenceProducer,
    lease: DeviceLease,
}

impl ZstdContexts {
    /// Start the device, create both contexts and register the sequence
    /// producer. `Auto` enables software fallback of sequence production.
    pub fn setup(device: &Arc<Device>, mode: Mode, level: u32) -> Result<Self, NativeStatus> {
        let fallback = mode == Mode::Auto;
        if !device.has_hardware() && !fallback {
            return Err(NativeStatus::new(StatusCode::NoSwNoHw, "QAT device start failed"));
        }
        let mut cctx = CCtx::try_create().ok_or_else(|| context_error("compression"))?;
        let dctx = DCtx::try_create().ok_or_else(|| context_error("decompression"))?;
        let level = i32::try_from(level).map_err(|_| {
            NativeStatus::new(StatusCode::Params, format!("zstd level {level} out of range"))
        })?;
        cctx.set_parameter(CParameter::CompressionLevel(level))
            .map_err(|code| zstd_status(code, StatusCode::Params))?;

        let lease = device.lease();
        let instance = device.try_attach();
        debug!(
            "[SETUP] zstd level={level} mode={mode} seq_producer_attached={} fallback={fallback}",
            instance.is_some()
        );
        Ok(Self {
            cctx,
            dctx,
            seq_producer: SequenceProducer { instance, fallback },
            lease,
        })
    }

    /// Retry count is accepted for signature parity and ignored.
    pub fn compress(
        &mut self,
        entry: EntryPoint,
        src: &[u8],
        dst: &mut [u8],
        _retry_count: u32,
    ) -> Result<Transfer, NativeStatus> {
        let on_hw = self.sequence_producer_ready()?;
        trace!("[ZSTD] compress via {entry:?} seq_producer={}", if on_hw { "hw" } else { "sw" });
        let n = self
            .cctx
            .compress2(dst, src)
            .map_err(|code| zstd_status(code, StatusCode::Fail))?;
        self.lease.device().record_job(on_hw);
        Ok(Transfer::new(src.len(), n))
    }

    pub fn decompress(
        &mut self,
        entry: EntryPoint,
        src: &[u8],
        dst: &mut [u8],
        _retry_count: u32,
    ) -> Result<Transfer, NativeStatus> {
        trace!("[ZSTD] decompress via {entry:?}");
        let n = self
            .dctx
            .decompress(dst, src)
            .map_err(|code| zstd_status(code, StatusCode::DataError))?;
        self.lease.device().record_job(false);
        Ok(Transfer::new(src.len(), n))
    }

    fn sequence_producer_ready(&mut self) -> Result<bool, NativeStatus> {
        if self.seq_producer.instance.is_some() {
            return Ok(true);
        }
        if let Some(guard) = self.lease.device().try_attach() {
            self.seq_producer.instance = Some(guard);
            return Ok(true);
        }
        if self.seq_producer.fallback {
            debug!("[FALLBACK] zstd sequence production in software");
            return Ok(false);
        }
        Err(NativeStatus::new(StatusCode::NoSwNoInstAttach, "sequence producer failed"))
    }
}

fn context_error(which: &str) -> NativeStatus {
    NativeStatus::new(StatusCode::Fail, format!("creating {which} context failed"))
}

/// Map a zstd error code: a short destination is `BufError`, anything else
/// is `otherwise`.
fn zstd_status(code: ErrorCode, otherwise: StatusCode) -> NativeStatus {
    let status = if 0usize.wrapping_sub(code) == ZSTD_ERROR_DST_SIZE_TOO_SMALL {
        StatusCode::BufError
    } else {
        otherwise
    };
    NativeStatus::new(status, zstd_safe::get_error_name(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[test]
    fn bound_covers_incompressible_input() {
        assert!(max_compressed_size(1000) > 1000);
    }

    #[test]
    fn bound_saturates_past_largest_input() {
        assert_eq!(max_compressed_size(ZSTD_MAX_INPUT_SIZE), usize::MAX);
        assert_eq!(max_compressed_size(usize::MAX), usize::MAX);
        let below = max_compressed_size(ZSTD_MAX_INPUT_SIZE - 1);
        assert!(below >= ZSTD_MAX_INPUT_SIZE - 1);
    }

    #[test]
    fn short_destination_is_buf_error() {
        let dev = Device::with_instances(1);
        let mut ctx = ZstdContexts::setup(&dev, Mode::Hardware, 3).expect("setup");
        let mut dst = [0u8; 8];
        let err = ctx.compress(EntryPoint::ByteArray, &sample(4096), &mut dst, 0).err();
        assert_eq!(err.map(|s| s.code), Some(StatusCode::BufError));
    }

    #[test]
    fn garbage_input_is_data_error() {
        let dev = Device::with_instances(1);
        let mut ctx = ZstdContexts::setup(&dev, Mode::Hardware, 3).expect("setup");
        let mut dst = [0u8; 64];
        let err = ctx.decompress(EntryPoint::ByteArray, b"not a zstd frame", &mut dst, 0).err();
        assert_eq!(err.map(|s| s.code), Some(StatusCode::DataError));
    }

    #[test]
    fn hardware_mode_without_free_instance_fails_compress() {
        let dev = Device::with_instances(1);
        let _holder = dev.try_attach();
        let mut ctx = ZstdContexts::setup(&dev, Mode::Hardware, 3).expect("setup");
        let mut dst = vec![0u8; 64];
        let err = ctx.compress(EntryPoint::ByteArray, b"hello", &mut dst, 5).err();
        assert_eq!(err.map(|s| s.code), Some(StatusCode::NoSwNoInstAttach));
    }

    #[test]
    fn contexts_round_trip_and_interoperate() {
        let dev = Device::with_instances(1);
        let mut ctx = ZstdContexts::setup(&dev, Mode::Hardware, 3).expect("setup");
        let src = b"zstd zstd zstd zstd zstd zstd".to_vec();
        let mut packed = vec![0u8; max_compressed_size(src.len())];
        let t = ctx.compress(EntryPoint::ByteArray, &src, &mut packed, 0).expect("compress");
        let frame = &packed[..t.bytes_written];
        assert_eq!(zstd::bulk::decompress(frame, src.len()).expect("zstd crate"), src);

        let mut out = vec![0u8; src.len()];
        let u = ctx.decompress(EntryPoint::ByteArray, frame, &mut out, 0).expect("decompress");
        assert_eq!(&out[..u.bytes_written], &src[..]);
    }
}
