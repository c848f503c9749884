//! buffer/resolver.rs
//! Classifies a (source, destination) pair into one of five dispatch shapes
//! and runs the matching native entry point on the active ranges.
//!
//! Heap/heap, direct/direct and the two mixed heap/direct shapes hand the
//! native side the buffers' own bytes. Anything else (a read-only heap
//! buffer has no accessible array) is copied into scratch arrays, run
//! through the heap/heap entry point, and the produced bytes copied back.
use log::trace;

use crate::buffer::types::{BufferView, ByteBuf};
use crate::native::status::{EntryPoint, Transfer};
use crate::types::{Result, ZipperError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchShape {
    HeapHeap,
    DirectDirect,
    HeapSrcDirectDst,
    DirectSrcHeapDst,
    MixedCopy,
}

impl DispatchShape {
    pub const ALL: [DispatchShape; 5] = [
        DispatchShape::HeapHeap,
        DispatchShape::DirectDirect,
        DispatchShape::HeapSrcDirectDst,
        DispatchShape::DirectSrcHeapDst,
        DispatchShape::MixedCopy,
    ];

    pub fn is_zero_copy(self) -> bool {
        self != DispatchShape::MixedCopy
    }
}

impl EntryPoint {
    /// The single shape → entry point table.
    pub const fn for_shape(shape: DispatchShape) -> EntryPoint {
        match shape {
            DispatchShape::HeapHeap | DispatchShape::MixedCopy => EntryPoint::ByteBuffer,
            DispatchShape::DirectDirect => EntryPoint::DirectByteBuffer,
            DispatchShape::HeapSrcDirectDst => EntryPoint::DirectByteBufferDst,
            DispatchShape::DirectSrcHeapDst => EntryPoint::DirectByteBufferSrc,
        }
    }
}

/// Outcome of a resolved call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub shape: DispatchShape,
    pub transfer: Transfer,
}

/// Reject empty active ranges, then a read-only destination.
pub fn check_views(src: &BufferView, dst: &BufferView) -> Result<()> {
    if src.length == 0 || dst.length == 0 {
        return Err(ZipperError::Argument(
            "source and destination must both have remaining bytes".into(),
        ));
    }
    if dst.read_only {
        return Err(ZipperError::ReadOnlyTarget);
    }
    Ok(())
}

pub fn classify(src: &BufferView, dst: &BufferView) -> DispatchShape {
    if src.has_array && dst.has_array {
        DispatchShape::HeapHeap
    } else if src.is_direct() && dst.is_direct() {
        DispatchShape::DirectDirect
    } else if src.has_array && dst.is_direct() {
        DispatchShape::HeapSrcDirectDst
    } else if src.is_direct() && dst.has_array {
        DispatchShape::DirectSrcHeapDst
    } else {
        DispatchShape::MixedCopy
    }
}

/// Validate, classify and run `call` on the pair. Positions advance by the
/// reported transfer only when the call succeeds.
pub fn resolve<F>(src: &mut ByteBuf, dst: &mut ByteBuf, mut call: F) -> Result<Resolved>
where
    F: FnMut(EntryPoint, &[u8], &mut [u8]) -> Result<Transfer>,
{
    let (sv, dv) = (src.view(), dst.view());
    check_views(&sv, &dv)?;
    let shape = classify(&sv, &dv);
    let entry = EntryPoint::for_shape(shape);
    trace!(
        "[DISPATCH] {shape:?} -> {entry:?} src={}@{} dst={}@{}",
        sv.length, sv.start, dv.length, dv.start
    );

    let transfer = match shape {
        DispatchShape::MixedCopy => {
            let scratch_src = src.remaining_slice().to_vec();
            let mut scratch_dst = vec![0u8; dv.length];
            let t = within(call(entry, &scratch_src, &mut scratch_dst)?, &sv, &dv)?;
            dst.remaining_slice_mut()[..t.bytes_written]
                .copy_from_slice(&scratch_dst[..t.bytes_written]);
            t
        }
        _ => within(call(entry, src.remaining_slice(), dst.remaining_slice_mut())?, &sv, &dv)?,
    };

    src.advance(transfer.bytes_read);
    dst.advance(transfer.bytes_written);
    Ok(Resolved { shape, transfer })
}

fn within(t: Transfer, src: &BufferView, dst: &BufferView) -> Result<Transfer> {
    if t.bytes_read > src.length || t.bytes_written > dst.length {
        return Err(ZipperError::OutOfBounds(format!(
            "native transfer {}/{} exceeds ranges {}/{}",
            t.bytes_read, t.bytes_written, src.length, dst.length
        )));
    }
    Ok(t)
}
