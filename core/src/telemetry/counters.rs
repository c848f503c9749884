//! telemetry/counters.rs
//! Counters collected by one facade across its compress/decompress calls.
//!
//! Plain `u64` fields owned by the facade; no atomics since calls on a
//! facade are already serialised. Merge across facades with `+=`.
use std::ops::AddAssign;

use crate::buffer::DispatchShape;
use crate::native::{Direction, Transfer};

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct ZipperCounters {
    pub compress_calls: u64,
    pub decompress_calls: u64,
    pub failed_calls: u64,
    /// Bytes consumed from sources.
    pub bytes_in: u64,
    /// Bytes produced into destinations.
    pub bytes_out: u64,

    pub heap_heap: u64,
    pub direct_direct: u64,
    pub heap_src_direct_dst: u64,
    pub direct_src_heap_dst: u64,
    pub mixed_copy: u64,
}

impl ZipperCounters {
    pub fn record(&mut self, direction: Direction, transfer: &Transfer) {
        match direction {
            Direction::Compress => self.compress_calls += 1,
            Direction::Decompress => self.decompress_calls += 1,
        }
        self.bytes_in += transfer.bytes_read as u64;
        self.bytes_out += transfer.bytes_written as u64;
    }

    pub fn record_shape(&mut self, shape: DispatchShape) {
        *self.shape_slot(shape) += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed_calls += 1;
    }

    pub fn shape_count(&self, shape: DispatchShape) -> u64 {
        match shape {
            DispatchShape::HeapHeap => self.heap_heap,
            DispatchShape::DirectDirect => self.direct_direct,
            DispatchShape::HeapSrcDirectDst => self.heap_src_direct_dst,
            DispatchShape::DirectSrcHeapDst => self.direct_src_heap_dst,
            DispatchShape::MixedCopy => self.mixed_copy,
        }
    }

    pub fn total_calls(&self) -> u64 {
        self.compress_calls + self.decompress_calls
    }

    fn shape_slot(&mut self, shape: DispatchShape) -> &mut u64 {
        match shape {
            DispatchShape::HeapHeap => &mut self.heap_heap,
            DispatchShape::DirectDirect => &mut self.direct_direct,
            DispatchShape::HeapSrcDirectDst => &mut self.heap_src_direct_dst,
            DispatchShape::DirectSrcHeapDst => &mut self.direct_src_heap_dst,
            DispatchShape::MixedCopy => &mut self.mixed_copy,
        }
    }
}

impl AddAssign<&ZipperCounters> for ZipperCounters {
    fn add_assign(&mut self, rhs: &ZipperCounters) {
        self.compress_calls      += rhs.compress_calls;
        self.decompress_calls    += rhs.decompress_calls;
        self.failed_calls        += rhs.failed_calls;
        self.bytes_in            += rhs.bytes_in;
        self.bytes_out           += rhs.bytes_out;

        self.heap_heap           += rhs.heap_heap;
        self.direct_direct       += rhs.direct_direct;
        self.heap_src_direct_dst += rhs.heap_src_direct_dst;
        self.direct_src_heap_dst += rhs.direct_src_heap_dst;
        self.mixed_copy          += rhs.mixed_copy;
    }
}

impl AddAssign for ZipperCounters {
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}
