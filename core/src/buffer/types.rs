//! buffer/types.rs
//! `ByteBuf`: a position/limit buffer that is either heap-backed (exposes
//! its array) or direct (off-heap region, no array).
use crate::types::{Result, ZipperError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backing {
    Heap,
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Storage {
    Heap(Vec<u8>),
    Direct(Box<[u8]>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteBuf {
    storage: Storage,
    position: usize,
    limit: usize,
    read_only: bool,
}

/// Snapshot of a buffer's active range, taken per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferView {
    pub backing: Backing,
    pub start: usize,
    pub length: usize,
    pub read_only: bool,
    pub has_array: bool,
}

impl BufferView {
    pub fn is_direct(&self) -> bool {
        self.backing == Backing::Direct
    }
}

impl ByteBuf {
    fn from_storage(storage: Storage) -> Self {
        let limit = match &storage {
            Storage::Heap(v) => v.len(),
            Storage::Direct(b) => b.len(),
        };
        Self { storage, position: 0, limit, read_only: false }
    }

    pub fn allocate(capacity: usize) -> Self {
        Self::from_storage(Storage::Heap(vec![0; capacity]))
    }

    pub fn allocate_direct(capacity: usize) -> Self {
        Self::from_storage(Storage::Direct(vec![0; capacity].into_boxed_slice()))
    }

    /// Heap buffer over `bytes`; position 0, limit = len.
    pub fn wrap(bytes: Vec<u8>) -> Self {
        Self::from_storage(Storage::Heap(bytes))
    }

    /// Direct buffer holding a copy of `bytes`; position 0, limit = len.
    pub fn wrap_direct(bytes: &[u8]) -> Self {
        Self::from_storage(Storage::Direct(bytes.into()))
    }

    /// Read-only copy with the same contents, position and limit.
    /// A read-only heap buffer does not expose its array.
    pub fn as_read_only(&self) -> Self {
        Self { read_only: true, ..self.clone() }
    }

    pub fn backing(&self) -> Backing {
        match self.storage {
            Storage::Heap(_) => Backing::Heap,
            Storage::Direct(_) => Backing::Direct,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.backing() == Backing::Direct
    }

    pub fn has_array(&self) -> bool {
        matches!(self.storage, Storage::Heap(_)) && !self.read_only
    }

    /// Whole backing array, when accessible.
    pub fn array(&self) -> Option<&[u8]> {
        match &self.storage {
            Storage::Heap(v) if !self.read_only => Some(v),
            _ => None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn capacity(&self) -> usize {
        self.bytes().len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.limit {
            return Err(ZipperError::OutOfBounds(format!(
                "position {position} beyond limit {}",
                self.limit
            )));
        }
        self.position = position;
        Ok(())
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Clamps the position when it would fall beyond the new limit.
    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit > self.capacity() {
            return Err(ZipperError::OutOfBounds(format!(
                "limit {limit} beyond capacity {}",
                self.capacity()
            )));
        }
        self.limit = limit;
        self.position = self.position.min(limit);
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.limit - self.position
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    pub fn flip(&mut self) {
        self.limit = self.position;
        self.position = 0;
    }

    pub fn clear(&mut self) {
        self.position = 0;
        self.limit = self.capacity();
    }

    /// Relative bulk put at the position.
    pub fn put_slice(&mut self, src: &[u8]) -> Result<()> {
        if self.read_only {
            return Err(ZipperError::ReadOnlyTarget);
        }
        if src.len() > self.remaining() {
            return Err(ZipperError::OutOfBounds(format!(
                "put of {} bytes into {} remaining",
                src.len(),
                self.remaining()
            )));
        }
        let start = self.position;
        self.bytes_mut()[start..start + src.len()].copy_from_slice(src);
        self.position += src.len();
        Ok(())
    }

    /// Relative bulk get at the position.
    pub fn get_slice(&mut self, dst: &mut [u8]) -> Result<()> {
        if dst.len() > self.remaining() {
            return Err(ZipperError::OutOfBounds(format!(
                "get of {} bytes from {} remaining",
                dst.len(),
                self.remaining()
            )));
        }
        dst.copy_from_slice(&self.remaining_slice()[..dst.len()]);
        self.position += dst.len();
        Ok(())
    }

    /// Bytes between position and limit.
    pub fn remaining_slice(&self) -> &[u8] {
        &self.bytes()[self.position..self.limit]
    }

    /// Mutable active range. Callers check `read_only` first.
    pub(crate) fn remaining_slice_mut(&mut self) -> &mut [u8] {
        let (start, end) = (self.position, self.limit);
        &mut self.bytes_mut()[start..end]
    }

    pub(crate) fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.limit);
    }

    pub fn view(&self) -> BufferView {
        BufferView {
            backing: self.backing(),
            start: self.position,
            length: self.remaining(),
            read_only: self.read_only,
            has_array: self.has_array(),
        }
    }

    fn bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Heap(v) => v,
            Storage::Direct(b) => b,
        }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Heap(v) => v,
            Storage::Direct(b) => b,
        }
    }
}
