//! native/dummy.rs
//! Placeholder codec: "compresses" by writing the source `ratio` times.
use crate::native::status::Transfer;

pub fn max_compressed_size(ratio: u32, len: usize) -> usize {
    (ratio as usize).saturating_mul(len)
}

#[derive(Debug, Clone, Copy)]
pub struct DummySession {
    ratio: u32,
}

impl DummySession {
    pub fn setup(ratio: u32) -> Self {
        Self { ratio }
    }

    pub fn ratio(&self) -> u32 {
        self.ratio
    }

    /// The only native entry point. Repeats `src` up to `ratio` times,
    /// stopping when `dst` is full.
    pub fn compress_byte_array(&self, src: &[u8], dst: &mut [u8]) -> Transfer {
        let mut written = 0;
        for _ in 0..self.ratio {
            let n = src.len().min(dst.len() - written);
            dst[written..written + n].copy_from_slice(&src[..n]);
            written += n;
            if written == dst.len() {
                break;
            }
        }
        Transfer::new(src.len(), written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_by_ratio() {
        let s = DummySession::setup(3);
        let mut dst = [0u8; 9];
        let t = s.compress_byte_array(b"abc", &mut dst);
        assert_eq!(t, Transfer::new(3, 9));
        assert_eq!(&dst, b"abcabcabc");
    }

    #[test]
    fn truncates_at_destination() {
        let s = DummySession::setup(2);
        let mut dst = [0u8; 5];
        let t = s.compress_byte_array(b"abcd", &mut dst);
        assert_eq!(t.bytes_written, 5);
        assert_eq!(&dst, b"abcda");
    }
}
