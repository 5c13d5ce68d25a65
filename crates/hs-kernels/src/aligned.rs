use core::slice;

const CHUNK: usize = 64;

#[repr(C, align(64))]
#[derive(Clone, Copy)]
struct Block([u8; CHUNK]);

/// Owned byte buffer whose base address is 64-byte aligned.
///
/// `Vec<u8>` makes no alignment promise, so callers that want the packed or
/// vector kernels (4/8/16-byte alignment preconditions) allocate through
/// this instead.
pub struct AlignedBuf {
    blocks: Vec<Block>,
    len: usize,
}

impl AlignedBuf {
    pub fn zeroed(len: usize) -> Self {
        let n_blocks = len.div_ceil(CHUNK);
        Self {
            blocks: vec![Block([0u8; CHUNK]); n_blocks],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `blocks` owns at least `len` contiguous initialized bytes.
        unsafe { slice::from_raw_parts(self.blocks.as_ptr().cast::<u8>(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: `blocks` owns at least `len` contiguous initialized bytes
        // and `&mut self` guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.blocks.as_mut_ptr().cast::<u8>(), self.len) }
    }
}

#[cfg(test)]
mod tests {
    use super::AlignedBuf;

    #[test]
    fn base_address_is_aligned() {
        for len in [1usize, 63, 64, 65, 4096] {
            let buf = AlignedBuf::zeroed(len);
            assert_eq!(buf.as_slice().as_ptr() as usize % 64, 0);
            assert_eq!(buf.len(), len);
        }
    }

    #[test]
    fn writes_round_trip() {
        let mut buf = AlignedBuf::zeroed(100);
        buf.as_mut_slice()[99] = 42;
        assert_eq!(buf.as_slice()[99], 42);
        assert_eq!(buf.as_slice()[0], 0);
    }
}
