use crate::common::{FrameId, PAGE_SIZE};

/// FramePool is the page storage of the buffer pool: one contiguous
/// allocation of `num_frames * PAGE_SIZE` bytes, sliced per frame.
pub struct FramePool {
    data: Vec<u8>,
    num_frames: usize,
}

impl FramePool {
    /// Creates a zeroed pool with the given number of frames.
    pub fn new(num_frames: usize) -> Self {
        Self {
            data: vec![0u8; num_frames * PAGE_SIZE],
            num_frames,
        }
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Returns the bytes of a frame.
    ///
    /// # Panics
    ///
    /// Panics if `frame_id` is not below `num_frames()`.
    pub fn page(&self, frame_id: FrameId) -> &[u8] {
        let start = frame_id.as_usize() * PAGE_SIZE;
        &self.data[start..start + PAGE_SIZE]
    }

    /// Returns the bytes of a frame for writing.
    ///
    /// # Panics
    ///
    /// Panics if `frame_id` is not below `num_frames()`.
    pub fn page_mut(&mut self, frame_id: FrameId) -> &mut [u8] {
        let start = frame_id.as_usize() * PAGE_SIZE;
        &mut self.data[start..start + PAGE_SIZE]
    }
}
