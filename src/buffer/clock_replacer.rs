use log::debug;

use crate::common::{BufferError, FrameId, Result};

use super::{FrameDesc, FramePool, PageTable};

/// Clock (second-chance) replacement.
///
/// The replacer owns the clock hand and sweeps the frame table from it:
/// a free frame is taken as is, a referenced frame has its bit cleared and
/// is passed over once, a pinned frame is skipped, and the first frame that
/// is neither referenced nor pinned is evicted (written back first if
/// dirty). At most two full sweeps are made before giving up.
///
/// The hand stays on the frame it returns. That frame is only reserved:
/// the caller binds a page to it afterwards, and until then it is still
/// invalid and will be handed out again by the next sweep.
pub struct ClockReplacer {
    /// Number of frames swept
    num_frames: usize,
    /// Current clock hand position
    clock_hand: usize,
}

impl ClockReplacer {
    /// Creates a clock over `num_frames` frames with the hand on the last
    /// frame.
    pub fn new(num_frames: usize) -> Self {
        assert!(num_frames > 0, "Clock needs at least one frame");
        Self {
            num_frames,
            clock_hand: num_frames - 1,
        }
    }

    /// Returns the frame the hand points at.
    pub fn clock_hand(&self) -> FrameId {
        FrameId::new(self.clock_hand as u32)
    }

    fn advance(&mut self) {
        self.clock_hand = (self.clock_hand + 1) % self.num_frames;
    }

    /// Reserves a frame for a new page, evicting the resident page of the
    /// chosen frame if there is one.
    ///
    /// Fails with BufferExceeded if every frame stays pinned through two
    /// sweeps. If writing back a dirty victim fails the error is returned
    /// and the victim stays resident.
    pub fn allocate(
        &mut self,
        frames: &mut [FrameDesc<'_>],
        pool: &FramePool,
        page_table: &mut PageTable,
    ) -> Result<FrameId> {
        debug_assert_eq!(frames.len(), self.num_frames);

        for _ in 0..(2 * self.num_frames) {
            let frame_id = FrameId::new(self.clock_hand as u32);
            let desc = &mut frames[self.clock_hand];

            if !desc.is_valid() {
                return Ok(frame_id);
            }

            if desc.is_referenced() {
                desc.set_referenced(false);
                self.advance();
                continue;
            }

            if desc.pin_count() > 0 {
                self.advance();
                continue;
            }

            let file = desc.file().ok_or(BufferError::Corruption(frame_id))?;
            let page_id = desc.page_id();

            if desc.is_dirty() {
                file.write_page(page_id, pool.page(frame_id))?;
                debug!("wrote back {} of {} from {}", page_id, file.file_id(), frame_id);
            }

            // A missing entry means there is nothing to unmap
            let _ = page_table.remove(file.file_id(), page_id);
            desc.clear();

            debug!("evicted {} of {} from {}", page_id, file.file_id(), frame_id);
            return Ok(frame_id);
        }

        Err(BufferError::BufferExceeded)
    }
}
