use log::{debug, warn};

use crate::common::{BufferError, FileId, FrameId, PageId, Result, DEFAULT_BUFFER_POOL_SIZE};
use crate::storage::PageFile;

use super::{ClockReplacer, FrameDesc, FramePool, PageTable};

/// BufferManager caches pages of borrowed page files in a fixed number of
/// frames. Pages are pinned while in use and are only evicted once their
/// pin count drops to zero; dirty pages are written back before their frame
/// is reused, when their file is flushed, and when the manager is dropped.
///
/// All operations take `&mut self`: the manager does no locking of its own.
/// Page files are borrowed for `'f` and must outlive the manager.
pub struct BufferManager<'f> {
    /// Number of frames in the buffer pool
    pool_size: usize,
    /// Frame descriptors, indexed by frame ID
    frames: Vec<FrameDesc<'f>>,
    /// Page storage, indexed by frame ID
    pool: FramePool,
    /// Maps resident (file, page) pairs to frames
    page_table: PageTable,
    /// Clock replacement for choosing victims
    replacer: ClockReplacer,
}

impl<'f> BufferManager<'f> {
    /// Creates a BufferManager with `pool_size` frames.
    pub fn new(pool_size: usize) -> Self {
        assert!(pool_size > 0, "Buffer pool needs at least one frame");

        let frames = (0..pool_size)
            .map(|i| FrameDesc::new(FrameId::new(i as u32)))
            .collect();

        Self {
            pool_size,
            frames,
            pool: FramePool::new(pool_size),
            page_table: PageTable::new(pool_size),
            replacer: ClockReplacer::new(pool_size),
        }
    }

    /// Pins a page and returns the frame holding it, reading it from the
    /// file if it isn't resident.
    ///
    /// On a miss, a failure after a frame was reserved leaves that frame
    /// free; nothing done earlier in the call is undone.
    pub fn fetch_page(&mut self, file: &'f dyn PageFile, page_id: PageId) -> Result<FrameId> {
        let file_id = file.file_id();

        if let Ok(frame_id) = self.page_table.lookup(file_id, page_id) {
            self.frames[frame_id.as_usize()].pin();
            return Ok(frame_id);
        }

        let frame_id = self
            .replacer
            .allocate(&mut self.frames, &self.pool, &mut self.page_table)?;

        file.read_page(page_id, self.pool.page_mut(frame_id))?;
        self.page_table.insert(file_id, page_id, frame_id)?;
        self.frames[frame_id.as_usize()].set(file, page_id);

        debug!("read {} of {} into {}", page_id, file_id, frame_id);
        Ok(frame_id)
    }

    /// Drops one pin on a resident page. `is_dirty` marks the page as
    /// modified; passing false never clears an earlier mark.
    pub fn unpin_page(&mut self, file: &dyn PageFile, page_id: PageId, is_dirty: bool) -> Result<()> {
        let frame_id = self.page_table.lookup(file.file_id(), page_id)?;
        let desc = &mut self.frames[frame_id.as_usize()];

        if desc.unpin().is_none() {
            return Err(BufferError::PageNotPinned(page_id));
        }
        if is_dirty {
            desc.set_dirty(true);
        }

        Ok(())
    }

    /// Allocates a new page in the file and pins it in a zeroed frame.
    /// Returns the new page ID and its frame.
    ///
    /// If no frame can be reserved the page stays allocated in the file.
    pub fn create_page(&mut self, file: &'f dyn PageFile) -> Result<(PageId, FrameId)> {
        let file_id = file.file_id();
        let page_id = file.allocate_page()?;

        let frame_id = self
            .replacer
            .allocate(&mut self.frames, &self.pool, &mut self.page_table)
            .map_err(|err| {
                warn!("{} of {} allocated but not buffered: {}", page_id, file_id, err);
                err
            })?;

        self.page_table.insert(file_id, page_id, frame_id)?;
        self.pool.page_mut(frame_id).fill(0);
        self.frames[frame_id.as_usize()].set(file, page_id);

        debug!("created {} of {} in {}", page_id, file_id, frame_id);
        Ok((page_id, frame_id))
    }

    /// Drops a page from the buffer pool without writing it back, then
    /// disposes of it in the file. The file is asked to dispose of the page
    /// whether or not it was resident.
    ///
    /// Fails with PagePinned, touching nothing, if the page is resident and
    /// pinned.
    pub fn dispose_page(&mut self, file: &dyn PageFile, page_id: PageId) -> Result<()> {
        let file_id = file.file_id();

        if let Ok(frame_id) = self.page_table.lookup(file_id, page_id) {
            let desc = &mut self.frames[frame_id.as_usize()];
            if desc.pin_count() > 0 {
                return Err(BufferError::PagePinned(page_id));
            }
            desc.clear();
        }

        // Removing a page that was never resident is a no-op
        let _ = self.page_table.remove(file_id, page_id);

        file.dispose_page(page_id)
    }

    /// Writes back and evicts every resident page of the file.
    ///
    /// Frames are visited in frame order. Stops with PagePinned at the first
    /// pinned page of the file; pages visited before it stay flushed and
    /// evicted.
    pub fn flush_file(&mut self, file: &dyn PageFile) -> Result<()> {
        let file_id = file.file_id();

        for desc in self.frames.iter_mut() {
            if !desc.is_owned_by(file_id) {
                continue;
            }
            if !desc.is_valid() {
                return Err(BufferError::Corruption(desc.frame_id()));
            }
            if desc.pin_count() > 0 {
                return Err(BufferError::PagePinned(desc.page_id()));
            }

            if desc.is_dirty() {
                file.write_page(desc.page_id(), self.pool.page(desc.frame_id()))?;
                desc.set_dirty(false);
                debug!("flushed {} of {} from {}", desc.page_id(), file_id, desc.frame_id());
            }

            let _ = self.page_table.remove(file_id, desc.page_id());
            desc.clear();
        }

        Ok(())
    }

    /// Writes back every dirty page in the pool. Pages stay resident and
    /// keep their pins.
    pub fn flush_all_pages(&mut self) -> Result<()> {
        for desc in self.frames.iter_mut() {
            if !desc.is_valid() || !desc.is_dirty() {
                continue;
            }
            let file = desc.file().ok_or(BufferError::Corruption(desc.frame_id()))?;
            file.write_page(desc.page_id(), self.pool.page(desc.frame_id()))?;
            desc.set_dirty(false);
        }

        Ok(())
    }

    /// Returns the bytes of a frame.
    ///
    /// # Panics
    ///
    /// Panics if `frame_id` is not below `pool_size()`.
    pub fn page(&self, frame_id: FrameId) -> &[u8] {
        self.pool.page(frame_id)
    }

    /// Returns the bytes of a frame for writing. Callers should unpin with
    /// `is_dirty` set after modifying them.
    ///
    /// # Panics
    ///
    /// Panics if `frame_id` is not below `pool_size()`.
    pub fn page_mut(&mut self, frame_id: FrameId) -> &mut [u8] {
        self.pool.page_mut(frame_id)
    }

    /// Returns the pin count of a resident page.
    pub fn pin_count(&self, file: &dyn PageFile, page_id: PageId) -> Option<u32> {
        self.resident(file.file_id(), page_id).map(|desc| desc.pin_count())
    }

    /// Returns whether a resident page is dirty.
    pub fn is_dirty(&self, file: &dyn PageFile, page_id: PageId) -> Option<bool> {
        self.resident(file.file_id(), page_id).map(|desc| desc.is_dirty())
    }

    fn resident(&self, file_id: FileId, page_id: PageId) -> Option<&FrameDesc<'f>> {
        self.page_table
            .lookup(file_id, page_id)
            .ok()
            .map(|frame_id| &self.frames[frame_id.as_usize()])
    }

    /// Returns the descriptor of a frame.
    ///
    /// # Panics
    ///
    /// Panics if `frame_id` is not below `pool_size()`.
    pub fn frame(&self, frame_id: FrameId) -> &FrameDesc<'f> {
        &self.frames[frame_id.as_usize()]
    }

    /// Iterates over all frame descriptors in frame order.
    pub fn frames(&self) -> impl Iterator<Item = &FrameDesc<'f>> + '_ {
        self.frames.iter()
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    /// Returns the pool size.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Returns the number of frames not holding a page.
    pub fn free_frame_count(&self) -> usize {
        self.frames.iter().filter(|desc| !desc.is_valid()).count()
    }

    /// Returns the frame the clock hand points at.
    pub fn clock_hand(&self) -> FrameId {
        self.replacer.clock_hand()
    }

    /// Checks that the frame table and page table agree: invalid frames are
    /// blank and unowned, every valid frame is mapped under its own key, and
    /// every mapping points at a valid frame holding that key.
    pub fn check_consistency(&self) -> Result<()> {
        for desc in &self.frames {
            let frame_id = desc.frame_id();
            if !desc.is_valid() {
                if desc.pin_count() > 0
                    || desc.is_dirty()
                    || desc.is_referenced()
                    || desc.file_id().is_some()
                {
                    return Err(BufferError::Corruption(frame_id));
                }
                continue;
            }

            let file_id = desc.file_id().ok_or(BufferError::Corruption(frame_id))?;
            match self.page_table.lookup(file_id, desc.page_id()) {
                Ok(mapped) if mapped == frame_id => {}
                _ => return Err(BufferError::Corruption(frame_id)),
            }
        }

        for (file_id, page_id, frame_id) in self.page_table.iter() {
            let desc = self
                .frames
                .get(frame_id.as_usize())
                .ok_or(BufferError::Corruption(frame_id))?;
            if !desc.is_valid() || desc.file_id() != Some(file_id) || desc.page_id() != page_id {
                return Err(BufferError::Corruption(frame_id));
            }
        }

        Ok(())
    }
}

impl Default for BufferManager<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_POOL_SIZE)
    }
}

impl Drop for BufferManager<'_> {
    fn drop(&mut self) {
        for desc in &self.frames {
            if !desc.is_valid() || !desc.is_dirty() {
                continue;
            }
            if let Some(file) = desc.file() {
                match file.write_page(desc.page_id(), self.pool.page(desc.frame_id())) {
                    Ok(()) => debug!("flushed {} of {} on shutdown", desc.page_id(), file.file_id()),
                    Err(err) => warn!(
                        "lost {} of {} on shutdown: {}",
                        desc.page_id(),
                        file.file_id(),
                        err
                    ),
                }
            }
        }
    }
}
