use std::collections::HashMap;

use crate::common::{page_table_capacity, BufferError, FileId, FrameId, PageId, Result};

/// PageTable maps a (file, page) pair to the frame that holds it.
/// Keys are unique; a page is resident in at most one frame.
pub struct PageTable {
    entries: HashMap<(FileId, PageId), FrameId>,
}

impl PageTable {
    /// Creates a page table sized for a pool of `num_frames` frames.
    pub fn new(num_frames: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(page_table_capacity(num_frames)),
        }
    }

    /// Returns the frame holding the page.
    pub fn lookup(&self, file: FileId, page_id: PageId) -> Result<FrameId> {
        self.entries
            .get(&(file, page_id))
            .copied()
            .ok_or(BufferError::PageNotFound { file, page_id })
    }

    /// Records that the page now lives in `frame_id`.
    /// Fails if the page already has an entry.
    pub fn insert(&mut self, file: FileId, page_id: PageId, frame_id: FrameId) -> Result<()> {
        if self.entries.contains_key(&(file, page_id)) {
            return Err(BufferError::DuplicateEntry { file, page_id });
        }
        self.entries.insert((file, page_id), frame_id);
        Ok(())
    }

    /// Removes the page's entry. Callers may ignore the PageNotFound
    /// error when the page is known to be absent.
    pub fn remove(&mut self, file: FileId, page_id: PageId) -> Result<()> {
        self.entries
            .remove(&(file, page_id))
            .map(|_| ())
            .ok_or(BufferError::PageNotFound { file, page_id })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all (file, page, frame) entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (FileId, PageId, FrameId)> + '_ {
        self.entries
            .iter()
            .map(|(&(file, page_id), &frame_id)| (file, page_id, frame_id))
    }
}
