use std::fmt;

use crate::common::{FileId, FrameId, PageId, INVALID_PAGE_ID};
use crate::storage::PageFile;

/// FrameDesc holds the bookkeeping for one buffer frame: which page of
/// which file it holds, how many callers have it pinned, and the dirty and
/// reference bits used by write-back and clock replacement.
///
/// The owning file is borrowed, never owned. An invalid descriptor always
/// has a zero pin count and both bits clear.
pub struct FrameDesc<'f> {
    /// The frame ID (index in the buffer pool)
    frame_id: FrameId,
    /// The file the resident page belongs to
    file: Option<&'f dyn PageFile>,
    /// The page ID stored in this frame (meaningful only when valid)
    page_id: PageId,
    /// Number of outstanding holders
    pin_count: u32,
    /// Whether the page has been modified since being read from disk
    dirty: bool,
    /// Clock reference bit
    referenced: bool,
    /// Whether the frame holds a committed page
    valid: bool,
}

impl<'f> FrameDesc<'f> {
    /// Creates an invalid descriptor for the given frame ID.
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            file: None,
            page_id: INVALID_PAGE_ID,
            pin_count: 0,
            dirty: false,
            referenced: false,
            valid: false,
        }
    }

    /// Binds the frame to a page: pinned once, referenced, clean.
    pub fn set(&mut self, file: &'f dyn PageFile, page_id: PageId) {
        self.file = Some(file);
        self.page_id = page_id;
        self.pin_count = 1;
        self.dirty = false;
        self.referenced = true;
        self.valid = true;
    }

    /// Returns the frame to the invalid state and detaches its owner.
    pub fn clear(&mut self) {
        self.file = None;
        self.page_id = INVALID_PAGE_ID;
        self.pin_count = 0;
        self.dirty = false;
        self.referenced = false;
        self.valid = false;
    }

    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    pub fn file(&self) -> Option<&'f dyn PageFile> {
        self.file
    }

    /// Returns the owning file's identity, if any.
    pub fn file_id(&self) -> Option<FileId> {
        self.file.map(|file| file.file_id())
    }

    /// Returns true if the descriptor is tagged with the given file,
    /// whether or not it is valid.
    pub fn is_owned_by(&self, file_id: FileId) -> bool {
        self.file_id() == Some(file_id)
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    /// Increments the pin count and sets the reference bit.
    /// Returns the new pin count.
    pub fn pin(&mut self) -> u32 {
        self.pin_count += 1;
        self.referenced = true;
        self.pin_count
    }

    /// Decrements the pin count and returns the new value.
    /// Returns None if the pin count was already 0.
    pub fn unpin(&mut self) -> Option<u32> {
        if self.pin_count == 0 {
            return None;
        }
        self.pin_count -= 1;
        Some(self.pin_count)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn is_referenced(&self) -> bool {
        self.referenced
    }

    pub fn set_referenced(&mut self, referenced: bool) {
        self.referenced = referenced;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Drops the valid bit but keeps the owner tag.
    #[cfg(test)]
    pub(crate) fn force_invalid(&mut self) {
        self.valid = false;
    }
}

impl fmt::Debug for FrameDesc<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameDesc")
            .field("frame_id", &self.frame_id)
            .field("file", &self.file_id())
            .field("page_id", &self.page_id)
            .field("pin_count", &self.pin_count)
            .field("dirty", &self.dirty)
            .field("referenced", &self.referenced)
            .field("valid", &self.valid)
            .finish()
    }
}
