use std::sync::atomic::{AtomicU32, Ordering};

use crate::common::{FileId, PageId, Result};

static NEXT_FILE_ID: AtomicU32 = AtomicU32::new(0);

/// Hands out a process-unique FileId for a newly opened page file.
pub fn next_file_id() -> FileId {
    FileId::new(NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed))
}

/// PageFile is the contract the buffer manager relies on for one open
/// file of fixed-size pages. The buffer manager only borrows page files;
/// it never opens, closes or frees them.
///
/// All buffers passed in and out are exactly PAGE_SIZE bytes.
pub trait PageFile {
    /// Returns the identity of this file. Used as the owner tag on buffer
    /// frames and as part of the page table key.
    fn file_id(&self) -> FileId;

    /// Reads a page from the file into `data`.
    fn read_page(&self, page_id: PageId, data: &mut [u8]) -> Result<()>;

    /// Writes `data` to a page of the file.
    fn write_page(&self, page_id: PageId, data: &[u8]) -> Result<()>;

    /// Allocates a fresh, zeroed page and returns its page number.
    fn allocate_page(&self) -> Result<PageId>;

    /// Releases a page so its number may be handed out again.
    fn dispose_page(&self, page_id: PageId) -> Result<()>;
}
