use thiserror::Error;

use super::types::{FileId, FrameId, PageId};

/// Buffer manager error types
#[derive(Error, Debug)]
pub enum BufferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid page ID: {0}")]
    InvalidPageId(PageId),

    #[error("Buffer exceeded: every frame is pinned")]
    BufferExceeded,

    #[error("Page table already holds {page_id} of {file}")]
    DuplicateEntry { file: FileId, page_id: PageId },

    #[error("Page {page_id} of {file} is not buffered")]
    PageNotFound { file: FileId, page_id: PageId },

    #[error("Page {0} is not pinned")]
    PageNotPinned(PageId),

    #[error("Page {0} is still pinned")]
    PagePinned(PageId),

    #[error("Frame {0} is invalid but still tagged with an owning file")]
    Corruption(FrameId),
}

impl BufferError {
    /// Returns true if retrying the same call can succeed once the caller
    /// releases pins.
    pub fn is_retriable(&self) -> bool {
        matches!(self, BufferError::BufferExceeded)
    }
}

pub type Result<T> = std::result::Result<T, BufferError>;
