//! Clockpool - a buffer manager for disk-based database pages
//!
//! This crate multiplexes a fixed pool of in-memory page frames across the
//! pages of any number of page files. Pages in use are pinned and never
//! evicted; modified pages are written back before their frame is reused.
//!
//! # Architecture
//!
//! - **Buffer** (`buffer`): the in-memory side
//!   - `BufferManager`: fetch, create, unpin, dispose and flush pages
//!   - `ClockReplacer`: second-chance victim selection with a persistent hand
//!   - `FrameDesc`: per-frame owner, pin count, dirty and reference bits
//!   - `FramePool`: contiguous page storage, one slot per frame
//!   - `PageTable`: maps (file, page) pairs to frames
//!
//! - **Storage** (`storage`): the files pages come from
//!   - `PageFile`: the contract the buffer manager relies on
//!   - `DiskFile`: pages stored in an OS file
//!   - `MemFile`: pages stored in memory
//!
//! The buffer manager does no locking. Every operation takes `&mut self`,
//! so callers sharing one across threads wrap it themselves.
//!
//! # Example
//!
//! ```rust,no_run
//! use clockpool::buffer::BufferManager;
//! use clockpool::storage::DiskFile;
//!
//! let file = DiskFile::open("test.db").unwrap();
//! let mut bpm = BufferManager::new(100);
//!
//! // Allocate a new page; it comes back pinned
//! let (page_id, frame_id) = bpm.create_page(&file).unwrap();
//! bpm.page_mut(frame_id)[..5].copy_from_slice(b"hello");
//! bpm.unpin_page(&file, page_id, true).unwrap();
//!
//! // Write back and evict everything buffered for the file
//! bpm.flush_file(&file).unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod storage;

// Re-export commonly used types at the crate root
pub use common::{BufferError, FileId, FrameId, PageId, Result};
