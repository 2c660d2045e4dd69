use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;
use parking_lot::Mutex;

use crate::common::{BufferError, FileId, PageId, Result, PAGE_SIZE};

use super::page_file::{next_file_id, PageFile};

/// Allocation state of a DiskFile
struct AllocState {
    /// Number of page slots the file spans
    num_pages: u32,
    /// Disposed page numbers waiting to be reused (most recent at back)
    free_pages: Vec<PageId>,
}

impl AllocState {
    fn is_allocated(&self, page_id: PageId) -> bool {
        page_id.as_u32() < self.num_pages && !self.free_pages.contains(&page_id)
    }
}

/// DiskFile stores the pages of one database file on disk.
/// Page `k` lives at byte offset `k * PAGE_SIZE`.
pub struct DiskFile {
    /// Identity of this open file
    file_id: FileId,
    /// The database file
    db_file: Mutex<File>,
    /// Path to the database file
    db_path: String,
    /// Page allocation state
    alloc: Mutex<AllocState>,
    /// Number of page reads performed
    num_reads: AtomicU32,
    /// Number of page writes performed
    num_writes: AtomicU32,
}

impl DiskFile {
    /// Opens the page file at the given path, creating it if it doesn't exist.
    /// Every page already present in the file is treated as allocated.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path_str = db_path.as_ref().to_string_lossy().to_string();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&db_path)?;

        let file_size = file.metadata()?.len();
        let num_pages = (file_size / PAGE_SIZE as u64) as u32;

        Ok(Self {
            file_id: next_file_id(),
            db_file: Mutex::new(file),
            db_path: path_str,
            alloc: Mutex::new(AllocState {
                num_pages,
                free_pages: Vec::new(),
            }),
            num_reads: AtomicU32::new(0),
            num_writes: AtomicU32::new(0),
        })
    }

    fn check_allocated(&self, page_id: PageId) -> Result<()> {
        if self.alloc.lock().is_allocated(page_id) {
            Ok(())
        } else {
            Err(BufferError::InvalidPageId(page_id))
        }
    }

    fn write_at(&self, page_id: PageId, data: &[u8]) -> Result<()> {
        let offset = (page_id.as_u32() as u64) * (PAGE_SIZE as u64);

        let mut file = self.db_file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)?;
        file.flush()?;

        self.num_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Returns the number of page slots the file spans, including
    /// disposed ones.
    pub fn num_pages(&self) -> u32 {
        self.alloc.lock().num_pages
    }

    /// Returns the number of disposed pages awaiting reuse.
    pub fn num_free_pages(&self) -> usize {
        self.alloc.lock().free_pages.len()
    }

    /// Returns the number of page reads performed.
    pub fn num_reads(&self) -> u32 {
        self.num_reads.load(Ordering::Relaxed)
    }

    /// Returns the number of page writes performed, including the zero
    /// fill of newly allocated pages.
    pub fn num_writes(&self) -> u32 {
        self.num_writes.load(Ordering::Relaxed)
    }

    /// Returns the path to the database file.
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Flushes any buffered writes to disk.
    pub fn sync(&self) -> Result<()> {
        self.db_file.lock().sync_all()?;
        Ok(())
    }
}

impl PageFile for DiskFile {
    fn file_id(&self) -> FileId {
        self.file_id
    }

    fn read_page(&self, page_id: PageId, data: &mut [u8]) -> Result<()> {
        assert_eq!(data.len(), PAGE_SIZE, "Buffer must be PAGE_SIZE bytes");
        self.check_allocated(page_id)?;

        let offset = (page_id.as_u32() as u64) * (PAGE_SIZE as u64);

        let mut file = self.db_file.lock();
        file.seek(SeekFrom::Start(offset))?;

        // A short file reads back as zeros
        let bytes_read = file.read(data)?;
        if bytes_read < PAGE_SIZE {
            data[bytes_read..].fill(0);
        }

        self.num_reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn write_page(&self, page_id: PageId, data: &[u8]) -> Result<()> {
        assert_eq!(data.len(), PAGE_SIZE, "Buffer must be PAGE_SIZE bytes");
        self.check_allocated(page_id)?;
        self.write_at(page_id, data)
    }

    fn allocate_page(&self) -> Result<PageId> {
        let page_id = {
            let mut alloc = self.alloc.lock();
            match alloc.free_pages.pop() {
                Some(page_id) => page_id,
                None => {
                    let page_id = PageId::new(alloc.num_pages);
                    alloc.num_pages += 1;
                    page_id
                }
            }
        };

        let zeros = [0u8; PAGE_SIZE];
        self.write_at(page_id, &zeros)?;

        debug!("{}: allocated {}", self.file_id, page_id);
        Ok(page_id)
    }

    fn dispose_page(&self, page_id: PageId) -> Result<()> {
        let mut alloc = self.alloc.lock();
        if !alloc.is_allocated(page_id) {
            return Err(BufferError::InvalidPageId(page_id));
        }
        alloc.free_pages.push(page_id);

        debug!("{}: disposed {}", self.file_id, page_id);
        Ok(())
    }
}

impl Drop for DiskFile {
    fn drop(&mut self) {
        let file = self.db_file.get_mut();
        let _ = file.sync_all();
    }
}
