use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::common::{BufferError, FileId, PageId, Result, PAGE_SIZE};

use super::page_file::{next_file_id, PageFile};

struct MemState {
    pages: Vec<Box<[u8; PAGE_SIZE]>>,
    free_pages: Vec<PageId>,
}

impl MemState {
    fn slot(&mut self, page_id: PageId) -> Result<&mut [u8; PAGE_SIZE]> {
        if self.free_pages.contains(&page_id) {
            return Err(BufferError::InvalidPageId(page_id));
        }
        self.pages
            .get_mut(page_id.as_u32() as usize)
            .map(|page| &mut **page)
            .ok_or(BufferError::InvalidPageId(page_id))
    }
}

/// MemFile is a PageFile held entirely in memory. It follows the same
/// allocation rules as DiskFile, which makes it handy for tests and
/// scratch data.
pub struct MemFile {
    file_id: FileId,
    state: Mutex<MemState>,
    num_reads: AtomicU32,
    num_writes: AtomicU32,
}

impl MemFile {
    pub fn new() -> Self {
        Self {
            file_id: next_file_id(),
            state: Mutex::new(MemState {
                pages: Vec::new(),
                free_pages: Vec::new(),
            }),
            num_reads: AtomicU32::new(0),
            num_writes: AtomicU32::new(0),
        }
    }

    /// Returns the number of page slots, including disposed ones.
    pub fn num_pages(&self) -> u32 {
        self.state.lock().pages.len() as u32
    }

    /// Returns the number of page reads performed.
    pub fn num_reads(&self) -> u32 {
        self.num_reads.load(Ordering::Relaxed)
    }

    /// Returns the number of page writes performed. Allocation does not
    /// count as a write.
    pub fn num_writes(&self) -> u32 {
        self.num_writes.load(Ordering::Relaxed)
    }
}

impl Default for MemFile {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFile for MemFile {
    fn file_id(&self) -> FileId {
        self.file_id
    }

    fn read_page(&self, page_id: PageId, data: &mut [u8]) -> Result<()> {
        assert_eq!(data.len(), PAGE_SIZE, "Buffer must be PAGE_SIZE bytes");
        let mut state = self.state.lock();
        data.copy_from_slice(&state.slot(page_id)?[..]);
        self.num_reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn write_page(&self, page_id: PageId, data: &[u8]) -> Result<()> {
        assert_eq!(data.len(), PAGE_SIZE, "Buffer must be PAGE_SIZE bytes");
        let mut state = self.state.lock();
        state.slot(page_id)?.copy_from_slice(data);
        self.num_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn allocate_page(&self) -> Result<PageId> {
        let mut state = self.state.lock();
        match state.free_pages.pop() {
            Some(page_id) => {
                state.pages[page_id.as_u32() as usize].fill(0);
                Ok(page_id)
            }
            None => {
                let page_id = PageId::new(state.pages.len() as u32);
                state.pages.push(Box::new([0u8; PAGE_SIZE]));
                Ok(page_id)
            }
        }
    }

    fn dispose_page(&self, page_id: PageId) -> Result<()> {
        let mut state = self.state.lock();
        state.slot(page_id)?;
        state.free_pages.push(page_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_file_read_write() {
        let file = MemFile::new();
        let page_id = file.allocate_page().unwrap();
        assert_eq!(page_id, PageId::new(0));

        let mut data = [0u8; PAGE_SIZE];
        data[10] = 9;
        file.write_page(page_id, &data).unwrap();

        let mut out = [1u8; PAGE_SIZE];
        file.read_page(page_id, &mut out).unwrap();
        assert_eq!(out[10], 9);
        assert_eq!(out[0], 0);
        assert_eq!(file.num_reads(), 1);
        assert_eq!(file.num_writes(), 1);
    }

    #[test]
    fn test_mem_file_dispose_and_reuse() {
        let file = MemFile::new();
        let p0 = file.allocate_page().unwrap();
        file.write_page(p0, &[5u8; PAGE_SIZE]).unwrap();

        file.dispose_page(p0).unwrap();
        let mut out = [0u8; PAGE_SIZE];
        assert!(matches!(
            file.read_page(p0, &mut out),
            Err(BufferError::InvalidPageId(_))
        ));
        assert!(file.dispose_page(p0).is_err());

        assert_eq!(file.allocate_page().unwrap(), p0);
        file.read_page(p0, &mut out).unwrap();
        assert!(out.iter().all(|&b| b == 0));
        assert_eq!(file.num_pages(), 1);
    }
}
