use super::types::PageId;

/// Size of a page in bytes (4 KB)
pub const PAGE_SIZE: usize = 4096;

/// Invalid page ID constant
pub const INVALID_PAGE_ID: PageId = PageId(u32::MAX);

/// Default buffer pool size (number of frames)
pub const DEFAULT_BUFFER_POOL_SIZE: usize = 10;

/// Page table headroom over the frame count, as a ratio (6/5 = 1.2x)
pub const PAGE_TABLE_HEADROOM_NUM: usize = 6;
pub const PAGE_TABLE_HEADROOM_DEN: usize = 5;

/// Returns the number of page table slots to reserve for a pool of
/// `num_frames` frames: about 1.2x the frame count, rounded up to odd.
pub fn page_table_capacity(num_frames: usize) -> usize {
    (num_frames * PAGE_TABLE_HEADROOM_NUM / PAGE_TABLE_HEADROOM_DEN) | 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_table_capacity_is_odd_with_headroom() {
        assert_eq!(page_table_capacity(1), 1);
        assert_eq!(page_table_capacity(3), 3);
        assert_eq!(page_table_capacity(10), 13);
        assert_eq!(page_table_capacity(100), 121);

        for n in 1..200 {
            let cap = page_table_capacity(n);
            assert_eq!(cap % 2, 1);
            assert!(cap >= n);
        }
    }
}
