use clockpool::buffer::BufferManager;
use clockpool::storage::{DiskFile, PageFile};

fn main() {
    println!("Clockpool - a clock buffer manager in Rust");
    println!("==========================================\n");

    let db_path = "demo.db";

    let file = DiskFile::open(db_path).expect("Failed to open page file");
    println!("Opened page file {} as {}", file.path(), file.file_id());

    {
        // A small pool so the demo has to evict
        let mut bpm = BufferManager::new(3);
        println!("Created buffer manager with {} frames\n", bpm.pool_size());

        let mut page_ids = Vec::new();
        for i in 0..6u8 {
            let (page_id, frame_id) = bpm.create_page(&file).expect("Failed to create page");
            let msg = format!("page number {}", i);
            bpm.page_mut(frame_id)[..msg.len()].copy_from_slice(msg.as_bytes());
            bpm.unpin_page(&file, page_id, true)
                .expect("Failed to unpin page");
            println!("Created {} in {}", page_id, frame_id);
            page_ids.push(page_id);
        }

        println!("\nReading pages back:");
        for &page_id in &page_ids {
            let frame_id = bpm.fetch_page(&file, page_id).expect("Failed to fetch page");
            let text = String::from_utf8_lossy(&bpm.page(frame_id)[..13]).to_string();
            println!("  - {} in {}: {:?}", page_id, frame_id, text);
            bpm.unpin_page(&file, page_id, false)
                .expect("Failed to unpin page");
        }

        bpm.flush_file(&file).expect("Failed to flush file");
        println!("\nFlushed file, {} frames free", bpm.free_frame_count());
    }

    println!(
        "Disk activity: {} reads, {} writes",
        file.num_reads(),
        file.num_writes()
    );

    drop(file);
    std::fs::remove_file(db_path).ok();
    println!("\nDemo completed successfully!");
}
