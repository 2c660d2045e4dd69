mod disk_file;
mod mem_file;
mod page_file;

pub use disk_file::*;
pub use mem_file::*;
pub use page_file::*;
