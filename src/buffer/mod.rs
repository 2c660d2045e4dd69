mod buffer_manager;
mod clock_replacer;
mod frame_desc;
mod frame_pool;
mod page_table;

pub use buffer_manager::*;
pub use clock_replacer::*;
pub use frame_desc::*;
pub use frame_pool::*;
pub use page_table::*;
