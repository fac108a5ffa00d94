//! Copy job execution

pub mod copy;
pub mod pool;

pub use copy::{copy_file, execute_job};
pub use pool::CopyScheduler;
