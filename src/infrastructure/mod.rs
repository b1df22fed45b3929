pub mod fs_watcher;
pub mod sleeper;

pub use fs_watcher::FsWatcher;
pub use sleeper::{Sleeper, TokioSleeper};
