//! Utility modules shared across the launcher.
//!
//! - [`fs`]: async filesystem helpers (atomic writes, tolerant removal)
//! - [`progress`]: terminal progress bars for downloads

pub mod fs;
pub mod progress;

pub use fs::{atomic_write, ensure_dir};
pub use progress::DownloadBar;
