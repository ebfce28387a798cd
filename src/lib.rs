pub mod app;

pub use app::models::{EntryKind, ScanConfig, TreeLine};
pub use app::scan_directory;
