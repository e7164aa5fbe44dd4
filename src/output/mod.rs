mod format;
mod writer;

pub use format::{chars_per_plane, format_snapshot, format_snapshot_hybrid, snapshot_len};
pub use writer::write_snapshot;
