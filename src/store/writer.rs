//! Durable file writing
//!
//! Every archived artifact goes through a temp-path-then-rename protocol so
//! a crash or interruption can never leave a half-written file at the final
//! path. A message file either exists and is complete, or does not exist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Result of a no-clobber move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// File moved to the destination
    Moved,
    /// Destination already exists; nothing was touched
    SkippedExisting,
    /// Source and destination are the same path; nothing to do
    SamePath,
}

/// Writes `bytes` to `path` atomically
///
/// Missing parent directories are created. The bytes land in a sibling
/// `<path>.tmp` first and are renamed over the final path; the rename is the
/// commit point. Stale `.tmp` files from interrupted runs are ignored by the
/// archive census and harmless to delete.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

/// Sibling temporary path: the final name with `.tmp` appended
pub fn temp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Moves `src` to `dst`, refusing to overwrite an existing destination
///
/// Used by the reorganizer, where a destination collision means two message
/// files claim the same id and must be resolved by a human, not silently.
pub fn rename_no_clobber(src: &Path, dst: &Path) -> io::Result<RenameOutcome> {
    if src == dst {
        return Ok(RenameOutcome::SamePath);
    }
    if dst.exists() {
        return Ok(RenameOutcome::SkippedExisting);
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(src, dst)?;
    Ok(RenameOutcome::Moved)
}
