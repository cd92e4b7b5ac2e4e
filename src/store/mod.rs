//! Archive storage module
//!
//! This module owns everything that touches the filesystem:
//! - path layout of a group's archive tree
//! - atomic writes (temp path + rename)
//! - the per-group run log artifact
//! - the year/month reorganizer batch job

pub mod layout;
mod reorganize;
mod runlog;
mod writer;

pub use reorganize::{reorganize_group, ReorganizeSummary};
pub use runlog::RunLog;
pub use writer::{rename_no_clobber, temp_path, write_atomic, RenameOutcome};
