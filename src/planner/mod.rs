//! Resume planning module
//!
//! Decides which message ids a run will visit: the mode semantics, the
//! directional id range, and the on-disk census that reconstructs a group's
//! archive state at startup.

mod mode;
mod range;
mod scan;

pub use mode::ArchiveMode;
pub use range::ScanRange;
pub use scan::{plan, ArchivePlan, ArchiveState};
