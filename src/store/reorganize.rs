//! Year/month reorganizer
//!
//! Batch job that moves flat `<id>.json` files in a group directory into
//! `<year>/<month>/` subdirectories based on each file's `ygData.postDate`.
//! Idempotent: files already partitioned live below the top level and are
//! not re-examined, and an existing destination is never overwritten.

use crate::archiver::timestamp::post_date_from_payload;
use crate::store::layout;
use crate::store::writer::{rename_no_clobber, RenameOutcome};
use std::fs;
use std::path::Path;

/// Counters reported after a reorganize pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReorganizeSummary {
    /// Files moved into a year/month directory
    pub moved: usize,
    /// Files left in place (existing destination or already partitioned)
    pub skipped: usize,
    /// Files whose post date could not be read
    pub failed: usize,
}

/// Moves each top-level `<id>.json` in `group_dir` to its year/month home
///
/// A file with no recoverable `ygData.postDate` stays where it is and is
/// counted as failed; a destination collision is logged and counted as
/// skipped. Neither stops the pass.
pub fn reorganize_group(group_dir: &Path) -> crate::Result<ReorganizeSummary> {
    let mut summary = ReorganizeSummary::default();

    for entry in fs::read_dir(group_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if layout::message_file_id(name).is_none() {
            continue;
        }

        let src = entry.path();
        let payload = match fs::read(&src) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("could not read {}: {}", src.display(), e);
                summary.failed += 1;
                continue;
            }
        };

        let Some(post_date) = post_date_from_payload(&payload) else {
            tracing::error!(
                "{}: no parseable ygData.postDate, leaving in place",
                src.display()
            );
            summary.failed += 1;
            continue;
        };

        let dst = layout::date_dir(group_dir, post_date).join(name);
        match rename_no_clobber(&src, &dst)? {
            RenameOutcome::Moved => {
                tracing::info!("moved {} to {}", src.display(), dst.display());
                summary.moved += 1;
            }
            RenameOutcome::SkippedExisting => {
                tracing::warn!(
                    "destination {} already exists, leaving {} in place",
                    dst.display(),
                    src.display()
                );
                summary.skipped += 1;
            }
            RenameOutcome::SamePath => summary.skipped += 1,
        }
    }

    Ok(summary)
}
