//! On-disk layout of a group's archive
//!
//! ```text
//! <root>/<group>/<id>.json                     undated message
//! <root>/<group>/<year>/<month>/<id>.json      dated message
//! <root>/<group>/<id>-<name>                   attachment
//! <root>/<group>.txt                           run log
//! ```
//!
//! The filesystem enumeration of `<id>.json` files IS the archive index;
//! there is no separate state file.

use chrono::{DateTime, Datelike, Utc};
use std::path::{Path, PathBuf};

/// Directory holding one group's archive
pub fn group_dir(root: &Path, group: &str) -> PathBuf {
    root.join(group)
}

/// Path of a message file, partitioned by year/month when a post date is known
pub fn message_path(group_dir: &Path, id: u64, post_date: Option<DateTime<Utc>>) -> PathBuf {
    let mut path = match post_date {
        Some(date) => date_dir(group_dir, date),
        None => group_dir.to_path_buf(),
    };
    path.push(format!("{}.json", id));
    path
}

/// `<group>/<year>/<month>` with a 4-digit year and zero-padded month
pub fn date_dir(group_dir: &Path, date: DateTime<Utc>) -> PathBuf {
    group_dir
        .join(format!("{:04}", date.year()))
        .join(format!("{:02}", date.month()))
}

/// Path of a saved attachment, named after the message it belongs to
pub fn attachment_path(group_dir: &Path, id: u64, name: &str) -> PathBuf {
    group_dir.join(format!("{}-{}", id, name))
}

/// Path of the group's append-only run log
pub fn run_log_path(root: &Path, group: &str) -> PathBuf {
    root.join(format!("{}.txt", group))
}

/// Parses a message id out of a file name shaped like `<id>.json`
///
/// Anything else (attachments, `.json.tmp` leftovers, foreign files) yields
/// `None` and is invisible to the archive census.
pub fn message_file_id(file_name: &str) -> Option<u64> {
    file_name.strip_suffix(".json")?.parse().ok()
}

/// Reduces an attachment label from the rendered page to a safe file name
///
/// Path separators and parent-directory components are stripped so a hostile
/// label cannot escape the group directory. Returns `None` when nothing
/// usable remains.
pub fn sanitize_attachment_name(label: &str) -> Option<String> {
    let name = label
        .split(['/', '\\'])
        .filter(|s| !s.trim().is_empty())
        .next_back()?
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return None;
    }

    let cleaned: String = name.chars().filter(|c| !c.is_control()).collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        None
    } else {
        Some(cleaned)
    }
}
