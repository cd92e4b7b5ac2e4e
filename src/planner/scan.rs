//! Resume planning
//!
//! Reconstructs a group's archive state from the on-disk file tree and turns
//! it, together with the requested mode and the remote upper bound, into the
//! id range this run will visit. The filesystem is the only index: a message
//! counts as archived exactly when its `<id>.json` file exists.

use crate::planner::mode::ArchiveMode;
use crate::planner::range::ScanRange;
use crate::store::layout;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Ids already durably archived for a group
///
/// Built once per run by scanning the group directory, then grown in memory
/// as messages are confirmed written; never shrunk.
#[derive(Debug, Default)]
pub struct ArchiveState {
    ids: BTreeSet<u64>,
}

impl ArchiveState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Census of `<id>.json` files anywhere under `group_dir`
    ///
    /// Follows symlinks like the original archive trees expect; ignores
    /// `.tmp` leftovers, attachments and anything else that is not a message
    /// file. A missing directory is an empty state.
    pub fn scan(group_dir: &Path) -> Self {
        let mut ids = BTreeSet::new();
        if group_dir.exists() {
            for entry in WalkDir::new(group_dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Some(id) = entry
                    .file_name()
                    .to_str()
                    .and_then(layout::message_file_id)
                {
                    ids.insert(id);
                }
            }
        }
        Self { ids }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn insert(&mut self, id: u64) {
        self.ids.insert(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The frontier: highest archived id, if any
    pub fn max_archived(&self) -> Option<u64> {
        self.ids.iter().next_back().copied()
    }

    /// Lowest archived id, the starting point for reverse-update
    pub fn min_archived(&self) -> Option<u64> {
        self.ids.iter().next().copied()
    }
}

/// The planner's output: the range to visit plus the starting state
#[derive(Debug)]
pub struct ArchivePlan {
    pub range: ScanRange,
    pub state: ArchiveState,
}

/// Computes the id range still to be visited for one group
///
/// Mode semantics:
/// - `restart` deletes the group's archive tree, then scans 1..=upper_bound.
/// - `update` scans from the frontier + 1 upward; holes below the frontier
///   are assumed permanent and never revisited.
/// - `retry` scans 1..=upper_bound; archived ids are skipped in-loop.
/// - `reverse-update` scans from the lowest archived id - 1 down to 1.
/// - `reverse-retry` scans upper_bound..=1, skipping archived ids in-loop.
///
/// The group directory is created if missing, so an aborted run still leaves
/// a resumable (possibly empty) tree behind.
pub fn plan(
    mode: ArchiveMode,
    root: &Path,
    group: &str,
    upper_bound: u64,
) -> io::Result<ArchivePlan> {
    let group_dir = layout::group_dir(root, group);

    let plan = match mode {
        ArchiveMode::Restart => {
            if group_dir.exists() {
                tracing::info!("clearing directory {}", group_dir.display());
                fs::remove_dir_all(&group_dir)?;
            }
            ArchivePlan {
                range: ScanRange::ascending(1, upper_bound + 1),
                state: ArchiveState::empty(),
            }
        }
        ArchiveMode::Update => {
            let state = census(&group_dir);
            let range =
                ScanRange::ascending(state.max_archived().unwrap_or(0) + 1, upper_bound + 1);
            ArchivePlan { range, state }
        }
        ArchiveMode::Retry => ArchivePlan {
            range: ScanRange::ascending(1, upper_bound + 1),
            state: census(&group_dir),
        },
        ArchiveMode::ReverseUpdate => {
            let state = census(&group_dir);
            // An empty archive starts the reverse walk at the top of the id
            // space, same as reverse-retry.
            let range =
                ScanRange::descending(state.min_archived().unwrap_or(upper_bound + 1) - 1, 0);
            ArchivePlan { range, state }
        }
        ArchiveMode::ReverseRetry => ArchivePlan {
            range: ScanRange::descending(upper_bound, 0),
            state: census(&group_dir),
        },
    };

    fs::create_dir_all(&group_dir)?;
    Ok(plan)
}

fn census(group_dir: &Path) -> ArchiveState {
    tracing::info!("scanning {} for existing files", group_dir.display());
    let state = ArchiveState::scan(group_dir);
    tracing::info!(
        "found {} archived messages, lowest/highest (contiguity not checked): {:?}/{:?}",
        state.len(),
        state.min_archived(),
        state.max_archived()
    );
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed_message(root: &Path, group: &str, rel: &str) {
        let path = root.join(group).join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"{}").unwrap();
    }

    #[test]
    fn test_census_finds_nested_messages_and_ignores_foreign_files() {
        let root = TempDir::new().unwrap();
        seed_message(root.path(), "demo", "1.json");
        seed_message(root.path(), "demo", "2009/02/5.json");
        seed_message(root.path(), "demo", "3.json.tmp");
        seed_message(root.path(), "demo", "2-photo.jpg");

        let state = ArchiveState::scan(&root.path().join("demo"));

        assert_eq!(state.len(), 2);
        assert!(state.contains(1));
        assert!(state.contains(5));
        assert_eq!(state.min_archived(), Some(1));
        assert_eq!(state.max_archived(), Some(5));
    }

    #[test]
    fn test_census_of_missing_directory_is_empty() {
        let root = TempDir::new().unwrap();
        let state = ArchiveState::scan(&root.path().join("absent"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_update_starts_above_frontier_ignoring_holes() {
        let root = TempDir::new().unwrap();
        for rel in ["1.json", "3.json", "5.json"] {
            seed_message(root.path(), "demo", rel);
        }

        let plan = plan(ArchiveMode::Update, root.path(), "demo", 5).unwrap();

        // Holes at 2 and 4 stay holes: the range starts past the frontier.
        assert_eq!(plan.range.bounds(), None);
        let plan = super::plan(ArchiveMode::Update, root.path(), "demo", 9).unwrap();
        assert_eq!(plan.range.clone().collect::<Vec<_>>(), vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_update_on_empty_archive_scans_from_one() {
        let root = TempDir::new().unwrap();
        let plan = plan(ArchiveMode::Update, root.path(), "demo", 3).unwrap();
        assert_eq!(plan.range.collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_retry_covers_whole_space_with_state_for_skipping() {
        let root = TempDir::new().unwrap();
        for rel in ["1.json", "3.json"] {
            seed_message(root.path(), "demo", rel);
        }

        let plan = plan(ArchiveMode::Retry, root.path(), "demo", 5).unwrap();

        let visited: Vec<u64> = plan
            .range
            .filter(|id| !plan.state.contains(*id))
            .collect();
        assert_eq!(visited, vec![2, 4, 5]);
    }

    #[test]
    fn test_reverse_update_descends_from_below_minimum() {
        let root = TempDir::new().unwrap();
        seed_message(root.path(), "demo", "10.json");
        seed_message(root.path(), "demo", "12.json");

        let plan = plan(ArchiveMode::ReverseUpdate, root.path(), "demo", 20).unwrap();

        assert_eq!(plan.range.bounds(), Some((9, 1)));
        assert_eq!(
            plan.range.collect::<Vec<_>>(),
            vec![9, 8, 7, 6, 5, 4, 3, 2, 1]
        );
    }

    #[test]
    fn test_reverse_update_on_empty_archive_starts_at_upper_bound() {
        let root = TempDir::new().unwrap();
        let plan = plan(ArchiveMode::ReverseUpdate, root.path(), "demo", 3).unwrap();
        assert_eq!(plan.range.collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_reverse_retry_descends_whole_space() {
        let root = TempDir::new().unwrap();
        seed_message(root.path(), "demo", "2.json");

        let plan = plan(ArchiveMode::ReverseRetry, root.path(), "demo", 3).unwrap();

        assert_eq!(plan.range.clone().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert!(plan.state.contains(2));
    }

    #[test]
    fn test_restart_deletes_existing_tree() {
        let root = TempDir::new().unwrap();
        seed_message(root.path(), "demo", "1.json");
        seed_message(root.path(), "demo", "2009/02/5.json");

        let plan = plan(ArchiveMode::Restart, root.path(), "demo", 2).unwrap();

        assert!(plan.state.is_empty());
        assert_eq!(plan.range.collect::<Vec<_>>(), vec![1, 2]);
        assert!(!root.path().join("demo/2009").exists());
        // Directory is recreated empty and ready for the run.
        assert!(root.path().join("demo").exists());
    }

    #[test]
    fn test_plan_creates_group_directory() {
        let root = TempDir::new().unwrap();
        plan(ArchiveMode::Update, root.path(), "demo", 0).unwrap();
        assert!(root.path().join("demo").is_dir());
    }
}
