//! Archive driver
//!
//! Runs one group end to end: query the upper bound, plan the id range,
//! then walk it one message at a time, sleeping whatever the backoff
//! controller dictates between attempts. Strictly sequential; the remote
//! service's rate limiting is the binding constraint, not local CPU.

use crate::archiver::backoff::Backoff;
use crate::archiver::message::{ArchiveOutcome, MessageArchiver};
use crate::client::{FetchClient, GroupApi};
use crate::config::Config;
use crate::planner::{plan, ArchiveMode, ArchivePlan};
use crate::store::{layout, RunLog};
use std::time::{Duration, Instant};

/// Counters reported after a group's run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Messages newly archived this run
    pub archived: u64,
    /// Holes encountered (404)
    pub not_found: u64,
    /// Attempts that failed with an unexpected status
    pub failed: u64,
    /// Wall time for the whole run
    pub elapsed: Duration,
}

/// Drives the archival of a single group
pub struct GroupArchiver<'a> {
    group: String,
    client: &'a FetchClient,
    api: &'a GroupApi,
    config: &'a Config,
    run_log: RunLog,
}

impl<'a> GroupArchiver<'a> {
    pub fn new(group: &str, client: &'a FetchClient, api: &'a GroupApi, config: &'a Config) -> Self {
        let run_log = if config.output.run_log {
            RunLog::new(&config.output.root_dir, group)
        } else {
            RunLog::disabled(group)
        };
        Self {
            group: group.to_string(),
            client,
            api,
            config,
            run_log,
        }
    }

    /// Archives the group in the given mode
    ///
    /// Fatal errors (`UpstreamUnavailable`, `AuthRequired`,
    /// `TooManyServerErrors`, filesystem failures) abort this group's run;
    /// everything already written stays on disk and the next run resumes
    /// from it.
    pub async fn archive(&mut self, mode: ArchiveMode) -> crate::Result<ArchiveSummary> {
        let start = Instant::now();
        tracing::info!("archiving group '{}' in mode '{}'", self.group, mode);
        self.run_log
            .info(&format!("archiving group '{}' in mode '{}'", self.group, mode));

        let result = self.run(mode, start).await;
        match &result {
            Ok(summary) => {
                let line = format!(
                    "archive finished, archived {}, time taken is {:.1?}",
                    summary.archived, summary.elapsed
                );
                tracing::info!("{}", line);
                self.run_log.info(&line);
            }
            Err(e) => {
                self.run_log.error(&format!("archive aborted: {}", e));
            }
        }
        result
    }

    async fn run(&mut self, mode: ArchiveMode, start: Instant) -> crate::Result<ArchiveSummary> {
        // Planning: one upper-bound lookup, then the mode's range.
        let upper_bound = self.api.last_record_id(self.client, &self.group).await?;
        tracing::info!("last message id in group '{}' is {}", self.group, upper_bound);

        let root = &self.config.output.root_dir;
        let ArchivePlan { range, mut state } = plan(mode, root, &self.group, upper_bound)?;
        match range.bounds() {
            Some((first, last)) => {
                let line = format!("archiving messages {}...{}", first, last);
                tracing::info!("{}", line);
                self.run_log.info(&line);
            }
            None => tracing::info!("nothing to archive, already at the frontier"),
        }

        let group_dir = layout::group_dir(root, &self.group);
        let archiver = MessageArchiver {
            client: self.client,
            api: self.api,
            group: &self.group,
            group_dir: &group_dir,
            save_attachments: self.config.output.save_attachments,
        };
        let mut backoff = Backoff::new(&self.config.pacing);
        let mut archived = 0u64;
        let mut not_found = 0u64;
        let mut failed = 0u64;

        // Scanning -> (Sleeping <-> Fetching) until the range is exhausted.
        for id in range {
            if state.contains(id) {
                continue;
            }
            if let Some(delay) = backoff.delay() {
                tracing::debug!("sleeping for {:?}", delay);
                tokio::time::sleep(delay).await;
            }

            tracing::debug!("attempting to archive message {}", id);
            let outcome = archiver.archive(id).await?;
            if let Err(e) = backoff.observe(outcome.status()) {
                tracing::error!("{}; partial archive retained for next run", e);
                return Err(e);
            }

            match outcome {
                ArchiveOutcome::Archived { .. } => {
                    state.insert(id);
                    archived += 1;
                    self.run_log.info(&format!("archived message {}", id));
                }
                ArchiveOutcome::Missing => {
                    not_found += 1;
                    tracing::warn!("message {} not found", id);
                    self.run_log.warn(&format!("message {} not found", id));
                }
                ArchiveOutcome::Failed { status } => {
                    failed += 1;
                    let line =
                        format!("message {} got unexpected HTTP error code {}", id, status);
                    tracing::error!("{}", line);
                    self.run_log.error(&line);
                }
            }
        }

        Ok(ArchiveSummary {
            archived,
            not_found,
            failed,
            elapsed: start.elapsed(),
        })
    }
}
