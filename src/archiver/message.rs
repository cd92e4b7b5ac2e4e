//! Per-message archiving
//!
//! Orchestrates one message id: fetch the raw payload, fetch any attachments
//! (strictly before the message write, since the message file's existence is
//! the "done" marker), recover a best-effort post date, and persist the
//! payload atomically.

use crate::archiver::attachments::{extract_attachment_links, save_attachments, AttachmentSweep};
use crate::archiver::timestamp::post_date_from_payload;
use crate::client::{FetchClient, GroupApi};
use crate::store::{layout, write_atomic};
use serde_json::Value;
use std::path::Path;

/// Disposition of one message attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Message (and its attachments, when enabled) durably written
    Archived { dated: bool },
    /// The raw endpoint returned 404: a hole in the id space
    Missing,
    /// The raw endpoint or an attachment fetch returned something else;
    /// nothing was persisted for this id
    Failed { status: u16 },
}

impl ArchiveOutcome {
    /// The status the backoff controller should observe for this outcome
    pub fn status(&self) -> u16 {
        match self {
            Self::Archived { .. } => 200,
            Self::Missing => 404,
            Self::Failed { status } => *status,
        }
    }
}

/// Archives single messages for one group
pub struct MessageArchiver<'a> {
    pub client: &'a FetchClient,
    pub api: &'a GroupApi,
    pub group: &'a str,
    pub group_dir: &'a Path,
    pub save_attachments: bool,
}

impl MessageArchiver<'_> {
    /// Attempts to archive one message id
    ///
    /// Any non-200 on the raw endpoint returns immediately with no side
    /// effects. An attachment failure (non-200, non-404) also leaves no
    /// message file behind, so the next run retries message and attachments
    /// together. Only filesystem errors propagate as `Err`.
    pub async fn archive(&self, id: u64) -> crate::Result<ArchiveOutcome> {
        let raw_url = self.api.raw_message_url(self.group, id);
        let outcome = self.client.get(&raw_url, None).await;
        match outcome.status {
            200 => {}
            404 => return Ok(ArchiveOutcome::Missing),
            status => return Ok(ArchiveOutcome::Failed { status }),
        }

        if self.save_attachments {
            if let Some(status) = self.sweep_attachments(id).await? {
                return Ok(ArchiveOutcome::Failed { status });
            }
        }

        let post_date = post_date_from_payload(&outcome.body);
        if post_date.is_none() {
            tracing::warn!(
                "message {}: no parseable post date, archiving without date path",
                id
            );
        }

        let path = layout::message_path(self.group_dir, id, post_date);
        tracing::info!("writing message {} to {}", id, path.display());
        write_atomic(&path, &outcome.body)?;

        Ok(ArchiveOutcome::Archived {
            dated: post_date.is_some(),
        })
    }

    /// Fetches the rendered page and saves every attachment it references
    ///
    /// Returns `Some(status)` when a fetch failed in a way that must defer
    /// the whole message; `None` when the message may be written. A 404 on
    /// the rendered page itself means there is no attachment data, which is
    /// not a failure.
    async fn sweep_attachments(&self, id: u64) -> crate::Result<Option<u16>> {
        let page_url = self.api.rendered_message_url(self.group, id);
        let page = self.client.get(&page_url, None).await;
        match page.status {
            200 => {}
            404 => return Ok(None),
            status => {
                tracing::error!(
                    "message {}: rendered page fetch failed with HTTP {}",
                    id,
                    status
                );
                return Ok(Some(status));
            }
        }

        let html = serde_json::from_slice::<Value>(&page.body)
            .ok()
            .and_then(|v| v.get("html").and_then(|h| h.as_str().map(String::from)));
        let Some(html) = html else {
            tracing::debug!("message {}: rendered page carries no html envelope", id);
            return Ok(None);
        };

        let links = extract_attachment_links(&html, &page_url);
        if links.is_empty() {
            return Ok(None);
        }
        tracing::debug!("message {}: found {} attachment link(s)", id, links.len());

        match save_attachments(self.client, self.group_dir, id, &links, &page_url).await? {
            AttachmentSweep::Complete { .. } => Ok(None),
            AttachmentSweep::Failed { status } => Ok(Some(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_status_mapping() {
        assert_eq!(ArchiveOutcome::Archived { dated: true }.status(), 200);
        assert_eq!(ArchiveOutcome::Archived { dated: false }.status(), 200);
        assert_eq!(ArchiveOutcome::Missing.status(), 404);
        assert_eq!(ArchiveOutcome::Failed { status: 503 }.status(), 503);
    }
}
