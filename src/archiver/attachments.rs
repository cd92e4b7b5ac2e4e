//! Attachment discovery and saving
//!
//! The rendered message page is the only place the API exposes attachment
//! links: anchors pointing at the content CDN with a download marker, whose
//! text is the attachment's filename. The HTML scan lives behind
//! [`extract_attachment_links`] so the selector logic can change without
//! touching the message archiver's contract.

use crate::client::{FetchClient, FetchOutcome};
use crate::store::layout;
use crate::store::write_atomic;
use scraper::{Html, Selector};
use std::path::Path;
use url::Url;

/// Host suffix of the content CDN that serves attachments
const CDN_HOST_SUFFIX: &str = "yimg.com";

/// One attachment candidate found on a rendered message page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLink {
    pub url: Url,
    pub name: String,
}

/// Result of fetching all attachments for one message
#[derive(Debug, PartialEq, Eq)]
pub enum AttachmentSweep {
    /// Every attachment is on disk (or was a 404 the CDN no longer serves)
    Complete { saved: usize, skipped: usize },
    /// An attachment fetch failed; the message must not be archived yet
    Failed { status: u16 },
}

/// Scans rendered-page HTML for attachment links
///
/// An anchor qualifies when its href resolves to the content CDN and carries
/// a `download` query marker, and its text sanitizes to a usable filename.
/// Anchors with hostile or empty labels are dropped with a warning rather
/// than failing the message.
pub fn extract_attachment_links(html: &str, base: &Url) -> Vec<AttachmentLink> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(url) = base.join(href.trim()) else {
            continue;
        };
        if !is_attachment_url(&url) {
            continue;
        }

        let label: String = element.text().collect();
        match layout::sanitize_attachment_name(&label) {
            Some(name) => links.push(AttachmentLink { url, name }),
            None => {
                tracing::warn!("skipping attachment at {} with unusable label", url);
            }
        }
    }
    links.dedup();
    links
}

/// True when the URL points at the content CDN with a download marker
fn is_attachment_url(url: &Url) -> bool {
    let on_cdn = url
        .host_str()
        .map(|host| host == CDN_HOST_SUFFIX || host.ends_with(".yimg.com"))
        .unwrap_or(false);
    on_cdn && url.query_pairs().any(|(key, _)| key == "download")
}

/// Fetches every attachment for a message, before the message itself
///
/// Already-present non-empty files are skipped, so an interrupted run does
/// not refetch what it has. A 404 from the CDN is tolerated (the attachment
/// is gone upstream); any other non-200 aborts the sweep so the whole
/// message is retried together on the next run.
pub async fn save_attachments(
    client: &FetchClient,
    group_dir: &Path,
    id: u64,
    links: &[AttachmentLink],
    page_url: &Url,
) -> std::io::Result<AttachmentSweep> {
    let mut saved = 0;
    let mut skipped = 0;

    for link in links {
        let path = layout::attachment_path(group_dir, id, &link.name);
        if non_empty_file(&path) {
            tracing::debug!("attachment {} already saved", path.display());
            skipped += 1;
            continue;
        }

        let FetchOutcome { status, body } = client.get(&link.url, Some(page_url)).await;
        match status {
            200 => {
                write_atomic(&path, &body)?;
                tracing::info!("saved attachment {}", path.display());
                saved += 1;
            }
            404 => {
                tracing::warn!(
                    "attachment {} for message {} is gone upstream (404)",
                    link.name,
                    id
                );
                skipped += 1;
            }
            status => {
                tracing::error!(
                    "attachment {} for message {} failed with HTTP {}",
                    link.name,
                    id,
                    status
                );
                return Ok(AttachmentSweep::Failed { status });
            }
        }
    }

    Ok(AttachmentSweep::Complete { saved, skipped })
}

fn non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
