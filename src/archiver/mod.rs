//! Archiving module
//!
//! This module contains the core archiving logic, including:
//! - The backoff controller pacing requests and aborting on server distress
//! - Per-message orchestration (fetch, attachments, durable write)
//! - Best-effort post-date recovery for year/month placement
//! - The per-group driver state machine

mod attachments;
mod backoff;
mod driver;
mod message;
pub(crate) mod timestamp;

pub use attachments::{extract_attachment_links, save_attachments, AttachmentLink, AttachmentSweep};
pub use backoff::Backoff;
pub use driver::{ArchiveSummary, GroupArchiver};
pub use message::{ArchiveOutcome, MessageArchiver};
pub use timestamp::post_date_from_payload;
