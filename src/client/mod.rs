//! HTTP client module
//!
//! One persistent session per run (connection reuse keeps the upstream
//! service from treating the archiver as an attack), plus the URL builders
//! and pre-flight queries for the message API.

mod api;
mod fetch;

pub use api::GroupApi;
pub use fetch::{FetchClient, FetchOutcome, NETWORK_ERROR_STATUS};
