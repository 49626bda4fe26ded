//! Bulk file retrieval with per-file failure isolation.

mod fetcher;

pub use fetcher::{decode_content, BulkFetcher, DownloadRequest, DownloadResult};
