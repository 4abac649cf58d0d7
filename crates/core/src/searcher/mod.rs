//! Candidate torrent search.
//!
//! This module provides a `Searcher` trait for fetching candidate releases
//! for a content id from an external aggregator, a Torrentio-compatible
//! client, and the cached `CandidateSource` the pipeline uses.

mod source;
mod torrentio;
mod types;

pub use source::CandidateSource;
pub use torrentio::TorrentioClient;
pub use types::{SearchError, Searcher, TorrentCandidate};
