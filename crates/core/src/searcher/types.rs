//! Types for the candidate search system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::ContentType;

/// A candidate release for a content id.
///
/// The info hash is the natural key: candidates without one are unusable
/// and discarded during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentCandidate {
    /// Release title as reported by the aggregator.
    pub title: String,
    /// Info hash (40 lowercase hex chars).
    pub info_hash: String,
    /// Magnet link, constructed from the info hash when not provided.
    pub magnet: String,
    /// Quality label parsed from the release text (e.g. "1080p").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Size label parsed from the release text (e.g. "1.4 GB").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_label: Option<String>,
}

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Aggregator connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Aggregator API error: {0}")]
    ApiError(String),

    #[error("Failed to parse aggregator response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for release aggregator backends.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch candidate releases for a content id.
    ///
    /// For series the full composite id (with season/episode suffix) is
    /// used; result sets differ per episode.
    async fn search(
        &self,
        content_type: ContentType,
        content_id: &str,
    ) -> Result<Vec<TorrentCandidate>, SearchError>;
}
