//! Types for the debrid provider protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Provider-side torrent handle returned by a magnet submission.
#[derive(Debug, Clone, Deserialize)]
pub struct AddedMagnet {
    pub id: String,
}

/// Provider-side torrent state.
///
/// `Downloaded` and `WaitingFilesSelection` are the terminal "ready"
/// states the poll loop waits for; everything else keeps polling until
/// the attempt budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorrentStatus {
    MagnetConversion,
    WaitingFilesSelection,
    Queued,
    Downloading,
    Downloaded,
    Error,
    Virus,
    Dead,
    #[serde(other)]
    Unknown,
}

impl TorrentStatus {
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            TorrentStatus::Downloaded | TorrentStatus::WaitingFilesSelection
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TorrentStatus::MagnetConversion => "magnet_conversion",
            TorrentStatus::WaitingFilesSelection => "waiting_files_selection",
            TorrentStatus::Queued => "queued",
            TorrentStatus::Downloading => "downloading",
            TorrentStatus::Downloaded => "downloaded",
            TorrentStatus::Error => "error",
            TorrentStatus::Virus => "virus",
            TorrentStatus::Dead => "dead",
            TorrentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TorrentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file within a provider-side torrent.
#[derive(Debug, Clone, Deserialize)]
pub struct TorrentFileInfo {
    pub id: u32,
    pub path: String,
    #[serde(default)]
    pub bytes: u64,
}

/// Provider-side torrent details.
#[derive(Debug, Clone, Deserialize)]
pub struct TorrentInfo {
    pub status: TorrentStatus,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub files: Vec<TorrentFileInfo>,
    #[serde(default)]
    pub links: Vec<String>,
}

/// Which files of a torrent to select for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChoice {
    /// All files (single-file torrents, or no episode context).
    All,
    /// A single file by provider file id.
    Single(u32),
}

impl FileChoice {
    /// Wire form of the selection ("all" or a file id).
    pub fn as_param(&self) -> String {
        match self {
            FileChoice::All => "all".to_string(),
            FileChoice::Single(id) => id.to_string(),
        }
    }
}

/// A link materialized into a direct download.
#[derive(Debug, Clone, Deserialize)]
pub struct UnrestrictedLink {
    pub download: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Errors that can occur talking to the debrid provider.
#[derive(Debug, Error)]
pub enum DebridError {
    #[error("Debrid provider not configured: {0}")]
    NotConfigured(String),

    #[error("Debrid connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Debrid API error: HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse debrid response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for debrid provider backends.
#[async_trait]
pub trait DebridClient: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Submit a magnet link, obtaining a provider-side torrent id.
    async fn add_magnet(&self, magnet: &str) -> Result<AddedMagnet, DebridError>;

    /// Fetch torrent details (status, file listing, links).
    async fn torrent_info(&self, torrent_id: &str) -> Result<TorrentInfo, DebridError>;

    /// Select which files to download.
    async fn select_files(&self, torrent_id: &str, choice: &FileChoice)
        -> Result<(), DebridError>;

    /// Turn a provider link into a direct-download URL.
    async fn unrestrict_link(&self, link: &str) -> Result<UnrestrictedLink, DebridError>;

    /// Bulk instant-availability check.
    ///
    /// Returns the subset of hashes the provider already holds (a hash is
    /// cached iff its availability object is non-empty).
    async fn instant_availability(
        &self,
        hashes: &[String],
    ) -> Result<HashSet<String>, DebridError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_deserialization() {
        let status: TorrentStatus = serde_json::from_str("\"downloaded\"").unwrap();
        assert_eq!(status, TorrentStatus::Downloaded);
        assert!(status.is_ready());

        let status: TorrentStatus = serde_json::from_str("\"waiting_files_selection\"").unwrap();
        assert!(status.is_ready());

        let status: TorrentStatus = serde_json::from_str("\"downloading\"").unwrap();
        assert!(!status.is_ready());
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let status: TorrentStatus = serde_json::from_str("\"compressing\"").unwrap();
        assert_eq!(status, TorrentStatus::Unknown);
        assert!(!status.is_ready());
    }

    #[test]
    fn test_file_choice_param() {
        assert_eq!(FileChoice::All.as_param(), "all");
        assert_eq!(FileChoice::Single(3).as_param(), "3");
    }

    #[test]
    fn test_torrent_info_defaults() {
        let info: TorrentInfo = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        assert_eq!(info.status, TorrentStatus::Queued);
        assert!(info.files.is_empty());
        assert!(info.links.is_empty());
        assert!(info.filename.is_none());
    }
}
