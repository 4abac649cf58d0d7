//! Torrentio-compatible aggregator client.
//!
//! Torrentio serves pre-indexed torrent candidates per content id in the
//! Stremio stream format. Entries without an info hash are unusable and
//! dropped during normalization.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::SearcherConfig;
use crate::content::ContentType;

use super::types::{SearchError, Searcher, TorrentCandidate};

const DEFAULT_BASE_URL: &str = "https://torrentio.strem.fun";

static QUALITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(2160p|4k|1080p|720p|480p)\b").unwrap());
static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(GB|MB)\b").unwrap());

/// Torrentio aggregator client.
pub struct TorrentioClient {
    client: Client,
    base_url: String,
}

impl TorrentioClient {
    /// Create a new Torrentio client.
    pub fn new(config: SearcherConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Searcher for TorrentioClient {
    fn name(&self) -> &str {
        "torrentio"
    }

    async fn search(
        &self,
        content_type: ContentType,
        content_id: &str,
    ) -> Result<Vec<TorrentCandidate>, SearchError> {
        let url = format!(
            "{}/stream/{}/{}.json",
            self.base_url,
            content_type.as_str(),
            content_id
        );

        debug!(content_type = %content_type, content_id, "Aggregator search");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else if e.is_connect() {
                SearchError::ConnectionFailed(e.to_string())
            } else {
                SearchError::ApiError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::ApiError(format!("HTTP {}", status)));
        }

        let body: StreamsResponse = response.json().await.map_err(|e| {
            SearchError::ParseError(format!("Failed to parse streams response: {}", e))
        })?;

        let candidates: Vec<TorrentCandidate> = body
            .streams
            .into_iter()
            .filter_map(normalize_entry)
            .collect();

        debug!(
            content_id,
            results = candidates.len(),
            "Aggregator search complete"
        );

        Ok(candidates)
    }
}

/// Normalize one aggregator entry into a candidate.
///
/// Returns `None` for entries without a usable 40-hex info hash.
fn normalize_entry(entry: StreamEntry) -> Option<TorrentCandidate> {
    let info_hash = entry.info_hash?.to_lowercase();
    if info_hash.len() != 40 || !info_hash.chars().all(|c| c.is_ascii_hexdigit()) {
        debug!(info_hash = %info_hash, "Discarding entry with malformed info hash");
        return None;
    }

    let title = entry
        .title
        .or(entry.name)
        .unwrap_or_else(|| info_hash.clone());

    // The display name for the magnet link; release text is often
    // multi-line with seeder/size decorations on later lines.
    let display_name = title.lines().next().unwrap_or(&title);
    let magnet = format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        info_hash,
        urlencoding::encode(display_name)
    );

    let quality = parse_quality(&title);
    let size_label = parse_size_label(&title);

    Some(TorrentCandidate {
        title,
        info_hash,
        magnet,
        quality,
        size_label,
    })
}

/// Extract a canonical quality label from release text.
fn parse_quality(text: &str) -> Option<String> {
    let m = QUALITY_RE.captures(text)?;
    let token = m[1].to_lowercase();
    let canonical = match token.as_str() {
        "4k" => "2160p",
        other => other,
    };
    Some(canonical.to_string())
}

/// Extract a size label ("1.4 GB") from release text.
fn parse_size_label(text: &str) -> Option<String> {
    let caps = SIZE_RE.captures(text)?;
    Some(format!("{} {}", &caps[1], caps[2].to_uppercase()))
}

// ============================================================================
// Aggregator API response types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    #[serde(default)]
    streams: Vec<StreamEntry>,
}

#[derive(Debug, Deserialize)]
struct StreamEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "infoHash", default)]
    info_hash: Option<String>,
}
