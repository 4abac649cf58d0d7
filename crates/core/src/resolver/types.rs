//! Types for stream resolution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::debrid::{DebridError, TorrentStatus};
use crate::searcher::TorrentCandidate;

/// A playable stream materialized through the debrid provider.
///
/// Immutable once cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStream {
    pub url: String,
    pub title: String,
}

/// A candidate annotated with its episode match, request-scoped only.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: TorrentCandidate,
    pub match_score: i32,
    pub matches: bool,
}

/// Why a single candidate failed to resolve.
///
/// Always scoped to one candidate; the scheduler logs these and moves on.
#[derive(Debug, Error)]
pub enum ResolveFailure {
    #[error("magnet submission failed: {0}")]
    Submit(#[source] DebridError),

    #[error("torrent inspection failed: {0}")]
    Inspect(#[source] DebridError),

    #[error("file selection failed: {0}")]
    FileSelection(#[source] DebridError),

    #[error("torrent not ready after {attempts} attempts (last status: {status})")]
    NeverReady { status: TorrentStatus, attempts: u32 },

    #[error("no download link available")]
    NoLink,

    #[error("unrestrict failed: {0}")]
    Unrestrict(#[source] DebridError),
}

/// One stream entry in the addon response.
#[derive(Debug, Clone, Serialize)]
pub struct Stream {
    /// Short label (service name plus quality).
    pub name: String,
    /// Release title, with the size label when known.
    pub title: String,
    /// Direct-download URL.
    pub url: String,
    #[serde(rename = "behaviorHints", skip_serializing_if = "Option::is_none")]
    pub behavior_hints: Option<BehaviorHints>,
}

/// Player hints attached to a stream entry.
#[derive(Debug, Clone, Serialize)]
pub struct BehaviorHints {
    /// Streams sharing a group are treated as the same release across
    /// episodes, enabling binge auto-play of the same quality.
    #[serde(rename = "bingeGroup", skip_serializing_if = "Option::is_none")]
    pub binge_group: Option<String>,
}

/// The addon-shaped response: a possibly-empty list of streams.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StreamList {
    pub streams: Vec<Stream>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_serialization_shape() {
        let stream = Stream {
            name: "Presto\n1080p".to_string(),
            title: "Show S06E03\n1.4 GB".to_string(),
            url: "https://example.test/direct".to_string(),
            behavior_hints: Some(BehaviorHints {
                binge_group: Some("presto-aabb".to_string()),
            }),
        };

        let json = serde_json::to_string(&stream).unwrap();
        assert!(json.contains("\"behaviorHints\""));
        assert!(json.contains("\"bingeGroup\""));
    }

    #[test]
    fn test_empty_stream_list() {
        let json = serde_json::to_string(&StreamList::default()).unwrap();
        assert_eq!(json, r#"{"streams":[]}"#);
    }

    #[test]
    fn test_behavior_hints_omitted_when_absent() {
        let stream = Stream {
            name: "Presto".to_string(),
            title: "Movie".to_string(),
            url: "https://example.test/direct".to_string(),
            behavior_hints: None,
        };

        let json = serde_json::to_string(&stream).unwrap();
        assert!(!json.contains("behaviorHints"));
    }
}
