//! Testing utilities and mock implementations for pipeline tests.
//!
//! This module provides mock implementations of all external service traits,
//! allowing comprehensive end-to-end testing without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use presto_core::testing::{fixtures, MockCatalog, MockDebridClient, MockSearcher};
//!
//! let catalog = MockCatalog::new();
//! let searcher = MockSearcher::new();
//! let debrid = MockDebridClient::new();
//!
//! // Configure mock responses
//! searcher.set_results(vec![fixtures::candidate("Show S06E03", "aa")]).await;
//! debrid.set_cached(&["aa..."]).await;
//!
//! // Wire into a StreamResolver...
//! ```

mod mock_catalog;
mod mock_debrid;
mod mock_searcher;

pub use mock_catalog::MockCatalog;
pub use mock_debrid::MockDebridClient;
pub use mock_searcher::MockSearcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::Metadata;
    use crate::searcher::TorrentCandidate;

    /// Create a test candidate with a full 40-hex info hash derived from
    /// a short hex suffix ("aa" -> "000...0aa").
    pub fn candidate(title: &str, hash_suffix: &str) -> TorrentCandidate {
        let info_hash = format!("{:0>40}", hash_suffix.to_lowercase());
        TorrentCandidate {
            title: title.to_string(),
            magnet: format!(
                "magnet:?xt=urn:btih:{}&dn={}",
                info_hash,
                urlencoding::encode(title)
            ),
            info_hash,
            quality: None,
            size_label: None,
        }
    }

    /// Create a test candidate with a quality and size label.
    pub fn labeled_candidate(title: &str, hash_suffix: &str, quality: &str) -> TorrentCandidate {
        let mut c = candidate(title, hash_suffix);
        c.quality = Some(quality.to_string());
        c.size_label = Some("1.4 GB".to_string());
        c
    }

    /// Create test metadata.
    pub fn metadata(name: &str) -> Metadata {
        Metadata {
            id: None,
            name: name.to_string(),
            year: Some("2005".to_string()),
        }
    }
}
