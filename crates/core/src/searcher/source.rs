//! Cached candidate fetching.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::content::ContentType;

use super::types::{Searcher, TorrentCandidate};

/// Fetches candidate releases through the search-result cache.
///
/// Unlike metadata, series entries are cached per full content id:
/// candidate sets differ per episode. Empty results are not cached, so a
/// transient aggregator failure can be retried on the next request
/// instead of poisoning the cache for the TTL window.
pub struct CandidateSource {
    searcher: Arc<dyn Searcher>,
    cache: Arc<CacheStore>,
}

impl CandidateSource {
    pub fn new(searcher: Arc<dyn Searcher>, cache: Arc<CacheStore>) -> Self {
        Self { searcher, cache }
    }

    /// Fetch candidates for a content id. Never fails: any aggregator
    /// error degrades to an empty list.
    pub async fn fetch(
        &self,
        content_type: ContentType,
        content_id: &str,
    ) -> Vec<TorrentCandidate> {
        let key = format!("torrents_{}_{}", content_type.as_str(), content_id);

        if let Some(hit) = self.cache.search().get(&key).await {
            return hit;
        }

        match self.searcher.search(content_type, content_id).await {
            Ok(candidates) => {
                if candidates.is_empty() {
                    debug!(content_id, "Aggregator returned no candidates");
                } else {
                    self.cache.search().insert(&key, candidates.clone()).await;
                }
                candidates
            }
            Err(e) => {
                warn!(searcher = self.searcher.name(), error = %e, "Candidate search failed");
                Vec::new()
            }
        }
    }
}
