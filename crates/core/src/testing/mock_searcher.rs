//! Mock searcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::content::ContentType;
use crate::searcher::{SearchError, Searcher, TorrentCandidate};

/// Mock implementation of the `Searcher` trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable candidates, globally or per content id
/// - Track searched content ids for assertions
/// - Simulate failures (one-shot injected error)
pub struct MockSearcher {
    results: Arc<RwLock<Vec<TorrentCandidate>>>,
    by_id: Arc<RwLock<HashMap<String, Vec<TorrentCandidate>>>>,
    next_error: Arc<RwLock<Option<SearchError>>>,
    searches: Arc<RwLock<Vec<String>>>,
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearcher {
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            by_id: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            searches: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the candidates returned for any content id.
    pub async fn set_results(&self, results: Vec<TorrentCandidate>) {
        *self.results.write().await = results;
    }

    /// Set the candidates returned for one specific content id.
    pub async fn set_results_for(&self, content_id: &str, results: Vec<TorrentCandidate>) {
        self.by_id
            .write()
            .await
            .insert(content_id.to_string(), results);
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Content ids searched so far.
    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }

    /// Number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }
}

#[async_trait]
impl Searcher for MockSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(
        &self,
        _content_type: ContentType,
        content_id: &str,
    ) -> Result<Vec<TorrentCandidate>, SearchError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.searches.write().await.push(content_id.to_string());

        if let Some(results) = self.by_id.read().await.get(content_id) {
            return Ok(results.clone());
        }

        Ok(self.results.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_global_results() {
        let searcher = MockSearcher::new();
        searcher
            .set_results(vec![fixtures::candidate("Show S06E03", "aa")])
            .await;

        let results = searcher
            .search(ContentType::Series, "tt1:6:3")
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(searcher.recorded_searches().await, vec!["tt1:6:3"]);
    }

    #[tokio::test]
    async fn test_per_id_results_take_precedence() {
        let searcher = MockSearcher::new();
        searcher
            .set_results(vec![fixtures::candidate("Global", "aa")])
            .await;
        searcher
            .set_results_for("tt2", vec![fixtures::candidate("Specific", "bb")])
            .await;

        let results = searcher.search(ContentType::Movie, "tt2").await.unwrap();
        assert_eq!(results[0].title, "Specific");

        let results = searcher.search(ContentType::Movie, "tt3").await.unwrap();
        assert_eq!(results[0].title, "Global");
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let searcher = MockSearcher::new();
        searcher.set_next_error(SearchError::Timeout).await;

        assert!(searcher.search(ContentType::Movie, "tt1").await.is_err());
        assert!(searcher.search(ContentType::Movie, "tt1").await.is_ok());
    }
}
