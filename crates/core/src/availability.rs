//! Cache-availability-based candidate reordering.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::debrid::DebridClient;
use crate::metrics;
use crate::searcher::TorrentCandidate;

/// Reorders candidates so instantly-available releases start first.
///
/// One bulk availability call covers the whole (already truncated) input.
/// This is an optimization, never a correctness requirement: any provider
/// failure keeps the original order.
pub struct AvailabilityPrioritizer {
    debrid: Arc<dyn DebridClient>,
}

impl AvailabilityPrioritizer {
    pub fn new(debrid: Arc<dyn DebridClient>) -> Self {
        Self { debrid }
    }

    /// Stable partition: cached candidates first, original order preserved
    /// within each group.
    pub async fn prioritize(&self, candidates: Vec<TorrentCandidate>) -> Vec<TorrentCandidate> {
        if candidates.is_empty() {
            return candidates;
        }

        let hashes: Vec<String> = candidates.iter().map(|c| c.info_hash.clone()).collect();

        match self.debrid.instant_availability(&hashes).await {
            Ok(cached) => {
                debug!(
                    checked = hashes.len(),
                    cached = cached.len(),
                    "Instant availability check complete"
                );
                let (mut available, rest): (Vec<_>, Vec<_>) = candidates
                    .into_iter()
                    .partition(|c| cached.contains(&c.info_hash));
                available.extend(rest);
                available
            }
            Err(e) => {
                warn!(provider = self.debrid.name(), error = %e, "Availability check failed, keeping original order");
                metrics::AVAILABILITY_CHECK_FAILURES.inc();
                candidates
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debrid::DebridError;
    use crate::testing::{fixtures, MockDebridClient};

    fn titles(candidates: &[TorrentCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_cached_candidates_move_first() {
        let debrid = Arc::new(MockDebridClient::new());
        let a = fixtures::candidate("A", "aa");
        let b = fixtures::candidate("B", "bb");
        let c = fixtures::candidate("C", "cc");
        debrid.set_cached(&[&b.info_hash]).await;

        let prioritizer = AvailabilityPrioritizer::new(debrid);
        let ordered = prioritizer.prioritize(vec![a, b, c]).await;

        assert_eq!(titles(&ordered), vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_order_stable_within_groups() {
        let debrid = Arc::new(MockDebridClient::new());
        let a = fixtures::candidate("A", "aa");
        let b = fixtures::candidate("B", "bb");
        let c = fixtures::candidate("C", "cc");
        let d = fixtures::candidate("D", "dd");
        debrid.set_cached(&[&b.info_hash, &d.info_hash]).await;

        let prioritizer = AvailabilityPrioritizer::new(debrid);
        let ordered = prioritizer.prioritize(vec![a, b, c, d]).await;

        assert_eq!(titles(&ordered), vec!["B", "D", "A", "C"]);
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_original_order() {
        let debrid = Arc::new(MockDebridClient::new());
        debrid
            .set_next_error(DebridError::ConnectionFailed("down".to_string()))
            .await;

        let candidates = vec![
            fixtures::candidate("A", "aa"),
            fixtures::candidate("B", "bb"),
        ];
        let prioritizer = AvailabilityPrioritizer::new(debrid);
        let ordered = prioritizer.prioritize(candidates).await;

        assert_eq!(titles(&ordered), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let debrid = Arc::new(MockDebridClient::new());
        let prioritizer = AvailabilityPrioritizer::new(debrid.clone());

        assert!(prioritizer.prioritize(Vec::new()).await.is_empty());
        assert!(debrid.calls().await.is_empty());
    }
}
