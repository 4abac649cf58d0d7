//! Top-level stream resolution orchestration.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::availability::AvailabilityPrioritizer;
use crate::cache::CacheStore;
use crate::catalog::{CatalogSource, MetadataResolver};
use crate::config::ResolverConfig;
use crate::content::ContentType;
use crate::debrid::DebridClient;
use crate::episode::{self, SeasonEpisode};
use crate::metrics;
use crate::searcher::{CandidateSource, Searcher, TorrentCandidate};

use super::job::CandidateResolver;
use super::scheduler::{BatchOutcome, BatchScheduler};
use super::types::{
    BehaviorHints, ResolveFailure, ResolvedStream, ScoredCandidate, Stream, StreamList,
};

/// Non-matching candidates appended after episode-matching ones, as a
/// fallback when the title tags are unreliable.
const MAX_FALLBACK_CANDIDATES: usize = 3;

/// The resolution pipeline entry point.
///
/// `resolve_streams` never fails: every upstream failure degrades to a
/// smaller (possibly empty) stream list.
pub struct StreamResolver {
    metadata: MetadataResolver,
    candidates: CandidateSource,
    availability: AvailabilityPrioritizer,
    job: CandidateResolver,
    config: ResolverConfig,
}

impl StreamResolver {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        searcher: Arc<dyn Searcher>,
        debrid: Arc<dyn DebridClient>,
        cache: Arc<CacheStore>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            metadata: MetadataResolver::new(catalog, Arc::clone(&cache)),
            candidates: CandidateSource::new(searcher, Arc::clone(&cache)),
            availability: AvailabilityPrioritizer::new(Arc::clone(&debrid)),
            job: CandidateResolver::new(debrid, cache, config.poll_attempts),
            config,
        }
    }

    /// Resolve playable streams for a content id.
    pub async fn resolve_streams(
        &self,
        content_type: ContentType,
        content_id: &str,
    ) -> StreamList {
        metrics::STREAM_REQUESTS
            .with_label_values(&[content_type.as_str()])
            .inc();

        let episode = episode::extract_season_episode(content_id);

        let Some(meta) = self.metadata.resolve(content_type, content_id).await else {
            debug!(content_id, "No metadata for title, returning empty list");
            return StreamList::default();
        };

        let candidates = self.candidates.fetch(content_type, content_id).await;
        if candidates.is_empty() {
            info!(content_id, title = %meta.name, "No candidates found");
            return StreamList::default();
        }

        let ordered = match episode {
            Some(se) => select_episode_candidates(candidates, se),
            None => candidates,
        };

        let mut shortlist = ordered;
        shortlist.truncate(self.config.availability_check_limit);
        let mut shortlist = self.availability.prioritize(shortlist).await;
        shortlist.truncate(self.config.torrent_limit);

        debug!(
            content_id,
            candidates = shortlist.len(),
            max_concurrency = self.config.max_concurrency,
            "Starting batched resolution"
        );

        let scheduler =
            BatchScheduler::new(self.config.max_concurrency, self.config.max_streams);
        let run = scheduler.run(shortlist, |candidate| self.resolve_one(candidate, episode));

        let outcome = match self.config.request_deadline_secs {
            Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), run).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(content_id, deadline_secs = secs, "Request deadline exceeded");
                    BatchOutcome::empty()
                }
            },
            None => run.await,
        };

        // Failures were decided inside the jobs; recording them is the
        // pipeline's job.
        for (title, failure) in &outcome.failures {
            warn!(candidate = %title, error = %failure, "Candidate resolution failed");
        }

        info!(
            content_id,
            attempted = outcome.attempted,
            resolved = outcome.resolved.len(),
            "Stream resolution complete"
        );

        StreamList {
            streams: outcome
                .resolved
                .into_iter()
                .map(|(candidate, stream)| build_stream(candidate, stream))
                .collect(),
        }
    }

    async fn resolve_one(
        &self,
        candidate: TorrentCandidate,
        episode: Option<SeasonEpisode>,
    ) -> Result<(TorrentCandidate, ResolvedStream), (String, ResolveFailure)> {
        let started = Instant::now();
        let result = self.job.resolve(&candidate, episode).await;
        let elapsed = started.elapsed().as_secs_f64();

        match result {
            Ok(stream) => {
                metrics::CANDIDATE_RESOLUTIONS
                    .with_label_values(&["resolved"])
                    .inc();
                metrics::RESOLUTION_DURATION
                    .with_label_values(&["resolved"])
                    .observe(elapsed);
                Ok((candidate, stream))
            }
            Err(failure) => {
                metrics::CANDIDATE_RESOLUTIONS
                    .with_label_values(&["failed"])
                    .inc();
                metrics::RESOLUTION_DURATION
                    .with_label_values(&["failed"])
                    .observe(elapsed);
                Err((candidate.title, failure))
            }
        }
    }
}

/// Order candidates for an episode request: title-matching candidates by
/// descending score, then up to three non-matching fallbacks in their
/// original order.
fn select_episode_candidates(
    candidates: Vec<TorrentCandidate>,
    se: SeasonEpisode,
) -> Vec<TorrentCandidate> {
    let scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| ScoredCandidate {
            match_score: episode::episode_match_score(&candidate.title, se),
            matches: episode::matches_episode(&candidate.title, se),
            candidate,
        })
        .collect();

    let (mut matching, non_matching): (Vec<_>, Vec<_>) =
        scored.into_iter().partition(|s| s.matches);

    // Stable sort keeps input order between equal scores.
    matching.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    matching.extend(non_matching.into_iter().take(MAX_FALLBACK_CANDIDATES));

    matching.into_iter().map(|s| s.candidate).collect()
}

fn build_stream(candidate: TorrentCandidate, stream: ResolvedStream) -> Stream {
    let name = match &candidate.quality {
        Some(quality) => format!("Presto\n{}", quality),
        None => "Presto".to_string(),
    };
    let title = match &candidate.size_label {
        Some(size) => format!("{}\n{}", stream.title, size),
        None => stream.title,
    };

    Stream {
        name,
        title,
        url: stream.url,
        behavior_hints: Some(BehaviorHints {
            binge_group: Some(format!("presto-{}", candidate.info_hash)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn se(season: u32, episode: u32) -> SeasonEpisode {
        SeasonEpisode { season, episode }
    }

    fn titles(candidates: &[TorrentCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_matching_candidates_sorted_by_score() {
        let candidates = vec![
            fixtures::candidate("Show E03 rip", "01"),
            fixtures::candidate("Show S06E03 1080p", "02"),
            fixtures::candidate("Show 6x03 720p", "03"),
        ];

        let ordered = select_episode_candidates(candidates, se(6, 3));
        assert_eq!(
            titles(&ordered),
            vec!["Show S06E03 1080p", "Show 6x03 720p", "Show E03 rip"]
        );
    }

    #[test]
    fn test_fallback_capped_at_three() {
        let candidates = vec![
            fixtures::candidate("No tag 1", "01"),
            fixtures::candidate("No tag 2", "02"),
            fixtures::candidate("Show S06E03", "03"),
            fixtures::candidate("No tag 3", "04"),
            fixtures::candidate("No tag 4", "05"),
        ];

        let ordered = select_episode_candidates(candidates, se(6, 3));
        assert_eq!(ordered.len(), 4, "1 matching + 3 fallbacks");
        assert_eq!(ordered[0].title, "Show S06E03");
        assert_eq!(
            titles(&ordered)[1..],
            ["No tag 1", "No tag 2", "No tag 3"]
        );
    }

    #[test]
    fn test_no_matching_candidates_keeps_fallbacks_only() {
        let candidates = vec![
            fixtures::candidate("Movie pack", "01"),
            fixtures::candidate("Other release", "02"),
        ];

        let ordered = select_episode_candidates(candidates, se(6, 3));
        assert_eq!(ordered.len(), 2);
        assert_eq!(titles(&ordered), vec!["Movie pack", "Other release"]);
    }

    #[test]
    fn test_build_stream_labels() {
        let candidate = fixtures::labeled_candidate("Show S06E03", "aa", "1080p");
        let stream = ResolvedStream {
            url: "https://debrid.test/direct".to_string(),
            title: "Show S06E03".to_string(),
        };

        let built = build_stream(candidate, stream);
        assert_eq!(built.name, "Presto\n1080p");
        assert_eq!(built.title, "Show S06E03\n1.4 GB");
        assert!(built
            .behavior_hints
            .unwrap()
            .binge_group
            .unwrap()
            .starts_with("presto-"));
    }

    #[test]
    fn test_build_stream_without_labels() {
        let candidate = fixtures::candidate("Movie", "bb");
        let stream = ResolvedStream {
            url: "https://debrid.test/direct".to_string(),
            title: "Movie".to_string(),
        };

        let built = build_stream(candidate, stream);
        assert_eq!(built.name, "Presto");
        assert_eq!(built.title, "Movie");
    }
}
