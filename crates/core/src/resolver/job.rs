//! Per-candidate resolution against the debrid provider.

use std::sync::Arc;

use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::cache::CacheStore;
use crate::debrid::{DebridClient, FileChoice, TorrentInfo, TorrentStatus};
use crate::episode::{self, SeasonEpisode};
use crate::searcher::TorrentCandidate;

use super::types::{ResolveFailure, ResolvedStream};

// Adaptive poll waits: instantly-cached torrents flip to ready within the
// first attempt or two, slower ones get a longer interval.
const FAST_POLL_ATTEMPTS: u32 = 2;
const FAST_POLL_WAIT: Duration = Duration::from_millis(500);
const SLOW_POLL_WAIT: Duration = Duration::from_millis(1000);

/// Runs one candidate through the provider protocol:
/// submit -> inspect -> select -> poll-ready -> materialize -> cache.
///
/// Each failure is isolated to its candidate and returned as a typed
/// `ResolveFailure`; the caller decides how to record it.
pub struct CandidateResolver {
    debrid: Arc<dyn DebridClient>,
    cache: Arc<CacheStore>,
    poll_attempts: u32,
}

impl CandidateResolver {
    pub fn new(debrid: Arc<dyn DebridClient>, cache: Arc<CacheStore>, poll_attempts: u32) -> Self {
        Self {
            debrid,
            cache,
            poll_attempts: poll_attempts.max(1),
        }
    }

    /// Resolve one candidate into a playable stream.
    pub async fn resolve(
        &self,
        candidate: &TorrentCandidate,
        episode: Option<SeasonEpisode>,
    ) -> Result<ResolvedStream, ResolveFailure> {
        // Series keys ignore the file index, so a cached episode is found
        // before any provider call regardless of how it was selected.
        let preflight_key = stream_cache_key(&candidate.info_hash, episode.as_ref(), 0);
        if let Some(hit) = self.cache.streams().get(&preflight_key).await {
            debug!(info_hash = %candidate.info_hash, "Stream cache hit");
            return Ok(hit);
        }

        let added = self
            .debrid
            .add_magnet(&candidate.magnet)
            .await
            .map_err(ResolveFailure::Submit)?;

        let info = self
            .debrid
            .torrent_info(&added.id)
            .await
            .map_err(ResolveFailure::Inspect)?;

        let (choice, selected_index) = select_file(&info, episode.as_ref());
        self.debrid
            .select_files(&added.id, &choice)
            .await
            .map_err(ResolveFailure::FileSelection)?;

        let info = self.poll_ready(&added.id).await?;

        // The provider's link array can skew against the file listing;
        // fall back to the first link rather than failing the candidate.
        let link = info
            .links
            .get(selected_index)
            .or_else(|| info.links.first())
            .ok_or(ResolveFailure::NoLink)?;

        let unrestricted = self
            .debrid
            .unrestrict_link(link)
            .await
            .map_err(ResolveFailure::Unrestrict)?;

        let stream = ResolvedStream {
            url: unrestricted.download,
            title: candidate.title.clone(),
        };

        let key = stream_cache_key(&candidate.info_hash, episode.as_ref(), selected_index);
        self.cache.streams().insert(&key, stream.clone()).await;

        Ok(stream)
    }

    /// Re-fetch torrent info until a ready status or the attempt budget
    /// runs out.
    async fn poll_ready(&self, torrent_id: &str) -> Result<TorrentInfo, ResolveFailure> {
        let mut last_status = TorrentStatus::Unknown;

        for attempt in 0..self.poll_attempts {
            let info = self
                .debrid
                .torrent_info(torrent_id)
                .await
                .map_err(ResolveFailure::Inspect)?;

            if info.status.is_ready() {
                return Ok(info);
            }
            last_status = info.status;

            if attempt + 1 < self.poll_attempts {
                let wait = if attempt < FAST_POLL_ATTEMPTS {
                    FAST_POLL_WAIT
                } else {
                    SLOW_POLL_WAIT
                };
                sleep(wait).await;
            }
        }

        Err(ResolveFailure::NeverReady {
            status: last_status,
            attempts: self.poll_attempts,
        })
    }
}

/// Pick the file to download and its position in the listing.
///
/// Episode context with a multi-file torrent narrows to one file;
/// everything else selects all files and materializes the first link.
fn select_file(info: &TorrentInfo, episode: Option<&SeasonEpisode>) -> (FileChoice, usize) {
    match episode {
        Some(se) if info.files.len() > 1 => {
            let paths: Vec<&str> = info.files.iter().map(|f| f.path.as_str()).collect();
            let index = episode::find_matching_file(&paths, Some(*se));
            (FileChoice::Single(info.files[index].id), index)
        }
        _ => (FileChoice::All, 0),
    }
}

/// Cache key for a resolved stream.
///
/// Series entries key on the episode pair rather than the file index, so
/// re-requests hit cache even when the selected index differs across
/// requests; movies key on the materialized link index.
fn stream_cache_key(info_hash: &str, episode: Option<&SeasonEpisode>, file_index: usize) -> String {
    match episode {
        Some(se) => format!("stream_{}_s{}e{}", info_hash, se.season, se.episode),
        None => format!("stream_{}_f{}", info_hash, file_index),
    }
}
