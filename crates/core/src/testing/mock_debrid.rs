//! Mock debrid client for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::debrid::{
    AddedMagnet, DebridClient, DebridError, FileChoice, TorrentFileInfo, TorrentInfo,
    TorrentStatus, UnrestrictedLink,
};

#[derive(Debug, Clone)]
struct MockTorrent {
    info_hash: String,
}

/// Mock implementation of the `DebridClient` trait.
///
/// Provides controllable behavior for testing:
/// - Script which hashes are instantly available
/// - Script per-hash file listings
/// - Make specific hashes fail at submission or never become ready
/// - Record every call for assertions
///
/// By default any submitted magnet becomes a single-file torrent that is
/// immediately `downloaded`, with one link per file.
pub struct MockDebridClient {
    counter: AtomicU64,
    torrents: Arc<RwLock<HashMap<String, MockTorrent>>>,
    files_by_hash: Arc<RwLock<HashMap<String, Vec<TorrentFileInfo>>>>,
    cached: Arc<RwLock<HashSet<String>>>,
    fail_add: Arc<RwLock<HashSet<String>>>,
    never_ready: Arc<RwLock<HashSet<String>>>,
    next_error: Arc<RwLock<Option<DebridError>>>,
    selections: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl Default for MockDebridClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDebridClient {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            torrents: Arc::new(RwLock::new(HashMap::new())),
            files_by_hash: Arc::new(RwLock::new(HashMap::new())),
            cached: Arc::new(RwLock::new(HashSet::new())),
            fail_add: Arc::new(RwLock::new(HashSet::new())),
            never_ready: Arc::new(RwLock::new(HashSet::new())),
            next_error: Arc::new(RwLock::new(None)),
            selections: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Mark hashes as instantly available.
    pub async fn set_cached<S: AsRef<str>>(&self, hashes: &[S]) {
        let mut cached = self.cached.write().await;
        for hash in hashes {
            cached.insert(hash.as_ref().to_lowercase());
        }
    }

    /// Script the file listing for a hash.
    pub async fn set_files(&self, info_hash: &str, files: Vec<TorrentFileInfo>) {
        self.files_by_hash
            .write()
            .await
            .insert(info_hash.to_lowercase(), files);
    }

    /// Make submissions of this hash fail.
    pub async fn set_fail_add(&self, info_hash: &str) {
        self.fail_add.write().await.insert(info_hash.to_lowercase());
    }

    /// Make this hash stay `downloading` forever.
    pub async fn set_never_ready(&self, info_hash: &str) {
        self.never_ready
            .write()
            .await
            .insert(info_hash.to_lowercase());
    }

    /// Configure the next availability check to fail with the given error.
    pub async fn set_next_error(&self, error: DebridError) {
        *self.next_error.write().await = Some(error);
    }

    /// The file selection recorded for a hash, if any ("all" or a file id).
    pub async fn selection_for(&self, info_hash: &str) -> Option<String> {
        self.selections
            .read()
            .await
            .get(&info_hash.to_lowercase())
            .cloned()
    }

    /// All recorded calls, as "operation:detail" strings.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    /// Number of recorded calls for one operation.
    pub async fn call_count(&self, operation: &str) -> usize {
        let prefix = format!("{}:", operation);
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .count()
    }

    async fn record(&self, call: String) {
        self.calls.write().await.push(call);
    }

    fn hash_from_magnet(magnet: &str) -> String {
        magnet
            .split("btih:")
            .nth(1)
            .map(|rest| rest.chars().take(40).collect::<String>())
            .unwrap_or_default()
            .to_lowercase()
    }

    async fn files_for(&self, info_hash: &str) -> Vec<TorrentFileInfo> {
        self.files_by_hash
            .read()
            .await
            .get(info_hash)
            .cloned()
            .unwrap_or_else(|| {
                vec![TorrentFileInfo {
                    id: 1,
                    path: format!("{}.mkv", info_hash),
                    bytes: 700 * 1024 * 1024,
                }]
            })
    }
}

#[async_trait]
impl DebridClient for MockDebridClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn add_magnet(&self, magnet: &str) -> Result<AddedMagnet, DebridError> {
        let info_hash = Self::hash_from_magnet(magnet);
        self.record(format!("add_magnet:{}", info_hash)).await;

        if self.fail_add.read().await.contains(&info_hash) {
            return Err(DebridError::ApiError {
                status: 503,
                message: "infringing_file".to_string(),
            });
        }

        let id = format!("mock-{}", self.counter.fetch_add(1, Ordering::Relaxed));
        self.torrents
            .write()
            .await
            .insert(id.clone(), MockTorrent { info_hash });
        Ok(AddedMagnet { id })
    }

    async fn torrent_info(&self, torrent_id: &str) -> Result<TorrentInfo, DebridError> {
        self.record(format!("torrent_info:{}", torrent_id)).await;

        let torrent = self
            .torrents
            .read()
            .await
            .get(torrent_id)
            .cloned()
            .ok_or_else(|| DebridError::ApiError {
                status: 404,
                message: "unknown torrent".to_string(),
            })?;

        let files = self.files_for(&torrent.info_hash).await;
        let ready = !self.never_ready.read().await.contains(&torrent.info_hash);

        let (status, links) = if ready {
            let links = files
                .iter()
                .map(|f| format!("https://debrid.test/{}/{}", torrent.info_hash, f.id))
                .collect();
            (TorrentStatus::Downloaded, links)
        } else {
            (TorrentStatus::Downloading, Vec::new())
        };

        Ok(TorrentInfo {
            status,
            filename: Some(format!("{}.mkv", torrent.info_hash)),
            files,
            links,
        })
    }

    async fn select_files(
        &self,
        torrent_id: &str,
        choice: &FileChoice,
    ) -> Result<(), DebridError> {
        self.record(format!("select_files:{}:{}", torrent_id, choice.as_param()))
            .await;

        let torrents = self.torrents.read().await;
        let torrent = torrents.get(torrent_id).ok_or_else(|| DebridError::ApiError {
            status: 404,
            message: "unknown torrent".to_string(),
        })?;

        self.selections
            .write()
            .await
            .insert(torrent.info_hash.clone(), choice.as_param());
        Ok(())
    }

    async fn unrestrict_link(&self, link: &str) -> Result<UnrestrictedLink, DebridError> {
        self.record(format!("unrestrict:{}", link)).await;
        Ok(UnrestrictedLink {
            download: format!("{}/direct", link),
            filename: None,
        })
    }

    async fn instant_availability(
        &self,
        hashes: &[String],
    ) -> Result<HashSet<String>, DebridError> {
        self.record(format!("instant_availability:{}", hashes.len()))
            .await;

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let cached = self.cached.read().await;
        Ok(hashes
            .iter()
            .filter(|h| cached.contains(&h.to_lowercase()))
            .cloned()
            .collect())
    }
}
