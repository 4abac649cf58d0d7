//! Cached metadata resolution.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::content::ContentType;
use crate::episode;

use super::types::{CatalogError, CatalogSource, Metadata};

/// Resolves a content id to title metadata, caching by base id.
///
/// Every episode of a show shares one cache entry: the season/episode
/// suffix is stripped before the id is used as a cache or lookup key.
/// A missing title is not an error here; it short-circuits the request
/// to zero streams upstream.
pub struct MetadataResolver {
    source: Arc<dyn CatalogSource>,
    cache: Arc<CacheStore>,
}

impl MetadataResolver {
    pub fn new(source: Arc<dyn CatalogSource>, cache: Arc<CacheStore>) -> Self {
        Self { source, cache }
    }

    /// Resolve metadata for a content id, episode suffix included or not.
    ///
    /// Returns `None` on any catalog failure; never retries and never
    /// propagates an error.
    pub async fn resolve(&self, content_type: ContentType, content_id: &str) -> Option<Metadata> {
        let base = episode::base_id(content_id);
        let key = format!("meta_{}_{}", content_type.as_str(), base);

        if let Some(meta) = self.cache.metadata().get(&key).await {
            return Some(meta);
        }

        match self.source.meta(content_type, base).await {
            Ok(meta) => {
                self.cache.metadata().insert(&key, meta.clone()).await;
                Some(meta)
            }
            Err(CatalogError::NotFound(id)) => {
                debug!(source = self.source.name(), id = %id, "Title not found in catalog");
                None
            }
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "Catalog lookup failed");
                None
            }
        }
    }
}
