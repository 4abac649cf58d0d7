use std::sync::Arc;

use presto_core::{CacheStore, Config, SanitizedConfig, StreamResolver};

/// Shared application state
pub struct AppState {
    config: Config,
    resolver: Arc<StreamResolver>,
    cache: Arc<CacheStore>,
}

impl AppState {
    pub fn new(config: Config, resolver: Arc<StreamResolver>, cache: Arc<CacheStore>) -> Self {
        Self {
            config,
            resolver,
            cache,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn resolver(&self) -> &StreamResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }
}
