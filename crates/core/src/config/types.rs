use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub searcher: SearcherConfig,
    pub debrid: DebridConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    7070
}

/// Catalog service (metadata lookup) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Base URL (default: https://v3-cinemeta.strem.io)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_lookup_timeout(),
        }
    }
}

/// Release aggregator (torrent search) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearcherConfig {
    /// Base URL (default: https://torrentio.strem.fun)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u32,
}

impl Default for SearcherConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_lookup_timeout(),
        }
    }
}

fn default_lookup_timeout() -> u32 {
    10
}

/// Debrid provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DebridConfig {
    /// Bearer token for the debrid API (required).
    pub api_token: String,
    /// Base URL (default: https://api.real-debrid.com/rest/1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_debrid_timeout")]
    pub timeout_secs: u32,
}

fn default_debrid_timeout() -> u32 {
    30
}

/// Resolution pipeline limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Max candidates handed to the batch scheduler (default: 15).
    #[serde(default = "default_torrent_limit")]
    pub torrent_limit: usize,
    /// Max candidates included in the bulk availability check (default: 30).
    #[serde(default = "default_availability_check_limit")]
    pub availability_check_limit: usize,
    /// Stop scheduling batches once this many streams resolved (default: 5).
    #[serde(default = "default_max_streams")]
    pub max_streams: usize,
    /// Candidates resolved concurrently per batch (default: 5).
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Poll attempts waiting for a torrent to become ready (default: 10).
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
    /// Optional wall-clock cap on the resolution phase. Unset by default;
    /// every stage already carries its own timeout or attempt budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_deadline_secs: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            torrent_limit: default_torrent_limit(),
            availability_check_limit: default_availability_check_limit(),
            max_streams: default_max_streams(),
            max_concurrency: default_max_concurrency(),
            poll_attempts: default_poll_attempts(),
            request_deadline_secs: None,
        }
    }
}

fn default_torrent_limit() -> usize {
    15
}

fn default_availability_check_limit() -> usize {
    30
}

fn default_max_streams() -> usize {
    5
}

fn default_max_concurrency() -> usize {
    5
}

fn default_poll_attempts() -> u32 {
    10
}

/// Cache TTLs, one per tier
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Metadata cache TTL in seconds (default: 24h).
    #[serde(default = "default_metadata_ttl")]
    pub metadata_ttl_secs: u64,
    /// Search result cache TTL in seconds (default: 6h).
    #[serde(default = "default_search_ttl")]
    pub search_ttl_secs: u64,
    /// Resolved stream cache TTL in seconds (default: 30m).
    #[serde(default = "default_stream_ttl")]
    pub stream_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            metadata_ttl_secs: default_metadata_ttl(),
            search_ttl_secs: default_search_ttl(),
            stream_ttl_secs: default_stream_ttl(),
        }
    }
}

fn default_metadata_ttl() -> u64 {
    24 * 60 * 60
}

fn default_search_ttl() -> u64 {
    6 * 60 * 60
}

fn default_stream_ttl() -> u64 {
    30 * 60
}

/// Sanitized config for API responses (debrid token redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub searcher: SearcherConfig,
    pub debrid: SanitizedDebridConfig,
    pub resolver: ResolverConfig,
    pub cache: CacheConfig,
}

/// Sanitized debrid config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDebridConfig {
    pub api_token_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            catalog: config.catalog.clone(),
            searcher: config.searcher.clone(),
            debrid: SanitizedDebridConfig {
                api_token_configured: !config.debrid.api_token.is_empty(),
                base_url: config.debrid.base_url.clone(),
                timeout_secs: config.debrid.timeout_secs,
            },
            resolver: config.resolver.clone(),
            cache: config.cache.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[debrid]
api_token = "secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.debrid.api_token, "secret");
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.resolver.torrent_limit, 15);
        assert_eq!(config.resolver.max_concurrency, 5);
        assert_eq!(config.cache.metadata_ttl_secs, 24 * 60 * 60);
        assert!(config.resolver.request_deadline_secs.is_none());
    }

    #[test]
    fn test_deserialize_missing_debrid_fails() {
        let toml = r#"
[server]
port = 7070
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_overrides() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[debrid]
api_token = "secret"
timeout_secs = 15

[resolver]
torrent_limit = 8
max_streams = 3
request_deadline_secs = 45

[cache]
stream_ttl_secs = 60
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.debrid.timeout_secs, 15);
        assert_eq!(config.resolver.torrent_limit, 8);
        assert_eq!(config.resolver.max_streams, 3);
        assert_eq!(config.resolver.request_deadline_secs, Some(45));
        assert_eq!(config.cache.stream_ttl_secs, 60);
        // Untouched sections keep defaults.
        assert_eq!(config.cache.search_ttl_secs, 6 * 60 * 60);
    }

    #[test]
    fn test_sanitized_config_redacts_token() {
        let toml = r#"
[debrid]
api_token = "very-secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);

        assert!(sanitized.debrid.api_token_configured);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("very-secret"));
    }
}
