use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::llm::LLMProvider;

/// Configuration for the ViewScout analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// YouTube Data API settings
    pub youtube: YouTubeConfig,

    /// Search-volume (Naver Search Ad) settings
    pub search_volume: SearchVolumeConfig,

    /// Transcript provider settings
    pub transcript: TranscriptConfig,

    /// LLM content advisor settings
    pub llm: LLMConfig,

    /// Keyword cache settings
    pub cache: CacheConfig,

    /// Analysis tuning
    pub analysis: AnalysisConfig,

    /// HTTP API settings
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// API key (provider is disabled when absent)
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchVolumeConfig {
    /// Access license key
    pub access_key: Option<String>,

    /// Secret key used for request signing
    pub secret_key: Option<String>,

    /// Advertiser customer id
    pub customer_id: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// API key (provider is disabled when absent)
    pub api_key: Option<String>,

    /// Transcript endpoint
    pub endpoint: String,

    /// Preferred transcript language
    pub language: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// LLM configuration for content review, keyword extraction and ideas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM provider to use
    pub provider: LLMProvider,

    /// API endpoint (for LMStudio and custom providers)
    pub endpoint: Option<String>,

    /// API key (for cloud providers)
    pub api_key: Option<String>,

    /// Model used for quality review and idea generation
    pub model: String,

    /// Model used for keyword extraction
    pub keyword_model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for generation
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Persist keyword reports between runs
    pub enabled: bool,

    /// Cache directory
    pub dir: PathBuf,

    /// Cache file inside `dir`
    pub file_name: String,

    /// Entry lifetime in hours
    pub ttl_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Results requested from each video search
    pub search_limit: u32,

    /// Top videos whose details are fetched in the keyword flow
    pub top_video_count: usize,

    /// Reference videos kept in a video diagnosis
    pub reference_video_count: usize,

    /// Days counted as "recent" uploads for saturation
    pub recent_window_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Listen port
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout_seconds: 15,
        }
    }
}

impl Default for SearchVolumeConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            secret_key: None,
            customer_id: None,
            base_url: "https://api.searchad.naver.com".to_string(),
            timeout_seconds: 15,
        }
    }
}

impl SearchVolumeConfig {
    /// All three credentials are required for signed requests
    pub fn has_credentials(&self) -> bool {
        self.access_key.is_some() && self.secret_key.is_some() && self.customer_id.is_some()
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.supadata.ai/v1/youtube/transcript".to_string(),
            language: "ko".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::Gemini,
            endpoint: None,
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            keyword_model: "gemini-2.0-flash".to_string(),
            max_tokens: 4096,
            temperature: 0.4,
            timeout_seconds: 60,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(".cache"),
            file_name: "keyword-data.json".to_string(),
            ttl_hours: 24,
        }
    }
}

impl CacheConfig {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            search_limit: 10,
            top_video_count: 6,
            reference_video_count: 5,
            recent_window_days: 30,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "viewscout=info,warn".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube: YouTubeConfig::default(),
            search_volume: SearchVolumeConfig::default(),
            transcript: TranscriptConfig::default(),
            llm: LLMConfig::default(),
            cache: CacheConfig::default(),
            analysis: AnalysisConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a numeric variable, warning and returning `None` when it is malformed
fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env_string(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("⚠️ Ignoring invalid {}={:?}, keeping the default", name, raw);
            None
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then layer environment variables on top
    pub fn load() -> Result<Self> {
        let config_paths = [
            "viewscout.toml",
            "config/viewscout.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config.apply_env();
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from environment variables (and a `.env` file if present)
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if dotenvy::dotenv().is_ok() {
            tracing::debug!("Loaded variables from .env");
        }

        if let Some(key) = env_string("YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(key);
        }

        if let Some(key) = env_string("NAVER_AD_ACCESS_KEY") {
            self.search_volume.access_key = Some(key);
        }

        if let Some(key) = env_string("NAVER_AD_SECRET_KEY") {
            self.search_volume.secret_key = Some(key);
        }

        if let Some(id) = env_string("NAVER_AD_CUSTOMER_ID") {
            self.search_volume.customer_id = Some(id);
        }

        if let Some(key) = env_string("SUPADATA_API_KEY") {
            self.transcript.api_key = Some(key);
        }

        if let Some(key) = env_string("GEMINI_API_KEY") {
            self.llm.api_key = Some(key);
        }

        if let Some(dir) = env_string("VIEWSCOUT_CACHE_DIR") {
            self.cache.dir = PathBuf::from(dir);
        }

        if let Some(ttl) = env_parsed("VIEWSCOUT_CACHE_TTL_HOURS") {
            self.cache.ttl_hours = ttl;
        }

        if let Some(level) = env_string("VIEWSCOUT_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(port) = env_parsed("VIEWSCOUT_PORT") {
            self.server.port = port;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_hours == 0 {
            return Err(anyhow!("cache.ttl_hours must be greater than 0"));
        }

        if self.analysis.search_limit == 0 || self.analysis.search_limit > 50 {
            return Err(anyhow!("analysis.search_limit must be between 1 and 50"));
        }

        if self.analysis.top_video_count == 0 {
            return Err(anyhow!("analysis.top_video_count must be greater than 0"));
        }

        if self.analysis.recent_window_days <= 0 {
            return Err(anyhow!("analysis.recent_window_days must be positive"));
        }

        if self.llm.provider == LLMProvider::LMStudio && self.llm.endpoint.is_none() {
            return Err(anyhow!("LMStudio provider requires llm.endpoint"));
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        let enabled = |on: bool| if on { "enabled" } else { "disabled" };
        format!(
            "ViewScout Configuration:\n\
            - YouTube: {}\n\
            - Search Volume: {}\n\
            - Transcripts: {}\n\
            - LLM: {:?} ({})\n\
            - Cache: {} ({}, TTL {}h)\n\
            - Top Videos: {}",
            enabled(self.youtube.api_key.is_some()),
            enabled(self.search_volume.has_credentials()),
            enabled(self.transcript.api_key.is_some()),
            self.llm.provider,
            enabled(self.llm.api_key.is_some() || self.llm.endpoint.is_some()),
            enabled(self.cache.enabled),
            self.cache.path().display(),
            self.cache.ttl_hours,
            self.analysis.top_video_count,
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_youtube_key(mut self, api_key: String) -> Self {
        self.config.youtube.api_key = Some(api_key);
        self
    }

    pub fn with_search_volume_credentials(
        mut self,
        access_key: String,
        secret_key: String,
        customer_id: String,
    ) -> Self {
        self.config.search_volume.access_key = Some(access_key);
        self.config.search_volume.secret_key = Some(secret_key);
        self.config.search_volume.customer_id = Some(customer_id);
        self
    }

    pub fn with_transcript_key(mut self, api_key: String) -> Self {
        self.config.transcript.api_key = Some(api_key);
        self
    }

    pub fn with_llm(mut self, provider: LLMProvider, api_key: Option<String>) -> Self {
        self.config.llm.provider = provider;
        self.config.llm.api_key = api_key;
        self
    }

    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.config.cache.dir = dir;
        self
    }

    pub fn with_cache_ttl_hours(mut self, hours: u64) -> Self {
        self.config.cache.ttl_hours = hours;
        self
    }

    pub fn enable_caching(mut self, enable: bool) -> Self {
        self.config.cache.enabled = enable;
        self
    }

    pub fn with_top_video_count(mut self, count: usize) -> Self {
        self.config.analysis.top_video_count = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache.ttl_hours, 24);
        assert_eq!(config.analysis.search_limit, 10);
        assert_eq!(config.cache.path(), PathBuf::from(".cache/keyword-data.json"));
        assert!(config.youtube.api_key.is_none());
        assert!(!config.search_volume.has_credentials());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_youtube_key("yt-key".to_string())
            .with_cache_ttl_hours(6)
            .with_top_video_count(3)
            .enable_caching(false)
            .build();

        assert_eq!(config.youtube.api_key.as_deref(), Some("yt-key"));
        assert_eq!(config.cache.ttl_hours, 6);
        assert_eq!(config.analysis.top_video_count, 3);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let config = ConfigBuilder::new().with_cache_ttl_hours(0).build();
        assert!(config.validate().is_err());

        let config = ConfigBuilder::new()
            .with_llm(LLMProvider::LMStudio, None)
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [youtube]
            api_key = "abc"

            [cache]
            ttl_hours = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.youtube.api_key.as_deref(), Some("abc"));
        assert_eq!(config.youtube.base_url, "https://www.googleapis.com/youtube/v3");
        assert_eq!(config.cache.ttl_hours, 12);
        assert_eq!(config.cache.file_name, "keyword-data.json");
    }

    #[test]
    fn test_invalid_numeric_env_is_ignored() {
        std::env::set_var("VIEWSCOUT_TEST_TTL_OK", " 12 ");
        std::env::set_var("VIEWSCOUT_TEST_PORT_BAD", "eighty");
        assert_eq!(env_parsed::<u64>("VIEWSCOUT_TEST_TTL_OK"), Some(12));
        assert_eq!(env_parsed::<u16>("VIEWSCOUT_TEST_PORT_BAD"), None);
        assert_eq!(env_parsed::<u16>("VIEWSCOUT_TEST_UNSET"), None);
    }

    #[test]
    fn test_save_writes_loadable_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("viewscout.toml");
        let config = ConfigBuilder::new()
            .with_cache_ttl_hours(6)
            .with_top_video_count(3)
            .build();

        config.save(&path).unwrap();
        let loaded: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.cache.ttl_hours, 6);
        assert_eq!(loaded.analysis.top_video_count, 3);
    }
}
