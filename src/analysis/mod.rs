//! Orchestrator: keyword flow and video flow
//!
//! The [`Analyzer`] gathers signals from the providers (concurrently where the
//! calls are independent), falls back to documented defaults when a provider
//! fails, runs the scoring engine and caches keyword reports.

pub mod keyword;
pub mod video;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, FileCache, MemoryCache};
use crate::config::{AnalysisConfig, Config};
use crate::error::{AnalysisError, ProviderOutcome, Result};
use crate::llm::{fallback_ideas, ContentAdvisor, DisabledAdvisor, LLMAdvisor, VideoIdea};
use crate::providers::{
    ChannelDetails, GoogleTrends, KeywordVolume, NaverSearchAd, SearchOrder, SearchPage,
    SearchVolumeProvider, SupaData, TranscriptProvider, TrendFeed, TrendItem, VideoDetails,
    VideoProvider, YouTubeClient, TREND_MONTHS,
};
use crate::scoring::{
    analyze_market, analyze_script, calculate_viral_velocity, diagnose_video, estimate_revenue,
    KeywordSignals,
};
use crate::synthetic::synthetic_report;

pub use keyword::{DataSource, KeywordReport, SearchVolumeSplit, TopVideo};
pub use video::{
    extract_keyword_from_title, extract_video_id, map_category, KeywordSource, TrendSnapshot,
    VideoDiagnostics, VideoSummary, PLACEHOLDER_TRANSCRIPT,
};

/// Search volume assumed in the video flow when the provider has none
const DEFAULT_VIDEO_SEARCH_VOLUME: u64 = 5_000;
const DEFAULT_TOP_AVERAGE_VIEWS: f64 = 10_000.0;
const DEFAULT_SMALL_CHANNEL_RATIO: f64 = 0.3;

/// The external services the analyzer talks to
#[derive(Clone)]
pub struct Providers {
    pub search_volume: Arc<dyn SearchVolumeProvider>,
    pub videos: Arc<dyn VideoProvider>,
    pub transcripts: Arc<dyn TranscriptProvider>,
    pub advisor: Arc<dyn ContentAdvisor>,
    pub trends: Arc<dyn TrendFeed>,
}

impl Providers {
    /// Real HTTP clients; services without credentials stay disabled
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let advisor: Arc<dyn ContentAdvisor> = match LLMAdvisor::from_config(&config.llm) {
            Ok(advisor) => Arc::new(advisor),
            Err(e) => {
                info!("🤖 Content advisor disabled: {}", e);
                Arc::new(DisabledAdvisor)
            }
        };

        Ok(Self {
            search_volume: Arc::new(NaverSearchAd::new(&config.search_volume)?),
            videos: Arc::new(YouTubeClient::new(&config.youtube)?),
            transcripts: Arc::new(SupaData::new(&config.transcript)?),
            advisor,
            trends: Arc::new(GoogleTrends::new()?),
        })
    }
}

/// Live channel and view aggregates for a ranked list of videos
struct RankedVideos {
    details: Vec<VideoDetails>,
    subscribers: HashMap<String, u64>,
}

impl RankedVideos {
    fn views(&self) -> Vec<u64> {
        self.details.iter().map(|v| v.view_count).collect()
    }

    fn subscriber_list(&self) -> Vec<Option<u64>> {
        self.details
            .iter()
            .map(|v| self.subscribers.get(&v.channel_id).copied())
            .collect()
    }

    fn top_videos(&self, limit: usize) -> Vec<TopVideo> {
        self.details
            .iter()
            .take(limit)
            .map(|v| TopVideo {
                id: v.id.clone(),
                title: v.title.clone(),
                thumbnail: v.thumbnail_url.clone(),
                channel_name: v.channel_title.clone(),
                views: v.view_count,
                published_at: v.published_at.clone(),
                subscriber_count: self.subscribers.get(&v.channel_id).copied().unwrap_or(0),
            })
            .collect()
    }
}

pub struct Analyzer {
    providers: Providers,
    cache: Arc<dyn CacheStore>,
    settings: AnalysisConfig,
}

impl Analyzer {
    pub fn new(providers: Providers, cache: Arc<dyn CacheStore>, settings: AnalysisConfig) -> Self {
        Self {
            providers,
            cache,
            settings,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache: Arc<dyn CacheStore> = if config.cache.enabled {
            Arc::new(FileCache::new(config.cache.path(), config.cache.ttl_hours))
        } else {
            Arc::new(MemoryCache::new(config.cache.ttl_hours))
        };

        Ok(Self::new(
            Providers::from_config(config)?,
            cache,
            config.analysis.clone(),
        ))
    }

    async fn cached_report(&self, keyword: &str) -> Option<KeywordReport> {
        let payload = self.cache.get(keyword).await?;
        match serde_json::from_value(payload) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Ignoring unreadable cache entry for '{}': {}", keyword, e);
                None
            }
        }
    }

    /// Fetch details for the given videos, then their channels in one batch
    async fn rank_videos(&self, video_ids: &[String]) -> RankedVideos {
        let lookups = join_all(video_ids.iter().map(|id| self.providers.videos.video_details(id))).await;

        let details: Vec<VideoDetails> = lookups
            .into_iter()
            .filter_map(|outcome| match outcome {
                ProviderOutcome::Found(details) => Some(details),
                ProviderOutcome::NotFound => None,
                ProviderOutcome::Failed(e) => {
                    warn!("⚠️ Video details unavailable: {}", e);
                    None
                }
            })
            .collect();

        let channel_ids: Vec<String> = details.iter().map(|v| v.channel_id.clone()).collect();
        let channels: Vec<ChannelDetails> = if channel_ids.is_empty() {
            Vec::new()
        } else {
            self.providers
                .videos
                .channel_details(&channel_ids)
                .await
                .or_default_logged("channel details", Vec::new())
        };

        RankedVideos {
            details,
            subscribers: channels
                .into_iter()
                .map(|c| (c.id, c.subscriber_count))
                .collect(),
        }
    }

    /// Keyword flow: demand, supply and performance signals scored into a
    /// [`KeywordReport`], served from the cache when fresh
    pub async fn analyze_keyword(&self, keyword: &str) -> Result<KeywordReport> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AnalysisError::EmptyKeyword);
        }

        if let Some(report) = self.cached_report(keyword).await {
            return Ok(report);
        }

        info!("🔍 Analyzing keyword: {}", keyword);
        let now = Utc::now();
        let limit = self.settings.search_limit;

        let (volume, supply) = tokio::join!(
            self.providers.search_volume.keyword_volume(keyword),
            self.providers.videos.search_videos(keyword, limit, SearchOrder::Relevance),
        );

        if !volume.is_found() && !supply.is_found() {
            warn!("⚠️ No live data for '{}', using synthetic report", keyword);
            return Ok(synthetic_report(keyword, now));
        }

        let volume: Option<KeywordVolume> = volume.map(Some).or_default_logged("search volume", None);
        let supply: SearchPage = supply.or_default_logged("video search", SearchPage::default());

        let search_volume = volume
            .as_ref()
            .map(|v| v.total)
            .unwrap_or(supply.total_results * 10);

        let top_hits = self
            .providers
            .videos
            .search_videos(keyword, limit, SearchOrder::ViewCount)
            .await
            .or_default_logged("top video search", SearchPage::default());
        let top_ids: Vec<String> = top_hits
            .results
            .iter()
            .take(self.settings.top_video_count)
            .map(|r| r.video_id.clone())
            .collect();
        let ranked = self.rank_videos(&top_ids).await;

        let (trend, last_7_days, recent_count) = tokio::join!(
            self.providers.videos.monthly_trend(keyword, now),
            self.providers.videos.last_7_days(keyword, now),
            self.providers.videos.video_count(
                keyword,
                now - Duration::days(self.settings.recent_window_days),
                now
            ),
        );

        let signals = KeywordSignals {
            monthly_search_volume: search_volume,
            competitor_video_count_30d: recent_count
                .or_default_logged("recent upload count", supply.total_results),
            top_video_average_views: keyword::average_views(&ranked.views()),
            small_channel_ratio: keyword::small_channel_ratio(&ranked.subscriber_list()),
        };
        let market = analyze_market(&signals);

        let (pc, mobile, related) = match volume {
            Some(v) => (v.pc, v.mobile, v.related),
            None => (0, 0, Vec::new()),
        };

        let report = KeywordReport {
            keyword: keyword.to_string(),
            source: DataSource::Live,
            signals,
            market,
            search_volume: SearchVolumeSplit {
                total: search_volume,
                pc,
                mobile,
            },
            total_video_count: supply.total_results,
            monthly_trend: trend
                .or_default_logged("monthly trend", [0; TREND_MONTHS])
                .to_vec(),
            last_7_days: last_7_days.or_default_logged("daily uploads", Vec::new()),
            top_videos: ranked.top_videos(self.settings.top_video_count),
            related_keywords: related
                .into_iter()
                .take(keyword::MAX_RELATED_KEYWORDS)
                .collect(),
            generated_at: now,
        };

        match serde_json::to_value(&report) {
            Ok(payload) => self.cache.set(keyword, payload).await,
            Err(e) => warn!("Failed to serialize report for '{}': {}", keyword, e),
        }

        info!(
            "✅ Keyword '{}' analyzed: opportunity {}, saturation {:.2}",
            keyword, report.market.opportunity_score, report.market.saturation_index
        );
        Ok(report)
    }

    /// Video flow: metadata, transcript and keyword market scored into
    /// [`VideoDiagnostics`]. Only an unresolvable video id is fatal.
    pub async fn analyze_video(&self, url: &str) -> Result<VideoDiagnostics> {
        let video_id = extract_video_id(url).ok_or_else(|| AnalysisError::InvalidUrl(url.to_string()))?;
        info!("🎬 Diagnosing video: {}", video_id);
        self.diagnose(&video_id, Utc::now()).await
    }

    async fn diagnose(&self, video_id: &str, now: DateTime<Utc>) -> Result<VideoDiagnostics> {
        let (metadata, transcript) = tokio::join!(
            self.providers.videos.video_details(video_id),
            self.providers.transcripts.transcript(video_id),
        );

        let (details, placeholder_metadata) = match metadata {
            ProviderOutcome::Found(details) => (details, false),
            ProviderOutcome::NotFound => return Err(AnalysisError::VideoNotFound(video_id.to_string())),
            ProviderOutcome::Failed(e) => {
                warn!("⚠️ Video metadata unavailable ({}), using placeholder", e);
                (video::placeholder_details(video_id), true)
            }
        };

        let (transcript, placeholder_transcript) = match transcript {
            ProviderOutcome::Found(text) => (text, false),
            other => {
                let text = other
                    .map(Some)
                    .or_default_logged("transcript", None)
                    .unwrap_or_else(|| PLACEHOLDER_TRANSCRIPT.to_string());
                (text, true)
            }
        };

        let (keyword, keyword_source) = match self
            .providers
            .advisor
            .extract_keyword(&details.title, &transcript)
            .await
        {
            ProviderOutcome::Found(keyword) => (keyword, KeywordSource::Llm),
            other => {
                if let ProviderOutcome::Failed(e) = other {
                    debug!("Keyword extraction fell back to title heuristic: {}", e);
                }
                (extract_keyword_from_title(&details.title), KeywordSource::Heuristic)
            }
        };
        info!("🔑 Keyword for {}: {} ({:?})", video_id, keyword, keyword_source);

        let (volume, recent_count, supply) = tokio::join!(
            self.providers.search_volume.keyword_volume(&keyword),
            self.providers.videos.video_count(
                &keyword,
                now - Duration::days(self.settings.recent_window_days),
                now
            ),
            self.providers
                .videos
                .search_videos(&keyword, self.settings.search_limit, SearchOrder::Relevance),
        );

        let volume: Option<KeywordVolume> = volume.map(Some).or_default_logged("search volume", None);
        let recent_count = recent_count.or_default_logged("recent upload count", 0);
        let supply = supply.or_default_logged("video search", SearchPage::default());

        let ids: Vec<String> = supply.results.iter().map(|r| r.video_id.clone()).collect();
        let ranked = self.rank_videos(&ids).await;
        let (average_views, small_ratio) = if ranked.details.is_empty() {
            (DEFAULT_TOP_AVERAGE_VIEWS, DEFAULT_SMALL_CHANNEL_RATIO)
        } else {
            (
                keyword::average_views(&ranked.views()),
                keyword::small_channel_ratio(&ranked.subscriber_list()),
            )
        };

        let search_volume = volume.as_ref().map_or(DEFAULT_VIDEO_SEARCH_VOLUME, |v| v.total);
        let signals = KeywordSignals {
            monthly_search_volume: search_volume,
            competitor_video_count_30d: recent_count,
            top_video_average_views: average_views,
            small_channel_ratio: small_ratio,
        };
        let market = analyze_market(&signals);

        let (quality, trend) = tokio::join!(
            self.providers
                .advisor
                .analyze_quality(&details.title, &keyword, &transcript),
            self.providers.videos.monthly_trend(&keyword, now),
        );
        let quality = quality.map(Some).or_default_logged("AI quality review", None);

        let dual_core = diagnose_video(&transcript, &details.title, &keyword, &market, quality.as_ref());

        let summary = VideoSummary::from_details(&details);
        let revenue = estimate_revenue(
            details.view_count,
            &summary.category,
            details.duration_minutes,
            Some(details.published_at.as_str()),
        );

        let hours_since_upload = DateTime::parse_from_rfc3339(&details.published_at)
            .map(|published| (now - published.with_timezone(&Utc)).num_seconds() as f64 / 3600.0)
            .unwrap_or(0.0);
        let viral_velocity = calculate_viral_velocity(details.view_count, hours_since_upload);

        let trend = TrendSnapshot {
            keyword: keyword.clone(),
            search_volume,
            pc_volume: volume.as_ref().map_or(0, |v| v.pc),
            mobile_volume: volume.as_ref().map_or(0, |v| v.mobile),
            recent_video_count: recent_count,
            monthly_trend: trend
                .or_default_logged("monthly trend", [0; TREND_MONTHS])
                .to_vec(),
            saturation_index: market.saturation_index,
            average_views: average_views.round() as u64,
        };

        info!(
            "✅ Video {} diagnosed: {} ({}/100)",
            video_id, dual_core.matrix_label, dual_core.total_score
        );

        Ok(VideoDiagnostics {
            video: summary,
            script_analysis: analyze_script(&transcript),
            transcript,
            placeholder_metadata,
            placeholder_transcript,
            keyword,
            keyword_source,
            trend,
            market,
            dual_core,
            revenue,
            viral_velocity,
            top_videos: ranked.top_videos(self.settings.reference_video_count),
        })
    }

    /// Three video ideas for a keyword; template ideas when the advisor fails
    pub async fn generate_ideas(
        &self,
        keyword: &str,
        related_keywords: &[String],
        top_video_titles: &[String],
    ) -> Vec<VideoIdea> {
        match self
            .providers
            .advisor
            .generate_ideas(keyword, related_keywords, top_video_titles)
            .await
        {
            ProviderOutcome::Found(ideas) => ideas,
            other => {
                if let ProviderOutcome::Failed(e) = other {
                    warn!("⚠️ Idea generation failed ({}), using templates", e);
                }
                fallback_ideas(keyword)
            }
        }
    }

    /// Current trending searches, empty when the feed is unavailable
    pub async fn trending_topics(&self) -> Vec<TrendItem> {
        self.providers
            .trends
            .trending()
            .await
            .or_default_logged("trending topics", Vec::new())
    }
}
