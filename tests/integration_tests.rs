use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use viewscout::analysis::{extract_video_id, DataSource};
use viewscout::config::AnalysisConfig;
use viewscout::llm::DisabledAdvisor;
use viewscout::providers::{
    ChannelDetails, KeywordVolume, SearchOrder, SearchPage, SearchResult, SearchVolumeProvider,
    TranscriptProvider, TrendFeed, TrendItem, VideoDetails, VideoProvider,
};
use viewscout::scoring::{
    analyze_market, classify_matrix, compute_opportunity, compute_saturation, estimate_revenue,
    KeywordSignals, MatrixLabel,
};
use viewscout::{
    AnalysisError, Analyzer, CacheStore, FileCache, ProviderError, ProviderOutcome, Providers,
};

fn unavailable<T>() -> ProviderOutcome<T> {
    ProviderOutcome::Failed(ProviderError::Disabled("offline"))
}

struct CountingVolume {
    calls: AtomicUsize,
}

#[async_trait]
impl SearchVolumeProvider for CountingVolume {
    async fn keyword_volume(&self, _: &str) -> ProviderOutcome<KeywordVolume> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ProviderOutcome::Found(KeywordVolume {
            total: 8_000,
            pc: 2_000,
            mobile: 6_000,
            related: vec!["camping tent".to_string(), "camping chair".to_string()],
        })
    }
}

/// Two ranked videos from a large and a small channel
struct TwoVideos;

#[async_trait]
impl VideoProvider for TwoVideos {
    async fn search_videos(&self, _: &str, _: u32, _: SearchOrder) -> ProviderOutcome<SearchPage> {
        ProviderOutcome::Found(SearchPage {
            results: ["big", "small"]
                .iter()
                .map(|id| SearchResult {
                    video_id: id.to_string(),
                    title: format!("{} video", id),
                    channel_id: format!("{}-channel", id),
                    published_at: "2024-06-01T00:00:00Z".to_string(),
                })
                .collect(),
            total_results: 900,
        })
    }

    async fn video_details(&self, video_id: &str) -> ProviderOutcome<VideoDetails> {
        let views = match video_id {
            "big" => 180_000,
            "small" => 20_000,
            _ => return ProviderOutcome::NotFound,
        };
        ProviderOutcome::Found(VideoDetails {
            id: video_id.to_string(),
            title: format!("{} video", video_id),
            description: String::new(),
            thumbnail_url: String::new(),
            channel_title: format!("{} channel", video_id),
            channel_id: format!("{}-channel", video_id),
            published_at: "2024-06-01T00:00:00Z".to_string(),
            view_count: views,
            duration: "PT9M".to_string(),
            duration_minutes: 9.0,
            category_id: "19".to_string(),
        })
    }

    async fn channel_details(&self, ids: &[String]) -> ProviderOutcome<Vec<ChannelDetails>> {
        ProviderOutcome::Found(
            ids.iter()
                .map(|id| ChannelDetails {
                    id: id.clone(),
                    subscriber_count: if id.starts_with("big") { 1_000_000 } else { 4_000 },
                    video_count: 50,
                })
                .collect(),
        )
    }

    async fn video_count(&self, _: &str, _: DateTime<Utc>, _: DateTime<Utc>) -> ProviderOutcome<u64> {
        ProviderOutcome::Found(400)
    }
}

struct OfflineVideos;

#[async_trait]
impl VideoProvider for OfflineVideos {
    async fn search_videos(&self, _: &str, _: u32, _: SearchOrder) -> ProviderOutcome<SearchPage> {
        unavailable()
    }

    async fn video_details(&self, _: &str) -> ProviderOutcome<VideoDetails> {
        unavailable()
    }

    async fn channel_details(&self, _: &[String]) -> ProviderOutcome<Vec<ChannelDetails>> {
        unavailable()
    }

    async fn video_count(&self, _: &str, _: DateTime<Utc>, _: DateTime<Utc>) -> ProviderOutcome<u64> {
        unavailable()
    }
}

struct OfflineVolume;

#[async_trait]
impl SearchVolumeProvider for OfflineVolume {
    async fn keyword_volume(&self, _: &str) -> ProviderOutcome<KeywordVolume> {
        unavailable()
    }
}

struct NoTranscripts;

#[async_trait]
impl TranscriptProvider for NoTranscripts {
    async fn transcript(&self, _: &str) -> ProviderOutcome<String> {
        ProviderOutcome::NotFound
    }
}

struct NoTrends;

#[async_trait]
impl TrendFeed for NoTrends {
    async fn trending(&self) -> ProviderOutcome<Vec<TrendItem>> {
        unavailable()
    }
}

fn providers(
    search_volume: Arc<dyn SearchVolumeProvider>,
    videos: Arc<dyn VideoProvider>,
) -> Providers {
    Providers {
        search_volume,
        videos,
        transcripts: Arc::new(NoTranscripts),
        advisor: Arc::new(DisabledAdvisor),
        trends: Arc::new(NoTrends),
    }
}

#[test]
fn test_opportunity_stays_in_bounds() {
    for volume in [1_u64, 10, 999, 1_000, 50_000, 10_000_000] {
        for competitors in [0_u64, 1, 50, 5_000, 1_000_000] {
            for views in [0.0, 5_000.0, 100_000.0, 50_000_000.0] {
                let score = compute_opportunity(compute_saturation(volume, competitors), views);
                assert!(score <= 100, "{} {} {} -> {}", volume, competitors, views, score);
            }
        }
    }
}

#[test]
fn test_matrix_is_total_and_monotonic() {
    let mut previous = classify_matrix(0);
    for score in 1..=100u8 {
        let label = classify_matrix(score);
        assert!(label >= previous, "label dropped at {}", score);
        previous = label;
    }
    assert_eq!(classify_matrix(95), MatrixLabel::S);
    assert_eq!(classify_matrix(85), MatrixLabel::APlus);
    assert_eq!(classify_matrix(45), MatrixLabel::C);
}

#[test]
fn test_zero_volume_sentinel() {
    let market = analyze_market(&KeywordSignals {
        monthly_search_volume: 0,
        competitor_video_count_30d: 12_345,
        top_video_average_views: 1_000_000.0,
        small_channel_ratio: 1.0,
    });
    assert_eq!(market.saturation_index, 999.0);
    assert_eq!(market.opportunity_score, 0);
    assert!(!market.is_blue_ocean);
}

#[test]
fn test_revenue_examples() {
    let finance = estimate_revenue(1_000_000, "finance", 10.0, Some("2024-12-15"));
    assert_eq!(finance.min, 35_100_000);
    assert_eq!(finance.max, 81_900_000);
    assert!(finance.factors.length_boost);

    for category in ["finance", "tech", "news", "anything"] {
        let short = estimate_revenue(1_000_000, category, 0.5, Some("2024-12-15"));
        assert!(!short.factors.length_boost);
        assert_eq!(short.factors.season_multiplier, 1.0);
        assert_eq!(short.min, 10_000);
        assert_eq!(short.max, 30_000);
    }
}

#[test]
fn test_video_id_extraction() {
    assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
    assert_eq!(
        extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
        Some("dQw4w9WgXcQ")
    );
    assert_eq!(extract_video_id("not a youtube link"), None);
}

#[tokio::test]
async fn test_file_cache_round_trip() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path().join("keywords.json"), 24);

    let payload = serde_json::json!({ "keyword": "camping", "score": 42 });
    cache.set("camping", payload.clone()).await;
    assert_eq!(cache.get("camping").await, Some(payload));
    assert_eq!(cache.get("fishing").await, None);
}

#[tokio::test]
async fn test_keyword_report_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keywords.json");
    let volume = Arc::new(CountingVolume {
        calls: AtomicUsize::new(0),
    });

    let first = Analyzer::new(
        providers(volume.clone(), Arc::new(TwoVideos)),
        Arc::new(FileCache::new(path.clone(), 24)),
        AnalysisConfig::default(),
    );
    let report = first.analyze_keyword("camping").await.unwrap();
    assert_eq!(report.source, DataSource::Live);
    assert_eq!(report.signals.monthly_search_volume, 8_000);
    assert_eq!(report.signals.competitor_video_count_30d, 400);
    assert_eq!(report.signals.top_video_average_views, 100_000.0);
    assert_eq!(report.signals.small_channel_ratio, 0.5);
    assert_eq!(report.market.saturation_index, 0.05);

    let second = Analyzer::new(
        providers(volume.clone(), Arc::new(TwoVideos)),
        Arc::new(FileCache::new(path, 24)),
        AnalysisConfig::default(),
    );
    let cached = second.analyze_keyword("  camping ").await.unwrap();
    assert_eq!(cached, report);
    assert_eq!(volume.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_offline_providers_degrade_gracefully() {
    let dir = TempDir::new().unwrap();
    let cache = Arc::new(FileCache::new(dir.path().join("keywords.json"), 24));
    let analyzer = Analyzer::new(
        providers(Arc::new(OfflineVolume), Arc::new(OfflineVideos)),
        cache.clone(),
        AnalysisConfig::default(),
    );

    let report = analyzer.analyze_keyword("camping").await.unwrap();
    assert_eq!(report.source, DataSource::Synthetic);
    let again = analyzer.analyze_keyword("camping").await.unwrap();
    assert_eq!(again.signals, report.signals);
    assert_eq!(cache.stats().await.unwrap().total_entries, 0);

    let video = analyzer.analyze_video("https://youtu.be/dQw4w9WgXcQ").await.unwrap();
    assert!(video.placeholder_metadata);
    assert!(video.placeholder_transcript);
    assert!(video.dual_core.total_score <= 100);

    assert!(matches!(
        analyzer.analyze_video("https://vimeo.com/1234").await,
        Err(AnalysisError::InvalidUrl(_))
    ));
    assert_eq!(analyzer.generate_ideas("camping", &[], &[]).await.len(), 3);
    assert!(analyzer.trending_topics().await.is_empty());
}
