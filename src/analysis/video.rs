//! Video diagnosis types and the URL / title helpers of the video flow
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::keyword::TopVideo;
use crate::providers::VideoDetails;
use crate::scoring::{DualCoreResult, MarketAnalysis, RevenueEstimate, ScriptAnalysis};

pub const VIDEO_ID_LEN: usize = 11;
pub const DEFAULT_KEYWORD: &str = "youtube";

/// Example script scored when no transcript can be fetched
pub const PLACEHOLDER_TRANSCRIPT: &str = "Are you struggling to get views on your channel? \
Today I will reveal three growth secrets that never fail, and if you skip them your channel may stay stuck forever. \
First, raise the click-through rate of your thumbnails. \
Second, keep viewers through the first thirty seconds. \
Third, build a structure that makes people watch to the end. \
In a moment I will show you a real example that will surprise you. \
Stay until the end and you will get the checklist I used to reach ten thousand subscribers.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeywordSource {
    /// Derived from the title
    Heuristic,
    /// Chosen by the content advisor
    Llm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub channel_name: String,
    /// `YYYY-MM-DD`
    pub published_at: String,
    pub duration_minutes: f64,
    pub view_count: u64,
    pub category: String,
}

/// Demand/supply snapshot for the extracted keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub keyword: String,
    pub search_volume: u64,
    pub pc_volume: u64,
    pub mobile_volume: u64,
    /// Uploads in the recent window
    pub recent_video_count: u64,
    pub monthly_trend: Vec<u64>,
    pub saturation_index: f64,
    pub average_views: u64,
}

/// Result of the video flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDiagnostics {
    pub video: VideoSummary,
    pub transcript: String,
    pub placeholder_metadata: bool,
    pub placeholder_transcript: bool,
    pub keyword: String,
    pub keyword_source: KeywordSource,
    pub script_analysis: ScriptAnalysis,
    pub trend: TrendSnapshot,
    pub market: MarketAnalysis,
    pub dual_core: DualCoreResult,
    pub revenue: RevenueEstimate,
    pub viral_velocity: f64,
    pub top_videos: Vec<TopVideo>,
}

/// Extract the 11-character id from the common YouTube URL forms
pub fn extract_video_id(url: &str) -> Option<String> {
    let re = Regex::new(r"^.*(youtu\.be/|v/|embed/|watch\?v=|&v=)([^#&?]*).*").ok()?;
    let id = re.captures(url.trim())?.get(2)?.as_str();
    (id.chars().count() == VIDEO_ID_LEN).then(|| id.to_string())
}

/// Bracketed title fragment, else the first word of two or more characters
pub fn extract_keyword_from_title(title: &str) -> String {
    if let Ok(re) = Regex::new(r"[\[(]([^\])]+)[\])]") {
        if let Some(fragment) = re.captures(title).and_then(|c| c.get(1)) {
            let fragment = fragment.as_str().trim();
            if !fragment.is_empty() {
                return fragment.to_string();
            }
        }
    }

    title
        .split_whitespace()
        .find(|w| w.chars().count() >= 2)
        .unwrap_or(DEFAULT_KEYWORD)
        .to_string()
}

/// Revenue category from the YouTube category id, overridden by title terms
pub fn map_category(category_id: &str, title: &str) -> &'static str {
    let by_id = match category_id.trim().parse::<u32>() {
        Ok(20) | Ok(24) => "entertainment",
        Ok(28) => "tech",
        Ok(27) => "education",
        Ok(25) => "news",
        _ => "vlog",
    };

    if ["주식", "투자", "코인"].iter().any(|t| title.contains(t)) {
        "finance"
    } else if ["아이폰", "갤럭시"].iter().any(|t| title.contains(t)) {
        "tech"
    } else {
        by_id
    }
}

/// Stand-in metadata when the video provider is unreachable
pub fn placeholder_details(video_id: &str) -> VideoDetails {
    VideoDetails {
        id: video_id.to_string(),
        title: "Placeholder video (metadata unavailable)".to_string(),
        description: String::new(),
        thumbnail_url: "https://via.placeholder.com/320x180".to_string(),
        channel_title: "Unknown channel".to_string(),
        channel_id: String::new(),
        published_at: "2024-01-01T00:00:00Z".to_string(),
        view_count: 50_000,
        duration: "PT10M".to_string(),
        duration_minutes: 10.0,
        category_id: String::new(),
    }
}

impl VideoSummary {
    pub fn from_details(details: &VideoDetails) -> Self {
        let published_at = details
            .published_at
            .split('T')
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            video_id: details.id.clone(),
            title: details.title.clone(),
            thumbnail_url: details.thumbnail_url.clone(),
            channel_name: details.channel_title.clone(),
            published_at,
            duration_minutes: details.duration_minutes,
            view_count: details.view_count,
            category: map_category(&details.category_id, &details.title).to_string(),
        }
    }
}
