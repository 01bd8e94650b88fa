//! Keyword report types and the channel/view aggregates they are built from
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::providers::DailyCount;
use crate::scoring::{KeywordSignals, MarketAnalysis};

/// Channels below this subscriber count are always "small"
pub const SMALL_CHANNEL_SUBSCRIBERS: u64 = 50_000;
/// Channels below this share of the leading channel's subscribers are "small"
pub const SMALL_CHANNEL_SHARE: f64 = 0.1;
pub const MAX_RELATED_KEYWORDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    /// Built from provider responses
    Live,
    /// Generated locally because every provider failed
    Synthetic,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchVolumeSplit {
    pub total: u64,
    pub pc: u64,
    pub mobile: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopVideo {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub channel_name: String,
    pub views: u64,
    pub published_at: String,
    pub subscriber_count: u64,
}

/// Result of the keyword flow, and the payload stored in the cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    pub keyword: String,
    pub source: DataSource,
    pub signals: KeywordSignals,
    pub market: MarketAnalysis,
    pub search_volume: SearchVolumeSplit,
    /// Total competing videos reported by the relevance search
    pub total_video_count: u64,
    /// Monthly upload counts, oldest first
    pub monthly_trend: Vec<u64>,
    pub last_7_days: Vec<DailyCount>,
    pub top_videos: Vec<TopVideo>,
    pub related_keywords: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl KeywordReport {
    pub fn top_video_titles(&self) -> Vec<String> {
        self.top_videos.iter().map(|v| v.title.clone()).collect()
    }
}

/// Mean view count, 0 for no videos
pub fn average_views(views: &[u64]) -> f64 {
    if views.is_empty() {
        return 0.0;
    }
    views.iter().sum::<u64>() as f64 / views.len() as f64
}

/// Share of videos from small channels.
///
/// `subscribers` follows the ranking order; `None` marks an unknown channel,
/// which counts towards the total but never as small. The first entry is the
/// leading channel.
pub fn small_channel_ratio(subscribers: &[Option<u64>]) -> f64 {
    if subscribers.is_empty() {
        return 0.0;
    }

    let leader = subscribers.first().copied().flatten().unwrap_or(0);
    let small = subscribers
        .iter()
        .flatten()
        .filter(|&&subs| {
            subs < SMALL_CHANNEL_SUBSCRIBERS
                || (leader > 0 && (subs as f64) < leader as f64 * SMALL_CHANNEL_SHARE)
        })
        .count();

    small as f64 / subscribers.len() as f64
}
