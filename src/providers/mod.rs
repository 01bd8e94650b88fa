//! External data providers
//!
//! Each provider is a thin async client over one third-party API. Calls
//! return a [`ProviderOutcome`] so the orchestrator can pick a fallback
//! without inspecting error strings.

pub mod naver;
pub mod supadata;
pub mod trends;
pub mod youtube;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderOutcome};

pub use naver::NaverSearchAd;
pub use supadata::SupaData;
pub use trends::GoogleTrends;
pub use youtube::YouTubeClient;

/// Months covered by [`VideoProvider::monthly_trend`]
pub const TREND_MONTHS: usize = 6;

/// Monthly search volume for a keyword
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordVolume {
    pub total: u64,
    pub pc: u64,
    pub mobile: u64,
    /// Related keywords as returned by the provider
    pub related: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrder {
    Relevance,
    ViewCount,
}

impl SearchOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOrder::Relevance => "relevance",
            SearchOrder::ViewCount => "viewCount",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
    pub published_at: String,
}

/// One page of search results plus the provider's (estimated) total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub total_results: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub channel_title: String,
    pub channel_id: String,
    pub published_at: String,
    pub view_count: u64,
    /// Raw ISO-8601 duration, e.g. `PT12M5S`
    pub duration: String,
    pub duration_minutes: f64,
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDetails {
    pub id: String,
    pub subscriber_count: u64,
    pub video_count: u64,
}

/// Uploads on one of the last seven days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCount {
    /// 0 = the 24 hours before now, 1 = the 24 hours before that, ...
    pub days_ago: u32,
    pub label: String,
    pub value: u64,
}

/// Trending search from a public feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendItem {
    pub title: String,
    pub traffic: String,
    pub pub_date: String,
}

#[async_trait]
pub trait SearchVolumeProvider: Send + Sync {
    async fn keyword_volume(&self, keyword: &str) -> ProviderOutcome<KeywordVolume>;
}

#[async_trait]
pub trait VideoProvider: Send + Sync {
    async fn search_videos(
        &self,
        query: &str,
        limit: u32,
        order: SearchOrder,
    ) -> ProviderOutcome<SearchPage>;

    async fn video_details(&self, video_id: &str) -> ProviderOutcome<VideoDetails>;

    /// Batch lookup; channels the provider does not know are simply absent
    async fn channel_details(&self, channel_ids: &[String]) -> ProviderOutcome<Vec<ChannelDetails>>;

    /// Number of videos matching `query` published in `[from, to)`
    async fn video_count(
        &self,
        query: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ProviderOutcome<u64>;

    /// Upload counts for the last six calendar months, oldest first.
    ///
    /// The current month is partial. Fails if any month fails.
    async fn monthly_trend(&self, query: &str, now: DateTime<Utc>) -> ProviderOutcome<[u64; TREND_MONTHS]> {
        let windows = month_windows(now);
        let counts = join_all(
            windows
                .iter()
                .map(|(from, to)| self.video_count(query, *from, *to)),
        )
        .await;

        let mut trend = [0u64; TREND_MONTHS];
        for (slot, outcome) in trend.iter_mut().zip(counts) {
            match outcome {
                ProviderOutcome::Found(count) => *slot = count,
                ProviderOutcome::NotFound => {}
                ProviderOutcome::Failed(err) => return ProviderOutcome::Failed(err),
            }
        }
        ProviderOutcome::Found(trend)
    }

    /// Upload counts for each of the last seven 24-hour blocks, oldest first
    async fn last_7_days(&self, query: &str, now: DateTime<Utc>) -> ProviderOutcome<Vec<DailyCount>> {
        let counts = join_all((0..7u32).map(|i| {
            let to = now - Duration::days(i as i64);
            let from = now - Duration::days(i as i64 + 1);
            self.video_count(query, from, to)
        }))
        .await;

        let mut days = Vec::with_capacity(7);
        for (i, outcome) in counts.into_iter().enumerate() {
            let value = match outcome {
                ProviderOutcome::Found(count) => count,
                ProviderOutcome::NotFound => 0,
                ProviderOutcome::Failed(err) => return ProviderOutcome::Failed(err),
            };
            days.push(DailyCount {
                days_ago: i as u32,
                label: day_label(i as u32),
                value,
            });
        }
        days.reverse();
        ProviderOutcome::Found(days)
    }
}

#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Full transcript text, segments joined by spaces
    async fn transcript(&self, video_id: &str) -> ProviderOutcome<String>;
}

#[async_trait]
pub trait TrendFeed: Send + Sync {
    async fn trending(&self) -> ProviderOutcome<Vec<TrendItem>>;
}

/// `[start, next month start)` for the six months ending with `now`'s month
pub fn month_windows(now: DateTime<Utc>) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let month_index = now.year() * 12 + now.month0() as i32;
    (0..TREND_MONTHS as i32)
        .rev()
        .filter_map(|back| {
            let start = month_start(month_index - back)?;
            let end = month_start(month_index - back + 1)?;
            Some((start, end))
        })
        .collect()
}

fn month_start(month_index: i32) -> Option<DateTime<Utc>> {
    let year = month_index.div_euclid(12);
    let month = month_index.rem_euclid(12) as u32 + 1;
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

/// Decode a JSON body, turning non-2xx responses into [`ProviderError::Status`]
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        ProviderError::Malformed(format!("{} response: {}", provider, e))
    })
}

pub(crate) fn http_client(timeout_seconds: u64) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .build()?)
}

fn day_label(days_ago: u32) -> String {
    match days_ago {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        n => format!("{} days ago", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_month_windows_cross_year() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let windows = month_windows(now);
        assert_eq!(windows.len(), 6);
        assert_eq!(windows[0].0, Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap());
        assert_eq!(windows[5].0, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(windows[5].1, Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
        assert_eq!(windows[2].1, windows[3].0);
    }

    /// Reports each window's start month as its count
    struct MonthCounter {
        calls: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
        fail: bool,
    }

    #[async_trait]
    impl VideoProvider for MonthCounter {
        async fn search_videos(&self, _: &str, _: u32, _: SearchOrder) -> ProviderOutcome<SearchPage> {
            ProviderOutcome::NotFound
        }

        async fn video_details(&self, _: &str) -> ProviderOutcome<VideoDetails> {
            ProviderOutcome::NotFound
        }

        async fn channel_details(&self, _: &[String]) -> ProviderOutcome<Vec<ChannelDetails>> {
            ProviderOutcome::NotFound
        }

        async fn video_count(&self, _: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> ProviderOutcome<u64> {
            self.calls.lock().unwrap().push((from, to));
            if self.fail {
                return ProviderOutcome::Failed(ProviderError::Malformed("boom".into()));
            }
            ProviderOutcome::Found(from.month() as u64)
        }
    }

    #[tokio::test]
    async fn test_monthly_trend_orders_oldest_first() {
        let provider = MonthCounter { calls: Mutex::new(Vec::new()), fail: false };
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let trend = provider.monthly_trend("rust", now).await.found().unwrap();
        assert_eq!(trend, [10, 11, 12, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_last_7_days_blocks() {
        let provider = MonthCounter { calls: Mutex::new(Vec::new()), fail: false };
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let days = provider.last_7_days("rust", now).await.found().unwrap();

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].days_ago, 6);
        assert_eq!(days[6].label, "today");
        for (from, to) in provider.calls.lock().unwrap().iter() {
            assert_eq!(*to - *from, Duration::days(1));
        }
    }

    #[tokio::test]
    async fn test_trend_failure_propagates() {
        let provider = MonthCounter { calls: Mutex::new(Vec::new()), fail: true };
        let outcome = provider.monthly_trend("rust", Utc::now()).await;
        assert!(matches!(outcome, ProviderOutcome::Failed(_)));
    }
}
