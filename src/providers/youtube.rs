//! YouTube Data API v3 client
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{
    http_client, read_json, ChannelDetails, SearchOrder, SearchPage, SearchResult, VideoDetails,
    VideoProvider,
};
use crate::config::YouTubeConfig;
use crate::error::{ProviderError, ProviderOutcome};

const PROVIDER: &str = "YouTube";

pub struct YouTubeClient {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    #[serde(rename = "pageInfo")]
    page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "totalResults", default)]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snippet {
    title: String,
    description: String,
    #[serde(rename = "channelId")]
    channel_id: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
    #[serde(rename = "categoryId")]
    category_id: String,
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    fallback: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
    #[serde(rename = "contentDetails", default)]
    content_details: ContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "subscriberCount")]
    subscriber_count: Option<String>,
    #[serde(rename = "videoCount")]
    video_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    #[serde(default)]
    statistics: Statistics,
}

/// YouTube reports counters as decimal strings
fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// Convert an ISO-8601 duration such as `PT1H2M10S` to minutes
pub fn parse_duration_minutes(duration: &str) -> f64 {
    let Ok(re) = Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?") else {
        return 0.0;
    };
    let Some(caps) = re.captures(duration) else {
        return 0.0;
    };
    let part = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    part(1) * 60.0 + part(2) + part(3) / 60.0
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: http_client(config.timeout_seconds)?,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::Disabled(PROVIDER))?;
        let base = format!("{}/{}", self.base_url, resource);
        let mut url = Url::parse(&base).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().copied())
            .append_pair("key", api_key);
        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        debug!("Sending request to YouTube API: {}", url.path());
        let response = self.client.get(url).send().await?;
        read_json(PROVIDER, response).await
    }

    async fn search(&self, query: &str, limit: u32, order: SearchOrder) -> Result<SearchPage, ProviderError> {
        let limit = limit.to_string();
        let url = self.endpoint(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", limit.as_str()),
                ("order", order.as_str()),
            ],
        )?;
        let response: SearchResponse = self.get(url).await?;

        let results = response
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let snippet = item.snippet.unwrap_or_default();
                Some(SearchResult {
                    video_id,
                    title: snippet.title,
                    channel_id: snippet.channel_id,
                    published_at: snippet.published_at,
                })
            })
            .collect();

        Ok(SearchPage {
            results,
            total_results: response.page_info.map(|p| p.total_results).unwrap_or(0),
        })
    }

    async fn videos(&self, video_id: &str) -> Result<Option<VideoDetails>, ProviderError> {
        let url = self.endpoint(
            "videos",
            &[("part", "snippet,contentDetails,statistics"), ("id", video_id)],
        )?;
        let response: ListResponse<VideoItem> = self.get(url).await?;

        Ok(response.items.into_iter().next().map(|item| {
            let thumbnails = item.snippet.thumbnails;
            let thumbnail_url = thumbnails
                .high
                .or(thumbnails.medium)
                .or(thumbnails.fallback)
                .map(|t| t.url)
                .unwrap_or_default();

            VideoDetails {
                id: item.id,
                title: item.snippet.title,
                description: item.snippet.description,
                thumbnail_url,
                channel_title: item.snippet.channel_title,
                channel_id: item.snippet.channel_id,
                published_at: item.snippet.published_at,
                view_count: parse_count(item.statistics.view_count.as_deref()),
                duration_minutes: parse_duration_minutes(&item.content_details.duration),
                duration: item.content_details.duration,
                category_id: item.snippet.category_id,
            }
        }))
    }

    async fn channels(&self, channel_ids: &[String]) -> Result<Vec<ChannelDetails>, ProviderError> {
        let mut unique: Vec<&str> = Vec::new();
        for id in channel_ids {
            if !unique.contains(&id.as_str()) {
                unique.push(id);
            }
        }
        let ids = unique.join(",");
        let url = self.endpoint("channels", &[("part", "statistics"), ("id", ids.as_str())])?;
        let response: ListResponse<ChannelItem> = self.get(url).await?;

        Ok(response
            .items
            .into_iter()
            .map(|item| ChannelDetails {
                id: item.id,
                subscriber_count: parse_count(item.statistics.subscriber_count.as_deref()),
                video_count: parse_count(item.statistics.video_count.as_deref()),
            })
            .collect())
    }

    async fn count(&self, query: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<u64, ProviderError> {
        let (after, before) = (rfc3339(from), rfc3339(to));
        let url = self.endpoint(
            "search",
            &[
                ("part", "id"),
                ("q", query),
                ("type", "video"),
                ("publishedAfter", after.as_str()),
                ("publishedBefore", before.as_str()),
                ("maxResults", "1"),
            ],
        )?;
        let response: SearchResponse = self.get(url).await?;
        Ok(response.page_info.map(|p| p.total_results).unwrap_or(0))
    }
}

#[async_trait]
impl VideoProvider for YouTubeClient {
    async fn search_videos(&self, query: &str, limit: u32, order: SearchOrder) -> ProviderOutcome<SearchPage> {
        match self.search(query, limit, order).await {
            Ok(page) if page.results.is_empty() && page.total_results == 0 => ProviderOutcome::NotFound,
            other => other.into(),
        }
    }

    async fn video_details(&self, video_id: &str) -> ProviderOutcome<VideoDetails> {
        match self.videos(video_id).await {
            Ok(Some(details)) => ProviderOutcome::Found(details),
            Ok(None) => ProviderOutcome::NotFound,
            Err(e) => ProviderOutcome::Failed(e),
        }
    }

    async fn channel_details(&self, channel_ids: &[String]) -> ProviderOutcome<Vec<ChannelDetails>> {
        if channel_ids.is_empty() {
            return ProviderOutcome::NotFound;
        }
        self.channels(channel_ids).await.into()
    }

    async fn video_count(&self, query: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> ProviderOutcome<u64> {
        self.count(query, from, to).await.into()
    }
}
