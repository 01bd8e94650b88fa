//! Google Trends daily trending searches (RSS)
use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use super::{http_client, TrendFeed, TrendItem};
use crate::error::{ProviderError, ProviderOutcome};

const PROVIDER: &str = "Google Trends";
pub const DEFAULT_FEED_URL: &str = "https://trends.google.co.kr/trending/rss?geo=KR&hl=ko";
pub const MAX_TREND_ITEMS: usize = 10;

/// Cyrillic, Vietnamese, Arabic and Thai ranges
const FOREIGN_SCRIPT: &str = r"[\x{0400}-\x{04FF}\x{1E00}-\x{1EFF}\x{0600}-\x{06FF}\x{0E00}-\x{0E7F}]";

pub struct GoogleTrends {
    feed_url: String,
    client: reqwest::Client,
}

fn strip_cdata(text: &str) -> String {
    text.replace("<![CDATA[", "").replace("]]>", "").trim().to_string()
}

/// Extract up to [`MAX_TREND_ITEMS`] items, skipping titles in foreign scripts
pub fn parse_feed(xml: &str) -> Result<Vec<TrendItem>, ProviderError> {
    let compile = |pattern: &str| {
        Regex::new(pattern).map_err(|e| ProviderError::Malformed(e.to_string()))
    };
    let item_re = compile(r"(?s)<item>.*?</item>")?;
    let title_re = compile(r"(?s)<title>(.*?)</title>")?;
    let traffic_re = compile(r"(?s)<ht:approx_traffic>(.*?)</ht:approx_traffic>")?;
    let date_re = compile(r"(?s)<pubDate>(.*?)</pubDate>")?;
    let foreign_re = compile(FOREIGN_SCRIPT)?;

    let capture = |re: &Regex, text: &str| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };

    let items = item_re
        .find_iter(xml)
        .map(|m| m.as_str())
        .filter(|item| {
            let title = capture(&title_re, *item).map(|t| strip_cdata(&t)).unwrap_or_default();
            !foreign_re.is_match(&title)
        })
        .take(MAX_TREND_ITEMS)
        .filter_map(|item| {
            let title = capture(&title_re, item)?;
            let traffic = capture(&traffic_re, item)?;
            Some(TrendItem {
                title: strip_cdata(&title),
                traffic: traffic.replace('+', ""),
                pub_date: capture(&date_re, item).unwrap_or_default(),
            })
        })
        .collect();

    Ok(items)
}

impl GoogleTrends {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_url(DEFAULT_FEED_URL)
    }

    pub fn with_url(feed_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            feed_url: feed_url.to_string(),
            client: http_client(15)?,
        })
    }

    async fn fetch(&self) -> Result<Vec<TrendItem>, ProviderError> {
        debug!("Fetching trending searches from {}", self.feed_url);
        let response = self.client.get(&self.feed_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        parse_feed(&response.text().await?)
    }
}

#[async_trait]
impl TrendFeed for GoogleTrends {
    async fn trending(&self) -> ProviderOutcome<Vec<TrendItem>> {
        match self.fetch().await {
            Ok(items) if items.is_empty() => ProviderOutcome::NotFound,
            other => other.into(),
        }
    }
}
