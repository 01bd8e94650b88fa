//! SupaData YouTube transcript API
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{http_client, read_json, TranscriptProvider};
use crate::config::TranscriptConfig;
use crate::error::{ProviderError, ProviderOutcome};

const PROVIDER: &str = "SupaData";

pub struct SupaData {
    api_key: Option<String>,
    endpoint: String,
    language: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    content: Option<Vec<Segment>>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    text: String,
}

fn join_segments(response: TranscriptResponse) -> Option<String> {
    let segments = response.content?;
    let text = segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

impl SupaData {
    pub fn new(config: &TranscriptConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
            client: http_client(config.timeout_seconds)?,
        })
    }

    async fn fetch(&self, video_id: &str) -> Result<Option<String>, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::Disabled(PROVIDER))?;

        let mut url = Url::parse(&self.endpoint).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("videoId", video_id)
            .append_pair("lang", &self.language);

        debug!("Fetching transcript for {}", video_id);
        let response = self.client.get(url).header("x-api-key", api_key).send().await?;
        let body: TranscriptResponse = read_json(PROVIDER, response).await?;
        Ok(join_segments(body))
    }
}

#[async_trait]
impl TranscriptProvider for SupaData {
    async fn transcript(&self, video_id: &str) -> ProviderOutcome<String> {
        match self.fetch(video_id).await {
            Ok(Some(text)) => ProviderOutcome::Found(text),
            Ok(None) => ProviderOutcome::NotFound,
            Err(e) => ProviderOutcome::Failed(e),
        }
    }
}
