use super::{ChatMessage, LLMConfig, LLMResponse, LLM};
use crate::error::ProviderError;
use crate::providers::{http_client, read_json};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Request/response shape shared by OpenAI-compatible chat endpoints
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

impl ChatCompletionResponse {
    fn into_response(self, provider: &str) -> Result<LLMResponse, ProviderError> {
        let tokens_used = self.usage.map(|u| u.total_tokens);
        let content = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed(format!("No response from {}", provider)))?
            .message
            .content;

        Ok(LLMResponse {
            content,
            tokens_used,
        })
    }
}

fn completion_request(config: &LLMConfig, messages: Vec<ChatMessage>) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}

/// LMStudio provider implementation
pub struct LMStudioProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

impl LMStudioProvider {
    pub fn new(config: LLMConfig) -> Result<Self, ProviderError> {
        let client = http_client(config.timeout_seconds)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LLM for LMStudioProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse, ProviderError> {
        let endpoint = self
            .config
            .endpoint
            .as_ref()
            .ok_or(ProviderError::Disabled("LMStudio"))?;

        debug!("Sending request to LMStudio at {}", endpoint);

        let response = self
            .client
            .post(endpoint)
            .json(&completion_request(&self.config, messages))
            .send()
            .await?;

        let body: ChatCompletionResponse = read_json("LMStudio", response).await?;
        body.into_response("LMStudio")
    }
}

/// Gemini provider implementation
pub struct GeminiProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "totalTokenCount")]
    total_token_count: u32,
}

/// Gemini has no chat roles in this API; messages are flattened into one prompt
fn flatten_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|msg| format!("{}: {}", msg.role, msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

impl GeminiProvider {
    pub fn new(config: LLMConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_none() {
            return Err(ProviderError::Disabled("Gemini"));
        }

        let client = http_client(config.timeout_seconds)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LLM for GeminiProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(ProviderError::Disabled("Gemini"))?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: flatten_messages(&messages),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.config.model, api_key
        );

        debug!("Sending request to Gemini API ({})", self.config.model);

        let response = self.client.post(&url).json(&request).send().await?;
        let gemini_response: GeminiResponse = read_json("Gemini", response).await?;

        let tokens_used = gemini_response
            .usage_metadata
            .map(|u| u.total_token_count);

        let content = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ProviderError::Malformed("No response from Gemini".to_string()))?;

        Ok(LLMResponse {
            content,
            tokens_used,
        })
    }
}

/// OpenAI provider implementation
pub struct OpenAIProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(config: LLMConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_none() {
            return Err(ProviderError::Disabled("OpenAI"));
        }

        let client = http_client(config.timeout_seconds)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LLM for OpenAIProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(ProviderError::Disabled("OpenAI"))?;

        let url = self.config.endpoint.as_deref().unwrap_or(OPENAI_CHAT_URL);

        debug!("Sending request to OpenAI API");

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&completion_request(&self.config, messages))
            .send()
            .await?;

        let body: ChatCompletionResponse = read_json("OpenAI", response).await?;
        body.into_response("OpenAI")
    }
}
