//! LLM-backed content review, keyword extraction and idea generation
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{create_llm, ChatMessage, LLMConfig, LLM};
use crate::error::{ProviderError, ProviderOutcome};
use crate::scoring::QualityAssessment;

/// Transcript characters sent for a quality review
const QUALITY_TRANSCRIPT_CHARS: usize = 15_000;
/// Transcript characters sent for keyword extraction
const KEYWORD_TRANSCRIPT_CHARS: usize = 5_000;
const IDEA_CONTEXT_ITEMS: usize = 10;
const IDEA_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdeaKind {
    #[serde(rename = "Viral Hit")]
    ViralHit,
    #[serde(rename = "Search-Optimized")]
    SearchOptimized,
    #[serde(rename = "Creative Twist")]
    CreativeTwist,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoIdea {
    #[serde(rename = "type")]
    pub kind: IdeaKind,
    pub title: String,
    pub reason: String,
}

/// Opinionated helpers that sit on top of a chat model
#[async_trait]
pub trait ContentAdvisor: Send + Sync {
    async fn analyze_quality(
        &self,
        title: &str,
        keyword: &str,
        transcript: &str,
    ) -> ProviderOutcome<QualityAssessment>;

    async fn extract_keyword(&self, title: &str, transcript: &str) -> ProviderOutcome<String>;

    async fn generate_ideas(
        &self,
        keyword: &str,
        related_keywords: &[String],
        top_video_titles: &[String],
    ) -> ProviderOutcome<Vec<VideoIdea>>;
}

/// Template ideas used when no model answers
pub fn fallback_ideas(keyword: &str) -> Vec<VideoIdea> {
    let year = Utc::now().year();
    vec![
        VideoIdea {
            kind: IdeaKind::ViralHit,
            title: format!("Shocking Truth About {}", keyword),
            reason: "High curiosity gap.".to_string(),
        },
        VideoIdea {
            kind: IdeaKind::SearchOptimized,
            title: format!("{} Complete Guide {}", keyword, year),
            reason: "Matches search intent.".to_string(),
        },
        VideoIdea {
            kind: IdeaKind::CreativeTwist,
            title: format!("I tried {} for 30 Days", keyword),
            reason: "Personal challenge format.".to_string(),
        },
    ]
}

/// Remove markdown code fences around a model answer
pub fn clean_llm_response(content: &str) -> String {
    let content = content.trim();

    if content.starts_with("```") {
        if let Some(start) = content.find('\n') {
            if let Some(end) = content.rfind("```") {
                if end > start {
                    return content[start + 1..end].trim().to_string();
                }
            }
        }
    }

    content.replace("```", "").trim().to_string()
}

fn head(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn quality_prompt(title: &str, keyword: &str, transcript: &str) -> String {
    format!(
        "You are a strict YouTube content auditor. Evaluate this video against the keyword '{}'.\n\
         Title: \"{}\"\n\
         Transcript: \"{}...\"\n\n\
         Score three metrics from 0 to 100: metadata (title and thumbnail potential), \
         script (hook and structure) and relevance (does the content deliver on the keyword). \
         Be critical and give actionable feedback.\n\
         Return only JSON: {{\"metadata\":{{\"score\":0,\"reason\":\"\"}},\"script\":{{\"score\":0,\"reason\":\"\"}},\
         \"relevance\":{{\"score\":0,\"reason\":\"\"}},\"feedback\":[\"\"],\"summary\":\"\"}}",
        keyword,
        title,
        head(transcript, QUALITY_TRANSCRIPT_CHARS)
    )
}

fn keyword_prompt(title: &str, transcript: &str) -> String {
    format!(
        "Identify the single most important search keyword (core topic) of this YouTube video.\n\
         Title: \"{}\"\n\
         Transcript start: \"{}...\"\n\n\
         Prefer a short compound noun that people actually search for. \
         Return only the keyword text, without quotes or explanation.",
        title,
        head(transcript, KEYWORD_TRANSCRIPT_CHARS)
    )
}

fn ideas_prompt(keyword: &str, related: &[String], titles: &[String]) -> String {
    let list = |items: &[String]| {
        let joined = items
            .iter()
            .take(IDEA_CONTEXT_ITEMS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if joined.is_empty() {
            "None provided".to_string()
        } else {
            joined
        }
    };

    format!(
        "You are an expert YouTube strategist. Generate 3 video ideas for the keyword '{}'.\n\
         Related searches: {}\n\
         Top videos by views: {}\n\n\
         Combine search intent with the winning formats: one \"Viral Hit\", one \
         \"Search-Optimized\" and one \"Creative Twist\".\n\
         Return only a JSON array: [{{\"type\":\"Viral Hit\",\"title\":\"\",\"reason\":\"\"}}]",
        keyword,
        list(related),
        list(titles)
    )
}

/// Keyword answers sometimes arrive quoted or on several lines
fn normalize_keyword(answer: &str) -> Option<String> {
    let cleaned = clean_llm_response(answer);
    let line = cleaned.lines().map(str::trim).find(|l| !l.is_empty())?;
    let keyword = line.trim_matches(|c| c == '"' || c == '\'' || c == '`').trim();
    (!keyword.is_empty()).then(|| keyword.to_string())
}

pub struct LLMAdvisor {
    review_llm: Box<dyn LLM>,
    keyword_llm: Box<dyn LLM>,
}

impl LLMAdvisor {
    pub fn new(review_llm: Box<dyn LLM>, keyword_llm: Box<dyn LLM>) -> Self {
        Self {
            review_llm,
            keyword_llm,
        }
    }

    /// Build an advisor, using `keyword_model` for keyword extraction
    pub fn from_config(config: &LLMConfig) -> Result<Self, ProviderError> {
        let keyword_config = LLMConfig {
            model: config.keyword_model.clone(),
            ..config.clone()
        };
        Ok(Self::new(create_llm(config)?, create_llm(&keyword_config)?))
    }

    async fn ask(llm: &dyn LLM, prompt: String) -> Result<String, ProviderError> {
        let response = llm.chat(vec![ChatMessage::user(prompt)]).await?;
        debug!("LLM response received ({:?} tokens)", response.tokens_used);
        Ok(clean_llm_response(&response.content))
    }
}

#[async_trait]
impl ContentAdvisor for LLMAdvisor {
    async fn analyze_quality(
        &self,
        title: &str,
        keyword: &str,
        transcript: &str,
    ) -> ProviderOutcome<QualityAssessment> {
        let prompt = quality_prompt(title, keyword, transcript);
        let answer = match Self::ask(self.review_llm.as_ref(), prompt).await {
            Ok(answer) => answer,
            Err(e) => return ProviderOutcome::Failed(e),
        };

        match serde_json::from_str::<QualityAssessment>(&answer) {
            Ok(assessment) => {
                info!("🤖 AI quality review completed for '{}'", keyword);
                ProviderOutcome::Found(assessment)
            }
            Err(e) => {
                warn!("Quality review is not valid JSON: {}", e);
                ProviderOutcome::Failed(e.into())
            }
        }
    }

    async fn extract_keyword(&self, title: &str, transcript: &str) -> ProviderOutcome<String> {
        let prompt = keyword_prompt(title, transcript);
        match Self::ask(self.keyword_llm.as_ref(), prompt).await {
            Ok(answer) => match normalize_keyword(&answer) {
                Some(keyword) => ProviderOutcome::Found(keyword),
                None => ProviderOutcome::NotFound,
            },
            Err(e) => ProviderOutcome::Failed(e),
        }
    }

    async fn generate_ideas(
        &self,
        keyword: &str,
        related_keywords: &[String],
        top_video_titles: &[String],
    ) -> ProviderOutcome<Vec<VideoIdea>> {
        let prompt = ideas_prompt(keyword, related_keywords, top_video_titles);
        let answer = match Self::ask(self.review_llm.as_ref(), prompt).await {
            Ok(answer) => answer,
            Err(e) => return ProviderOutcome::Failed(e),
        };

        match serde_json::from_str::<Vec<VideoIdea>>(&answer) {
            Ok(ideas) if ideas.is_empty() => ProviderOutcome::NotFound,
            Ok(mut ideas) => {
                ideas.truncate(IDEA_COUNT);
                ProviderOutcome::Found(ideas)
            }
            Err(e) => ProviderOutcome::Failed(e.into()),
        }
    }
}

/// Advisor used when no LLM is configured
pub struct DisabledAdvisor;

#[async_trait]
impl ContentAdvisor for DisabledAdvisor {
    async fn analyze_quality(&self, _: &str, _: &str, _: &str) -> ProviderOutcome<QualityAssessment> {
        ProviderOutcome::Failed(ProviderError::Disabled("LLM"))
    }

    async fn extract_keyword(&self, _: &str, _: &str) -> ProviderOutcome<String> {
        ProviderOutcome::Failed(ProviderError::Disabled("LLM"))
    }

    async fn generate_ideas(&self, _: &str, _: &[String], _: &[String]) -> ProviderOutcome<Vec<VideoIdea>> {
        ProviderOutcome::Failed(ProviderError::Disabled("LLM"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMResponse;

    struct CannedLLM(&'static str);

    #[async_trait]
    impl LLM for CannedLLM {
        async fn chat(&self, _: Vec<ChatMessage>) -> Result<LLMResponse, ProviderError> {
            Ok(LLMResponse {
                content: self.0.to_string(),
                tokens_used: None,
            })
        }
    }

    fn advisor(answer: &'static str) -> LLMAdvisor {
        LLMAdvisor::new(Box::new(CannedLLM(answer)), Box::new(CannedLLM(answer)))
    }

    #[test]
    fn test_clean_llm_response() {
        assert_eq!(clean_llm_response("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(clean_llm_response("  plain  "), "plain");
    }

    #[test]
    fn test_normalize_keyword() {
        assert_eq!(normalize_keyword("\"김치찌개 레시피\"\n").as_deref(), Some("김치찌개 레시피"));
        assert_eq!(normalize_keyword("\n\ncamping gear\nbecause..."), Some("camping gear".to_string()));
        assert!(normalize_keyword("  ").is_none());
    }

    #[tokio::test]
    async fn test_quality_review_parses_fenced_json() {
        let answer = "```json\n{\"metadata\":{\"score\":80,\"reason\":\"ok\"},\"script\":{\"score\":70,\"reason\":\"\"},\
                      \"relevance\":{\"score\":90,\"reason\":\"\"},\"feedback\":[\"tighten intro\"],\"summary\":\"s\"}\n```";
        let review = advisor(answer)
            .analyze_quality("title", "keyword", "transcript")
            .await
            .found()
            .unwrap();
        assert_eq!(review.metadata.score, 80.0);
        assert_eq!(review.feedback, vec!["tighten intro"]);
    }

    #[tokio::test]
    async fn test_invalid_quality_json_is_failure() {
        let outcome = advisor("I think it is great").analyze_quality("t", "k", "x").await;
        assert!(matches!(outcome, ProviderOutcome::Failed(ProviderError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_ideas_truncated_to_three() {
        let answer = r#"[
            {"type":"Viral Hit","title":"a","reason":"r"},
            {"type":"Search-Optimized","title":"b","reason":"r"},
            {"type":"Creative Twist","title":"c","reason":"r"},
            {"type":"Viral Hit","title":"d","reason":"r"}
        ]"#;
        let ideas = advisor(answer).generate_ideas("kw", &[], &[]).await.found().unwrap();
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[1].kind, IdeaKind::SearchOptimized);
    }

    #[test]
    fn test_fallback_ideas_cover_each_kind() {
        let ideas = fallback_ideas("camping");
        let kinds: Vec<IdeaKind> = ideas.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IdeaKind::ViralHit, IdeaKind::SearchOptimized, IdeaKind::CreativeTwist]);
        assert!(ideas.iter().all(|i| i.title.contains("camping")));
    }

    #[test]
    fn test_ideas_prompt_handles_empty_context() {
        let prompt = ideas_prompt("kw", &[], &["Top".to_string()]);
        assert!(prompt.contains("Related searches: None provided"));
        assert!(prompt.contains("Top videos by views: Top"));
    }
}
