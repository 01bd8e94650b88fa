//! Dual-core video diagnosis: topic score (market) + content score (quality)

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::market::MarketAnalysis;

/// Characters treated as the opening ~60 seconds of a transcript
pub const HOOK_WINDOW_CHARS: usize = 300;

const POWER_WORDS: &str = r"(?i)이유|방법|충격|공개|비밀|why|how to|secret|revealed|shocking";
const PAIN_WORDS: &str = r"(?i)손해|위험|조심|절대|mistake|danger|careful|never";
const PROMISE_WORDS: &str = r"(?i)공개|알려|해결|방법|reveal|show you|solve|how to";
const STRUCTURE_MARKERS: &str = r"(?i)첫째|두번째|결론|요약|first|second|in conclusion|to sum up";

/// Sub-scores returned by an LLM quality review (each 0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub metadata: ScoredReason,
    pub script: ScoredReason,
    pub relevance: ScoredReason,
    #[serde(default)]
    pub feedback: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReason {
    pub score: f64,
    #[serde(default)]
    pub reason: String,
}

/// Content score breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentScoreDetail {
    /// Max 20
    pub metadata: u8,
    /// Max 20
    pub script: u8,
    /// Max 10
    pub relevance: u8,
    pub feedback: Vec<String>,
    pub summary: Option<String>,
}

impl ContentScoreDetail {
    pub fn total(&self) -> u8 {
        self.metadata + self.script + self.relevance
    }
}

/// Letter grade derived from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatrixLabel {
    C,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "A+")]
    APlus,
    S,
}

impl MatrixLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatrixLabel::S => "S",
            MatrixLabel::APlus => "A+",
            MatrixLabel::AMinus => "A-",
            MatrixLabel::BPlus => "B+",
            MatrixLabel::BMinus => "B-",
            MatrixLabel::C => "C",
        }
    }
}

impl fmt::Display for MatrixLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined topic + content diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualCoreResult {
    /// Max 50
    pub topic_score: u8,
    /// Max 50
    pub content_score: u8,
    /// Max 100
    pub total_score: u8,
    pub matrix_label: MatrixLabel,
    pub grade_reason: String,
    pub market_insight: String,
    pub breakdown: ContentScoreDetail,
}

/// Topic score (0-50): search volume (25) + blue-ocean room (25)
pub fn compute_topic_score(market: &MarketAnalysis) -> u8 {
    let volume_points = (market.monthly_volume as f64 / 10_000.0 * 25.0).min(25.0);

    let saturation = market.saturation_index;
    let blue_points = if saturation < 0.1 {
        25.0
    } else if saturation > 2.0 {
        0.0
    } else {
        25.0 * (1.0 - saturation / 2.0)
    };

    (volume_points + blue_points).floor().clamp(0.0, 50.0) as u8
}

fn matches(pattern: &str, text: &str) -> bool {
    Regex::new(pattern).map_or(false, |re| re.is_match(text))
}

fn head_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    haystack.to_lowercase().contains(&keyword.to_lowercase())
}

/// Scale an LLM sub-score (0-100) down to `max` points
fn scale_ai_score(score: f64, factor: f64, max: u8) -> u8 {
    (score.clamp(0.0, 100.0) * factor).floor().min(max as f64) as u8
}

/// Content score (0-50) from an LLM review when available, otherwise from
/// text heuristics over the title and transcript.
pub fn compute_content_score(
    transcript: &str,
    title: &str,
    keyword: &str,
    ai_quality: Option<&QualityAssessment>,
) -> ContentScoreDetail {
    if let Some(ai) = ai_quality {
        return ContentScoreDetail {
            metadata: scale_ai_score(ai.metadata.score, 0.2, 20),
            script: scale_ai_score(ai.script.score, 0.2, 20),
            relevance: scale_ai_score(ai.relevance.score, 0.1, 10),
            feedback: ai.feedback.clone(),
            summary: Some(ai.summary.clone()).filter(|s| !s.is_empty()),
        };
    }

    let mut feedback = Vec::new();

    // Metadata (max 20)
    let mut metadata = 0u8;
    let title_len = title.chars().count();
    if (15..=40).contains(&title_len) {
        metadata += 5;
    } else {
        feedback.push("The title is too short or too long (15-40 characters recommended).".to_string());
    }

    if title.contains('?') || title.contains('!') || matches(POWER_WORDS, title) {
        metadata += 5;
    } else {
        feedback.push(
            "Add a hook word to the title such as 'shocking', 'revealed' or 'why'.".to_string(),
        );
    }

    // Thumbnail and thumbnail text are not analyzed, credited as passing
    metadata += 5;
    metadata += 5;

    // Script (max 20)
    let opening = head_chars(transcript, HOOK_WINDOW_CHARS);
    let mut hook_points = 0u8;
    if opening.contains('?') {
        hook_points += 3;
    }
    if matches(PAIN_WORDS, opening) {
        hook_points += 4;
    }
    if matches(PROMISE_WORDS, opening) {
        hook_points += 3;
    }
    if hook_points < 5 {
        feedback.push(
            "Mention the viewer's pain or benefit more strongly within the first 60 seconds."
                .to_string(),
        );
    }
    let mut script = hook_points.min(10);

    if matches(STRUCTURE_MARKERS, transcript) {
        script += 5;
    } else {
        feedback.push(
            "Use logical structure such as 'first, second' in the script to reduce drop-off."
                .to_string(),
        );
    }

    // Readability is not measured, credited as passing
    script += 5;

    // Relevance (max 10)
    let mut relevance = 0u8;
    if contains_keyword(transcript, keyword) {
        relevance += 5;
    } else {
        feedback.push(format!(
            "The video body barely mentions the target keyword '{}'.",
            keyword
        ));
    }

    if contains_keyword(opening, keyword) {
        relevance += 5;
    } else {
        feedback.push(format!(
            "Mention the topic keyword '{}' within the first 30 seconds of the video.",
            keyword
        ));
    }

    ContentScoreDetail {
        metadata,
        script,
        relevance,
        feedback,
        summary: None,
    }
}

/// Map a total score (0-100) onto the six-level matrix
pub fn classify_matrix(total_score: u8) -> MatrixLabel {
    match total_score {
        90..=u8::MAX => MatrixLabel::S,
        80..=89 => MatrixLabel::APlus,
        70..=79 => MatrixLabel::AMinus,
        60..=69 => MatrixLabel::BPlus,
        50..=59 => MatrixLabel::BMinus,
        _ => MatrixLabel::C,
    }
}

/// Short explanation of the grade
pub fn grade_reason(total_score: u8, topic_score: u8, content_score: u8) -> &'static str {
    let gap = topic_score as i16 - content_score as i16;

    if total_score >= 90 {
        "Topic choice and content quality are in perfect harmony. Breakout potential is very high!"
    } else if total_score >= 80 {
        "An excellent video. Polishing a few small details can reach the S grade."
    } else if gap >= 15 {
        "The topic (keyword) is well chosen, but the content lacks engagement or structure. Improve the script."
    } else if gap <= -15 {
        "The video quality is high, but the topic is rarely searched or too competitive. Consider the market more."
    } else if total_score >= 60 {
        "Solid overall but without a clear strength. Strengthen the thumbnail or the opening hook."
    } else {
        "Both the topic choice and the content structure need a full review."
    }
}

/// Run the dual-core diagnosis for one video
pub fn diagnose_video(
    transcript: &str,
    title: &str,
    keyword: &str,
    market: &MarketAnalysis,
    ai_quality: Option<&QualityAssessment>,
) -> DualCoreResult {
    let topic_score = compute_topic_score(market);
    let breakdown = compute_content_score(transcript, title, keyword, ai_quality);
    let content_score = breakdown.total().min(50);
    let total_score = (topic_score + content_score).min(100);

    DualCoreResult {
        topic_score,
        content_score,
        total_score,
        matrix_label: classify_matrix(total_score),
        grade_reason: grade_reason(total_score, topic_score, content_score).to_string(),
        market_insight: market.market_insight.clone(),
        breakdown,
    }
}
