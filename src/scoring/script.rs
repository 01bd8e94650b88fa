//! Hook and structure analysis of a video script
use serde::{Deserialize, Serialize};

const NEGATIVE_WORDS: &[&str] = &[
    "주의", "실수", "절대", "손해", "위험", "망하는", "비밀", "경고", "최악",
    "warning", "mistake", "never", "danger", "worst", "secret",
];
const DIRECT_ADDRESS: &[&str] = &["당신", "여러분", "너", "구독자님", "시청자", "you", "your"];
const LOGICAL_MARKERS: &[&str] = &[
    "첫째", "둘째", "셋째", "첫 번째", "두 번째", "세 번째", "우선", "결론적으로",
    "요약하면", "예를 들어", "하지만", "반면",
    "first", "second", "third", "in conclusion", "for example", "however",
];
const OPEN_LOOPS: &[&str] = &[
    "잠시 후에", "영상 끝까지", "마지막에", "뒤에서", "공개합니다", "알려드릴게요",
    "stay until the end", "later in this video", "in a moment", "i'll reveal",
];

/// Script split into intro (first 15%), body and outro (last 10%) by characters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptSegments {
    pub intro: String,
    pub body: String,
    pub outro: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptAnalysis {
    /// 0-100
    pub hook_score: u8,
    /// 0-100
    pub structure_score: u8,
    pub hook_feedback: Vec<String>,
    pub structure_feedback: Vec<String>,
}

pub fn split_script(text: &str) -> ScriptSegments {
    let chars: Vec<char> = text.trim().chars().collect();
    let length = chars.len();
    if length == 0 {
        return ScriptSegments::default();
    }

    let intro_end = length * 15 / 100;
    let outro_start = length * 90 / 100;

    ScriptSegments {
        intro: chars[..intro_end].iter().collect(),
        body: chars[intro_end..outro_start].iter().collect(),
        outro: chars[outro_start..].iter().collect(),
    }
}

/// Latin terms match whole words only; Hangul terms match as substrings
fn contains_term(text: &str, term: &str) -> bool {
    if !term.is_ascii() {
        return text.contains(term);
    }
    text.match_indices(term).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn found_in<'a>(words: &[&'a str], text: &str) -> Vec<&'a str> {
    let lowered = text.to_lowercase();
    words.iter().copied().filter(|w| contains_term(&lowered, w)).collect()
}

fn hook_score(intro: &str) -> (u8, Vec<String>) {
    let mut score: u32 = 50;
    let mut feedback = Vec::new();

    if intro.contains('?') {
        score += 10;
    } else {
        feedback.push("Ask the viewer a question within the first 15% to invite engagement (?).".to_string());
    }

    if !found_in(NEGATIVE_WORDS, intro).is_empty() {
        score += 10;
    } else {
        feedback.push(
            "Use loss-aversion words such as 'warning', 'mistake' or 'never'.".to_string(),
        );
    }

    let direct = found_in(DIRECT_ADDRESS, intro).len() as u32;
    if direct > 0 {
        score += (direct * 5).min(10);
    } else {
        feedback.push("Address the viewer directly ('you') to increase immersion.".to_string());
    }

    if intro.chars().count() >= 100 {
        score += 5;
    }

    (score.min(100) as u8, feedback)
}

fn structure_score(full_text: &str, body: &str) -> (u8, Vec<String>) {
    let mut score: u32 = 40;
    let mut feedback = Vec::new();

    match found_in(LOGICAL_MARKERS, body).len() {
        0 => feedback.push(
            "The body lacks ordering or contrast connectors such as 'first', 'second'.".to_string(),
        ),
        1 => {
            score += 10;
            feedback.push(
                "Use more logical connectors ('first', 'however') to structure the content."
                    .to_string(),
            );
        }
        _ => score += 20,
    }

    if !found_in(OPEN_LOOPS, body).is_empty() {
        score += 20;
    } else {
        feedback.push(
            "Add open-loop lines ('stay until the end', 'in a moment') to keep viewers watching."
                .to_string(),
        );
    }

    if full_text.chars().count() > 500 {
        score += 20;
    }

    (score.min(100) as u8, feedback)
}

/// Score the hook (intro) and structure (body) of a script
pub fn analyze_script(full_text: &str) -> ScriptAnalysis {
    let segments = split_script(full_text);
    let (hook_score, hook_feedback) = hook_score(&segments.intro);
    let (structure_score, structure_feedback) = structure_score(full_text, &segments.body);

    ScriptAnalysis {
        hook_score,
        structure_score,
        hook_feedback,
        structure_feedback,
    }
}
