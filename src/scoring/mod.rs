//! Scoring engine
//!
//! Pure, deterministic functions that turn normalized keyword and video
//! signals into market, content and revenue scores. Nothing in here performs
//! I/O; the orchestrator in [`crate::analysis`] gathers the inputs.

pub mod market;
pub mod diagnosis;
pub mod revenue;
pub mod script;

pub use market::{
    analyze_market, compute_opportunity, compute_saturation, Competition, KeywordSignals,
    MarketAnalysis, MarketInsight, ZERO_VOLUME_SATURATION,
};
pub use diagnosis::{
    classify_matrix, compute_content_score, compute_topic_score, diagnose_video, grade_reason,
    ContentScoreDetail, DualCoreResult, MatrixLabel, QualityAssessment, ScoredReason,
};
pub use revenue::{
    calculate_viral_velocity, estimate_revenue, rpm_band, RevenueEstimate, RevenueFactors, RpmBand,
};
pub use script::{analyze_script, split_script, ScriptAnalysis, ScriptSegments};
