//! API request handlers

use crate::analysis::{Analyzer, KeywordReport, VideoDiagnostics};
use crate::error::Result;
use crate::llm::VideoIdea;
use crate::providers::TrendItem;

use super::models::{DiagnoseRequest, HealthStatus, IdeasRequest};

/// Handle health check requests
pub fn health_check() -> HealthStatus {
    HealthStatus {
        status: "healthy".to_string(),
        service: "viewscout".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

pub async fn keyword_report(analyzer: &Analyzer, keyword: &str) -> Result<KeywordReport> {
    analyzer.analyze_keyword(keyword).await
}

pub async fn diagnose_video(analyzer: &Analyzer, request: &DiagnoseRequest) -> Result<VideoDiagnostics> {
    analyzer.analyze_video(&request.url).await
}

/// Ideas from the request context; an empty context is filled from the
/// keyword report
pub async fn video_ideas(analyzer: &Analyzer, request: &IdeasRequest) -> Result<Vec<VideoIdea>> {
    let (related, titles) = if request.related_keywords.is_empty() && request.top_video_titles.is_empty() {
        let report = analyzer.analyze_keyword(&request.keyword).await?;
        let titles = report.top_video_titles();
        (report.related_keywords, titles)
    } else {
        (request.related_keywords.clone(), request.top_video_titles.clone())
    };

    Ok(analyzer.generate_ideas(request.keyword.trim(), &related, &titles).await)
}

pub async fn trending(analyzer: &Analyzer) -> Vec<TrendItem> {
    analyzer.trending_topics().await
}
