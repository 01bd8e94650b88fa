//! ViewScout - keyword and YouTube video analytics
//!
//! Gathers demand (search volume), supply (competing uploads) and performance
//! (top video views, channel sizes) signals from external providers, scores
//! them into market, content and revenue estimates, and caches the results.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod llm;
pub mod providers;
pub mod scoring;
pub mod synthetic;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::analysis::{Analyzer, KeywordReport, Providers, VideoDiagnostics};
pub use crate::cache::{CacheStore, FileCache, MemoryCache};
pub use crate::config::Config;
pub use crate::error::{AnalysisError, ProviderError, ProviderOutcome};
pub use crate::llm::{LLMConfig, LLMProvider, VideoIdea};
pub use crate::scoring::{DualCoreResult, MarketAnalysis, MatrixLabel, RevenueEstimate};
