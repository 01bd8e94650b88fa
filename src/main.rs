use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, reload, EnvFilter, Registry};

use viewscout::config::LoggingConfig;
use viewscout::{Analyzer, Config};

#[derive(Parser)]
#[command(name = "viewscout")]
#[command(version, about = "Keyword and YouTube video analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print results as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a keyword's market (volume, saturation, opportunity)
    Keyword {
        keyword: String,
    },
    /// Diagnose a YouTube video by URL
    Video {
        url: String,
    },
    /// Generate video ideas for a keyword
    Ideas {
        keyword: String,
    },
    /// Show current trending searches
    Trends,
    /// Run the JSON HTTP API
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Write the effective configuration to a TOML file
    InitConfig {
        #[arg(default_value = "viewscout.toml")]
        path: PathBuf,
    },
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// RUST_LOG wins over `--verbose`, which wins over the configured level
fn filter_directive(verbose: bool, level: &str) -> Option<String> {
    if std::env::var_os("RUST_LOG").is_some() {
        return None;
    }
    Some(if verbose { "viewscout=debug,info".to_string() } else { level.to_string() })
}

fn build_filter(directive: Option<String>) -> EnvFilter {
    match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::from_default_env(),
    }
}

/// Install the subscriber before config loading so its warnings are not lost
fn init_logging(verbose: bool) -> FilterHandle {
    let provisional = LoggingConfig::default().level;
    let (filter, handle) = reload::Layer::new(build_filter(filter_directive(verbose, &provisional)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    handle
}

fn apply_log_level(handle: &FilterHandle, config: &Config, verbose: bool) {
    if let Some(directive) = filter_directive(verbose, &config.logging.level) {
        if let Err(e) = handle.reload(EnvFilter::new(directive)) {
            warn!("Failed to apply configured log level: {}", e);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_handle = init_logging(cli.verbose);

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });
    apply_log_level(&log_handle, &config, cli.verbose);

    if let Err(e) = config.validate() {
        warn!("⚠️ Configuration issue: {}", e);
    }
    info!("{}", config.summary());

    if let Commands::InitConfig { path } = &cli.command {
        return config.save(path);
    }

    let analyzer = Analyzer::from_config(&config).context("failed to initialize analyzer")?;

    match cli.command {
        Commands::Keyword { keyword } => {
            let report = analyzer.analyze_keyword(&keyword).await?;
            if cli.json {
                return print_json(&report);
            }

            let market = &report.market;
            println!("🔍 {} ({:?} data)", report.keyword, report.source);
            println!("  Monthly searches: {} (PC {}, mobile {})",
                report.search_volume.total, report.search_volume.pc, report.search_volume.mobile);
            println!("  Uploads (30d): {}", report.signals.competitor_video_count_30d);
            println!("  Saturation: {:.3}", market.saturation_index);
            println!("  Opportunity: {}/100", market.opportunity_score);
            println!("  Niche score: {}/100", market.niche_score);
            println!("  Competition: {:?}", market.competition);
            println!("  💡 {}", market.market_insight);
            for video in &report.top_videos {
                println!("  ▶ {} ({} views, {} subscribers)", video.title, video.views, video.subscriber_count);
            }
        }

        Commands::Video { url } => {
            let result = analyzer.analyze_video(&url).await?;
            if cli.json {
                return print_json(&result);
            }

            let dual = &result.dual_core;
            println!("🎬 {}", result.video.title);
            if result.placeholder_metadata {
                println!("  ⚠️ Metadata unavailable, scores use placeholder data");
            }
            if result.placeholder_transcript {
                println!("  ⚠️ Transcript unavailable, script scores use an example transcript");
            }
            println!("  Keyword: {} ({:?})", result.keyword, result.keyword_source);
            println!("  Grade: {} ({}/100, topic {}/50, content {}/50)",
                dual.matrix_label, dual.total_score, dual.topic_score, dual.content_score);
            println!("  {}", dual.grade_reason);
            println!("  Hook {}/100, structure {}/100",
                result.script_analysis.hook_score, result.script_analysis.structure_score);
            println!("  Revenue: {} ~ {} {} (RPM {})",
                result.revenue.min, result.revenue.max, result.revenue.currency, result.revenue.factors.rpm_used);
            println!("  Viral velocity: {:.1}", result.viral_velocity);
            for tip in &dual.breakdown.feedback {
                println!("  • {}", tip);
            }
        }

        Commands::Ideas { keyword } => {
            let report = analyzer.analyze_keyword(&keyword).await?;
            let ideas = analyzer
                .generate_ideas(&report.keyword, &report.related_keywords, &report.top_video_titles())
                .await;
            if cli.json {
                return print_json(&ideas);
            }
            for idea in ideas {
                println!("💡 [{:?}] {}\n     {}", idea.kind, idea.title, idea.reason);
            }
        }

        Commands::Trends => {
            let items = analyzer.trending_topics().await;
            if cli.json {
                return print_json(&items);
            }
            if items.is_empty() {
                println!("📭 No trending searches available");
            }
            for (rank, item) in items.iter().enumerate() {
                println!("{:>2}. {} ({}+)", rank + 1, item.title, item.traffic);
            }
        }

        Commands::Serve { port } => serve(analyzer, &config, port).await?,
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

#[cfg(feature = "api")]
async fn serve(analyzer: Analyzer, config: &Config, port: Option<u16>) -> Result<()> {
    use std::sync::Arc;
    use viewscout::api::ApiServer;

    let mut server_config = config.server.clone();
    if let Some(port) = port {
        server_config.port = port;
    }
    ApiServer::new(Arc::new(analyzer), &server_config).start().await
}

#[cfg(not(feature = "api"))]
async fn serve(_analyzer: Analyzer, _config: &Config, _port: Option<u16>) -> Result<()> {
    anyhow::bail!("viewscout was built without the `api` feature")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_precedence() {
        if std::env::var_os("RUST_LOG").is_some() {
            assert_eq!(filter_directive(true, "warn"), None);
            return;
        }
        assert_eq!(filter_directive(false, "warn").as_deref(), Some("warn"));
        assert_eq!(filter_directive(true, "warn").as_deref(), Some("viewscout=debug,info"));
    }
}
