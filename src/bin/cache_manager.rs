use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use viewscout::cache::FileCache;
use viewscout::Config;

#[derive(Parser)]
#[command(name = "cache-manager")]
#[command(about = "Keyword cache management utility")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cache file (defaults to the configured cache path)
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Entry lifetime in hours (defaults to the configured TTL)
    #[arg(long)]
    ttl_hours: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all cached keywords
    List,
    /// Get cache statistics
    Stats,
    /// Invalidate the cache entry for a keyword
    Invalidate {
        /// Keyword to invalidate
        keyword: String,
    },
    /// Clear all cache entries
    Clear,
    /// Clean up expired cache entries
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    let cache = FileCache::new(
        cli.cache_file.unwrap_or_else(|| config.cache.path()),
        cli.ttl_hours.unwrap_or(config.cache.ttl_hours),
    );
    info!("📁 Cache file: {}", cache.path().display());

    match cli.command {
        Commands::List => {
            let entries = cache.list().await?;

            if entries.is_empty() {
                info!("📭 No cached keywords found");
                return Ok(());
            }

            info!("📚 Found {} cached keywords:", entries.len());

            for entry in entries {
                let status = if entry.valid { "✅ Valid" } else { "❌ Expired" };
                info!("  {} - {:.1} hours old, {}", entry.keyword, entry.age_hours, status);
            }
        }

        Commands::Stats => {
            let stats = cache.stats().await?;
            info!("📊 Cache Statistics:");
            info!("  Total entries: {}", stats.total_entries);
            info!("  Valid entries: {}", stats.valid_entries);
            info!("  Expired entries: {}", stats.expired_entries);
        }

        Commands::Invalidate { keyword } => {
            if cache.invalidate(&keyword).await? {
                info!("✅ Successfully invalidated cache for: {}", keyword);
            } else {
                warn!("⚠️ Keyword not found in cache: {}", keyword);
            }
        }

        Commands::Clear => {
            let removed = cache.clear().await?;
            info!("🗑️ Cleared {} cache entries", removed);
        }

        Commands::Cleanup => {
            let cleaned = cache.cleanup_expired().await?;
            if cleaned == 0 {
                info!("✨ No expired entries found");
            } else {
                info!("🧹 Cleaned up {} expired entries", cleaned);
            }
        }
    }

    Ok(())
}
