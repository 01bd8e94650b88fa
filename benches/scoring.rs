use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tokio::runtime::Runtime;
use viewscout::analysis::PLACEHOLDER_TRANSCRIPT;
use viewscout::cache::{CacheStore, MemoryCache};
use viewscout::scoring::{
    analyze_market, analyze_script, compute_content_score, diagnose_video, estimate_revenue,
    KeywordSignals,
};
use viewscout::synthetic::synthetic_report;

fn signals() -> KeywordSignals {
    KeywordSignals {
        monthly_search_volume: 42_000,
        competitor_video_count_30d: 1_300,
        top_video_average_views: 85_000.0,
        small_channel_ratio: 0.4,
    }
}

/// Benchmark market analysis
fn bench_market_analysis(c: &mut Criterion) {
    let signals = signals();
    c.bench_function("analyze_market", |b| {
        b.iter(|| analyze_market(black_box(&signals)))
    });
}

/// Benchmark heuristic content scoring and the full diagnosis
fn bench_content_scoring(c: &mut Criterion) {
    let market = analyze_market(&signals());
    let title = "Why your savings never grow: 3 mistakes to avoid";

    c.bench_function("content_score_heuristic", |b| {
        b.iter(|| {
            compute_content_score(
                black_box(PLACEHOLDER_TRANSCRIPT),
                black_box(title),
                black_box("savings"),
                None,
            )
        })
    });

    c.bench_function("diagnose_video", |b| {
        b.iter(|| {
            diagnose_video(
                black_box(PLACEHOLDER_TRANSCRIPT),
                black_box(title),
                black_box("savings"),
                black_box(&market),
                None,
            )
        })
    });
}

/// Benchmark script analysis on a long transcript
fn bench_script_analysis(c: &mut Criterion) {
    let long_script = PLACEHOLDER_TRANSCRIPT.repeat(40);
    c.bench_function("analyze_script_long", |b| {
        b.iter(|| analyze_script(black_box(&long_script)))
    });
}

fn bench_revenue(c: &mut Criterion) {
    c.bench_function("estimate_revenue", |b| {
        b.iter(|| {
            estimate_revenue(
                black_box(1_250_000),
                black_box("finance"),
                black_box(12.5),
                black_box(Some("2024-12-03T09:00:00Z")),
            )
        })
    });
}

/// Benchmark synthetic report generation and cache round trips
fn bench_synthetic_and_cache(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = MemoryCache::new(24);
    let now = Utc::now();

    c.bench_function("synthetic_report", |b| {
        b.iter(|| synthetic_report(black_box("camping gear"), now))
    });

    let payload = serde_json::to_value(synthetic_report("camping gear", now)).unwrap();
    c.bench_function("memory_cache_round_trip", |b| {
        b.iter(|| {
            rt.block_on(async {
                cache.set("camping gear", payload.clone()).await;
                cache.get(black_box("camping gear")).await
            })
        })
    });
}

criterion_group!(
    benches,
    bench_market_analysis,
    bench_content_scoring,
    bench_script_analysis,
    bench_revenue,
    bench_synthetic_and_cache
);
criterion_main!(benches);
