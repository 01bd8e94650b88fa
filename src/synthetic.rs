//! Reproducible stand-in data for when every provider is unavailable
//!
//! The generator is seeded from the keyword, so the same keyword always
//! produces the same report (apart from dates, which follow `now`).

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analysis::keyword::{
    average_views, small_channel_ratio, DataSource, KeywordReport, SearchVolumeSplit, TopVideo,
};
use crate::scoring::{analyze_market, KeywordSignals};

const TREND_MONTHS: usize = 12;
const TOP_VIDEOS: usize = 5;
/// Keywords starting with these letters simulate a crowded market
const CROWDED_INITIALS: [char; 4] = ['a', 'i', 's', 'r'];

fn seeded_rng(keyword: &str) -> StdRng {
    let digest = md5::compute(keyword.trim().to_lowercase().as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest.0[..8]);
    StdRng::seed_from_u64(u64::from_le_bytes(seed))
}

fn placeholder_thumbnail(keyword: &str, index: usize) -> String {
    let text: String = url::form_urlencoded::byte_serialize(keyword.as_bytes()).collect();
    format!("https://placehold.co/600x400/2a2a2a/FFF?text={}+{}", text, index + 1)
}

/// Build a synthetic [`KeywordReport`] for `keyword`
pub fn synthetic_report(keyword: &str, now: DateTime<Utc>) -> KeywordReport {
    let mut rng = seeded_rng(keyword);
    let normalized = keyword.trim().to_lowercase();

    let base_volume: u64 = rng.gen_range(1_000..501_000);
    let crowded = normalized
        .chars()
        .next()
        .map_or(false, |c| CROWDED_INITIALS.contains(&c));
    let video_ratio = if crowded {
        rng.gen_range(0.2..1.0)
    } else {
        rng.gen_range(0.001..0.051)
    };
    let video_count = (base_volume as f64 * video_ratio).floor() as u64;
    let avg_views: u64 = rng.gen_range(5_000..1_005_000);

    let monthly_trend = (0..TREND_MONTHS)
        .map(|_| (base_volume as f64 * rng.gen_range(0.8..1.2)).floor() as u64)
        .collect();

    let top_videos: Vec<TopVideo> = (0..TOP_VIDEOS)
        .map(|i| {
            let views = (avg_views as f64 * (1.5 - rng.gen::<f64>())).floor() as u64;
            let days_ago = rng.gen_range(0..365);
            let published = now - Duration::days(days_ago);
            TopVideo {
                id: format!("synthetic-video-{}", i),
                title: format!("{} - Ultimate Guide {}", keyword, i + 1),
                thumbnail: placeholder_thumbnail(keyword, i),
                channel_name: format!("Channel {}", (b'A' + i as u8) as char),
                views: views.max(1_000),
                published_at: published.format("%Y-%m-%d").to_string(),
                subscriber_count: rng.gen_range(1_000..1_001_000),
            }
        })
        .collect();

    let views: Vec<u64> = top_videos.iter().map(|v| v.views).collect();
    let subscribers: Vec<Option<u64>> = top_videos.iter().map(|v| Some(v.subscriber_count)).collect();

    let signals = KeywordSignals {
        monthly_search_volume: base_volume,
        competitor_video_count_30d: video_count,
        top_video_average_views: average_views(&views),
        small_channel_ratio: small_channel_ratio(&subscribers),
    };

    let related_keywords = vec![
        format!("{} tips", keyword),
        format!("{} tutorial", keyword),
        format!("how to {}", keyword),
        format!("best {}", keyword),
        format!("{} review", keyword),
        format!("{} {}", keyword, now.format("%Y")),
    ];

    KeywordReport {
        keyword: keyword.to_string(),
        source: DataSource::Synthetic,
        market: analyze_market(&signals),
        signals,
        search_volume: SearchVolumeSplit {
            total: base_volume,
            pc: 0,
            mobile: 0,
        },
        total_video_count: video_count,
        monthly_trend,
        last_7_days: Vec::new(),
        top_videos,
        related_keywords,
        generated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_reproducible_per_keyword() {
        let a = synthetic_report("camping", fixed_now());
        let b = synthetic_report("  Camping ", fixed_now());
        assert_eq!(a.signals, b.signals);
        assert_eq!(a.monthly_trend, b.monthly_trend);

        let c = synthetic_report("fishing", fixed_now());
        assert_ne!(a.signals, c.signals);
    }

    #[test]
    fn test_value_ranges() {
        for keyword in ["apple", "banana", "rust", "캠핑"] {
            let report = synthetic_report(keyword, fixed_now());
            assert_eq!(report.source, DataSource::Synthetic);
            assert!((1_000..501_000).contains(&report.signals.monthly_search_volume));
            assert_eq!(report.monthly_trend.len(), 12);
            assert_eq!(report.top_videos.len(), 5);
            assert!(report.top_videos.iter().all(|v| v.views >= 1_000));
            assert!(report.market.opportunity_score <= 100);
            assert_eq!(report.related_keywords.len(), 6);
        }
    }

    #[test]
    fn test_crowded_initials_raise_competition() {
        let crowded = synthetic_report("apple", fixed_now());
        let ratio = crowded.signals.competitor_video_count_30d as f64
            / crowded.signals.monthly_search_volume as f64;
        assert!(ratio >= 0.19);

        let quiet = synthetic_report("banana", fixed_now());
        let ratio = quiet.signals.competitor_video_count_30d as f64
            / quiet.signals.monthly_search_volume as f64;
        assert!(ratio < 0.06);
    }
}
