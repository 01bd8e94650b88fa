//! Market analysis: saturation, opportunity and niche scoring for a keyword
use serde::{Deserialize, Serialize};
use std::fmt;

/// Saturation reported when there is no search demand at all
pub const ZERO_VOLUME_SATURATION: f64 = 999.0;

/// Saturation at or below this normalizes to 0 (best)
const SATURATION_BEST: f64 = 0.05;
/// Saturation at or above this normalizes to 1 (worst)
const SATURATION_WORST: f64 = 5.0;
/// Average views of top videos that earn the full view-gap credit
const VIEW_GAP_FULL: f64 = 100_000.0;
/// Below this saturation a keyword counts as blue ocean
const BLUE_OCEAN_THRESHOLD: f64 = 0.5;

/// Raw demand/supply/performance signals for one keyword
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeywordSignals {
    /// Monthly searches (PC + mobile)
    pub monthly_search_volume: u64,
    /// Videos uploaded for the keyword in the last 30 days
    pub competitor_video_count_30d: u64,
    /// Average view count of the top-ranking videos
    pub top_video_average_views: f64,
    /// Fraction of top-ranking videos coming from small channels
    pub small_channel_ratio: f64,
}

impl KeywordSignals {
    /// Fraction of top-ranking videos coming from big channels
    pub fn big_channel_ratio(&self) -> f64 {
        1.0 - self.small_channel_ratio.clamp(0.0, 1.0)
    }
}

/// Competition color shown next to a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Competition {
    Blue,
    Red,
}

/// Insight band chosen from search volume and saturation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketInsight {
    InsufficientData,
    TooLowDemand,
    RedOcean,
    Competitive,
    BlueOcean,
    Moderate,
}

impl MarketInsight {
    pub fn classify(monthly_search_volume: u64, saturation_index: f64) -> Self {
        if monthly_search_volume < 1000 {
            MarketInsight::TooLowDemand
        } else if saturation_index > 2.0 {
            MarketInsight::RedOcean
        } else if saturation_index > 1.0 {
            MarketInsight::Competitive
        } else if saturation_index < 0.1 {
            MarketInsight::BlueOcean
        } else {
            MarketInsight::Moderate
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            MarketInsight::InsufficientData => "Not enough data to analyze this keyword.",
            MarketInsight::TooLowDemand => {
                "⚠️ Almost nobody searches for this topic. Search demand is too low."
            }
            MarketInsight::RedOcean => {
                "⚠️ Far more videos are published than the search demand supports (red ocean)."
            }
            MarketInsight::Competitive => {
                "⚡ Competition is fairly intense. Differentiated content is a must."
            }
            MarketInsight::BlueOcean => {
                "🎉 A near-perfect blue ocean with almost no competitors. Jump in now."
            }
            MarketInsight::Moderate => {
                "✅ Competition is at a healthy level. Quality can win here."
            }
        }
    }
}

impl fmt::Display for MarketInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Market analysis derived from [`KeywordSignals`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub saturation_index: f64,
    /// 0-100
    pub opportunity_score: u8,
    pub is_blue_ocean: bool,
    pub competition: Competition,
    /// 0-100, higher means more room for small channels
    pub niche_score: u8,
    pub monthly_volume: u64,
    pub insight: MarketInsight,
    pub market_insight: String,
}

impl MarketAnalysis {
    /// Maximum-competition state used when search demand is zero
    pub fn zero_volume() -> Self {
        let insight = MarketInsight::InsufficientData;
        Self {
            saturation_index: ZERO_VOLUME_SATURATION,
            opportunity_score: 0,
            is_blue_ocean: false,
            competition: Competition::Red,
            niche_score: 0,
            monthly_volume: 0,
            insight,
            market_insight: insight.message().to_string(),
        }
    }
}

/// Competing uploads per monthly search.
///
/// Zero volume returns [`ZERO_VOLUME_SATURATION`] instead of dividing.
pub fn compute_saturation(monthly_search_volume: u64, competitor_count: u64) -> f64 {
    if monthly_search_volume == 0 {
        return ZERO_VOLUME_SATURATION;
    }
    competitor_count as f64 / monthly_search_volume.max(1) as f64
}

/// Normalize saturation into [0, 1], lower is better
fn normalize_saturation(saturation_index: f64) -> f64 {
    if saturation_index <= SATURATION_BEST {
        0.0
    } else if saturation_index >= SATURATION_WORST {
        1.0
    } else {
        (saturation_index - SATURATION_BEST) / (SATURATION_WORST - SATURATION_BEST)
    }
}

/// Opportunity score (0-100): 60% low saturation, 40% view potential
pub fn compute_opportunity(saturation_index: f64, top_video_average_views: f64) -> u8 {
    let c_norm = normalize_saturation(saturation_index);
    let v_gap = (top_video_average_views.max(0.0) / VIEW_GAP_FULL).min(1.0);
    let score = (1.0 - c_norm) * 60.0 + v_gap * 40.0;
    score.max(0.0).floor().min(100.0) as u8
}

/// Full market analysis for a keyword
pub fn analyze_market(signals: &KeywordSignals) -> MarketAnalysis {
    if signals.monthly_search_volume == 0 {
        return MarketAnalysis::zero_volume();
    }

    let saturation_index = compute_saturation(
        signals.monthly_search_volume,
        signals.competitor_video_count_30d,
    );
    let opportunity_score =
        compute_opportunity(saturation_index, signals.top_video_average_views);
    let niche_score = ((1.0 - signals.big_channel_ratio()) * 100.0)
        .floor()
        .clamp(0.0, 100.0) as u8;
    let is_blue_ocean = saturation_index < BLUE_OCEAN_THRESHOLD;
    let insight = MarketInsight::classify(signals.monthly_search_volume, saturation_index);

    MarketAnalysis {
        saturation_index,
        opportunity_score,
        is_blue_ocean,
        competition: if is_blue_ocean {
            Competition::Blue
        } else {
            Competition::Red
        },
        niche_score,
        monthly_volume: signals.monthly_search_volume,
        insight,
        market_insight: insight.message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(volume: u64, competitors: u64, views: f64, small: f64) -> KeywordSignals {
        KeywordSignals {
            monthly_search_volume: volume,
            competitor_video_count_30d: competitors,
            top_video_average_views: views,
            small_channel_ratio: small,
        }
    }

    #[test]
    fn test_zero_volume_sentinel() {
        assert_eq!(compute_saturation(0, 12345), ZERO_VOLUME_SATURATION);

        let market = analyze_market(&signals(0, 500, 1_000_000.0, 1.0));
        assert_eq!(market.saturation_index, 999.0);
        assert_eq!(market.opportunity_score, 0);
        assert!(!market.is_blue_ocean);
        assert_eq!(market.competition, Competition::Red);
        assert_eq!(market.insight, MarketInsight::InsufficientData);
    }

    #[test]
    fn test_saturation_ratio() {
        assert_eq!(compute_saturation(1000, 500), 0.5);
        assert_eq!(compute_saturation(10, 0), 0.0);
    }

    #[test]
    fn test_opportunity_breakpoints() {
        // Best saturation with full view credit
        assert_eq!(compute_opportunity(0.01, 250_000.0), 100);
        // Worst saturation, no views
        assert_eq!(compute_opportunity(7.5, 0.0), 0);
        // Worst saturation, half view credit
        assert_eq!(compute_opportunity(5.0, 50_000.0), 20);
        // Breakpoint itself counts as best saturation: 60 + 40 * 0.1
        assert_eq!(compute_opportunity(0.05, 10_000.0), 64);
        // Partially saturated market scores strictly between the extremes
        let partial = compute_opportunity(2.5, 0.0);
        assert!(partial > 0 && partial < 60);
    }

    #[test]
    fn test_opportunity_bounded_for_positive_volume() {
        for volume in [1u64, 10, 999, 1000, 50_000, 1_000_000] {
            for competitors in [0u64, 1, 100, 10_000, 10_000_000] {
                for views in [0.0, 500.0, 99_999.0, 5_000_000.0] {
                    let sat = compute_saturation(volume, competitors);
                    let score = compute_opportunity(sat, views);
                    assert!(score <= 100, "score {} out of range", score);
                }
            }
        }
    }

    #[test]
    fn test_insight_bands() {
        assert_eq!(MarketInsight::classify(500, 0.01), MarketInsight::TooLowDemand);
        assert_eq!(MarketInsight::classify(5000, 2.5), MarketInsight::RedOcean);
        assert_eq!(MarketInsight::classify(5000, 1.5), MarketInsight::Competitive);
        assert_eq!(MarketInsight::classify(5000, 0.05), MarketInsight::BlueOcean);
        assert_eq!(MarketInsight::classify(5000, 0.5), MarketInsight::Moderate);
    }

    #[test]
    fn test_blue_ocean_and_niche() {
        let market = analyze_market(&signals(10_000, 4_000, 50_000.0, 0.3));
        assert!(market.is_blue_ocean);
        assert_eq!(market.competition, Competition::Blue);
        assert_eq!(market.niche_score, 30);
        assert_eq!(market.monthly_volume, 10_000);

        let crowded = analyze_market(&signals(10_000, 6_000, 50_000.0, 0.0));
        assert!(!crowded.is_blue_ocean);
        assert_eq!(crowded.niche_score, 0);
    }
}
