//! Revenue estimation (KRW) from views, category, length and upload season
use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const CURRENCY: &str = "KRW";

/// Content shorter than this many minutes is treated as Shorts
const SHORTS_MAX_MINUTES: f64 = 1.0;
/// Long-form threshold that unlocks mid-roll ads
const LONG_FORM_MINUTES: f64 = 8.0;
const LONG_FORM_MULTIPLIER: f64 = 1.8;
const DECEMBER_MULTIPLIER: f64 = 1.3;
const NEW_YEAR_MULTIPLIER: f64 = 0.7;

/// Revenue per 1000 views, in KRW
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpmBand {
    pub min: u32,
    pub max: u32,
}

const fn band(min: u32, max: u32) -> RpmBand {
    RpmBand { min, max }
}

pub const SHORTS_RPM: RpmBand = band(10, 30);
pub const DEFAULT_RPM: RpmBand = band(2000, 5000);
const VLOG_RPM: RpmBand = band(1500, 4000);

const RPM_TABLE: &[(&str, RpmBand)] = &[
    ("finance", band(15000, 35000)),
    ("tech", band(6000, 12000)),
    ("vlog", VLOG_RPM),
    ("entertainment", band(1500, 4000)),
    ("news", band(1000, 2500)),
    ("shorts", SHORTS_RPM),
    ("default", DEFAULT_RPM),
];

/// Look up the RPM band for a category name.
///
/// Unknown names containing "vlog" fall back to the vlog band, anything else
/// to the default band.
pub fn rpm_band(category: &str) -> RpmBand {
    let key = category.trim().to_lowercase();
    if let Some((_, found)) = RPM_TABLE.iter().find(|(name, _)| *name == key.as_str()) {
        return *found;
    }
    if key.contains("vlog") {
        return VLOG_RPM;
    }
    DEFAULT_RPM
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueFactors {
    /// Human readable band, e.g. "15,000 ~ 35,000"
    pub rpm_used: String,
    pub length_boost: bool,
    pub season_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueEstimate {
    pub min: u64,
    pub max: u64,
    pub currency: String,
    pub factors: RevenueFactors,
}

/// Parse the upload month from an RFC 3339 timestamp or a plain `YYYY-MM-DD` date
fn upload_month(upload_date: &str) -> Option<u32> {
    let upload_date = upload_date.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(upload_date) {
        return Some(ts.month());
    }
    let date_part = upload_date.get(..10).unwrap_or(upload_date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|d| d.month())
}

/// Seasonal ad-rate multiplier for the upload month
pub fn season_multiplier(upload_date: Option<&str>) -> f64 {
    match upload_date.and_then(upload_month) {
        Some(12) => DECEMBER_MULTIPLIER,
        Some(1) | Some(2) => NEW_YEAR_MULTIPLIER,
        _ => 1.0,
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Estimate the revenue range of a video.
///
/// Shorts use their own RPM band and never get length or season multipliers.
pub fn estimate_revenue(
    views: u64,
    category: &str,
    duration_minutes: f64,
    upload_date: Option<&str>,
) -> RevenueEstimate {
    let is_shorts = duration_minutes < SHORTS_MAX_MINUTES;

    let (band, length_multiplier, season) = if is_shorts {
        (SHORTS_RPM, 1.0, 1.0)
    } else {
        let length = if duration_minutes >= LONG_FORM_MINUTES {
            LONG_FORM_MULTIPLIER
        } else {
            1.0
        };
        (rpm_band(category), length, season_multiplier(upload_date))
    };

    let calc = |rpm: u32| -> u64 {
        let revenue = (views as f64 / 1000.0) * rpm as f64 * length_multiplier * season;
        revenue.max(0.0).floor() as u64
    };

    RevenueEstimate {
        min: calc(band.min),
        max: calc(band.max),
        currency: CURRENCY.to_string(),
        factors: RevenueFactors {
            rpm_used: format!("{} ~ {}", group_thousands(band.min), group_thousands(band.max)),
            length_boost: length_multiplier > 1.0,
            season_multiplier: season,
        },
    }
}

/// Views per hour^1.5 since upload, with a one hour floor
pub fn calculate_viral_velocity(views: u64, hours_since_upload: f64) -> f64 {
    let hours = hours_since_upload.max(1.0);
    views as f64 / hours.powf(1.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finance_long_form_december() {
        let estimate = estimate_revenue(1_000_000, "finance", 10.0, Some("2024-12-15"));
        assert_eq!(estimate.min, (1000.0 * 15000.0 * 1.8 * 1.3_f64).floor() as u64);
        assert_eq!(estimate.max, (1000.0 * 35000.0 * 1.8 * 1.3_f64).floor() as u64);
        assert_eq!(estimate.currency, "KRW");
        assert_eq!(estimate.factors.rpm_used, "15,000 ~ 35,000");
        assert!(estimate.factors.length_boost);
        assert_eq!(estimate.factors.season_multiplier, 1.3);
    }

    #[test]
    fn test_shorts_never_apply_multipliers() {
        for category in ["finance", "tech", "vlog", "unknown"] {
            for date in [Some("2024-12-24"), Some("2024-01-10"), None] {
                let estimate = estimate_revenue(100_000, category, 0.5, date);
                assert!(!estimate.factors.length_boost);
                assert_eq!(estimate.factors.season_multiplier, 1.0);
                assert_eq!(estimate.min, 1000);
                assert_eq!(estimate.max, 3000);
            }
        }
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(rpm_band("Tech"), band(6000, 12000));
        assert_eq!(rpm_band("daily-vlog"), VLOG_RPM);
        assert_eq!(rpm_band("education"), DEFAULT_RPM);
    }

    #[test]
    fn test_season_from_timestamps() {
        assert_eq!(season_multiplier(Some("2024-02-03T10:00:00Z")), 0.7);
        assert_eq!(season_multiplier(Some("2024-06-03")), 1.0);
        assert_eq!(season_multiplier(Some("not a date")), 1.0);
        assert_eq!(season_multiplier(None), 1.0);
    }

    #[test]
    fn test_short_regular_video_has_no_length_boost() {
        let estimate = estimate_revenue(10_000, "news", 5.0, Some("2024-05-01"));
        assert!(!estimate.factors.length_boost);
        assert_eq!(estimate.min, 10_000);
        assert_eq!(estimate.max, 25_000);
    }

    #[test]
    fn test_viral_velocity() {
        assert_eq!(calculate_viral_velocity(1000, 0.2), 1000.0);
        assert!((calculate_viral_velocity(8000, 4.0) - 1000.0).abs() < 1e-6);
    }
}
