//! Display formatting shared by every view model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const NOT_AVAILABLE: &str = "N/A";

/// Compact count: `1.5M`, `3K`, `42`. Missing or NaN values render as `"0"`.
pub fn format_number(value: Option<f64>) -> String {
    let n = match value {
        Some(n) if n.is_finite() => n,
        _ => return "0".to_string(),
    };

    if n >= 1_000_000.0 {
        format!("{}M", to_fixed_1(n / 1_000_000.0))
    } else if n >= 1_000.0 {
        format!("{:.0}K", (n / 1_000.0).round())
    } else {
        format!("{:.0}", n.round())
    }
}

pub fn format_count(count: u64) -> String {
    format_number(Some(count as f64))
}

/// One decimal place, `"N/A"` when absent.
pub fn format_score(value: Option<f64>) -> String {
    match value {
        Some(n) if n.is_finite() => to_fixed_1(n),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Store ratings: zero means the store never reported one.
pub fn format_rating(rating: f64) -> String {
    if rating == 0.0 {
        return NOT_AVAILABLE.to_string();
    }
    format_score(Some(rating))
}

pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    format!("{:.0}%", value.round())
}

pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|ts| ts.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Story points with their t-shirt size. Unknown values pass through.
pub fn format_effort(effort: &str) -> String {
    let size = match effort.trim() {
        "1" => "XS",
        "2" => "S",
        "3" => "M",
        "5" => "L",
        "8" => "XL",
        "13" => "XXL",
        _ => return effort.to_string(),
    };
    format!("{} ({size})", effort.trim())
}

/// One decimal, rounding the exact binary value half away from zero.
///
/// Only multiples of 0.25 with an odd numerator sit exactly halfway at one decimal; everything
/// else is already rounded correctly by the formatter (0.35 is stored just below 0.35).
fn to_fixed_1(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters.rem_euclid(2.0) == 1.0 {
        let tenths = (value * 10.0).round();
        return format!("{:.1}", tenths / 10.0);
    }
    format!("{value:.1}")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RatingTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl RatingTier {
    pub fn from_rating(rating: f64) -> Self {
        if rating >= 4.5 {
            RatingTier::Excellent
        } else if rating >= 4.0 {
            RatingTier::Good
        } else if rating >= 3.0 {
            RatingTier::Fair
        } else {
            RatingTier::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl PriorityLevel {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" | "alta" => PriorityLevel::High,
            "medium" | "média" | "media" => PriorityLevel::Medium,
            "low" | "baixa" => PriorityLevel::Low,
            _ => PriorityLevel::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_number_millions() {
        assert_eq!(format_number(Some(1_500_000.0)), "1.5M");
        assert_eq!(format_number(Some(1_000_000.0)), "1.0M");
        assert_eq!(format_number(Some(12_340_000.0)), "12.3M");
    }

    #[test]
    fn test_format_number_thousands_round() {
        assert_eq!(format_number(Some(2_500.0)), "3K");
        assert_eq!(format_number(Some(1_000.0)), "1K");
        assert_eq!(format_number(Some(1_499.0)), "1K");
        assert_eq!(format_number(Some(999_999.0)), "1000K");
    }

    #[test]
    fn test_format_number_small_and_missing() {
        assert_eq!(format_number(Some(42.0)), "42");
        assert_eq!(format_number(Some(0.0)), "0");
        assert_eq!(format_number(None), "0");
        assert_eq!(format_number(Some(f64::NAN)), "0");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn test_format_score_one_decimal() {
        assert_eq!(format_score(Some(0.634)), "0.6");
        assert_eq!(format_score(Some(4.25)), "4.3");
        assert_eq!(format_score(Some(4.0)), "4.0");
        assert_eq!(format_score(Some(0.25)), "0.3");
        assert_eq!(format_score(Some(-0.25)), "-0.3");
        assert_eq!(format_score(Some(0.35)), "0.3");
        assert_eq!(format_score(Some(0.45)), "0.5");
        assert_eq!(format_score(Some(1.15)), "1.1");
        assert_eq!(format_score(None), "N/A");
    }

    #[test]
    fn test_format_rating_zero_is_not_available() {
        assert_eq!(format_rating(0.0), "N/A");
        assert_eq!(format_rating(4.62), "4.6");
    }

    #[test]
    fn test_format_percentage_and_date() {
        assert_eq!(format_percentage(59.6), "60%");
        assert_eq!(format_percentage(f64::NAN), "0%");
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(format_date(Some(ts)), "05/03/2024");
        assert_eq!(format_date(None), "N/A");
    }

    #[test]
    fn test_format_effort() {
        assert_eq!(format_effort("3"), "3 (M)");
        assert_eq!(format_effort("13"), "13 (XXL)");
        assert_eq!(format_effort("4"), "4");
    }

    #[test]
    fn test_rating_tiers() {
        assert_eq!(RatingTier::from_rating(4.7), RatingTier::Excellent);
        assert_eq!(RatingTier::from_rating(4.0), RatingTier::Good);
        assert_eq!(RatingTier::from_rating(3.2), RatingTier::Fair);
        assert_eq!(RatingTier::from_rating(0.0), RatingTier::Poor);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(PriorityLevel::parse("High"), PriorityLevel::High);
        assert_eq!(PriorityLevel::parse(" low "), PriorityLevel::Low);
        assert_eq!(PriorityLevel::parse("urgent"), PriorityLevel::Unknown);
    }
}
