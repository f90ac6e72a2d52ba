//! Mood scale: label values, good/bad classification, and trend thresholds.
//!
//! Two slope thresholds coexist on purpose. Chart trend lines use
//! [`TREND_SLOPE_THRESHOLD`]; the entry-indexed regression in the
//! distribution summary is more sensitive and uses
//! [`DISTRIBUTION_SLOPE_THRESHOLD`].

use serde::Serialize;

/// Value used for any label outside the scale.
pub const NEUTRAL_VALUE: u8 = 4;

/// Lowest value on the scale.
pub const MIN_VALUE: f64 = 1.0;

/// Highest value on the scale.
pub const MAX_VALUE: f64 = 7.0;

/// Slope beyond which a chart trend counts as improving/declining.
pub const TREND_SLOPE_THRESHOLD: f64 = 0.1;

/// Slope beyond which the distribution summary counts as improving/declining.
pub const DISTRIBUTION_SLOPE_THRESHOLD: f64 = 0.05;

/// Map a label to its 1-7 value. Unknown labels are neutral.
pub fn value_of(label: &str) -> u8 {
    match label.trim().to_lowercase().as_str() {
        "very bad" => 1,
        "bad" => 2,
        "slightly bad" => 3,
        "neutral" => 4,
        "slightly well" => 5,
        "well" => 6,
        "very well" => 7,
        _ => NEUTRAL_VALUE,
    }
}

/// Good/neutral/bad bucket of a mood value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodClass {
    Good,
    Neutral,
    Bad,
}

/// Classify a (possibly averaged) mood value: `>= 5` good, `<= 3` bad.
pub fn classify(value: f64) -> MoodClass {
    if value >= 5.0 {
        MoodClass::Good
    } else if value <= 3.0 {
        MoodClass::Bad
    } else {
        MoodClass::Neutral
    }
}

/// Whether a single entry counts toward a good-mood streak.
pub fn is_good(value: u8) -> bool {
    classify(value as f64) == MoodClass::Good
}

/// Direction of a regression slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl TrendDirection {
    /// Classify a chart trend slope (`±0.1`).
    pub fn from_slope(slope: f64) -> Self {
        Self::with_threshold(slope, TREND_SLOPE_THRESHOLD)
    }

    /// Classify an entry-indexed distribution slope (`±0.05`).
    pub fn from_distribution_slope(slope: f64) -> Self {
        Self::with_threshold(slope, DISTRIBUTION_SLOPE_THRESHOLD)
    }

    fn with_threshold(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            TrendDirection::Improving
        } else if slope < -threshold {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Stable => "stable",
            TrendDirection::Declining => "declining",
        }
    }

    /// Chart icon name.
    pub fn icon(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "trending_up",
            TrendDirection::Stable => "trending_flat",
            TrendDirection::Declining => "trending_down",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "Improving trend",
            TrendDirection::Stable => "Stable trend",
            TrendDirection::Declining => "Declining trend",
        }
    }

    /// Chart color (green up, orange flat, red down).
    pub fn color(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "#4CAF50",
            TrendDirection::Stable => "#FF9800",
            TrendDirection::Declining => "#F44336",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Round to `places` decimals (half away from zero).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_of_is_strictly_monotonic() {
        let labels = [
            "very bad",
            "bad",
            "slightly bad",
            "neutral",
            "slightly well",
            "well",
            "very well",
        ];
        let values: Vec<u8> = labels.iter().map(|l| value_of(l)).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_value_of_unknown_is_neutral() {
        assert_eq!(value_of("great"), 4);
        assert_eq!(value_of(""), 4);
        assert_eq!(value_of("VERY WELL"), 7);
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify(5.0), MoodClass::Good);
        assert_eq!(classify(4.99), MoodClass::Neutral);
        assert_eq!(classify(3.01), MoodClass::Neutral);
        assert_eq!(classify(3.0), MoodClass::Bad);
        assert!(is_good(5));
        assert!(!is_good(4));
    }

    #[test]
    fn test_trend_thresholds_stay_distinct() {
        // 0.07 is a trend for the distribution summary but flat on charts
        assert_eq!(TrendDirection::from_slope(0.07), TrendDirection::Stable);
        assert_eq!(
            TrendDirection::from_distribution_slope(0.07),
            TrendDirection::Improving
        );
        assert_eq!(TrendDirection::from_slope(-0.11), TrendDirection::Declining);
        assert_eq!(TrendDirection::from_slope(0.1), TrendDirection::Stable);
        assert_eq!(
            TrendDirection::from_distribution_slope(-0.05),
            TrendDirection::Stable
        );
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(6.333333, 2), 6.33);
        assert_eq!(round_to(4.25, 1), 4.3);
        assert_eq!(round_to(-0.123456, 4), -0.1235);
    }
}
