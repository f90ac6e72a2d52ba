//! Least-squares trend lines over chart series.
//!
//! Series indexes are the independent variable. Gaps (`None`) are skipped,
//! never imputed, and stay gaps in the projected trend line.

use serde::Serialize;

use crate::scale::{round_to, TrendDirection, MAX_VALUE, MIN_VALUE};

/// Slope, intercept and Pearson correlation of a fitted line.
///
/// All values are rounded to 4 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub correlation: f64,
}

/// Fit `y = slope * index + intercept` over the non-gap points.
///
/// Fewer than two points gives the all-zero result. Zero variance in the
/// indexes gives a flat line at the mean; zero variance in the values gives
/// `correlation = 0`.
pub fn linear_regression(series: &[Option<f64>]) -> RegressionResult {
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|y| (i as f64, y)))
        .collect();

    if points.len() < 2 {
        return RegressionResult::default();
    }

    let n = points.len() as f64;
    let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let numerator: f64 = points
        .iter()
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    let x_variance: f64 = points.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();

    if x_variance == 0.0 {
        return RegressionResult {
            slope: 0.0,
            intercept: round_to(y_mean, 4),
            correlation: 0.0,
        };
    }

    let slope = numerator / x_variance;
    let intercept = y_mean - slope * x_mean;

    let y_variance: f64 = points.iter().map(|(_, y)| (y - y_mean).powi(2)).sum();
    let correlation = if y_variance == 0.0 {
        0.0
    } else {
        numerator / (x_variance * y_variance).sqrt()
    };

    RegressionResult {
        slope: round_to(slope, 4),
        intercept: round_to(intercept, 4),
        correlation: round_to(correlation, 4),
    }
}

/// Project the fitted line onto every non-gap index of `series`.
///
/// Values are clamped to the mood scale and rounded to 2 decimals.
pub fn trend_line(series: &[Option<f64>], regression: &RegressionResult) -> Vec<Option<f64>> {
    series
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.map(|_| {
                let projected = regression.slope * i as f64 + regression.intercept;
                round_to(projected.clamp(MIN_VALUE, MAX_VALUE), 2)
            })
        })
        .collect()
}

/// Chart-ready description of a trend direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendDescriptor {
    pub direction: TrendDirection,
    pub icon: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

impl From<TrendDirection> for TrendDescriptor {
    fn from(direction: TrendDirection) -> Self {
        Self {
            direction,
            icon: direction.icon(),
            description: direction.description(),
            color: direction.color(),
        }
    }
}

/// Regression, direction and trend line for one chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub regression: RegressionResult,
    pub direction: TrendDescriptor,
    pub trend_line: Vec<Option<f64>>,
    /// Slope expressed as percent of a mood point per bucket
    pub slope_percentage: f64,
}

/// Full trend analysis of a gapped series, using the chart threshold (`±0.1`).
pub fn analyze_series(series: &[Option<f64>]) -> TrendAnalysis {
    let regression = linear_regression(series);
    TrendAnalysis {
        regression,
        direction: TrendDirection::from_slope(regression.slope).into(),
        trend_line: trend_line(series, &regression),
        slope_percentage: round_to(regression.slope * 100.0, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_perfect_positive_line() {
        let result = linear_regression(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(result.slope, 1.0);
        assert_eq!(result.intercept, 1.0);
        assert_eq!(result.correlation, 1.0);
    }

    #[test]
    fn test_degenerate_inputs_do_not_panic() {
        assert_eq!(linear_regression(&[]), RegressionResult::default());
        assert_eq!(linear_regression(&[Some(4.0)]), RegressionResult::default());
        assert_eq!(
            linear_regression(&[None, Some(4.0), None]),
            RegressionResult::default()
        );
    }

    #[test]
    fn test_flat_series_has_zero_correlation() {
        let result = linear_regression(&series(&[5.0, 5.0, 5.0]));
        assert_eq!(result.slope, 0.0);
        assert_eq!(result.intercept, 5.0);
        assert_eq!(result.correlation, 0.0);
    }

    #[test]
    fn test_gaps_keep_original_indexes() {
        // Points at x=0 and x=2 only
        let result = linear_regression(&[Some(2.0), None, Some(6.0)]);
        assert_eq!(result.slope, 2.0);
        assert_eq!(result.intercept, 2.0);
        assert_eq!(result.correlation, 1.0);
    }

    #[test]
    fn test_declining_correlation_is_negative() {
        let result = linear_regression(&series(&[7.0, 5.0, 6.0, 2.0]));
        assert!(result.slope < 0.0);
        assert!(result.correlation < 0.0 && result.correlation >= -1.0);
    }

    #[test]
    fn test_trend_line_preserves_gaps_and_clamps() {
        let data = vec![Some(1.0), None, Some(5.0), Some(7.0)];
        let regression = RegressionResult {
            slope: 3.0,
            intercept: -1.0,
            correlation: 0.9,
        };
        let line = trend_line(&data, &regression);
        assert_eq!(line, vec![Some(1.0), None, Some(5.0), Some(7.0)]);

        let regression = RegressionResult {
            slope: 0.333,
            intercept: 4.0,
            correlation: 0.5,
        };
        let line = trend_line(&data, &regression);
        assert_eq!(line[1], None);
        assert_eq!(line[2], Some(4.67));
        assert_eq!(line[3], Some(5.0));
    }

    #[test]
    fn test_analyze_series_direction() {
        let analysis = analyze_series(&series(&[3.0, 4.0, 5.0, 6.0]));
        assert_eq!(analysis.direction.direction, TrendDirection::Improving);
        assert_eq!(analysis.direction.icon, "trending_up");
        assert_eq!(analysis.slope_percentage, 100.0);
        assert_eq!(analysis.trend_line.len(), 4);

        let analysis = analyze_series(&series(&[4.0, 4.05, 4.0, 4.05]));
        assert_eq!(analysis.direction.direction, TrendDirection::Stable);
    }
}
