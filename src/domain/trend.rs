// Trend classification from a fitted regression slope
use crate::domain::stats::{detect_anomalies, linear_regression, mean_std, safe_div};
use serde::Serialize;

/// Slope thresholds relative to the series mean. Relative thresholds keep a
/// tiny absolute slope on a large-valued series from reading as a trend,
/// and the reverse for small-valued series.
const DIRECTIONAL_RATIO: f64 = 0.02;
const STRONG_RATIO: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
    Insufficient,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Strong,
    Moderate,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendReport {
    pub trend: TrendDirection,
    pub severity: Severity,
    pub slope: f64,
    pub r2: f64,
    pub confidence: u8,
    pub pct_change: f64,
    pub nb_anomalies: usize,
    pub mean: i64,
    pub last_value: f64,
}

impl TrendReport {
    pub fn insufficient() -> Self {
        Self::flat(TrendDirection::Insufficient)
    }

    pub fn disabled() -> Self {
        Self::flat(TrendDirection::Disabled)
    }

    fn flat(trend: TrendDirection) -> Self {
        Self {
            trend,
            severity: Severity::Neutral,
            slope: 0.0,
            r2: 0.0,
            confidence: 0,
            pct_change: 0.0,
            nb_anomalies: 0,
            mean: 0,
            last_value: 0.0,
        }
    }
}

/// Classify a monthly series as upward, downward or stable.
///
/// A slope above 2% of the series mean is directional, above 5% it is a
/// strong trend. Confidence is R² expressed as a percentage. Fewer than 2
/// points reports `Insufficient` rather than `Stable`.
pub fn analyze_trend(series: &[f64], anomaly_threshold: f64) -> TrendReport {
    if series.len() < 2 {
        let mut report = TrendReport::insufficient();
        if let Some(&value) = series.first() {
            report.mean = value.round() as i64;
            report.last_value = value;
        }
        return report;
    }

    let fit = linear_regression(series);
    let (mean, _) = mean_std(series);
    let nb_anomalies = detect_anomalies(series, anomaly_threshold)
        .iter()
        .filter(|p| p.is_anomaly)
        .count();

    let magnitude = fit.slope.abs();
    let reference = mean.abs();
    let (trend, severity) = if magnitude > DIRECTIONAL_RATIO * reference {
        let direction = if fit.slope > 0.0 {
            TrendDirection::Upward
        } else {
            TrendDirection::Downward
        };
        let severity = if magnitude > STRONG_RATIO * reference {
            Severity::Strong
        } else {
            Severity::Moderate
        };
        (direction, severity)
    } else {
        (TrendDirection::Stable, Severity::Neutral)
    };

    let first = series[0];
    let last = *series.last().unwrap();

    TrendReport {
        trend,
        severity,
        slope: fit.slope,
        r2: fit.r2,
        confidence: (fit.r2.abs() * 100.0).round() as u8,
        pct_change: safe_div(last - first, first) * 100.0,
        nb_anomalies,
        mean: mean.round() as i64,
        last_value: last,
    }
}
