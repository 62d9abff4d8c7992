// Blended short-horizon forecast: OLS projection + Holt smoothing
use crate::domain::stats::{holt_smoothing, linear_regression};

/// How far the blend may lean on the regression line. The R² weight is kept
/// inside [0.3, 0.7] so neither model ever fully drives the forecast.
const MIN_REGRESSION_WEIGHT: f64 = 0.3;
const MAX_REGRESSION_WEIGHT: f64 = 0.7;

/// N-step-ahead forecast blending the OLS projection with Holt's method.
///
/// Forecasts are floored at 0 (revenue and patient counts cannot go
/// negative) and rounded to 2 decimals. With fewer than 2 observations the
/// forecast is flat at the lone value, or 0 for an empty series.
pub fn blended_forecast(series: &[f64], steps: usize, alpha: f64, beta: f64) -> Vec<f64> {
    if series.len() < 2 {
        let flat = series.first().copied().unwrap_or(0.0).max(0.0);
        return vec![round2(flat); steps];
    }

    let fit = linear_regression(series);
    let holt = holt_smoothing(series, alpha, beta);
    let weight = fit.r2.clamp(MIN_REGRESSION_WEIGHT, MAX_REGRESSION_WEIGHT);
    let last_index = (series.len() - 1) as f64;

    (1..=steps)
        .map(|h| {
            let regression = fit.predict(last_index + h as f64);
            let smoothing = holt.forecast(h);
            let combined = weight * regression + (1.0 - weight) * smoothing;
            round2(combined.max(0.0))
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
