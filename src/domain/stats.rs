// Time-series primitives: OLS regression, exponential smoothing, anomaly detection
use serde::Serialize;

/// Division that never produces NaN or infinity: zero denominator yields 0.
pub fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Fitted ordinary least-squares line over (index, value) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionFit {
    pub slope: f64,
    pub intercept: f64,
    pub r2: f64,
}

impl RegressionFit {
    pub fn zero() -> Self {
        Self {
            slope: 0.0,
            intercept: 0.0,
            r2: 0.0,
        }
    }

    /// Value of the fitted line at time step x.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Closed-form OLS over a monthly series, x = array index.
///
/// Always returns a well-formed fit: fewer than 2 points degenerates to a
/// flat line through the first value, and a constant series reports r2 = 0
/// rather than a perfect fit.
pub fn linear_regression(series: &[f64]) -> RegressionFit {
    let n = series.len();
    if n == 0 {
        return RegressionFit::zero();
    }
    if n == 1 {
        return RegressionFit {
            slope: 0.0,
            intercept: series[0],
            r2: 0.0,
        };
    }

    let nf = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = series.iter().sum();
    let sum_xx: f64 = (0..n).map(|i| (i * i) as f64).sum();
    let sum_xy: f64 = series.iter().enumerate().map(|(i, y)| i as f64 * y).sum();

    let slope = safe_div(nf * sum_xy - sum_x * sum_y, nf * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / nf;

    let mean_y = sum_y / nf;
    let ss_tot: f64 = series.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = series
        .iter()
        .enumerate()
        .map(|(i, y)| {
            let predicted = slope * i as f64 + intercept;
            (y - predicted).powi(2)
        })
        .sum();

    // Constant series: SStot = 0 is "no variance to explain", not a perfect fit
    let r2 = if ss_tot > 0.0 {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        0.0
    };

    RegressionFit {
        slope,
        intercept,
        r2,
    }
}

/// Simple exponential smoothing. Alpha outside (0, 1] is clamped into range.
pub fn exponential_smoothing(series: &[f64], alpha: f64) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }
    let alpha = clamp_factor(alpha);

    let mut smoothed = Vec::with_capacity(series.len());
    smoothed.push(series[0]);
    for i in 1..series.len() {
        let prev = smoothed[i - 1];
        smoothed.push(alpha * series[i] + (1.0 - alpha) * prev);
    }
    smoothed
}

/// Level and trend state from Holt's linear method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoltFit {
    pub level: f64,
    pub trend: f64,
    pub smoothed: Vec<f64>,
}

impl HoltFit {
    /// Forecast h steps past the last observation: level + h * trend.
    pub fn forecast(&self, h: usize) -> f64 {
        self.level + h as f64 * self.trend
    }
}

/// Double exponential smoothing (Holt's linear trend method).
///
/// Needs at least 2 points to estimate a trend; with fewer the fit is flat
/// at the single value (or 0 for an empty series) and forecasts are constant.
pub fn holt_smoothing(series: &[f64], alpha: f64, beta: f64) -> HoltFit {
    match series.len() {
        0 => {
            return HoltFit {
                level: 0.0,
                trend: 0.0,
                smoothed: Vec::new(),
            };
        }
        1 => {
            return HoltFit {
                level: series[0],
                trend: 0.0,
                smoothed: vec![series[0]],
            };
        }
        _ => {}
    }

    let alpha = clamp_factor(alpha);
    let beta = clamp_factor(beta);

    let mut level = series[0];
    let mut trend = series[1] - series[0];
    let mut smoothed = Vec::with_capacity(series.len());
    smoothed.push(series[0]);

    for &value in &series[1..] {
        let next_level = alpha * value + (1.0 - alpha) * (level + trend);
        trend = beta * (next_level - level) + (1.0 - beta) * trend;
        level = next_level;
        smoothed.push(level);
    }

    HoltFit {
        level,
        trend,
        smoothed,
    }
}

/// Trailing simple moving average; the first window-1 slots have no value.
/// A series shorter than the window comes back unchanged.
pub fn moving_average(series: &[f64], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    if series.len() < window {
        return series.iter().map(|&v| Some(v)).collect();
    }

    let mut out = Vec::with_capacity(series.len());
    for i in 0..series.len() {
        if i + 1 < window {
            out.push(None);
        } else {
            let sum: f64 = series[i + 1 - window..=i].iter().sum();
            out.push(Some(sum / window as f64));
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    High,
    Low,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyPoint {
    pub is_anomaly: bool,
    pub z_score: f64,
    pub direction: Direction,
}

impl AnomalyPoint {
    fn normal() -> Self {
        Self {
            is_anomaly: false,
            z_score: 0.0,
            direction: Direction::Normal,
        }
    }
}

/// Batch Z-score anomaly detection against the whole series: a point is
/// anomalous when |z| reaches the threshold.
///
/// Uses the population mean and standard deviation, not a rolling window.
/// Fewer than 3 points or a constant series flags nothing: too little
/// variance to call anything an outlier.
pub fn detect_anomalies(series: &[f64], threshold: f64) -> Vec<AnomalyPoint> {
    if series.len() < 3 {
        return series.iter().map(|_| AnomalyPoint::normal()).collect();
    }

    let (mean, std_dev) = mean_std(series);
    if std_dev == 0.0 {
        return series.iter().map(|_| AnomalyPoint::normal()).collect();
    }

    series
        .iter()
        .map(|&value| {
            let z = (value - mean) / std_dev;
            let is_anomaly = z.abs() >= threshold;
            let direction = if !is_anomaly {
                Direction::Normal
            } else if z > 0.0 {
                Direction::High
            } else {
                Direction::Low
            };
            AnomalyPoint {
                is_anomaly,
                z_score: z,
                direction,
            }
        })
        .collect()
}

/// Population mean and standard deviation.
pub fn mean_std(series: &[f64]) -> (f64, f64) {
    if series.is_empty() {
        return (0.0, 0.0);
    }
    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

fn clamp_factor(factor: f64) -> f64 {
    if !factor.is_finite() || factor <= 0.0 {
        f64::EPSILON
    } else {
        factor.min(1.0)
    }
}
