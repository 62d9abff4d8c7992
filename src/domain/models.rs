// Analysis model facade and the process-wide enable switch
use crate::domain::forecast::blended_forecast;
use crate::domain::health::{HealthInputs, HealthScore, cabinet_health_score};
use crate::domain::insight::{Insight, generate_insight, practitioner_insight};
use crate::domain::stats::{
    AnomalyPoint, Direction, HoltFit, RegressionFit, detect_anomalies, exponential_smoothing,
    holt_smoothing, linear_regression, moving_average,
};
use crate::domain::trend::{TrendReport, analyze_trend};
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Smoothing and detection parameters, loaded from configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ModelParams {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default = "default_anomaly_threshold")]
    pub anomaly_threshold: f64,
    #[serde(default = "default_forecast_steps")]
    pub forecast_steps: usize,
    /// Canonical period-over-period threshold for Hausse/Baisse badges.
    #[serde(default = "default_delta_threshold")]
    pub delta_threshold_pct: f64,
}

fn default_alpha() -> f64 {
    0.3
}
fn default_beta() -> f64 {
    0.1
}
fn default_anomaly_threshold() -> f64 {
    2.0
}
fn default_forecast_steps() -> usize {
    3
}
fn default_delta_threshold() -> f64 {
    5.0
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            anomaly_threshold: default_anomaly_threshold(),
            forecast_steps: default_forecast_steps(),
            delta_threshold_pct: default_delta_threshold(),
        }
    }
}

/// Shared on/off switch for every analysis model.
///
/// Reads and writes use relaxed atomics and are deliberately not
/// synchronized with in-flight requests: a dashboard already computing may
/// observe either value. Eventual consistency is the accepted contract.
#[derive(Debug, Clone)]
pub struct ModelSwitch {
    enabled: Arc<AtomicBool>,
}

impl ModelSwitch {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

/// Gated front door to the statistical core.
///
/// Services go through this facade so that disabling the models swaps every
/// computation for a neutral result of the same shape, instead of an error.
#[derive(Debug, Clone)]
pub struct ModelEngine {
    switch: ModelSwitch,
    params: ModelParams,
}

impl ModelEngine {
    pub fn new(switch: ModelSwitch, params: ModelParams) -> Self {
        Self { switch, params }
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn switch(&self) -> &ModelSwitch {
        &self.switch
    }

    pub fn linear_regression(&self, series: &[f64]) -> RegressionFit {
        if !self.switch.is_enabled() {
            return RegressionFit::zero();
        }
        linear_regression(series)
    }

    pub fn exponential_smoothing(&self, series: &[f64]) -> Vec<f64> {
        if !self.switch.is_enabled() {
            return vec![0.0; series.len()];
        }
        exponential_smoothing(series, self.params.alpha)
    }

    pub fn holt_smoothing(&self, series: &[f64]) -> HoltFit {
        if !self.switch.is_enabled() {
            return HoltFit {
                level: 0.0,
                trend: 0.0,
                smoothed: vec![0.0; series.len()],
            };
        }
        holt_smoothing(series, self.params.alpha, self.params.beta)
    }

    pub fn moving_average(&self, series: &[f64], window: usize) -> Vec<Option<f64>> {
        if !self.switch.is_enabled() {
            return vec![None; series.len()];
        }
        moving_average(series, window)
    }

    pub fn detect_anomalies(&self, series: &[f64]) -> Vec<AnomalyPoint> {
        if !self.switch.is_enabled() {
            return series
                .iter()
                .map(|_| AnomalyPoint {
                    is_anomaly: false,
                    z_score: 0.0,
                    direction: Direction::Normal,
                })
                .collect();
        }
        detect_anomalies(series, self.params.anomaly_threshold)
    }

    pub fn forecast(&self, series: &[f64]) -> Vec<f64> {
        if !self.switch.is_enabled() {
            return vec![0.0; self.params.forecast_steps];
        }
        blended_forecast(
            series,
            self.params.forecast_steps,
            self.params.alpha,
            self.params.beta,
        )
    }

    pub fn analyze_trend(&self, series: &[f64]) -> TrendReport {
        if !self.switch.is_enabled() {
            return TrendReport::disabled();
        }
        analyze_trend(series, self.params.anomaly_threshold)
    }

    pub fn health_score(&self, inputs: &HealthInputs) -> HealthScore {
        if !self.switch.is_enabled() {
            return HealthScore::zero();
        }
        cabinet_health_score(inputs)
    }

    pub fn insight(&self, series: &[f64], metric_name: &str) -> Insight {
        if !self.switch.is_enabled() {
            return Insight::disabled();
        }
        generate_insight(series, metric_name, &self.params)
    }

    pub fn practitioner_insight(&self, series: &[f64], metric_name: &str) -> Insight {
        if !self.switch.is_enabled() {
            return Insight::disabled();
        }
        practitioner_insight(series, metric_name, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trend::TrendDirection;

    fn engine(enabled: bool) -> ModelEngine {
        ModelEngine::new(ModelSwitch::new(enabled), ModelParams::default())
    }

    #[test]
    fn test_disabled_engine_returns_neutral_results() {
        let engine = engine(false);
        let series = [10.0, 20.0, 30.0, 40.0];

        assert_eq!(engine.linear_regression(&series), RegressionFit::zero());
        assert_eq!(engine.forecast(&series), vec![0.0, 0.0, 0.0]);
        assert_eq!(engine.analyze_trend(&series).trend, TrendDirection::Disabled);
        assert_eq!(engine.health_score(&HealthInputs {
            taux_encaissement: 100.0,
            evolution_ca: 10.0,
            taux_absence: 0.0,
            production_horaire: 400.0,
            taux_nouveaux_patients: 20.0,
        }).global_score, 0);
        assert!(engine.detect_anomalies(&series).iter().all(|p| !p.is_anomaly));
        assert_eq!(engine.insight(&series, "CA").trend, TrendDirection::Disabled);

        // Smoothers keep the input shape but carry no signal
        assert_eq!(engine.exponential_smoothing(&series), vec![0.0; 4]);
        assert_eq!(engine.holt_smoothing(&series).forecast(3), 0.0);
        assert_eq!(engine.moving_average(&series, 3), vec![None; 4]);
    }

    #[test]
    fn test_disabled_results_are_idempotent() {
        let engine = engine(false);
        let series = [1.0, 2.0, 3.0];

        assert_eq!(engine.analyze_trend(&series), engine.analyze_trend(&series));
        assert_eq!(engine.forecast(&series), engine.forecast(&series));
        assert_eq!(engine.insight(&series, "CA"), engine.insight(&series, "CA"));
    }

    #[test]
    fn test_reenabling_restores_computation() {
        let switch = ModelSwitch::new(false);
        let engine = ModelEngine::new(switch.clone(), ModelParams::default());
        let series = [10.0, 20.0, 30.0, 40.0];

        assert_eq!(engine.analyze_trend(&series).trend, TrendDirection::Disabled);

        switch.set(true);
        let report = engine.analyze_trend(&series);
        assert_eq!(report.trend, TrendDirection::Upward);
        assert!(report.confidence > 0);
    }

    #[test]
    fn test_switch_is_shared_between_clones() {
        let switch = ModelSwitch::new(true);
        let other = switch.clone();
        other.set(false);
        assert!(!switch.is_enabled());
    }
}
