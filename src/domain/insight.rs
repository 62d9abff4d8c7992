// Templated analysis narratives for dashboards and reports
use crate::domain::forecast::blended_forecast;
use crate::domain::models::ModelParams;
use crate::domain::stats::{detect_anomalies, safe_div};
use crate::domain::trend::{Severity, TrendDirection, TrendReport, analyze_trend};
use serde::Serialize;

/// Relative move of the mean forecast vs the last observation below which
/// the outlook reads as a stabilisation.
const FORECAST_STABLE_PCT: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub text: String,
    pub parts: Vec<String>,
    pub trend: TrendDirection,
    pub confidence: u8,
    pub forecast: Vec<f64>,
    pub nb_anomalies: usize,
}

impl Insight {
    fn from_parts(parts: Vec<String>, report: &TrendReport, forecast: Vec<f64>) -> Self {
        Self {
            text: parts.join("\n"),
            parts,
            trend: report.trend,
            confidence: report.confidence,
            forecast,
            nb_anomalies: report.nb_anomalies,
        }
    }

    pub fn disabled() -> Self {
        let parts = vec!["Modèles d'analyse désactivés.".to_string()];
        Self {
            text: parts.join("\n"),
            parts,
            trend: TrendDirection::Disabled,
            confidence: 0,
            forecast: Vec::new(),
            nb_anomalies: 0,
        }
    }
}

/// Full narrative for the admin dashboard: trend, model reliability,
/// forecast outlook and any anomalies, as independent sentence fragments.
pub fn generate_insight(series: &[f64], metric_name: &str, params: &ModelParams) -> Insight {
    let report = analyze_trend(series, params.anomaly_threshold);
    let forecast = blended_forecast(series, params.forecast_steps, params.alpha, params.beta);

    let mut parts = vec![trend_sentence(&report, metric_name)];
    parts.push(format!(
        "Fiabilité du modèle : {}% (R² = {:.2}).",
        report.confidence, report.r2
    ));
    parts.push(forecast_sentence(&report, &forecast, params.forecast_steps));
    if report.nb_anomalies > 0 {
        parts.push(anomaly_sentence(series, params.anomaly_threshold));
    }

    Insight::from_parts(parts, &report, forecast)
}

/// Shortened variant for the practitioner view: trend and outlook only.
pub fn practitioner_insight(series: &[f64], metric_name: &str, params: &ModelParams) -> Insight {
    let report = analyze_trend(series, params.anomaly_threshold);
    let forecast = blended_forecast(series, params.forecast_steps, params.alpha, params.beta);

    let parts = vec![
        trend_sentence(&report, metric_name),
        forecast_sentence(&report, &forecast, params.forecast_steps),
    ];

    Insight::from_parts(parts, &report, forecast)
}

fn trend_sentence(report: &TrendReport, metric_name: &str) -> String {
    match report.trend {
        TrendDirection::Insufficient => {
            format!("Données insuffisantes pour analyser {metric_name}.")
        }
        TrendDirection::Disabled => "Modèles d'analyse désactivés.".to_string(),
        TrendDirection::Upward => format!(
            "{metric_name} en hausse {} : {:+.1}% sur la période.",
            severity_label(report.severity),
            report.pct_change
        ),
        TrendDirection::Downward => format!(
            "{metric_name} en baisse {} : {:+.1}% sur la période.",
            severity_label(report.severity),
            report.pct_change
        ),
        TrendDirection::Stable => {
            format!("{metric_name} stable sur la période ({:+.1}%).", report.pct_change)
        }
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Strong => "forte",
        Severity::Moderate => "modérée",
        Severity::Neutral => "neutre",
    }
}

fn forecast_sentence(report: &TrendReport, forecast: &[f64], steps: usize) -> String {
    let avg = if forecast.is_empty() {
        0.0
    } else {
        forecast.iter().sum::<f64>() / forecast.len() as f64
    };
    let move_pct = safe_div(avg - report.last_value, report.last_value) * 100.0;

    let outlook = if move_pct > FORECAST_STABLE_PCT {
        "hausse attendue"
    } else if move_pct < -FORECAST_STABLE_PCT {
        "baisse attendue"
    } else {
        "stabilisation attendue"
    };

    format!(
        "Prévision sur {steps} mois : {outlook} (moyenne {avg:.0} contre {:.0} observé).",
        report.last_value
    )
}

fn anomaly_sentence(series: &[f64], threshold: f64) -> String {
    let periods: Vec<String> = detect_anomalies(series, threshold)
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_anomaly)
        .map(|(i, _)| (i + 1).to_string())
        .collect();

    if periods.len() == 1 {
        format!("1 anomalie détectée à la période {}.", periods[0])
    } else {
        format!(
            "{} anomalies détectées aux périodes {}.",
            periods.len(),
            periods.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ModelParams {
        ModelParams::default()
    }

    #[test]
    fn test_insight_smooth_growth_scenario() {
        let series = [10_000.0, 10_500.0, 11_000.0, 11_600.0, 12_300.0];
        let insight = generate_insight(&series, "Chiffre d'affaires", &params());

        assert_eq!(insight.trend, TrendDirection::Upward);
        assert!(insight.parts[0].contains("hausse"));
        assert!(insight.parts.iter().any(|p| p.contains("hausse attendue")));
        // Smooth series: no anomaly fragment
        assert_eq!(insight.nb_anomalies, 0);
        assert!(!insight.text.contains("anomalie"));
        assert_eq!(insight.forecast.len(), 3);
    }

    #[test]
    fn test_insight_reports_anomalies_one_indexed() {
        let series = [10.0, 10.0, 10.0, 10.0, 100.0];
        let insight = generate_insight(&series, "Nouveaux patients", &params());

        assert_eq!(insight.nb_anomalies, 1);
        assert!(insight.text.contains("anomalie détectée à la période 5"));
    }

    #[test]
    fn test_insight_insufficient_data() {
        let insight = generate_insight(&[1_200.0], "RDV", &params());
        assert_eq!(insight.trend, TrendDirection::Insufficient);
        assert!(insight.parts[0].contains("insuffisantes"));
        assert_eq!(insight.confidence, 0);
    }

    #[test]
    fn test_insight_text_joins_parts() {
        let series = [100.0, 110.0, 120.0, 130.0];
        let insight = generate_insight(&series, "CA", &params());
        assert_eq!(insight.text, insight.parts.join("\n"));
        assert!(insight.parts.len() >= 3);
    }

    #[test]
    fn test_practitioner_insight_is_shorter() {
        let series = [100.0, 110.0, 120.0, 130.0];
        let full = generate_insight(&series, "CA", &params());
        let short = practitioner_insight(&series, "CA", &params());

        assert!(short.parts.len() < full.parts.len());
        assert_eq!(short.trend, full.trend);
        assert!(!short.text.contains("Fiabilité"));
    }

    #[test]
    fn test_insight_declining_series_reads_baisse() {
        let series = [1_000.0, 900.0, 780.0, 650.0];
        let insight = generate_insight(&series, "Encaissements", &params());
        assert!(insight.parts[0].contains("baisse"));
        assert!(insight.text.contains("baisse attendue"));
    }
}
