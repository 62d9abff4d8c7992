// Configuration loading for the reporting client and dashboard widgets
use crate::domain::models::ModelParams;
use crate::domain::record::Metric;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ReportingConfig {
    pub reporting: ReportingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportingSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Window of history pulled when the caller does not specify one.
    #[serde(default = "default_months")]
    pub default_months: u32,
}

fn default_months() -> u32 {
    12
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardsConfig {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub tiles: Vec<TileConfig>,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub params: ModelParams,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            params: ModelParams::default(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct TileConfig {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub precision: i32,
    pub metric: Metric,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub metric: Metric,
    #[serde(default = "default_overlay")]
    pub show_trend: bool,
    #[serde(default = "default_overlay")]
    pub show_forecast: bool,
    #[serde(default = "default_overlay")]
    pub show_anomalies: bool,
}

fn default_overlay() -> bool {
    true
}

pub fn load_reporting_config() -> anyhow::Result<ReportingConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/reporting"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_dashboards_config() -> anyhow::Result<DashboardsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboards"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboards_config_from_toml() {
        let raw = r#"
            [models]
            enabled = true
            alpha = 0.4
            forecast_steps = 6

            [[tiles]]
            id = "ca"
            title = "CA encaissé"
            unit = "€"
            precision = 0
            metric = "ca_encaisse"

            [[charts]]
            id = "rdv"
            title = "Rendez-vous"
            metric = "rdv_pris"
            show_anomalies = false
        "#;

        let config: DashboardsConfig = toml::from_str(raw).unwrap();
        assert!(config.models.enabled);
        assert_eq!(config.models.params.alpha, 0.4);
        assert_eq!(config.models.params.forecast_steps, 6);
        // Unset params keep their defaults
        assert_eq!(config.models.params.beta, 0.1);

        assert_eq!(config.tiles.len(), 1);
        assert_eq!(config.tiles[0].metric, Metric::CaEncaisse);

        let chart = &config.charts[0];
        assert_eq!(chart.metric, Metric::RdvPris);
        assert!(chart.show_trend);
        assert!(!chart.show_anomalies);
    }

    #[test]
    fn test_models_config_defaults() {
        let config: DashboardsConfig = toml::from_str("").unwrap();
        assert!(config.models.enabled);
        assert_eq!(config.models.params.anomaly_threshold, 2.0);
        assert_eq!(config.models.params.delta_threshold_pct, 5.0);
        assert!(config.tiles.is_empty());
    }
}
