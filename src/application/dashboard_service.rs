// Dashboard service - Use case for building dashboards
use crate::application::record_repository::RecordRepository;
use crate::domain::aggregation::{Totals, monthly_totals, period_delta, practitioner_total, to_series};
use crate::domain::cabinet::Cabinet;
use crate::domain::dashboard::{Dashboard, KpiTile, MetricChart, MetricPoint, PraticienSummary};
use crate::domain::health::{HealthInputs, HealthScore};
use crate::domain::models::ModelEngine;
use crate::domain::record::{Metric, MonthlyRecord};
use crate::infrastructure::config::{ChartConfig, DashboardsConfig, TileConfig};
use std::sync::Arc;

const MOVING_AVERAGE_WINDOW: usize = 3;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn RecordRepository>,
    dashboards: DashboardsConfig,
    engine: ModelEngine,
}

impl DashboardService {
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        dashboards: DashboardsConfig,
        engine: ModelEngine,
    ) -> Self {
        Self {
            repository,
            dashboards,
            engine,
        }
    }

    pub async fn get_dashboard(&self, cabinet_id: &str, months: u32) -> anyhow::Result<Dashboard> {
        let cabinet = Cabinet::new(cabinet_id.to_string());
        let records = self
            .repository
            .fetch_monthly_records(cabinet_id, months)
            .await?;

        tracing::debug!(
            "Building dashboard for {} from {} records over {} months",
            cabinet_id,
            records.len(),
            months
        );

        let title = format!("{} — activité sur {} mois", cabinet.name, months);
        let tiles = self.build_tiles(&records);
        let charts = self.build_charts(&records);
        let health = self.health_score(&records);

        Ok(Dashboard {
            cabinet_id: cabinet.id,
            title,
            tiles,
            charts,
            health,
        })
    }

    /// Simplified per-practitioner view: one revenue series and the short
    /// insight variant.
    pub async fn get_praticien_summary(
        &self,
        cabinet_id: &str,
        praticien: &str,
        months: u32,
    ) -> anyhow::Result<PraticienSummary> {
        let records = self
            .repository
            .fetch_monthly_records(cabinet_id, months)
            .await?;
        let own: Vec<MonthlyRecord> = records
            .iter()
            .filter(|r| r.praticien == praticien)
            .cloned()
            .collect();

        let totals = monthly_totals(&own, |r| r.ca_encaisse);
        let serie: Vec<MetricPoint> = totals
            .iter()
            .map(|(&periode, &value)| MetricPoint { periode, value })
            .collect();
        let insight = self
            .engine
            .practitioner_insight(&to_series(&totals), Metric::CaEncaisse.label());

        Ok(PraticienSummary {
            cabinet_id: cabinet_id.to_string(),
            praticien: praticien.to_string(),
            ca_total: practitioner_total(&records, praticien, |r| r.ca_encaisse),
            serie,
            insight,
        })
    }

    pub fn build_tiles(&self, records: &[MonthlyRecord]) -> Vec<KpiTile> {
        self.dashboards
            .tiles
            .iter()
            .map(|config| self.build_tile(config, records))
            .collect()
    }

    fn build_tile(&self, config: &TileConfig, records: &[MonthlyRecord]) -> KpiTile {
        let totals = monthly_totals(records, |r| config.metric.value(r));
        let value = totals.values().next_back().copied().unwrap_or(0.0);
        let delta = period_delta(&totals, self.engine.params().delta_threshold_pct);

        KpiTile {
            id: config.id.clone(),
            title: config.title.clone(),
            unit: config.unit.clone(),
            precision: config.precision,
            value,
            delta,
        }
    }

    pub fn build_charts(&self, records: &[MonthlyRecord]) -> Vec<MetricChart> {
        self.dashboards
            .charts
            .iter()
            .map(|config| self.build_chart(config, records))
            .collect()
    }

    fn build_chart(&self, config: &ChartConfig, records: &[MonthlyRecord]) -> MetricChart {
        let totals = monthly_totals(records, |r| config.metric.value(r));
        let points: Vec<MetricPoint> = totals
            .iter()
            .map(|(&periode, &value)| MetricPoint { periode, value })
            .collect();
        let series = to_series(&totals);

        // Overlays are dropped entirely, not zeroed, when the models are off:
        // a flat zero line would render as data
        let models_on = self.engine.switch().is_enabled();

        let trend_line = if config.show_trend && models_on {
            let fit = self.engine.linear_regression(&series);
            (0..series.len()).map(|i| fit.predict(i as f64)).collect()
        } else {
            Vec::new()
        };

        let moving_avg = if config.show_trend && models_on {
            self.engine.moving_average(&series, MOVING_AVERAGE_WINDOW)
        } else {
            Vec::new()
        };

        let forecast = if config.show_forecast && models_on {
            self.engine.forecast(&series)
        } else {
            Vec::new()
        };

        let anomalies: Vec<usize> = if config.show_anomalies {
            self.engine
                .detect_anomalies(&series)
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_anomaly)
                .map(|(i, _)| i)
                .collect()
        } else {
            Vec::new()
        };

        MetricChart {
            id: config.id.clone(),
            title: config.title.clone(),
            unit: config.unit.clone(),
            points,
            trend_line,
            moving_avg,
            forecast,
            anomalies,
            insight: self.engine.insight(&series, config.metric.label()),
        }
    }

    pub fn health_score(&self, records: &[MonthlyRecord]) -> HealthScore {
        let totals = Totals::from_records(records);
        let ca_totals = monthly_totals(records, |r| r.ca_encaisse);
        let evolution = period_delta(&ca_totals, self.engine.params().delta_threshold_pct);

        self.engine.health_score(&HealthInputs {
            taux_encaissement: totals.taux_encaissement(),
            evolution_ca: evolution.pct,
            taux_absence: totals.taux_absence(),
            production_horaire: totals.production_horaire(),
            taux_nouveaux_patients: totals.taux_nouveaux_patients(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::record_repository::RecordRepository;
    use crate::domain::models::{ModelParams, ModelSwitch};
    use crate::domain::record::Period;
    use crate::domain::trend::TrendDirection;
    use async_trait::async_trait;

    struct StubRepository {
        records: Vec<MonthlyRecord>,
    }

    #[async_trait]
    impl RecordRepository for StubRepository {
        async fn list_cabinet_ids(&self) -> anyhow::Result<Vec<String>> {
            Ok(vec!["Cabinet_Test".to_string()])
        }

        async fn list_praticiens(&self, _cabinet_id: &str) -> anyhow::Result<Vec<String>> {
            Ok(vec!["DR01".to_string()])
        }

        async fn fetch_monthly_records(
            &self,
            _cabinet_id: &str,
            _months: u32,
        ) -> anyhow::Result<Vec<MonthlyRecord>> {
            Ok(self.records.clone())
        }
    }

    fn record(praticien: &str, periode: u32, ca: f64) -> MonthlyRecord {
        MonthlyRecord {
            praticien: praticien.to_string(),
            periode: Period(periode),
            ca_facture: ca * 1.05,
            ca_encaisse: ca,
            heures_travaillees: 140.0,
            rdv_pris: 220.0,
            patients_vus: 200.0,
            nouveaux_patients: 25.0,
            devis_proposes: 40.0,
            devis_acceptes: 28.0,
        }
    }

    fn growing_records() -> Vec<MonthlyRecord> {
        vec![
            record("DR01", 202501, 10_000.0),
            record("DR01", 202502, 10_500.0),
            record("DR01", 202503, 11_000.0),
            record("DR01", 202504, 11_600.0),
            record("DR01", 202505, 12_300.0),
        ]
    }

    fn config() -> DashboardsConfig {
        toml::from_str(
            r#"
            [[tiles]]
            id = "ca"
            title = "CA encaissé"
            unit = "€"
            precision = 0
            metric = "ca_encaisse"

            [[charts]]
            id = "ca_chart"
            title = "CA encaissé"
            unit = "€"
            metric = "ca_encaisse"
            "#,
        )
        .unwrap()
    }

    fn service(enabled: bool) -> DashboardService {
        DashboardService::new(
            Arc::new(StubRepository {
                records: growing_records(),
            }),
            config(),
            ModelEngine::new(ModelSwitch::new(enabled), ModelParams::default()),
        )
    }

    #[tokio::test]
    async fn test_dashboard_end_to_end_growth_scenario() {
        let dashboard = service(true).get_dashboard("Cabinet_Test", 5).await.unwrap();

        let tile = &dashboard.tiles[0];
        assert_eq!(tile.value, 12_300.0);
        assert!(tile.delta.pct > 5.0);

        let chart = &dashboard.charts[0];
        assert_eq!(chart.points.len(), 5);
        assert_eq!(chart.trend_line.len(), 5);
        assert_eq!(chart.moving_avg.len(), 5);
        assert_eq!(chart.moving_avg[0], None);
        assert!(chart.moving_avg[4].is_some());
        assert_eq!(chart.forecast.len(), 3);
        assert!(chart.forecast.iter().all(|&v| v > 12_300.0));
        assert!(chart.anomalies.is_empty());
        assert_eq!(chart.insight.trend, TrendDirection::Upward);

        assert!(dashboard.health.global_score > 0);
        assert_eq!(dashboard.title, "Cabinet Test — activité sur 5 mois");
    }

    #[tokio::test]
    async fn test_dashboard_with_models_disabled() {
        let dashboard = service(false).get_dashboard("Cabinet_Test", 5).await.unwrap();

        let chart = &dashboard.charts[0];
        // Raw data still flows; model output does not
        assert_eq!(chart.points.len(), 5);
        assert!(chart.trend_line.is_empty());
        assert!(chart.moving_avg.is_empty());
        assert!(chart.forecast.is_empty());
        assert!(chart.anomalies.is_empty());
        assert_eq!(chart.insight.trend, TrendDirection::Disabled);
        assert_eq!(dashboard.health.global_score, 0);
    }

    #[tokio::test]
    async fn test_praticien_summary() {
        let summary = service(true)
            .get_praticien_summary("Cabinet_Test", "DR01", 5)
            .await
            .unwrap();

        assert_eq!(summary.ca_total, 55_400.0);
        assert_eq!(summary.serie.len(), 5);
        assert_eq!(summary.insight.trend, TrendDirection::Upward);
        assert!(summary.insight.parts.len() == 2);
    }
}
