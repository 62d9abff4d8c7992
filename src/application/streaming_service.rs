// Streaming dashboard service - Progressive loading over NDJSON events
use crate::application::dashboard_service::DashboardService;
use crate::application::record_repository::RecordRepository;
use crate::domain::cabinet::Cabinet;
use crate::domain::dashboard::{ChartSkeleton, StreamEvent, TileSkeleton};
use crate::infrastructure::config::DashboardsConfig;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct StreamingDashboardService {
    repository: Arc<dyn RecordRepository>,
    dashboards: DashboardsConfig,
    service: DashboardService,
}

impl StreamingDashboardService {
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        dashboards: DashboardsConfig,
        service: DashboardService,
    ) -> Self {
        Self {
            repository,
            dashboards,
            service,
        }
    }

    pub async fn stream_dashboard(
        &self,
        cabinet_id: &str,
        months: u32,
    ) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel(100);
        let start_time = Instant::now();
        let cabinet = Cabinet::new(cabinet_id.to_string());

        // 1. Skeleton goes out immediately so the client can lay out widgets
        // before any data is fetched
        let total_widgets = self.dashboards.tiles.len() + self.dashboards.charts.len();
        let _ = tx.send(self.build_skeleton(&cabinet, months)).await;

        // 2. One background task fetches the records and pushes updates as
        // each widget is computed
        let repository = self.repository.clone();
        let service = self.service.clone();
        let cabinet_id = cabinet.id.clone();

        tokio::spawn(async move {
            let records = match repository.fetch_monthly_records(&cabinet_id, months).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::error!("Failed to fetch records for {}: {}", cabinet_id, e);
                    Vec::new()
                }
            };

            for tile in service.build_tiles(&records) {
                let event = StreamEvent::TileUpdate {
                    id: tile.id,
                    value: tile.value,
                    delta: tile.delta,
                };
                let _ = tx.send(event).await;
            }

            for chart in service.build_charts(&records) {
                let event = StreamEvent::ChartUpdate {
                    id: chart.id.clone(),
                    points: chart.points,
                    trend_line: chart.trend_line,
                    moving_avg: chart.moving_avg,
                    forecast: chart.forecast,
                    anomalies: chart.anomalies,
                };
                let _ = tx.send(event).await;

                let insight = StreamEvent::InsightUpdate {
                    id: chart.id,
                    insight: chart.insight,
                };
                let _ = tx.send(insight).await;
            }

            let health = StreamEvent::HealthUpdate {
                health: service.health_score(&records),
            };
            let _ = tx.send(health).await;

            let complete = StreamEvent::Complete {
                widgets: total_widgets,
                duration_ms: start_time.elapsed().as_millis() as i64,
            };
            let _ = tx.send(complete).await;
        });

        rx
    }

    fn build_skeleton(&self, cabinet: &Cabinet, months: u32) -> StreamEvent {
        let tiles: Vec<TileSkeleton> = self
            .dashboards
            .tiles
            .iter()
            .map(|t| TileSkeleton {
                id: t.id.clone(),
                title: t.title.clone(),
                unit: t.unit.clone(),
                precision: t.precision,
            })
            .collect();

        let charts: Vec<ChartSkeleton> = self
            .dashboards
            .charts
            .iter()
            .map(|c| ChartSkeleton {
                id: c.id.clone(),
                title: c.title.clone(),
                unit: c.unit.clone(),
            })
            .collect();

        StreamEvent::Skeleton {
            cabinet_id: cabinet.id.clone(),
            title: format!("{} — activité sur {} mois", cabinet.name, months),
            tiles,
            charts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::record_repository::RecordRepository;
    use crate::domain::models::{ModelEngine, ModelParams, ModelSwitch};
    use crate::domain::record::{MonthlyRecord, Period};
    use async_trait::async_trait;

    struct StubRepository;

    #[async_trait]
    impl RecordRepository for StubRepository {
        async fn list_cabinet_ids(&self) -> anyhow::Result<Vec<String>> {
            Ok(vec![])
        }

        async fn list_praticiens(&self, _cabinet_id: &str) -> anyhow::Result<Vec<String>> {
            Ok(vec![])
        }

        async fn fetch_monthly_records(
            &self,
            _cabinet_id: &str,
            _months: u32,
        ) -> anyhow::Result<Vec<MonthlyRecord>> {
            Ok(vec![
                MonthlyRecord {
                    praticien: "DR01".to_string(),
                    periode: Period(202501),
                    ca_encaisse: 10_000.0,
                    ..stub_record()
                },
                MonthlyRecord {
                    praticien: "DR01".to_string(),
                    periode: Period(202502),
                    ca_encaisse: 11_000.0,
                    ..stub_record()
                },
            ])
        }
    }

    fn stub_record() -> MonthlyRecord {
        MonthlyRecord {
            praticien: String::new(),
            periode: Period(202501),
            ca_facture: 0.0,
            ca_encaisse: 0.0,
            heures_travaillees: 100.0,
            rdv_pris: 100.0,
            patients_vus: 90.0,
            nouveaux_patients: 10.0,
            devis_proposes: 0.0,
            devis_acceptes: 0.0,
        }
    }

    fn streaming_service() -> StreamingDashboardService {
        let repository: Arc<dyn RecordRepository> = Arc::new(StubRepository);
        let dashboards: DashboardsConfig = toml::from_str(
            r#"
            [[tiles]]
            id = "ca"
            title = "CA"
            unit = "€"
            precision = 0
            metric = "ca_encaisse"

            [[charts]]
            id = "ca_chart"
            title = "CA"
            metric = "ca_encaisse"
            "#,
        )
        .unwrap();
        let engine = ModelEngine::new(ModelSwitch::new(true), ModelParams::default());
        let service = DashboardService::new(repository.clone(), dashboards.clone(), engine);

        StreamingDashboardService::new(repository, dashboards, service)
    }

    #[tokio::test]
    async fn test_stream_orders_skeleton_first_and_complete_last() {
        let mut rx = streaming_service().stream_dashboard("Cabinet_Test", 6).await;

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert!(matches!(events.first(), Some(StreamEvent::Skeleton { .. })));
        assert!(matches!(
            events.last(),
            Some(StreamEvent::Complete { widgets: 2, .. })
        ));
        assert!(events.iter().any(|e| matches!(e, StreamEvent::TileUpdate { .. })));
        assert!(events.iter().any(|e| matches!(e, StreamEvent::ChartUpdate { .. })));
        assert!(events.iter().any(|e| matches!(e, StreamEvent::InsightUpdate { .. })));
        assert!(events.iter().any(|e| matches!(e, StreamEvent::HealthUpdate { .. })));
    }
}
