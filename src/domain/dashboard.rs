// Dashboard payload models
use crate::domain::aggregation::PeriodDelta;
use crate::domain::health::HealthScore;
use crate::domain::insight::Insight;
use crate::domain::record::Period;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MetricPoint {
    pub periode: Period,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KpiTile {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub precision: i32,
    pub value: f64,
    pub delta: PeriodDelta,
}

/// Chart series plus the model overlays the renderer draws on top of it:
/// fitted trend line, forward forecast points and anomaly markers.
#[derive(Debug, Clone, Serialize)]
pub struct MetricChart {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub points: Vec<MetricPoint>,
    pub trend_line: Vec<f64>,
    pub moving_avg: Vec<Option<f64>>,
    pub forecast: Vec<f64>,
    pub anomalies: Vec<usize>,
    pub insight: Insight,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub cabinet_id: String,
    pub title: String,
    pub tiles: Vec<KpiTile>,
    pub charts: Vec<MetricChart>,
    pub health: HealthScore,
}

/// Simplified practitioner-facing view.
#[derive(Debug, Clone, Serialize)]
pub struct PraticienSummary {
    pub cabinet_id: String,
    pub praticien: String,
    pub ca_total: f64,
    pub serie: Vec<MetricPoint>,
    pub insight: Insight,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileSkeleton {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub precision: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSkeleton {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
}

/// Progressive-loading events for the streaming dashboard endpoint.
/// One JSON object per line; the skeleton always comes first and
/// `complete` always closes the stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Skeleton {
        cabinet_id: String,
        title: String,
        tiles: Vec<TileSkeleton>,
        charts: Vec<ChartSkeleton>,
    },
    TileUpdate {
        id: String,
        value: f64,
        delta: PeriodDelta,
    },
    ChartUpdate {
        id: String,
        points: Vec<MetricPoint>,
        trend_line: Vec<f64>,
        moving_avg: Vec<Option<f64>>,
        forecast: Vec<f64>,
        anomalies: Vec<usize>,
    },
    InsightUpdate {
        id: String,
        insight: Insight,
    },
    HealthUpdate {
        health: HealthScore,
    },
    Complete {
        widgets: usize,
        duration_ms: i64,
    },
}
