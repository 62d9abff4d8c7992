// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::practice_service::PracticeService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::domain::models::ModelSwitch;

#[derive(Clone)]
pub struct AppState {
    pub practice_service: PracticeService,
    pub dashboard_service: DashboardService,
    pub streaming_service: StreamingDashboardService,
    pub model_switch: ModelSwitch,
    pub default_months: u32,
}
