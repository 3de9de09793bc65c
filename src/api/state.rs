use crate::application::registry::ToolRegistry;
use crate::domain::FinancialDataSource;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub data_source: Arc<dyn FinancialDataSource>,
    pub tools: Arc<ToolRegistry>,
    pub metrics: PrometheusHandle,
}
