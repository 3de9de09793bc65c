//! HTTP client for a baostock-style quote bridge.
//!
//! The gateway does not embed the provider SDK; it queries a sidecar
//! bridge that fronts it over HTTP. The bridge answers every query with a
//! result-set envelope:
//!
//! ```json
//! {"error_code": "0", "error_msg": "", "fields": ["date", "close"], "rows": [["2024-01-02", 10.5]]}
//! ```
//!
//! `error_code != "0"` is a provider-side failure; session-related codes
//! map to [`DataSourceError::Login`], everything else to
//! [`DataSourceError::Source`]. An empty row set maps to
//! [`DataSourceError::NoData`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;
use tracing::debug;

use crate::domain::{Cell, DataFrame, DataSourceError, FinancialDataSource};

/// Default bridge address, overridable via configuration.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8765";

const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: usize = 3;

/// Provider error codes indicating a lost or rejected session.
const LOGIN_ERROR_CODES: &[&str] = &["10001", "10002"];

/// Result-set envelope returned by every bridge query.
#[derive(Debug, Deserialize)]
struct BridgeResult {
    error_code: String,
    #[serde(default)]
    error_msg: String,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

/// Client for the quote bridge, shared across requests.
#[derive(Clone)]
pub struct BaostockBridge {
    client: Client,
    base_url: String,
}

impl BaostockBridge {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("ashare-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn classify_transport_error(url: &str, err: reqwest::Error) -> DataSourceError {
        if err.is_connect() || err.is_timeout() {
            DataSourceError::Login(format!("could not reach data bridge at {}: {}", url, err))
        } else {
            DataSourceError::Source(format!("request to {} failed: {}", url, err))
        }
    }

    /// Run one query with retry and convert the result set to a frame.
    async fn query(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<DataFrame, DataSourceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("querying data bridge: {}", url);

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .map(jitter)
            .take(MAX_RETRIES);

        let response = Retry::spawn(retry_strategy, || async {
            self.client
                .get(&url)
                .query(params)
                .header("Accept", "application/json")
                .send()
                .await
        })
        .await
        .map_err(|err| Self::classify_transport_error(&url, err))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DataSourceError::Login(format!(
                "data bridge rejected the session ({})",
                status
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataSourceError::Source(format!(
                "data bridge returned {}: {}",
                status, body
            )));
        }

        let result: BridgeResult = response.json().await.map_err(|err| {
            DataSourceError::Source(format!("invalid data bridge payload: {}", err))
        })?;

        if result.error_code != "0" {
            let message = format!(
                "provider error {}: {}",
                result.error_code, result.error_msg
            );
            return if LOGIN_ERROR_CODES.contains(&result.error_code.as_str()) {
                Err(DataSourceError::Login(message))
            } else {
                Err(DataSourceError::Source(message))
            };
        }
        if result.rows.is_empty() {
            return Err(DataSourceError::NoData(format!(
                "No data found for query '{}'.",
                path
            )));
        }

        let mut frame = DataFrame::new(result.fields);
        for row in result.rows {
            frame.push_row(row.into_iter().map(json_cell).collect());
        }
        Ok(frame)
    }

    async fn quarterly_query(
        &self,
        path: &str,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError> {
        self.query(
            path,
            &[
                ("code", code.to_string()),
                ("year", year.to_string()),
                ("quarter", quarter.to_string()),
            ],
        )
        .await
    }

    async fn report_range_query(
        &self,
        path: &str,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<DataFrame, DataSourceError> {
        self.query(
            path,
            &[
                ("code", code.to_string()),
                ("start_date", start_date.to_string()),
                ("end_date", end_date.to_string()),
            ],
        )
        .await
    }

    async fn date_range_query(
        &self,
        path: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError> {
        let mut params = Vec::new();
        push_opt(&mut params, "start_date", start_date);
        push_opt(&mut params, "end_date", end_date);
        self.query(path, &params).await
    }

    async fn dated_query(
        &self,
        path: &str,
        date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError> {
        let mut params = Vec::new();
        push_opt(&mut params, "date", date);
        self.query(path, &params).await
    }
}

fn json_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Bool(b) => Cell::Text(b.to_string()),
        Value::Number(n) => n
            .as_i64()
            .map(Cell::Int)
            .or_else(|| n.as_f64().map(Cell::Float))
            .unwrap_or(Cell::Null),
        Value::String(s) => Cell::Text(s),
        other => Cell::Text(other.to_string()),
    }
}

fn push_opt(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        params.push((key, value.to_string()));
    }
}

#[async_trait]
impl FinancialDataSource for BaostockBridge {
    async fn ping(&self) -> Result<(), DataSourceError> {
        let url = format!("{}/ping", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| Self::classify_transport_error(&url, err))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(DataSourceError::Source(format!(
                "data bridge ping returned {}",
                response.status()
            )))
        }
    }

    async fn get_historical_k_data(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
        frequency: &str,
        adjust_flag: &str,
        fields: Option<&[String]>,
    ) -> Result<DataFrame, DataSourceError> {
        let mut params = vec![
            ("code", code.to_string()),
            ("start_date", start_date.to_string()),
            ("end_date", end_date.to_string()),
            ("frequency", frequency.to_string()),
            ("adjust_flag", adjust_flag.to_string()),
        ];
        if let Some(fields) = fields {
            params.push(("fields", fields.join(",")));
        }
        self.query("/api/history_k_data", &params).await
    }

    async fn get_stock_basic_info(
        &self,
        code: &str,
        fields: Option<&[String]>,
    ) -> Result<DataFrame, DataSourceError> {
        let mut params = vec![("code", code.to_string())];
        if let Some(fields) = fields {
            params.push(("fields", fields.join(",")));
        }
        self.query("/api/stock_basic", &params).await
    }

    async fn get_dividend_data(
        &self,
        code: &str,
        year: &str,
        year_type: &str,
    ) -> Result<DataFrame, DataSourceError> {
        self.query(
            "/api/dividend_data",
            &[
                ("code", code.to_string()),
                ("year", year.to_string()),
                ("year_type", year_type.to_string()),
            ],
        )
        .await
    }

    async fn get_adjust_factor_data(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<DataFrame, DataSourceError> {
        self.report_range_query("/api/adjust_factor", code, start_date, end_date)
            .await
    }

    async fn get_profit_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError> {
        self.quarterly_query("/api/profit_data", code, year, quarter)
            .await
    }

    async fn get_operation_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError> {
        self.quarterly_query("/api/operation_data", code, year, quarter)
            .await
    }

    async fn get_growth_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError> {
        self.quarterly_query("/api/growth_data", code, year, quarter)
            .await
    }

    async fn get_balance_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError> {
        self.quarterly_query("/api/balance_data", code, year, quarter)
            .await
    }

    async fn get_cash_flow_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError> {
        self.quarterly_query("/api/cash_flow_data", code, year, quarter)
            .await
    }

    async fn get_dupont_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError> {
        self.quarterly_query("/api/dupont_data", code, year, quarter)
            .await
    }

    async fn get_performance_express_report(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<DataFrame, DataSourceError> {
        self.report_range_query("/api/performance_express_report", code, start_date, end_date)
            .await
    }

    async fn get_forecast_report(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<DataFrame, DataSourceError> {
        self.report_range_query("/api/forecast_report", code, start_date, end_date)
            .await
    }

    async fn get_stock_industry(
        &self,
        code: Option<&str>,
        date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError> {
        let mut params = Vec::new();
        push_opt(&mut params, "code", code);
        push_opt(&mut params, "date", date);
        self.query("/api/stock_industry", &params).await
    }

    async fn get_sz50_stocks(&self, date: Option<&str>) -> Result<DataFrame, DataSourceError> {
        self.dated_query("/api/sz50_stocks", date).await
    }

    async fn get_hs300_stocks(&self, date: Option<&str>) -> Result<DataFrame, DataSourceError> {
        self.dated_query("/api/hs300_stocks", date).await
    }

    async fn get_zz500_stocks(&self, date: Option<&str>) -> Result<DataFrame, DataSourceError> {
        self.dated_query("/api/zz500_stocks", date).await
    }

    async fn get_deposit_rate_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError> {
        self.date_range_query("/api/deposit_rate", start_date, end_date)
            .await
    }

    async fn get_loan_rate_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError> {
        self.date_range_query("/api/loan_rate", start_date, end_date)
            .await
    }

    async fn get_required_reserve_ratio_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
        year_type: &str,
    ) -> Result<DataFrame, DataSourceError> {
        let mut params = vec![("year_type", year_type.to_string())];
        push_opt(&mut params, "start_date", start_date);
        push_opt(&mut params, "end_date", end_date);
        self.query("/api/required_reserve_ratio", &params).await
    }

    async fn get_money_supply_data_month(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError> {
        self.date_range_query("/api/money_supply_month", start_date, end_date)
            .await
    }

    async fn get_money_supply_data_year(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError> {
        self.date_range_query("/api/money_supply_year", start_date, end_date)
            .await
    }

    async fn get_shibor_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError> {
        self.date_range_query("/api/shibor", start_date, end_date)
            .await
    }

    async fn get_trade_dates(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError> {
        self.date_range_query("/api/trade_dates", start_date, end_date)
            .await
    }

    async fn get_all_stock(&self, date: Option<&str>) -> Result<DataFrame, DataSourceError> {
        self.dated_query("/api/all_stock", date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_cells_keep_scalar_types() {
        assert_eq!(json_cell(serde_json::json!(null)), Cell::Null);
        assert_eq!(json_cell(serde_json::json!(3)), Cell::Int(3));
        assert_eq!(json_cell(serde_json::json!(2.5)), Cell::Float(2.5));
        assert_eq!(
            json_cell(serde_json::json!("2024-01-02")),
            Cell::Text("2024-01-02".to_string())
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let bridge = BaostockBridge::new("http://localhost:8765/");
        assert_eq!(bridge.base_url, "http://localhost:8765");
    }

    #[test]
    fn result_envelope_deserializes_with_defaults() {
        let result: BridgeResult = serde_json::from_str(r#"{"error_code": "10001"}"#).unwrap();
        assert_eq!(result.error_code, "10001");
        assert!(result.error_msg.is_empty());
        assert!(result.fields.is_empty());
        assert!(result.rows.is_empty());
    }
}
