//! Domain layer - core entities and the data-source trait.
//!
//! This module defines the domain model for the A-share data gateway:
//! - [`DataFrame`] and [`Cell`], the tabular result-set entities
//! - [`FinancialDataSource`], the trait every market-data backend implements
//! - [`DataSourceError`], the typed failure taxonomy for queries

pub mod frame;
pub use frame::{Cell, DataFrame};

use async_trait::async_trait;
use thiserror::Error;

/// Typed failures a data-source query can produce.
///
/// Tool handlers translate these into `"Error: ..."` text for the caller;
/// they are never propagated through the RPC layer as faults.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// The query succeeded but matched no records.
    #[error("{0}")]
    NoData(String),
    /// The provider could not be reached or rejected the session.
    #[error("{0}")]
    Login(String),
    /// The provider returned an error for the query itself.
    #[error("{0}")]
    Source(String),
}

/// Query interface for Chinese A-share market data.
///
/// One method per exposed tool query plus a liveness probe. Implementations
/// must be thread-safe (`Send + Sync`); the production implementation lives
/// in `infrastructure::baostock_bridge`.
#[async_trait]
pub trait FinancialDataSource: Send + Sync {
    /// Liveness probe against the backing provider.
    async fn ping(&self) -> Result<(), DataSourceError>;

    // ------------------------------------------------------------------
    // Stock market
    // ------------------------------------------------------------------

    /// Historical K-line (OHLCV) bars for a stock code.
    async fn get_historical_k_data(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
        frequency: &str,
        adjust_flag: &str,
        fields: Option<&[String]>,
    ) -> Result<DataFrame, DataSourceError>;

    /// Basic listing information for a stock code.
    async fn get_stock_basic_info(
        &self,
        code: &str,
        fields: Option<&[String]>,
    ) -> Result<DataFrame, DataSourceError>;

    /// Dividend records for a stock code and year.
    async fn get_dividend_data(
        &self,
        code: &str,
        year: &str,
        year_type: &str,
    ) -> Result<DataFrame, DataSourceError>;

    /// Price adjustment factors over a date range.
    async fn get_adjust_factor_data(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<DataFrame, DataSourceError>;

    // ------------------------------------------------------------------
    // Financial reports (quarterly)
    // ------------------------------------------------------------------

    async fn get_profit_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_operation_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_growth_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_balance_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_cash_flow_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_dupont_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<DataFrame, DataSourceError>;

    /// Performance express reports published within a date range.
    async fn get_performance_express_report(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<DataFrame, DataSourceError>;

    /// Earnings forecast reports published within a date range.
    async fn get_forecast_report(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<DataFrame, DataSourceError>;

    // ------------------------------------------------------------------
    // Indices
    // ------------------------------------------------------------------

    /// Industry classification, optionally filtered by code and date.
    async fn get_stock_industry(
        &self,
        code: Option<&str>,
        date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_sz50_stocks(&self, date: Option<&str>) -> Result<DataFrame, DataSourceError>;

    async fn get_hs300_stocks(&self, date: Option<&str>) -> Result<DataFrame, DataSourceError>;

    async fn get_zz500_stocks(&self, date: Option<&str>) -> Result<DataFrame, DataSourceError>;

    // ------------------------------------------------------------------
    // Macroeconomic
    // ------------------------------------------------------------------

    async fn get_deposit_rate_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_loan_rate_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_required_reserve_ratio_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
        year_type: &str,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_money_supply_data_month(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_money_supply_data_year(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError>;

    async fn get_shibor_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError>;

    // ------------------------------------------------------------------
    // Market overview
    // ------------------------------------------------------------------

    /// Trading calendar entries within a date range.
    async fn get_trade_dates(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<DataFrame, DataSourceError>;

    /// All listed stocks and their trading status on a date.
    async fn get_all_stock(&self, date: Option<&str>) -> Result<DataFrame, DataSourceError>;
}
