//! Application layer - the tool catalogue and its shared plumbing.
//!
//! Tools are thin pass-throughs: validate primitive arguments, query the
//! data source, render the frame. The shared helpers here keep their error
//! wording uniform across modules.

pub mod financial_reports;
pub mod indices;
pub mod macroeconomic;
pub mod market_overview;
pub mod registry;
pub mod stock_market;

pub use registry::{SharedDataSource, ToolRegistry, ToolSpec};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::DataSourceError;

/// Build the full tool catalogue served by the gateway.
pub fn build_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    stock_market::register_stock_market_tools(&mut registry);
    financial_reports::register_financial_report_tools(&mut registry);
    indices::register_index_tools(&mut registry);
    macroeconomic::register_macroeconomic_tools(&mut registry);
    market_overview::register_market_overview_tools(&mut registry);
    registry
}

/// Deserialize a tool's argument object, turning serde failures into the
/// caller-facing error text.
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, String> {
    serde_json::from_value(arguments)
        .map_err(|err| format!("Error: Invalid input parameter. {}", err))
}

/// Years must be 4-digit strings, e.g. "2023".
pub(crate) fn validate_year(year: &str) -> Result<(), String> {
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        tracing::warn!(year, "invalid year format requested");
        Err(format!(
            "Error: Invalid year '{}'. Please provide a 4-digit year.",
            year
        ))
    }
}

/// Quarters are 1 through 4.
pub(crate) fn validate_quarter(quarter: u32) -> Result<(), String> {
    if (1..=4).contains(&quarter) {
        Ok(())
    } else {
        tracing::warn!(quarter, "invalid quarter requested");
        Err(format!(
            "Error: Invalid quarter '{}'. Must be between 1 and 4.",
            quarter
        ))
    }
}

/// Membership check for enum-constrained string flags.
pub(crate) fn validate_flag(label: &str, value: &str, valid: &[&str]) -> Result<(), String> {
    if valid.contains(&value) {
        Ok(())
    } else {
        tracing::warn!(label, value, "invalid flag value requested");
        Err(format!(
            "Error: Invalid {} '{}'. Valid options are: {}",
            label,
            value,
            valid.join(", ")
        ))
    }
}

/// Map a typed data-source failure to the caller-facing error text.
pub(crate) fn render_source_error(err: DataSourceError) -> String {
    match err {
        DataSourceError::NoData(_) => {
            tracing::warn!("no data found: {}", err);
            format!("Error: {}", err)
        }
        DataSourceError::Login(_) => {
            tracing::error!("data source login failure: {}", err);
            format!("Error: Could not connect to data source. {}", err)
        }
        DataSourceError::Source(_) => {
            tracing::error!("data source failure: {}", err);
            format!("Error: An error occurred while fetching data. {}", err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_validation() {
        assert!(validate_year("2023").is_ok());
        assert_eq!(
            validate_year("23").unwrap_err(),
            "Error: Invalid year '23'. Please provide a 4-digit year."
        );
        assert!(validate_year("20a3").is_err());
    }

    #[test]
    fn quarter_validation() {
        for q in 1..=4 {
            assert!(validate_quarter(q).is_ok());
        }
        assert_eq!(
            validate_quarter(5).unwrap_err(),
            "Error: Invalid quarter '5'. Must be between 1 and 4."
        );
        assert!(validate_quarter(0).is_err());
    }

    #[test]
    fn flag_validation_lists_options() {
        assert!(validate_flag("frequency", "d", &["d", "w"]).is_ok());
        assert_eq!(
            validate_flag("frequency", "x", &["d", "w"]).unwrap_err(),
            "Error: Invalid frequency 'x'. Valid options are: d, w"
        );
    }

    #[test]
    fn source_errors_keep_original_prefixes() {
        assert_eq!(
            render_source_error(DataSourceError::NoData("no rows".into())),
            "Error: no rows"
        );
        assert_eq!(
            render_source_error(DataSourceError::Login("refused".into())),
            "Error: Could not connect to data source. refused"
        );
        assert_eq!(
            render_source_error(DataSourceError::Source("bad query".into())),
            "Error: An error occurred while fetching data. bad query"
        );
    }

    #[test]
    fn full_registry_has_all_tools() {
        let registry = build_registry();
        assert_eq!(registry.len(), 24);
    }
}
