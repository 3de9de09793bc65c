//! Stock market data tools: K-line history, listing info, dividends and
//! adjustment factors.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::application::registry::{ToolRegistry, ToolSpec};
use crate::application::{parse_args, render_source_error, validate_flag, validate_year};
use crate::formatting::{format_frame, FormatOptions};

const VALID_FREQUENCIES: &[&str] = &["d", "w", "m", "5", "15", "30", "60"];
const VALID_ADJUST_FLAGS: &[&str] = &["1", "2", "3"];
const VALID_YEAR_TYPES: &[&str] = &["report", "operate"];

#[derive(Deserialize)]
struct HistoricalKDataArgs {
    code: String,
    start_date: String,
    end_date: String,
    #[serde(default = "default_frequency")]
    frequency: String,
    #[serde(default = "default_adjust_flag")]
    adjust_flag: String,
    #[serde(default)]
    fields: Option<Vec<String>>,
}

fn default_frequency() -> String {
    "d".to_string()
}

fn default_adjust_flag() -> String {
    "3".to_string()
}

#[derive(Deserialize)]
struct BasicInfoArgs {
    code: String,
    #[serde(default)]
    fields: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct DividendArgs {
    code: String,
    year: String,
    #[serde(default = "default_year_type")]
    year_type: String,
}

fn default_year_type() -> String {
    "report".to_string()
}

#[derive(Deserialize)]
struct AdjustFactorArgs {
    code: String,
    start_date: String,
    end_date: String,
}

pub fn register_stock_market_tools(registry: &mut ToolRegistry) {
    registry.register(ToolSpec::new(
        "get_historical_k_data",
        "Fetches historical K-line (OHLCV) data for a Chinese A-share stock. \
         Codes use the Baostock format (e.g. 'sh.600000', 'sz.000001'); dates are \
         'YYYY-MM-DD'. The result table may be truncated if the range is large.",
        json!({
            "type": "object",
            "properties": {
                "code": {"type": "string", "description": "Stock code, e.g. 'sh.600000'"},
                "start_date": {"type": "string", "description": "Start date, YYYY-MM-DD"},
                "end_date": {"type": "string", "description": "End date, YYYY-MM-DD"},
                "frequency": {
                    "type": "string",
                    "enum": VALID_FREQUENCIES,
                    "description": "Bar frequency: d/w/m or minutes (5/15/30/60). Default 'd'."
                },
                "adjust_flag": {
                    "type": "string",
                    "enum": VALID_ADJUST_FLAGS,
                    "description": "Price adjustment: 1 forward, 2 backward, 3 none. Default '3'."
                },
                "fields": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Optional subset of fields to retrieve"
                }
            },
            "required": ["code", "start_date", "end_date"]
        }),
        |source, arguments| {
            Box::pin(async move {
                let args: HistoricalKDataArgs = match parse_args(arguments) {
                    Ok(args) => args,
                    Err(msg) => return msg,
                };
                info!(
                    code = %args.code,
                    start_date = %args.start_date,
                    end_date = %args.end_date,
                    frequency = %args.frequency,
                    adjust_flag = %args.adjust_flag,
                    "tool get_historical_k_data called"
                );
                if let Err(msg) = validate_flag("frequency", &args.frequency, VALID_FREQUENCIES) {
                    return msg;
                }
                if let Err(msg) = validate_flag("adjust_flag", &args.adjust_flag, VALID_ADJUST_FLAGS)
                {
                    return msg;
                }
                match source
                    .get_historical_k_data(
                        &args.code,
                        &args.start_date,
                        &args.end_date,
                        &args.frequency,
                        &args.adjust_flag,
                        args.fields.as_deref(),
                    )
                    .await
                {
                    Ok(frame) => format_frame(
                        &frame,
                        &FormatOptions::with_date_range(
                            Some(args.start_date),
                            Some(args.end_date),
                        ),
                    ),
                    Err(err) => render_source_error(err),
                }
            })
        },
    ));

    registry.register(ToolSpec::new(
        "get_stock_basic_info",
        "Fetches basic listing information for a Chinese A-share stock \
         (name, industry, listing date, status).",
        json!({
            "type": "object",
            "properties": {
                "code": {"type": "string", "description": "Stock code, e.g. 'sh.600000'"},
                "fields": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Optional subset of info columns"
                }
            },
            "required": ["code"]
        }),
        |source, arguments| {
            Box::pin(async move {
                let args: BasicInfoArgs = match parse_args(arguments) {
                    Ok(args) => args,
                    Err(msg) => return msg,
                };
                info!(code = %args.code, "tool get_stock_basic_info called");
                match source
                    .get_stock_basic_info(&args.code, args.fields.as_deref())
                    .await
                {
                    // Basic info is a handful of rows; keep the table tight.
                    Ok(frame) => format_frame(&frame, &FormatOptions::fixed(10, 10)),
                    Err(err) => render_source_error(err),
                }
            })
        },
    ));

    registry.register(ToolSpec::new(
        "get_dividend_data",
        "Fetches dividend records for a stock code and year. year_type \
         'report' selects announcement year, 'operate' ex-dividend year.",
        json!({
            "type": "object",
            "properties": {
                "code": {"type": "string", "description": "Stock code, e.g. 'sh.600000'"},
                "year": {"type": "string", "description": "4-digit year, e.g. '2023'"},
                "year_type": {
                    "type": "string",
                    "enum": VALID_YEAR_TYPES,
                    "description": "Year interpretation. Default 'report'."
                }
            },
            "required": ["code", "year"]
        }),
        |source, arguments| {
            Box::pin(async move {
                let args: DividendArgs = match parse_args(arguments) {
                    Ok(args) => args,
                    Err(msg) => return msg,
                };
                info!(
                    code = %args.code,
                    year = %args.year,
                    year_type = %args.year_type,
                    "tool get_dividend_data called"
                );
                if let Err(msg) = validate_flag("year_type", &args.year_type, VALID_YEAR_TYPES) {
                    return msg;
                }
                if let Err(msg) = validate_year(&args.year) {
                    return msg;
                }
                match source
                    .get_dividend_data(&args.code, &args.year, &args.year_type)
                    .await
                {
                    Ok(frame) => format_frame(&frame, &FormatOptions::default()),
                    Err(err) => render_source_error(err),
                }
            })
        },
    ));

    registry.register(ToolSpec::new(
        "get_adjust_factor_data",
        "Fetches price adjustment factors for a stock code over a date \
         range, useful for computing adjusted prices.",
        json!({
            "type": "object",
            "properties": {
                "code": {"type": "string", "description": "Stock code, e.g. 'sh.600000'"},
                "start_date": {"type": "string", "description": "Start date, YYYY-MM-DD"},
                "end_date": {"type": "string", "description": "End date, YYYY-MM-DD"}
            },
            "required": ["code", "start_date", "end_date"]
        }),
        |source, arguments| {
            Box::pin(async move {
                let args: AdjustFactorArgs = match parse_args(arguments) {
                    Ok(args) => args,
                    Err(msg) => return msg,
                };
                info!(
                    code = %args.code,
                    start_date = %args.start_date,
                    end_date = %args.end_date,
                    "tool get_adjust_factor_data called"
                );
                match source
                    .get_adjust_factor_data(&args.code, &args.start_date, &args.end_date)
                    .await
                {
                    Ok(frame) => format_frame(
                        &frame,
                        &FormatOptions::with_date_range(
                            Some(args.start_date),
                            Some(args.end_date),
                        ),
                    ),
                    Err(err) => render_source_error(err),
                }
            })
        },
    ));
}
