//! Financial statement tools: quarterly report tables plus express and
//! forecast reports.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::application::registry::{ToolRegistry, ToolSpec};
use crate::application::{parse_args, render_source_error, validate_quarter, validate_year};
use crate::formatting::{format_frame, FormatOptions};

// Quarterly report tables are wide and short; keep them tighter than the
// default caps.
const REPORT_MAX_ROWS: usize = 20;
const REPORT_MAX_COLS: usize = 10;

#[derive(Deserialize)]
struct QuarterlyArgs {
    code: String,
    year: String,
    quarter: u32,
}

#[derive(Deserialize)]
struct ReportRangeArgs {
    code: String,
    start_date: String,
    end_date: String,
}

fn quarterly_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "code": {"type": "string", "description": "Stock code, e.g. 'sh.600000'"},
            "year": {"type": "string", "description": "4-digit year, e.g. '2023'"},
            "quarter": {"type": "integer", "minimum": 1, "maximum": 4}
        },
        "required": ["code", "year", "quarter"]
    })
}

fn report_range_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "code": {"type": "string", "description": "Stock code, e.g. 'sh.600000'"},
            "start_date": {"type": "string", "description": "Start date, YYYY-MM-DD"},
            "end_date": {"type": "string", "description": "End date, YYYY-MM-DD"}
        },
        "required": ["code", "start_date", "end_date"]
    })
}

/// The six quarterly tools differ only in the data-source method they call.
macro_rules! register_quarterly_tool {
    ($registry:expr, $name:literal, $method:ident, $desc:literal) => {
        $registry.register(ToolSpec::new(
            $name,
            $desc,
            quarterly_schema(),
            |source, arguments| {
                Box::pin(async move {
                    let args: QuarterlyArgs = match parse_args(arguments) {
                        Ok(args) => args,
                        Err(msg) => return msg,
                    };
                    info!(
                        code = %args.code,
                        year = %args.year,
                        quarter = args.quarter,
                        concat!("tool ", $name, " called")
                    );
                    if let Err(msg) = validate_year(&args.year) {
                        return msg;
                    }
                    if let Err(msg) = validate_quarter(args.quarter) {
                        return msg;
                    }
                    match source.$method(&args.code, &args.year, args.quarter).await {
                        Ok(frame) => format_frame(
                            &frame,
                            &FormatOptions::fixed(REPORT_MAX_ROWS, REPORT_MAX_COLS),
                        ),
                        Err(err) => render_source_error(err),
                    }
                })
            },
        ));
    };
}

macro_rules! register_report_range_tool {
    ($registry:expr, $name:literal, $method:ident, $desc:literal) => {
        $registry.register(ToolSpec::new(
            $name,
            $desc,
            report_range_schema(),
            |source, arguments| {
                Box::pin(async move {
                    let args: ReportRangeArgs = match parse_args(arguments) {
                        Ok(args) => args,
                        Err(msg) => return msg,
                    };
                    info!(
                        code = %args.code,
                        start_date = %args.start_date,
                        end_date = %args.end_date,
                        concat!("tool ", $name, " called")
                    );
                    match source
                        .$method(&args.code, &args.start_date, &args.end_date)
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
    };
}

pub fn register_financial_report_tools(registry: &mut ToolRegistry) {
    register_quarterly_tool!(
        registry,
        "get_profit_data",
        get_profit_data,
        "Fetches quarterly profitability data (ROE, net margin, EPS) for a \
         stock code."
    );
    register_quarterly_tool!(
        registry,
        "get_operation_data",
        get_operation_data,
        "Fetches quarterly operation capability data (turnover ratios) for \
         a stock code."
    );
    register_quarterly_tool!(
        registry,
        "get_growth_data",
        get_growth_data,
        "Fetches quarterly growth capability data (YoY growth rates) for a \
         stock code."
    );
    register_quarterly_tool!(
        registry,
        "get_balance_data",
        get_balance_data,
        "Fetches quarterly balance sheet data (liquidity and leverage \
         ratios) for a stock code."
    );
    register_quarterly_tool!(
        registry,
        "get_cash_flow_data",
        get_cash_flow_data,
        "Fetches quarterly cash flow data (cash flow to revenue and asset \
         ratios) for a stock code."
    );
    register_quarterly_tool!(
        registry,
        "get_dupont_data",
        get_dupont_data,
        "Fetches quarterly DuPont analysis data (ROE decomposition) for a \
         stock code."
    );
    register_report_range_tool!(
        registry,
        "get_performance_express_report",
        get_performance_express_report,
        "Fetches performance express reports published for a stock within a \
         date range. Companies are not required to publish these outside \
         mandated windows."
    );
    register_report_range_tool!(
        registry,
        "get_forecast_report",
        get_forecast_report,
        "Fetches earnings forecast reports published for a stock within a \
         date range."
    );
}
