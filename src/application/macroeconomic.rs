//! Macroeconomic tools: benchmark rates, reserve ratios, money supply and
//! SHIBOR.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::application::registry::{ToolRegistry, ToolSpec};
use crate::application::{parse_args, render_source_error, validate_flag};
use crate::formatting::{format_frame, FormatOptions};

const VALID_RESERVE_YEAR_TYPES: &[&str] = &["0", "1"];

#[derive(Deserialize)]
struct DateRangeArgs {
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

#[derive(Deserialize)]
struct ReserveRatioArgs {
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default = "default_reserve_year_type")]
    year_type: String,
}

fn default_reserve_year_type() -> String {
    "0".to_string()
}

fn date_range_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "start_date": {"type": "string", "description": "Start date, YYYY-MM-DD; provider default when omitted"},
            "end_date": {"type": "string", "description": "End date, YYYY-MM-DD; provider default when omitted"}
        }
    })
}

macro_rules! register_macro_tool {
    ($registry:expr, $name:literal, $method:ident, $desc:literal) => {
        $registry.register(ToolSpec::new(
            $name,
            $desc,
            date_range_schema(),
            |source, arguments| {
                Box::pin(async move {
                    let args: DateRangeArgs = match parse_args(arguments) {
                        Ok(args) => args,
                        Err(msg) => return msg,
                    };
                    info!(
                        start_date = args.start_date.as_deref().unwrap_or("default"),
                        end_date = args.end_date.as_deref().unwrap_or("default"),
                        concat!("tool ", $name, " called")
                    );
                    match source
                        .$method(args.start_date.as_deref(), args.end_date.as_deref())
                        .await
                    {
                        Ok(frame) => format_frame(
                            &frame,
                            &FormatOptions::with_date_range(args.start_date, args.end_date),
                        ),
                        Err(err) => render_source_error(err),
                    }
                })
            },
        ));
    };
}

pub fn register_macroeconomic_tools(registry: &mut ToolRegistry) {
    register_macro_tool!(
        registry,
        "get_deposit_rate_data",
        get_deposit_rate_data,
        "Fetches benchmark deposit rates (demand and time deposits) within \
         an optional date range."
    );
    register_macro_tool!(
        registry,
        "get_loan_rate_data",
        get_loan_rate_data,
        "Fetches benchmark loan rates over various terms within an optional \
         date range."
    );
    register_macro_tool!(
        registry,
        "get_money_supply_data_month",
        get_money_supply_data_month,
        "Fetches monthly money supply data (M0, M1, M2) within an optional \
         date range (YYYY-MM granularity)."
    );
    register_macro_tool!(
        registry,
        "get_money_supply_data_year",
        get_money_supply_data_year,
        "Fetches yearly money supply data (M0, M1, M2 year-end balances) \
         within an optional date range (YYYY granularity)."
    );
    register_macro_tool!(
        registry,
        "get_shibor_data",
        get_shibor_data,
        "Fetches SHIBOR (Shanghai Interbank Offered Rate) data within an \
         optional date range."
    );

    registry.register(ToolSpec::new(
        "get_required_reserve_ratio_data",
        "Fetches required reserve ratio data within an optional date range. \
         year_type '0' filters by announcement date, '1' by effective date.",
        json!({
            "type": "object",
            "properties": {
                "start_date": {"type": "string", "description": "Start date, YYYY-MM-DD"},
                "end_date": {"type": "string", "description": "End date, YYYY-MM-DD"},
                "year_type": {
                    "type": "string",
                    "enum": VALID_RESERVE_YEAR_TYPES,
                    "description": "Date filter interpretation. Default '0'."
                }
            }
        }),
        |source, arguments| {
            Box::pin(async move {
                let args: ReserveRatioArgs = match parse_args(arguments) {
                    Ok(args) => args,
                    Err(msg) => return msg,
                };
                info!(
                    start_date = args.start_date.as_deref().unwrap_or("default"),
                    end_date = args.end_date.as_deref().unwrap_or("default"),
                    year_type = %args.year_type,
                    "tool get_required_reserve_ratio_data called"
                );
                if let Err(msg) =
                    validate_flag("year_type", &args.year_type, VALID_RESERVE_YEAR_TYPES)
                {
                    return msg;
                }
                match source
                    .get_required_reserve_ratio_data(
                        args.start_date.as_deref(),
                        args.end_date.as_deref(),
                        &args.year_type,
                    )
                    .await
                {
                    Ok(frame) => format_frame(
                        &frame,
                        &FormatOptions::with_date_range(args.start_date, args.end_date),
                    ),
                    Err(err) => render_source_error(err),
                }
            })
        },
    ));
}
