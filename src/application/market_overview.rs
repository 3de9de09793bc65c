//! Market overview tools: trading calendar and the full stock list.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::application::registry::{ToolRegistry, ToolSpec};
use crate::application::{parse_args, render_source_error};
use crate::formatting::{format_frame, FormatOptions};

#[derive(Deserialize)]
struct TradeDatesArgs {
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

#[derive(Deserialize)]
struct AllStockArgs {
    #[serde(default)]
    date: Option<String>,
}

pub fn register_market_overview_tools(registry: &mut ToolRegistry) {
    registry.register(ToolSpec::new(
        "get_trade_dates",
        "Fetches the trading calendar within an optional date range, marking \
         each day as a trading day or not.",
        json!({
            "type": "object",
            "properties": {
                "start_date": {"type": "string", "description": "Start date, YYYY-MM-DD; provider default when omitted"},
                "end_date": {"type": "string", "description": "End date, YYYY-MM-DD; provider default when omitted"}
            }
        }),
        |source, arguments| {
            Box::pin(async move {
                let args: TradeDatesArgs = match parse_args(arguments) {
                    Ok(args) => args,
                    Err(msg) => return msg,
                };
                info!(
                    start_date = args.start_date.as_deref().unwrap_or("default"),
                    end_date = args.end_date.as_deref().unwrap_or("default"),
                    "tool get_trade_dates called"
                );
                match source
                    .get_trade_dates(args.start_date.as_deref(), args.end_date.as_deref())
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

    registry.register(ToolSpec::new(
        "get_all_stock",
        "Fetches the list of all stocks (A-shares and indices) and their \
         trading status on a date.",
        json!({
            "type": "object",
            "properties": {
                "date": {
                    "type": "string",
                    "description": "Listing as of this date (YYYY-MM-DD); latest when omitted"
                }
            }
        }),
        |source, arguments| {
            Box::pin(async move {
                let args: AllStockArgs = match parse_args(arguments) {
                    Ok(args) => args,
                    Err(msg) => return msg,
                };
                info!(
                    date = args.date.as_deref().unwrap_or("latest"),
                    "tool get_all_stock called"
                );
                match source.get_all_stock(args.date.as_deref()).await {
                    Ok(frame) => format_frame(&frame, &FormatOptions::default()),
                    Err(err) => render_source_error(err),
                }
            })
        },
    ));
}
