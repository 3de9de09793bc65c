//! Index tools: industry classification and major index constituents.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::application::registry::{ToolRegistry, ToolSpec};
use crate::application::{parse_args, render_source_error};
use crate::formatting::{format_frame, FormatOptions};

#[derive(Deserialize)]
struct IndustryArgs {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Deserialize)]
struct ConstituentArgs {
    #[serde(default)]
    date: Option<String>,
}

fn constituent_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "date": {
                "type": "string",
                "description": "Constituents as of this date (YYYY-MM-DD); latest when omitted"
            }
        }
    })
}

/// The three constituent tools differ only in the index they query.
macro_rules! register_constituent_tool {
    ($registry:expr, $name:literal, $method:ident, $desc:literal) => {
        $registry.register(ToolSpec::new(
            $name,
            $desc,
            constituent_schema(),
            |source, arguments| {
                Box::pin(async move {
                    let args: ConstituentArgs = match parse_args(arguments) {
                        Ok(args) => args,
                        Err(msg) => return msg,
                    };
                    info!(
                        date = args.date.as_deref().unwrap_or("latest"),
                        concat!("tool ", $name, " called")
                    );
                    match source.$method(args.date.as_deref()).await {
                        Ok(frame) => format_frame(&frame, &FormatOptions::default()),
                        Err(err) => render_source_error(err),
                    }
                })
            },
        ));
    };
}

pub fn register_index_tools(registry: &mut ToolRegistry) {
    registry.register(ToolSpec::new(
        "get_stock_industry",
        "Fetches industry classification for a specific stock or for all \
         stocks when no code is given.",
        json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Optional stock code, e.g. 'sh.600000'; all stocks when omitted"
                },
                "date": {
                    "type": "string",
                    "description": "Classification as of this date (YYYY-MM-DD); latest when omitted"
                }
            }
        }),
        |source, arguments| {
            Box::pin(async move {
                let args: IndustryArgs = match parse_args(arguments) {
                    Ok(args) => args,
                    Err(msg) => return msg,
                };
                info!(
                    code = args.code.as_deref().unwrap_or("all"),
                    date = args.date.as_deref().unwrap_or("latest"),
                    "tool get_stock_industry called"
                );
                match source
                    .get_stock_industry(args.code.as_deref(), args.date.as_deref())
                    .await
                {
                    Ok(frame) => format_frame(&frame, &FormatOptions::default()),
                    Err(err) => render_source_error(err),
                }
            })
        },
    ));

    register_constituent_tool!(
        registry,
        "get_sz50_stocks",
        get_sz50_stocks,
        "Fetches the current constituent stocks of the SZSE 50 index."
    );
    register_constituent_tool!(
        registry,
        "get_hs300_stocks",
        get_hs300_stocks,
        "Fetches the current constituent stocks of the CSI 300 index."
    );
    register_constituent_tool!(
        registry,
        "get_zz500_stocks",
        get_zz500_stocks,
        "Fetches the current constituent stocks of the CSI 500 index."
    );
}
