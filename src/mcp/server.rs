//! JSON-RPC dispatcher exposing the tool catalogue.
//!
//! The server speaks a small JSON-RPC 2.0 subset over HTTP POST: the
//! `initialize` handshake, `tools/list` enumeration and `tools/call`
//! invocation, plus the `notifications/initialized` acknowledgement.
//! Tool execution itself never produces an RPC error; validation and
//! data-source failures come back as `"Error: ..."` text in the result.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::api::state::AppState;
use crate::mcp::protocol::{
    error_response, ok_response, McpMethod, RpcRequest, ToolCallParams, INTERNAL_ERROR,
    INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};

const SERVER_NAME: &str = "a_share_data_provider";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Axum handler for the RPC endpoint (`/mcp` and its aliases).
///
/// Takes the raw body so malformed JSON can be answered with a `-32700`
/// envelope instead of the framework's bare 400.
pub async fn mcp_handler(
    State(state): State<AppState>,
    body: String,
) -> (StatusCode, Json<Value>) {
    match serde_json::from_str::<Value>(&body) {
        Ok(payload) => (StatusCode::OK, Json(dispatch(&state, payload).await)),
        Err(err) => {
            error!("unparseable RPC request body: {}", err);
            (
                StatusCode::BAD_REQUEST,
                Json(error_response(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", err),
                )),
            )
        }
    }
}

/// Resolve one RPC payload to its response value.
///
/// Separated from the HTTP handler so tests can drive the protocol
/// in-process.
pub async fn dispatch(state: &AppState, payload: Value) -> Value {
    let request: RpcRequest = match serde_json::from_value(payload) {
        Ok(request) => request,
        Err(err) => {
            error!("malformed RPC envelope: {}", err);
            return error_response(Value::Null, PARSE_ERROR, format!("Parse error: {}", err));
        }
    };
    let id = request.id;
    info!(method = %request.method, "RPC request");

    match McpMethod::from(request.method.as_str()) {
        McpMethod::Initialize => ok_response(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {"name": SERVER_NAME, "version": VERSION},
            }),
        ),
        // Plain acknowledgement, not a JSON-RPC result: notifications carry
        // no id to respond to.
        McpMethod::Initialized => json!({"status": "ok"}),
        McpMethod::ToolsList => ok_response(id, json!({"tools": state.tools.descriptors()})),
        McpMethod::ToolsCall => {
            let params: ToolCallParams =
                match serde_json::from_value(request.params.unwrap_or_else(|| json!({}))) {
                    Ok(params) => params,
                    Err(err) => {
                        return error_response(id, INVALID_PARAMS, format!("Invalid params: {}", err))
                    }
                };
            match state
                .tools
                .call(&params.name, state.data_source.clone(), params.arguments)
            {
                Some(invocation) => {
                    let text = invocation.await;
                    ok_response(id, json!({"content": [{"type": "text", "text": text}]}))
                }
                None => {
                    error!(tool = %params.name, "tool not found");
                    error_response(
                        id,
                        INTERNAL_ERROR,
                        format!("Tool execution failed: unknown tool '{}'", params.name),
                    )
                }
            }
        }
        McpMethod::Unknown(method) => {
            error_response(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
        }
    }
}
