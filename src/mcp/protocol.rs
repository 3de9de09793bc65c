//! JSON-RPC 2.0 envelope types for the tool protocol.

use serde::Deserialize;
use serde_json::{json, Value};

/// Protocol revision reported to clients during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Incoming request envelope. `id` is absent for notifications.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// Parameters of a `tools/call` request.
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default = "empty_object")]
    pub arguments: Value,
}

fn empty_object() -> Value {
    json!({})
}

/// The finite method set, with an explicit unknown fallback so dispatch
/// stays exhaustiveness-checked as methods are added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McpMethod {
    Initialize,
    Initialized,
    ToolsList,
    ToolsCall,
    Unknown(String),
}

impl From<&str> for McpMethod {
    fn from(method: &str) -> Self {
        match method {
            "initialize" => McpMethod::Initialize,
            "notifications/initialized" => McpMethod::Initialized,
            "tools/list" => McpMethod::ToolsList,
            "tools/call" => McpMethod::ToolsCall,
            other => McpMethod::Unknown(other.to_string()),
        }
    }
}

/// Success envelope.
pub fn ok_response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

/// Error envelope with a JSON-RPC error object.
pub fn error_response(id: Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parsing_covers_the_protocol() {
        assert_eq!(McpMethod::from("initialize"), McpMethod::Initialize);
        assert_eq!(
            McpMethod::from("notifications/initialized"),
            McpMethod::Initialized
        );
        assert_eq!(McpMethod::from("tools/list"), McpMethod::ToolsList);
        assert_eq!(McpMethod::from("tools/call"), McpMethod::ToolsCall);
        assert_eq!(
            McpMethod::from("resources/list"),
            McpMethod::Unknown("resources/list".to_string())
        );
    }

    #[test]
    fn tool_call_params_default_to_empty_arguments() {
        let params: ToolCallParams =
            serde_json::from_value(json!({"name": "get_all_stock"})).unwrap();
        assert_eq!(params.arguments, json!({}));
    }

    #[test]
    fn envelopes_carry_the_id_through() {
        let ok = ok_response(json!(7), json!({"x": 1}));
        assert_eq!(ok["jsonrpc"], "2.0");
        assert_eq!(ok["id"], 7);
        assert_eq!(ok["result"]["x"], 1);

        let err = error_response(Value::Null, METHOD_NOT_FOUND, "Method not found: nope");
        assert_eq!(err["id"], Value::Null);
        assert_eq!(err["error"]["code"], METHOD_NOT_FOUND);
    }
}
