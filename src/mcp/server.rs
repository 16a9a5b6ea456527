//! The central Model Context Protocol engine
//!
//! Validates the JSON-RPC envelope, answers the handshake (`initialize`),
//! capability discovery and notifications, and routes tool invocations.

use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ServerCapabilities, ServerCapabilitiesPrompts,
    ServerCapabilitiesResources, ServerCapabilitiesTools,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::domain::tools::{
    build_tools_list, handle_legacy_generate_levels, handle_tools_call, GENERATE_LEVELS_TOOL,
};
use crate::mcp::rpc::{parse_request, RpcRequest, RpcResponse};
use crate::{errors::RpcFault, AppState};

pub const PROTOCOL_VERSION: &str = "2025-03-26";
pub const SERVER_NAME: &str = "Realentless MCP";

pub async fn handle_json_rpc_value(state: &AppState, payload: Value) -> RpcResponse {
    match parse_request(payload) {
        Ok(request) => handle_json_rpc_request(state, request).await,
        Err((id, fault)) => {
            warn!(id = %id, "rejected malformed json-rpc envelope");
            RpcResponse::fault(id, &fault)
        }
    }
}

pub async fn handle_json_rpc_request(state: &AppState, request: RpcRequest) -> RpcResponse {
    let RpcRequest { id, method, params } = request;
    let audit_params = redact_audit_params(params.as_ref());

    let response = match dispatch(state, &method, params).await {
        Ok(result) => RpcResponse::result(id, result),
        Err(fault) => RpcResponse::fault(id, &fault),
    };

    info!(
        method = %method,
        params = %audit_params,
        outcome = if response.is_error() { "failure" } else { "success" },
        "mcp action audited"
    );

    response
}

async fn dispatch(state: &AppState, method: &str, params: Option<Value>) -> Result<Value, RpcFault> {
    match method {
        "initialize" => initialize_result(),
        "tools/list" => serde_json::to_value(build_tools_list())
            .map(|tools| json!({ "tools": tools }))
            .map_err(|err| RpcFault::internal(err.to_string())),
        "notifications/initialized" => Ok(json!({})),
        "tools/call" => handle_tools_call(state, params).await,
        GENERATE_LEVELS_TOOL => handle_legacy_generate_levels(state, params).await,
        other => Err(RpcFault::MethodNotFound(other.to_string())),
    }
}

pub fn initialize_result() -> Result<Value, RpcFault> {
    let result = InitializeResult {
        server_info: Implementation {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(true),
            }),
            resources: Some(ServerCapabilitiesResources {
                subscribe: None,
                list_changed: Some(true),
            }),
            prompts: Some(ServerCapabilitiesPrompts {
                list_changed: Some(true),
            }),
            ..Default::default()
        },
        protocol_version: PROTOCOL_VERSION.to_string(),
        instructions: None,
        meta: None,
    };

    serde_json::to_value(result).map_err(|err| RpcFault::internal(err.to_string()))
}

pub fn redact_audit_params(params: Option<&Value>) -> Value {
    params.map(redact_audit_value).unwrap_or(Value::Null)
}

pub fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_audit_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_audit_value).collect()),
        _ => value.clone(),
    }
}

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    matches!(
        normalized.as_str(),
        "authorization" | "bearer" | "api_key" | "apikey"
    ) || normalized.contains("token")
        || normalized.contains("secret")
        || normalized.contains("password")
        || normalized.contains("credential")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{initialize_result, redact_audit_params, PROTOCOL_VERSION, SERVER_NAME};

    #[test]
    fn redacts_sensitive_fields_in_audit_params() {
        let params = json!({
            "name": "generateLevels",
            "arguments": {
                "userId": "6c7e2bee",
                "accessToken": "should-not-appear",
                "levels": [{"id": "level-1", "api_key": "should-not-appear"}]
            }
        });

        let redacted = redact_audit_params(Some(&params));

        assert_eq!(redacted["name"], json!("generateLevels"));
        assert_eq!(redacted["arguments"]["userId"], json!("6c7e2bee"));
        assert_eq!(redacted["arguments"]["accessToken"], json!("[REDACTED]"));
        assert_eq!(redacted["arguments"]["levels"][0]["id"], json!("level-1"));
        assert_eq!(
            redacted["arguments"]["levels"][0]["api_key"],
            json!("[REDACTED]")
        );
    }

    #[test]
    fn initialize_declares_fixed_version_and_list_changed_capabilities() {
        let result = initialize_result().expect("initialize result");

        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(result["serverInfo"]["version"], "0.0.1");
        for capability in ["tools", "resources", "prompts"] {
            assert_eq!(result["capabilities"][capability]["listChanged"], true);
        }
    }
}
