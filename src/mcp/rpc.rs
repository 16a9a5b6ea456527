//! JSON-RPC envelope types and validation
//!
//! Requests are validated field by field from raw JSON so that a present `null`
//! id can be told apart from a missing one.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::RpcFault;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub id: Value,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: RpcOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcOutcome {
    Result(Value),
    Error(RpcErrorObject),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcErrorObject {
    pub code: i32,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcResponse {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: RpcOutcome::Result(result),
        }
    }

    pub fn fault(id: Value, fault: &RpcFault) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: RpcOutcome::Error(RpcErrorObject {
                code: fault.code(),
                message: fault.message(),
                data: fault.data(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, RpcOutcome::Error(_))
    }
}

/// Checks the request envelope. On failure the id to echo back is returned
/// alongside the fault, `null` when none could be read.
pub fn parse_request(payload: Value) -> Result<RpcRequest, (Value, RpcFault)> {
    let Value::Object(mut object) = payload else {
        return Err((Value::Null, RpcFault::InvalidRequest));
    };

    let id = object.remove("id");
    let echo_id = id.clone().unwrap_or(Value::Null);

    if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err((echo_id, RpcFault::InvalidRequest));
    }

    let Some(Value::String(method)) = object.remove("method") else {
        return Err((echo_id, RpcFault::InvalidRequest));
    };

    let Some(id) = id else {
        return Err((echo_id, RpcFault::InvalidRequest));
    };

    Ok(RpcRequest {
        id,
        method,
        params: object.remove("params"),
    })
}

pub fn params_object(params: Option<&Value>) -> Option<&Map<String, Value>> {
    params.and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_null_id() {
        let request = parse_request(json!({"jsonrpc": "2.0", "id": null, "method": "tools/list"}))
            .expect("null id is allowed");
        assert_eq!(request.id, Value::Null);
        assert_eq!(request.method, "tools/list");
        assert_eq!(request.params, None);
    }

    #[test]
    fn keeps_params_and_string_id() {
        let request = parse_request(json!({
            "jsonrpc": "2.0",
            "id": "abc",
            "method": "generateLevels",
            "params": {"userId": "u1"}
        }))
        .expect("valid request");
        assert_eq!(request.id, json!("abc"));
        assert_eq!(request.params, Some(json!({"userId": "u1"})));
    }

    #[test]
    fn rejects_missing_id() {
        let (id, fault) = parse_request(json!({"jsonrpc": "2.0", "method": "initialize"}))
            .expect_err("missing id must fail");
        assert_eq!(id, Value::Null);
        assert!(matches!(fault, RpcFault::InvalidRequest));
    }

    #[test]
    fn rejects_wrong_version_and_echoes_id() {
        let (id, fault) = parse_request(json!({"jsonrpc": "1.0", "id": 7, "method": "initialize"}))
            .expect_err("wrong version must fail");
        assert_eq!(id, json!(7));
        assert!(matches!(fault, RpcFault::InvalidRequest));
    }

    #[test]
    fn rejects_non_string_method_and_non_object_body() {
        let (_, fault) = parse_request(json!({"jsonrpc": "2.0", "id": 1, "method": 42}))
            .expect_err("numeric method must fail");
        assert!(matches!(fault, RpcFault::InvalidRequest));

        let (id, fault) = parse_request(json!([1, 2, 3])).expect_err("array must fail");
        assert_eq!(id, Value::Null);
        assert!(matches!(fault, RpcFault::InvalidRequest));
    }

    #[test]
    fn serializes_exactly_one_of_result_or_error() {
        let ok = serde_json::to_value(RpcResponse::result(json!(1), json!({})))
            .expect("serialize result");
        assert_eq!(ok, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));

        let err = serde_json::to_value(RpcResponse::fault(Value::Null, &RpcFault::InvalidRequest))
            .expect("serialize error");
        assert_eq!(
            err,
            json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": {"code": -32600, "message": "Invalid Request"}
            })
        );
    }
}
