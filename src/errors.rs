use serde_json::{json, Value};
use thiserror::Error;

use crate::levels_client::GeneratorError;

pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INTERNAL_ERROR: i32 = -32603;

/// Every way a JSON-RPC call can fail. All of them are reported to the caller
/// as an `error` object over HTTP 200.
#[derive(Debug, Error)]
pub enum RpcFault {
    #[error("invalid request")]
    InvalidRequest,
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error(transparent)]
    Collaborator(#[from] GeneratorError),
    #[error("{0}")]
    Internal(String),
}

impl RpcFault {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidRequest => INVALID_REQUEST,
            Self::MethodNotFound(_) | Self::UnknownTool(_) => METHOD_NOT_FOUND,
            Self::Collaborator(_) | Self::Internal(_) => INTERNAL_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound(_) => "Method not found",
            Self::UnknownTool(_) => "Unknown tool",
            Self::Collaborator(_) | Self::Internal(_) => "Internal error",
        }
    }

    pub fn data(&self) -> Option<Value> {
        match self {
            Self::InvalidRequest | Self::MethodNotFound(_) => None,
            Self::UnknownTool(name) => Some(json!(name)),
            Self::Collaborator(err) => Some(json!(err.to_string())),
            Self::Internal(message) => Some(json!(message)),
        }
    }
}
