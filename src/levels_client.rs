use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),
    #[error("Request failed: {0}")]
    Request(String),
}

/// Produces personalized levels and exercises for a user.
///
/// Implementations own input validation; the MCP layer forwards arguments
/// untouched and reports any failure as an internal error.
#[async_trait]
pub trait LevelsGenerator: Send + Sync {
    async fn generate_levels(&self, args: Value) -> Result<Value, GeneratorError>;
}

#[derive(Debug, Serialize)]
struct BackendRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: &'a Value,
}

/// Forwards `generateLevels` to a JSON-RPC backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLevelsGenerator {
    client: Client,
    endpoint: Url,
}

impl HttpLevelsGenerator {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl LevelsGenerator for HttpLevelsGenerator {
    async fn generate_levels(&self, args: Value) -> Result<Value, GeneratorError> {
        let request = BackendRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "generateLevels",
            params: &args,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| GeneratorError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| GeneratorError::Request(err.to_string()))?;

        unwrap_backend_response(body)
    }
}

fn unwrap_backend_response(mut body: Value) -> Result<Value, GeneratorError> {
    if let Some(result) = body.get_mut("result") {
        return Ok(result.take());
    }

    if let Some(error) = body.get("error") {
        return Err(GeneratorError::Backend(error.to_string()));
    }

    Err(GeneratorError::UnexpectedResponse(body.to_string()))
}
