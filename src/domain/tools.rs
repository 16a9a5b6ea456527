//! The `generateLevels` tool exposed via Model Context Protocol
//!
//! Publishes the tool descriptor and forwards invocations to the
//! `LevelsGenerator` collaborator, both through `tools/call` and the legacy
//! direct method name.

use rust_mcp_sdk::schema::{CallToolResult, ContentBlock, TextContent};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::mcp::rpc::params_object;
use crate::{errors::RpcFault, AppState};

pub const GENERATE_LEVELS_TOOL: &str = "generateLevels";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
    pub input_schema: Value,
}

fn bilingual_text() -> Value {
    json!({
        "type": "object",
        "properties": {
            "en": { "type": "string" },
            "fr": { "type": "string" }
        }
    })
}

pub fn generate_levels_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "userId": {
                "type": "string",
                "description": "The user's unique ID"
            },
            "levels": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "title": bilingual_text(),
                        "subtitle": bilingual_text(),
                        "message": bilingual_text(),
                        "position": { "type": "number" },
                        "availableAt": { "type": "string" },
                        "userId": { "type": "string" },
                        "bodyExercisesPerRound": { "type": "number" },
                        "bodyIntensity": { "type": "number" },
                        "bodyMessage": bilingual_text(),
                        "bodyRounds": { "type": "number" },
                        "mindIntensity": { "type": "number" },
                        "mindMessage": bilingual_text(),
                        "mindRounds": { "type": "number" }
                    }
                },
                "description": "Array of level objects with multilingual titles, messages, and workout configuration"
            },
            "exercises": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "exerciseId": {
                            "type": "string",
                            "description": "Must be a valid exercise ID from the available exercises in the context"
                        },
                        "repetitions": { "type": "number", "nullable": true },
                        "duration": { "type": "number", "nullable": true },
                        "type": {
                            "type": "string",
                            "enum": ["BODY", "MIND"]
                        },
                        "userLevelId": { "type": "string" }
                    }
                },
                "description": "Array of exercise objects. The exerciseId must reference a valid exercise from the available exercises provided in the context."
            }
        },
        "required": ["userId", "levels", "exercises"]
    })
}

pub fn build_tools_list() -> Vec<ToolDescriptor> {
    let schema = generate_levels_schema();
    vec![ToolDescriptor {
        name: GENERATE_LEVELS_TOOL,
        description: "Generate personalized levels and exercises for a user. Use only the available exercises provided in the context.",
        parameters: schema.clone(),
        input_schema: schema,
    }]
}

/// `tools/call`: runs the named tool and wraps its output as one text block.
pub async fn handle_tools_call(state: &AppState, params: Option<Value>) -> Result<Value, RpcFault> {
    let Some(call) = params_object(params.as_ref()) else {
        return Err(RpcFault::internal("tools/call requires a params object"));
    };

    let name = call.get("name").and_then(Value::as_str).unwrap_or_default();
    if name != GENERATE_LEVELS_TOOL {
        return Err(RpcFault::UnknownTool(name.to_string()));
    }

    let args = call.get("arguments").cloned().unwrap_or(Value::Null);
    let output = call_generate_levels(state, args).await?;
    let text = serde_json::to_string_pretty(&output)
        .map_err(|err| RpcFault::internal(err.to_string()))?;

    let result = CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: None,
        meta: None,
        structured_content: None,
    };

    serde_json::to_value(result).map_err(|err| RpcFault::internal(err.to_string()))
}

/// Legacy convention: `generateLevels` as the JSON-RPC method, result returned
/// as is.
pub async fn handle_legacy_generate_levels(
    state: &AppState,
    params: Option<Value>,
) -> Result<Value, RpcFault> {
    call_generate_levels(state, params.unwrap_or(Value::Null)).await
}

async fn call_generate_levels(state: &AppState, args: Value) -> Result<Value, RpcFault> {
    let levels = args.get("levels").and_then(Value::as_array).map(Vec::len);
    let exercises = args.get("exercises").and_then(Value::as_array).map(Vec::len);
    info!(levels, exercises, "calling generateLevels");

    let output = state.levels_generator.generate_levels(args).await.map_err(|err| {
        tracing::error!(error = %err, "generateLevels failed");
        RpcFault::from(err)
    })?;

    Ok(output)
}
