//! Tool adapter: exposes the resolution pipeline as one callable tool and
//! turns every outcome into a result envelope.

use crate::directory_client::DirectoryApi;
use crate::models::EligibilityRequest;
use crate::resolution::get_fixed_line_eligibilities_by_address;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const TOOL_NAME: &str = "get_fixed_line_eligibilities";

pub const TOOL_DESCRIPTION: &str = "Get fixed-line eligibilities for an address from the ARCEP API. Chains town lookup, address lookup, building lookup, and eligibility fetch.";

/// Tool Definition
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Result envelope returned to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(
        rename = "isError",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: format!("Error: {}", message),
            }],
            is_error: true,
        }
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|ToolContent::Text { text }| text.as_str())
    }
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_NAME.to_string(),
        description: TOOL_DESCRIPTION.to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "streetAddress": {
                    "type": "string",
                    "description": "The street address to look up (e.g. '10 rue de la Paix')"
                },
                "townName": {
                    "type": "string",
                    "description": "The town/commune name (e.g. 'Paris')"
                }
            },
            "required": ["streetAddress", "townName"]
        }),
    }
}

/// Runs the pipeline for `request`. Never fails: errors become an
/// error-flagged envelope.
pub async fn call_fixed_line_eligibilities<C: DirectoryApi>(
    client: &C,
    request: &EligibilityRequest,
) -> ToolResult {
    tracing::info!(
        "[{}] Tool call received: streetAddress={}, townName={}",
        TOOL_NAME,
        request.street_address,
        request.town_name
    );

    match get_fixed_line_eligibilities_by_address(
        client,
        &request.street_address,
        &request.town_name,
    )
    .await
    {
        Ok(text) => ToolResult::text(text),
        Err(e) => {
            tracing::warn!("[{}] Tool call failed: {}", TOOL_NAME, e);
            ToolResult::error(e)
        }
    }
}
