//! MCP stdio server implementing JSON-RPC 2.0 over stdin/stdout.
//!
//! Protocol: newline-delimited JSON-RPC 2.0 on stdin/stdout.
//! Logging goes to stderr (stdout is reserved for protocol messages).

use crate::directory_client::DirectoryApi;
use crate::models::EligibilityRequest;
use crate::tool::{call_fixed_line_eligibilities, tool_definition, TOOL_NAME};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "arcep-api-eligibility";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

pub struct StdioServer<C: DirectoryApi> {
    client: C,
}

impl<C: DirectoryApi> StdioServer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Run the server loop on the process stdin/stdout until stdin closes.
    pub async fn run(&self) -> anyhow::Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve newline-delimited requests from `reader`, one response line per request.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        tracing::info!("MCP stdio server started");

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(line).await {
                let mut response_bytes = response.into_bytes();
                response_bytes.push(b'\n');
                writer.write_all(&response_bytes).await?;
                writer.flush().await?;
            }
        }

        tracing::info!("MCP stdio server stopped");
        Ok(())
    }

    /// Handle one JSON-RPC message. Notifications yield `None`.
    pub async fn handle_message(&self, line: &str) -> Option<String> {
        let request: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                return Some(error_response(
                    Value::Null,
                    PARSE_ERROR,
                    &format!("Parse error: {}", e),
                ));
            }
        };

        let method = request
            .get("method")
            .and_then(|m| m.as_str())
            .unwrap_or("");
        let Some(id) = request.get("id").cloned() else {
            tracing::debug!("Notification received: {}", method);
            return None;
        };
        let params = request.get("params").cloned().unwrap_or_else(|| json!({}));

        let response = match method {
            "initialize" => success_response(id, initialize_result()),
            "ping" => success_response(id, json!({})),
            "tools/list" => success_response(id, json!({ "tools": [tool_definition()] })),
            "tools/call" => self.handle_tools_call(id, &params).await,
            _ => error_response(id, METHOD_NOT_FOUND, &format!("Method not found: {}", method)),
        };
        Some(response)
    }

    async fn handle_tools_call(&self, id: Value, params: &Value) -> String {
        let name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
        if name != TOOL_NAME {
            return error_response(id, INVALID_PARAMS, &format!("Unknown tool: {}", name));
        }

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
        let request: EligibilityRequest = match serde_json::from_value(arguments) {
            Ok(request) => request,
            Err(e) => {
                return error_response(id, INVALID_PARAMS, &format!("Invalid arguments: {}", e));
            }
        };

        let result = call_fixed_line_eligibilities(&self.client, &request).await;
        match serde_json::to_value(&result) {
            Ok(value) => success_response(id, value),
            Err(e) => error_response(id, -32603, &format!("Internal error: {}", e)),
        }
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn success_response(id: Value, result: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
    .to_string()
}

fn error_response(id: Value, code: i64, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
    .to_string()
}
