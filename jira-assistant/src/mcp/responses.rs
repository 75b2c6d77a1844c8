//! Response creation utilities for MCP operations
//!
//! Every tool answers with a single text item holding pretty-printed JSON.
//! `is_error` mirrors the `success` field of that JSON.

use crate::dispatcher::Outcome;
use rmcp::model::*;
use serde::Serialize;

fn text_result(text: String, is_error: bool) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent { text }),
            None,
        )],
        is_error: Some(is_error),
    }
}

/// Serialize `value` as the tool result
pub fn create_json_response<T: Serialize>(value: &T, is_error: bool) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => text_result(text, is_error),
        Err(e) => create_error_response(format!("Failed to serialize response: {e}")),
    }
}

/// Tool result for an operation outcome
pub fn create_outcome_response<T: Serialize>(outcome: &Outcome<T>) -> CallToolResult {
    create_json_response(outcome, !outcome.is_success())
}

/// `{"success": false, "error": message}` as a tool result
pub fn create_error_response(message: impl Into<String>) -> CallToolResult {
    let body = serde_json::json!({
        "success": false,
        "error": message.into(),
    });
    let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
    text_result(text, true)
}

/// Text of the first content item, for inspecting results in tests
pub fn response_text(result: &CallToolResult) -> Option<&str> {
    result.content.first().and_then(|content| match &content.raw {
        RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    })
}
