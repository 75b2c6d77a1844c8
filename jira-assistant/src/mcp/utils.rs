//! Utility functions for MCP operations

use serde_json::Value;

/// Generate a JSON schema for a type that implements JsonSchema
pub fn generate_tool_schema<T>() -> Value
where
    T: schemars::JsonSchema,
{
    serde_json::to_value(schemars::schema_for!(T))
        .ok()
        .filter(Value::is_object)
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
}

/// Reject blank required string arguments
pub fn require_non_empty(value: &str, field: &str) -> Result<(), rmcp::Error> {
    if value.trim().is_empty() {
        return Err(rmcp::Error::invalid_params(
            format!("Invalid arguments: {field} must not be empty"),
            None,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::types::CloseTicketRequest;

    #[test]
    fn test_generate_tool_schema() {
        let schema = generate_tool_schema::<CloseTicketRequest>();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["comment"].is_object());
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("RVV-1", "ticket_key").is_ok());
        let err = require_non_empty("  ", "ticket_key").unwrap_err();
        assert!(err.message.contains("ticket_key"));
    }
}
