//! Helper functions for the provider server.

use crate::provider::ResourceKind;
use crate::Error;
use rmcp::model::{CallToolResult, Content, ErrorCode, ErrorData as McpError};
use serde::Serialize;
use serde_json::Value;

/// Convert an Error to an appropriate MCP error with proper error code.
///
/// Caller-side problems (bad configuration, unknown type, missing
/// credentials) map to INVALID_PARAMS; remote and transport failures map to
/// INTERNAL_ERROR. The underlying message is always passed through.
pub fn error_to_mcp(context: &str, error: Error) -> McpError {
    let code = match &error {
        Error::MissingToken
        | Error::InvalidToken
        | Error::InvalidProjectId { .. }
        | Error::InvalidConfig { .. }
        | Error::UnknownResourceType(_)
        | Error::UpdateNotSupported(_)
        | Error::MissingId(_)
        | Error::NotFound(_) => ErrorCode::INVALID_PARAMS,
        Error::Api { .. } | Error::Http(_) | Error::Parse(_) => ErrorCode::INTERNAL_ERROR,
    };

    McpError::new(code, format!("{}: {}", context, error), None)
}

/// Convert any Display error to an MCP error (for non-Error types).
pub fn to_mcp_error(context: &str, error: impl std::fmt::Display) -> McpError {
    McpError::new(
        ErrorCode::INTERNAL_ERROR,
        format!("{}: {}", context, error),
        None,
    )
}

/// Parse a resource type name from tool parameters.
pub fn parse_kind(resource_type: &str) -> Result<ResourceKind, McpError> {
    resource_type
        .parse()
        .map_err(|e| error_to_mcp("Invalid resource type", e))
}

/// Serialize a value to a JSON response.
pub fn json_response<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| to_mcp_error("Failed to serialize response", e))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Respond with resource state; `None` tells the host the resource is gone.
pub fn state_response(state: Option<Value>) -> Result<CallToolResult, McpError> {
    let removed = state.is_none();
    json_response(&serde_json::json!({"state": state, "removed": removed}))
}

/// Create a success response with a message.
pub fn success_response(message: &str) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::json!({"success": true, "message": message}).to_string(),
    )]))
}
