//! Tool handler plumbing.
//!
//! Every Sage tool is a pure projection from its parameters to an
//! [`ApiRequest`]. The [`SageTool`] trait captures that shape; the helpers
//! here turn an implementation into rmcp metadata, a type-erased request
//! builder, and the uniform result envelope.

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, Content, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::ToolError;
use crate::domains::sage::ApiRequest;

/// A tool backed by a single Sage API endpoint.
pub trait SageTool {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Arguments accepted by the tool; its schema is the tool's input schema.
    type Params: DeserializeOwned + JsonSchema + 'static;

    /// Map arguments to the request sent to Sage.
    fn request(params: Self::Params) -> Result<ApiRequest, ToolError>;
}

/// Create the Tool model (metadata) for a tool.
pub fn to_tool<T: SageTool>() -> Tool {
    Tool {
        name: T::NAME.into(),
        description: Some(T::DESCRIPTION.into()),
        input_schema: cached_schema_for_type::<T::Params>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Deserialize raw arguments and project them into a request.
pub fn build_request<T: SageTool>(arguments: JsonObject) -> Result<ApiRequest, ToolError> {
    let params: T::Params = serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(format!("{}: {}", T::NAME, e)))?;
    T::request(params)
}

/// Wrap a decoded API response as a successful tool result.
pub fn success_result(value: &Value) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => error_result(&ToolError::internal(e.to_string())),
    }
}

/// Wrap a failure as an error-flagged tool result.
pub fn error_result(err: &ToolError) -> CallToolResult {
    warn!("Tool call failed: {}", err);
    CallToolResult::error(vec![Content::text(format!("Error: {}", err))])
}
