//! Tool invocations lifted out of transcript deltas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tool invocation, cascade-deleted with its content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    /// The tool's input, as JSON.
    pub tool_input: serde_json::Value,
    /// First 500 characters of the result.
    pub tool_result: Option<String>,
    pub is_error: bool,
    pub timestamp: Option<DateTime<Utc>>,
}
