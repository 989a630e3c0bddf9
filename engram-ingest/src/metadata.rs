//! Session metadata and tool-call lifting from transcript deltas.
//!
//! Deltas are JSONL host transcripts. Both extractors are pure functions
//! over the raw delta; malformed lines are skipped.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use engram_core::constants::TOOL_RESULT_MAX_CHARS;
use engram_core::models::ToolCall;

/// Session-level metadata found in a delta. Fields stay `None` when the
/// delta never mentions them; the last occurrence wins otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMetadata {
    pub git_branch: Option<String>,
    pub cwd: Option<String>,
    pub host_version: Option<String>,
    pub thinking_level: Option<String>,
}

/// Lift session metadata out of a delta.
pub fn extract_metadata(delta: &str) -> SessionMetadata {
    let mut meta = SessionMetadata::default();
    for line in parsed_lines(delta) {
        if let Some(s) = line.get("gitBranch").and_then(Value::as_str) {
            meta.git_branch = Some(s.to_string());
        }
        if let Some(s) = line.get("cwd").and_then(Value::as_str) {
            meta.cwd = Some(s.to_string());
        }
        if let Some(s) = line.get("version").and_then(Value::as_str) {
            meta.host_version = Some(s.to_string());
        }
        if let Some(s) = line
            .get("thinkingLevel")
            .and_then(Value::as_str)
            .or_else(|| line.pointer("/thinking/level").and_then(Value::as_str))
        {
            meta.thinking_level = Some(s.to_string());
        }
    }
    meta
}

/// Lift tool invocations out of a delta, pairing each `tool_use` content
/// block with the `tool_result` block answering it.
pub fn extract_tool_calls(delta: &str) -> Vec<ToolCall> {
    let mut calls: Vec<ToolCall> = Vec::new();
    let mut index_by_use_id: HashMap<String, usize> = HashMap::new();

    for line in parsed_lines(delta) {
        let timestamp = line
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(parse_timestamp);

        let Some(content) = line
            .pointer("/message/content")
            .and_then(Value::as_array)
        else {
            continue;
        };

        for block in content {
            match block.get("type").and_then(Value::as_str) {
                Some("tool_use") => {
                    let Some(name) = block.get("name").and_then(Value::as_str) else {
                        continue;
                    };
                    if let Some(id) = block.get("id").and_then(Value::as_str) {
                        index_by_use_id.insert(id.to_string(), calls.len());
                    }
                    calls.push(ToolCall {
                        tool_name: name.to_string(),
                        tool_input: block.get("input").cloned().unwrap_or(Value::Null),
                        tool_result: None,
                        is_error: false,
                        timestamp,
                    });
                }
                Some("tool_result") => {
                    let Some(idx) = block
                        .get("tool_use_id")
                        .and_then(Value::as_str)
                        .and_then(|id| index_by_use_id.get(id).copied())
                    else {
                        continue;
                    };
                    calls[idx].tool_result =
                        block.get("content").map(|c| truncate(&result_text(c)));
                    calls[idx].is_error = block
                        .get("is_error")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                }
                _ => {}
            }
        }
    }
    calls
}

fn parsed_lines(delta: &str) -> impl Iterator<Item = Value> + '_ {
    delta
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Flatten a tool_result content value to text: strings pass through, text
/// blocks concatenate, anything else serializes.
fn result_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(TOOL_RESULT_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELTA: &str = r#"
{"type":"user","cwd":"/home/dev/project","gitBranch":"main","version":"2.1.0","message":{"content":[{"type":"text","text":"run the tests"}]},"timestamp":"2026-07-01T10:00:00Z"}
{"type":"assistant","message":{"content":[{"type":"tool_use","id":"toolu_1","name":"Bash","input":{"command":"cargo test"}}]},"timestamp":"2026-07-01T10:00:05Z"}
{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"toolu_1","content":"all tests passed","is_error":false}]},"timestamp":"2026-07-01T10:00:09Z"}
not json at all
{"type":"user","gitBranch":"feature/recall","message":{"content":[]}}
"#;

    #[test]
    fn metadata_takes_the_last_occurrence() {
        let meta = extract_metadata(DELTA);
        assert_eq!(meta.git_branch.as_deref(), Some("feature/recall"));
        assert_eq!(meta.cwd.as_deref(), Some("/home/dev/project"));
        assert_eq!(meta.host_version.as_deref(), Some("2.1.0"));
        assert_eq!(meta.thinking_level, None);
    }

    #[test]
    fn tool_calls_pair_use_with_result() {
        let calls = extract_tool_calls(DELTA);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool_name, "Bash");
        assert_eq!(calls[0].tool_input["command"], "cargo test");
        assert_eq!(calls[0].tool_result.as_deref(), Some("all tests passed"));
        assert!(!calls[0].is_error);
        assert!(calls[0].timestamp.is_some());
    }

    #[test]
    fn long_results_truncate_to_the_cap() {
        let long = "x".repeat(2000);
        let delta = format!(
            concat!(
                r#"{{"message":{{"content":[{{"type":"tool_use","id":"t1","name":"Read","input":{{}}}}]}}}}"#,
                "\n",
                r#"{{"message":{{"content":[{{"type":"tool_result","tool_use_id":"t1","content":"{}"}}]}}}}"#,
            ),
            long
        );
        let calls = extract_tool_calls(&delta);
        assert_eq!(calls[0].tool_result.as_ref().unwrap().len(), 500);
    }

    #[test]
    fn error_results_are_flagged() {
        let delta = concat!(
            r#"{"message":{"content":[{"type":"tool_use","id":"t1","name":"Bash","input":{"command":"false"}}]}}"#,
            "\n",
            r#"{"message":{"content":[{"type":"tool_result","tool_use_id":"t1","content":"exit 1","is_error":true}]}}"#,
        );
        let calls = extract_tool_calls(delta);
        assert!(calls[0].is_error);
    }

    #[test]
    fn block_array_results_flatten_text() {
        let delta = concat!(
            r#"{"message":{"content":[{"type":"tool_use","id":"t1","name":"Read","input":{}}]}}"#,
            "\n",
            r#"{"message":{"content":[{"type":"tool_result","tool_use_id":"t1","content":[{"type":"text","text":"line one"},{"type":"text","text":"line two"}]}]}}"#,
        );
        let calls = extract_tool_calls(delta);
        assert_eq!(calls[0].tool_result.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn empty_delta_yields_defaults() {
        assert_eq!(extract_metadata(""), SessionMetadata::default());
        assert!(extract_tool_calls("").is_empty());
    }
}
