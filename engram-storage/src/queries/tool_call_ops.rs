//! Tool invocation records, cascade-deleted with their content item.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::ToolCall;

use crate::to_storage_err;

pub fn insert_tool_calls(
    conn: &Connection,
    content_item_id: i64,
    calls: &[ToolCall],
) -> EngramResult<usize> {
    let mut stmt = conn
        .prepare(
            "INSERT INTO tool_calls (content_item_id, tool_name, tool_input, tool_result,
                                     is_error, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    for call in calls {
        let input_json = serde_json::to_string(&call.tool_input)?;
        stmt.execute(params![
            content_item_id,
            call.tool_name,
            input_json,
            call.tool_result,
            call.is_error as i32,
            call.timestamp.map(|t| t.to_rfc3339()),
        ])
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(calls.len())
}

pub fn tool_calls_for_content(
    conn: &Connection,
    content_item_id: i64,
) -> EngramResult<Vec<ToolCall>> {
    let mut stmt = conn
        .prepare(
            "SELECT tool_name, tool_input, tool_result, is_error, timestamp
             FROM tool_calls WHERE content_item_id = ?1 ORDER BY id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![content_item_id], |row| {
            let input_json: Option<String> = row.get(1)?;
            let timestamp: Option<String> = row.get(4)?;
            let is_error: i32 = row.get(3)?;
            Ok((
                row.get::<_, String>(0)?,
                input_json,
                row.get::<_, Option<String>>(2)?,
                is_error,
                timestamp,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut calls = Vec::new();
    for row in rows {
        let (tool_name, input_json, tool_result, is_error, timestamp) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let tool_input = input_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?
            .unwrap_or(serde_json::Value::Null);
        let timestamp: Option<DateTime<Utc>> = timestamp
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));
        calls.push(ToolCall {
            tool_name,
            tool_input,
            tool_result,
            is_error: is_error != 0,
            timestamp,
        });
    }
    Ok(calls)
}
