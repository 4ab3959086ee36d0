//! List every thread in the archive.

use super::{parse_arguments, structured_output, OutputMetadata};
use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::state::AppState;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use zedthreads_core::{Result, ThreadsError};
use zedthreads_types::ConsumableThread;

pub const NAME: &str = "zed-list-threads";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "List all Zed chat threads from the threads database".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "Limit result count"
                }
            }
        }),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Params {
    limit: Option<i64>,
}

pub fn run(state: &AppState, arguments: &Value) -> Result<ToolCallResult> {
    let params: Params = parse_arguments(arguments)?;
    let limit = match params.limit {
        Some(limit) if limit < 0 => {
            return Err(ThreadsError::Validation("limit must be >= 0".to_string()))
        }
        Some(limit) => Some(limit as usize),
        None => None,
    };

    let records = state.store.fetch_all(limit)?;
    let now = Utc::now();
    let results: Vec<ConsumableThread> = records
        .iter()
        .map(|record| ConsumableThread::project(record, None, now))
        .collect();

    structured_output(OutputMetadata::count(results.len()), &results)
}
