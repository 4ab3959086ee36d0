//! Search threads by summary text.

use super::{missing, parse_arguments, structured_output, OutputMetadata};
use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::state::AppState;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use zedthreads_core::{Result, ThreadsError};
use zedthreads_types::ConsumableThread;

pub const NAME: &str = "zed-search-threads";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "Search Zed chat threads by summary text".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query to match against thread summaries"
                },
                "limit": {
                    "type": "integer",
                    "description": "Limit result count"
                }
            },
            "required": ["query"]
        }),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Params {
    query: Option<String>,
    limit: Option<i64>,
}

pub fn run(state: &AppState, arguments: &Value) -> Result<ToolCallResult> {
    let params: Params = parse_arguments(arguments)?;
    let query = params.query.ok_or_else(|| missing("query"))?;
    let limit = match params.limit {
        Some(limit) if limit < 0 => {
            return Err(ThreadsError::Validation("limit must be >= 0".to_string()))
        }
        Some(limit) => Some(limit as usize),
        None => None,
    };

    let records = state.store.search_summaries(&query, limit)?;
    let now = Utc::now();
    let results: Vec<ConsumableThread> = records
        .iter()
        .map(|record| ConsumableThread::project(record, None, now))
        .collect();

    structured_output(
        OutputMetadata::summarized("Thread Titles Search Results", Some(results.len())),
        &results,
    )
}
