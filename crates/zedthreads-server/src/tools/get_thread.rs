//! Fetch one thread by id, with filtering and message paging.

use super::{missing, parse_arguments, structured_output, OutputMetadata};
use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::state::AppState;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use zedthreads_core::{apply_filters, clamp_messages, try_decode_record, Result, ThreadsError};
use zedthreads_types::{ConsumableThread, ThreadFilter};

pub const NAME: &str = "zed-get-thread";

/// Number of messages returned per page.
const MESSAGE_WINDOW: usize = 10;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "Get a specific Zed chat thread by ID".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The thread ID"
                },
                "page": {
                    "type": "integer",
                    "description": "The output is paged to handle resources more efficiently. Defaults to `0` when omitted."
                },
                "filters": {
                    "type": "array",
                    "description": "Filters to apply to the message output on the given thread. Notes: Filters are applied before paging, therefore consistent filtering should lead to consistent paging... Tho if filters are used, message indices address the filtered list. Uses AND logic. `query` input is always caseInsensitive in this search.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "type": {
                                "type": "string",
                                "enum": ["voice", "query", "isTool", "isThinking"]
                            },
                            "value": {
                                "type": "string",
                                "description": "Value for filters that need one (like query). Valid values for each enum are:\nvoice: `agent` or `user`\nquery: any valid search query\nisTool: true/false\nisThinking: true/false"
                            }
                        },
                        "required": ["type", "value"]
                    }
                }
            },
            "required": ["id"]
        }),
    }
}

#[derive(Debug, Deserialize)]
struct FilterSpec {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Params {
    id: Option<String>,
    page: Option<i64>,
    filters: Vec<FilterSpec>,
}

pub fn run(state: &AppState, arguments: &Value) -> Result<ToolCallResult> {
    let params: Params = parse_arguments(arguments)?;
    let id = params.id.ok_or_else(|| missing("id"))?;
    let page = params.page.unwrap_or(0);
    if page < 0 {
        return Err(ThreadsError::Validation("page must be >= 0".to_string()));
    }

    // Unknown filter types and invalid values are skipped, not errors.
    let filters: Vec<ThreadFilter> = params
        .filters
        .iter()
        .filter_map(|spec| ThreadFilter::parse(&spec.kind, &spec.value))
        .collect();

    let record = state
        .store
        .fetch_by_id(&id)?
        .ok_or_else(|| ThreadsError::ThreadNotFound(id.clone()))?;

    // A thread whose blob fails to decode is surfaced with a null body
    // rather than failing the request.
    let thread = try_decode_record(&record).map(|thread| {
        let filtered = apply_filters(&thread, &filters);
        let start = page as usize;
        clamp_messages(&filtered, start..start.saturating_add(MESSAGE_WINDOW))
    });

    let result = ConsumableThread::project(&record, thread, Utc::now());
    structured_output(
        OutputMetadata::summarized("Thread Details", None),
        &[result],
    )
}
