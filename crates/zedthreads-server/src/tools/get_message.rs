//! Fetch one message with character-level pagination.

use super::{missing, parse_arguments, structured_output, OutputMetadata};
use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use zedthreads_core::{decode_record, Result, ThreadsError};
use zedthreads_types::Message;

pub const NAME: &str = "zed-get-message";

const DEFAULT_LIMIT: usize = 1000;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "Get a specific message from a Zed chat thread by its index. Returns paginated character content from the message to reduce token usage. Use offset and limit parameters to navigate through large messages.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "threadID": {
                    "type": "string",
                    "description": "The thread ID"
                },
                "messageIndex": {
                    "type": "integer",
                    "description": "The index of the message within the thread (0-based)"
                },
                "offset": {
                    "type": "integer",
                    "description": "Starting character position within the message (default: 0)"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of characters to return (default: 1000)"
                }
            },
            "required": ["threadID", "messageIndex"]
        }),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Params {
    #[serde(rename = "threadID")]
    thread_id: Option<String>,
    message_index: Option<i64>,
    offset: Option<i64>,
    limit: Option<i64>,
}

/// One paginated slice of a message's searchable text.
#[derive(Debug, Serialize)]
struct MessageContent {
    thread_id: String,
    thread_summary: String,
    message_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<String>,
    role: String,
    content: String,
    total_length: usize,
    returned_length: usize,
    offset: usize,
    has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_offset: Option<usize>,
}

pub fn run(state: &AppState, arguments: &Value) -> Result<ToolCallResult> {
    let params: Params = parse_arguments(arguments)?;
    let thread_id = params.thread_id.ok_or_else(|| missing("threadID"))?;
    let message_index = params.message_index.ok_or_else(|| missing("messageIndex"))?;
    if message_index < 0 {
        return Err(ThreadsError::Validation(
            "messageIndex must be >= 0".to_string(),
        ));
    }
    let message_index = message_index as usize;

    let offset = params.offset.unwrap_or(0);
    if offset < 0 {
        return Err(ThreadsError::Validation("offset must be >= 0".to_string()));
    }
    let offset = offset as usize;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT as i64);
    if limit <= 0 {
        return Err(ThreadsError::Validation("limit must be > 0".to_string()));
    }
    let limit = limit as usize;

    let record = state
        .store
        .fetch_by_id(&thread_id)?
        .ok_or_else(|| ThreadsError::ThreadNotFound(thread_id.clone()))?;
    let thread = decode_record(&record)?;

    if message_index >= thread.messages.len() {
        return Err(ThreadsError::Validation(format!(
            "messageIndex {} out of range (thread has {} messages)",
            message_index,
            thread.messages.len()
        )));
    }

    let message = &thread.messages[message_index];
    let full_text = message.searchable_text();
    let total_length = full_text.chars().count();

    let start = offset.min(total_length);
    let end = offset.saturating_add(limit).min(total_length);
    let content: String = full_text.chars().skip(start).take(end - start).collect();
    let has_more = end < total_length;

    let message_id = match message {
        Message::User(user) => Some(user.id.clone()),
        _ => None,
    };

    let result = MessageContent {
        thread_id,
        thread_summary: record.summary.clone(),
        message_index,
        message_id,
        role: message.role_name().to_string(),
        content,
        total_length,
        returned_length: end - start,
        offset,
        has_more,
        next_offset: has_more.then_some(end),
    };

    structured_output(
        OutputMetadata::summarized("Message Content", None),
        &[result],
    )
}
