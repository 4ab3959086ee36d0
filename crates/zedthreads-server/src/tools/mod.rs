//! Tool registry and dispatch.
//!
//! Each tool lives in its own module with its command name, its MCP
//! definition, and a `run` function taking already-parsed JSON arguments.
//! Adding a tool means adding a module and wiring it into
//! `tool_definitions` and `dispatch`.

pub mod get_message;
pub mod get_thread;
pub mod list_threads;
pub mod search_content;
pub mod search_threads;

use crate::protocol::{ToolCallResult, ToolContent, ToolDefinition};
use crate::state::AppState;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use zedthreads_core::{Result, ThreadsError};

/// Definitions of every registered tool, in registration order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        list_threads::definition(),
        get_thread::definition(),
        search_threads::definition(),
        search_content::definition(),
        get_message::definition(),
    ]
}

/// Route a tool call to its implementation. Failures are reported inside
/// the tool result (`is_error`), never as protocol-level errors.
pub fn dispatch(state: &AppState, name: &str, arguments: &Value) -> ToolCallResult {
    debug!(target: "zedthreads::tools", "Calling tool {}", name);

    let outcome = match name {
        list_threads::NAME => list_threads::run(state, arguments),
        get_thread::NAME => get_thread::run(state, arguments),
        search_threads::NAME => search_threads::run(state, arguments),
        search_content::NAME => search_content::run(state, arguments),
        get_message::NAME => get_message::run(state, arguments),
        _ => Err(ThreadsError::Validation(format!("unknown tool `{name}`"))),
    };

    match outcome {
        Ok(result) => result,
        Err(e) => {
            warn!(target: "zedthreads::tools", "Tool {} failed: {}", name, e);
            ToolCallResult::error(format!("Error performing {name}: {e}"))
        }
    }
}

/// Metadata item leading every tool result.
#[derive(Debug, Serialize)]
pub struct OutputMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_count: Option<usize>,
}

impl OutputMetadata {
    pub fn count(result_count: usize) -> Self {
        Self {
            summary: None,
            result_count: Some(result_count),
        }
    }

    pub fn summarized(summary: &str, result_count: Option<usize>) -> Self {
        Self {
            summary: Some(summary.to_string()),
            result_count,
        }
    }
}

/// Assemble the output envelope shared by all tools: the metadata item
/// first, then one pretty-printed JSON item per result record. Struct
/// field order keeps the serialization deterministic.
pub fn structured_output<T: Serialize>(
    metadata: OutputMetadata,
    items: &[T],
) -> Result<ToolCallResult> {
    let mut content = Vec::with_capacity(items.len() + 1);
    content.push(ToolContent::Text {
        text: serde_json::to_string_pretty(&metadata)?,
    });
    for item in items {
        content.push(ToolContent::Text {
            text: serde_json::to_string_pretty(item)?,
        });
    }
    Ok(ToolCallResult {
        content,
        is_error: None,
    })
}

/// Deserialize tool arguments, mapping shape mismatches to a validation
/// error before anything touches the engine.
pub(crate) fn parse_arguments<P: DeserializeOwned + Default>(arguments: &Value) -> Result<P> {
    if arguments.is_null() {
        return Ok(P::default());
    }
    serde_json::from_value(arguments.clone())
        .map_err(|e| ThreadsError::Validation(format!("invalid arguments: {e}")))
}

/// Missing-argument validation error, phrased uniformly across tools.
pub(crate) fn missing(name: &str) -> ThreadsError {
    ThreadsError::Validation(format!("missing required argument `{name}`"))
}
