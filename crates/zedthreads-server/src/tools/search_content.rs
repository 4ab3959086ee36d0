//! Full-text search inside decoded thread content.

use super::{missing, parse_arguments, structured_output, OutputMetadata};
use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::state::AppState;
use serde::Deserialize;
use serde_json::{json, Value};
use zedthreads_core::{page_of, search_records, Result};

pub const NAME: &str = "zed-search-thread-content";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "Search Zed chat threads by decoding their thread content and searching inside"
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query to match against thread content. There's no special syntax. Matches must be exact (apart from case sensitivity, specified in another argument)"
                },
                "page": {
                    "type": "integer",
                    "description": "Results are paged because they can be obscenely large. This allows for more efficient, bite sized search. If omitted, defaults to `0`"
                },
                "caseInsensitive": {
                    "type": "boolean",
                    "description": "Whether the query matching is case sensitive"
                },
                "onlyFirstMatchPerThread": {
                    "type": "boolean",
                    "description": "When true, message filtering will stop on a thread once a message is found with a match. When false, all matching messages on the thread will be returned. It is more efficient to set to true, when exhaustion isn't necessary."
                }
            },
            "required": ["query"]
        }),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Params {
    query: Option<String>,
    page: Option<i64>,
    case_insensitive: Option<bool>,
    only_first_match_per_thread: Option<bool>,
}

pub fn run(state: &AppState, arguments: &Value) -> Result<ToolCallResult> {
    let params: Params = parse_arguments(arguments)?;
    let query = params.query.ok_or_else(|| missing("query"))?;
    // Negative and past-the-end pages both yield an empty result list;
    // they are not validation errors.
    let page = params.page.unwrap_or(0);
    let case_insensitive = params.case_insensitive.unwrap_or(true);
    let only_first_match = params.only_first_match_per_thread.unwrap_or(false);

    let records = state.store.fetch_all(None)?;
    let matches = search_records(&records, &query, case_insensitive, only_first_match);
    let page_items = page_of(matches, page);

    structured_output(
        OutputMetadata::summarized("Thread Content Search Results", Some(page_items.len())),
        &page_items,
    )
}
