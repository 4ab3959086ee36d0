//! End-to-end tool tests against a scratch threads database.

use rusqlite::{params, Connection};
use serde_json::{json, Value};
use std::path::PathBuf;
use zedthreads_server::config::Config;
use zedthreads_server::protocol::{McpHandler, McpRequest, ToolCallResult, ToolContent};
use zedthreads_server::state::AppState;
use zedthreads_server::tools;

struct Archive {
    _dir: tempfile::TempDir,
    state: AppState,
}

fn compress_doc(doc: &Value) -> Vec<u8> {
    let raw = serde_json::to_vec(doc).unwrap();
    zstd::encode_all(&raw[..], 3).unwrap()
}

fn create_archive(rows: &[(&str, &str, &str, Vec<u8>)]) -> Archive {
    let dir = tempfile::tempdir().unwrap();
    let db_path: PathBuf = dir.path().join("threads.db");

    let conn = Connection::open(&db_path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE threads (
            id TEXT PRIMARY KEY,
            summary TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            data_type TEXT NOT NULL,
            data BLOB NOT NULL
        );
        "#,
    )
    .unwrap();
    for (id, summary, updated_at, data) in rows {
        conn.execute(
            "INSERT INTO threads (id, summary, updated_at, data_type, data)
             VALUES (?1, ?2, ?3, 'json', ?4)",
            params![id, summary, updated_at, data],
        )
        .unwrap();
    }
    drop(conn);

    let state = AppState::new(Config { db_path }).unwrap();
    Archive { _dir: dir, state }
}

fn sample_doc() -> Value {
    json!({
        "title": "Fixing the flaky test",
        "messages": [
            {"User": {"id": "m1", "content": [{"Text": "why does this test fail?"}]}},
            {"Agent": {"content": [
                {"Text": "let me look at the error output"},
                {"ToolUse": {"id": "toolu_1", "name": "terminal",
                             "raw_input": "cargo test -- --nocapture"}}
            ]}},
            {"User": {"id": "m2", "content": [{"Text": "thanks, that fixed it"}]}}
        ],
        "updated_at": "2024-01-02T00:00:00.000Z",
        "version": "0.3.0"
    })
}

fn default_archive() -> Archive {
    create_archive(&[
        (
            "thread-a",
            "Fixing the flaky test",
            "2024-01-02T00:00:00.000Z",
            compress_doc(&sample_doc()),
        ),
        (
            "thread-b",
            "Planning the refactor",
            "2024-01-01T00:00:00.000Z",
            compress_doc(&json!({
                "messages": [
                    {"Agent": {"content": [{"Text": "an error occurred while planning"}]}}
                ],
                "updated_at": "2024-01-01T00:00:00.000Z"
            })),
        ),
    ])
}

fn text_items(result: &ToolCallResult) -> Vec<Value> {
    result
        .content
        .iter()
        .map(|item| {
            let ToolContent::Text { text } = item;
            serde_json::from_str(text).unwrap()
        })
        .collect()
}

fn call(state: &AppState, tool: &str, arguments: Value) -> ToolCallResult {
    tools::dispatch(state, tool, &arguments)
}

fn request(method: &str, params: Value) -> McpRequest {
    McpRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(1)),
        method: method.to_string(),
        params,
    }
}

#[test]
fn initialize_reports_server_info_and_capabilities() {
    let archive = default_archive();
    let response = archive.state.handle_request(request("initialize", Value::Null));

    let result = response.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], "zedthreads");
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert!(result["capabilities"]["tools"].is_object());
}

#[test]
fn tools_list_exposes_all_five_tools() {
    let archive = default_archive();
    let response = archive.state.handle_request(request("tools/list", Value::Null));

    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "zed-list-threads",
            "zed-get-thread",
            "zed-search-threads",
            "zed-search-thread-content",
            "zed-get-message",
        ]
    );
    for tool in &tools {
        assert!(tool["inputSchema"]["type"].is_string());
    }
}

#[test]
fn unknown_method_is_a_protocol_error() {
    let archive = default_archive();
    let response = archive.state.handle_request(request("prompts/list", Value::Null));
    assert_eq!(response.error.unwrap().code, -32601);
}

#[test]
fn unknown_tool_is_a_tool_error() {
    let archive = default_archive();
    let result = call(&archive.state, "zed-drop-tables", json!({}));
    assert_eq!(result.is_error, Some(true));
}

#[test]
fn list_threads_returns_records_most_recent_first() {
    let archive = default_archive();
    let result = call(&archive.state, "zed-list-threads", json!({}));
    assert!(result.is_error.is_none());

    let items = text_items(&result);
    assert_eq!(items[0]["result_count"], 2);
    assert_eq!(items[1]["id"], "thread-a");
    assert_eq!(items[1]["last_update"], "2024-01-02T00:00:00Z");
    assert!(items[1].get("thread").is_none());
    assert_eq!(items[2]["id"], "thread-b");
}

#[test]
fn list_threads_honours_limit_and_rejects_negative() {
    let archive = default_archive();

    let result = call(&archive.state, "zed-list-threads", json!({"limit": 1}));
    let items = text_items(&result);
    assert_eq!(items[0]["result_count"], 1);
    assert_eq!(items.len(), 2);

    let result = call(&archive.state, "zed-list-threads", json!({"limit": -1}));
    assert_eq!(result.is_error, Some(true));
}

#[test]
fn get_thread_returns_decoded_messages() {
    let archive = default_archive();
    let result = call(&archive.state, "zed-get-thread", json!({"id": "thread-a"}));
    assert!(result.is_error.is_none());

    let items = text_items(&result);
    assert_eq!(items[0]["summary"], "Thread Details");
    let thread = &items[1]["thread"];
    assert_eq!(thread["title"], "Fixing the flaky test");
    assert_eq!(
        thread["messages"][0]["User"]["content"][0]["Text"],
        "why does this test fail?"
    );
}

#[test]
fn get_thread_requires_an_id() {
    let archive = default_archive();
    let result = call(&archive.state, "zed-get-thread", json!({}));
    assert_eq!(result.is_error, Some(true));
    let ToolContent::Text { text } = &result.content[0];
    assert!(text.contains("missing required argument `id`"));
}

#[test]
fn get_thread_reports_missing_ids() {
    let archive = default_archive();
    let result = call(&archive.state, "zed-get-thread", json!({"id": "nope"}));
    assert_eq!(result.is_error, Some(true));
    let ToolContent::Text { text } = &result.content[0];
    assert!(text.contains("Thread not found"));
}

#[test]
fn get_thread_applies_filters_before_paging() {
    let archive = default_archive();
    let result = call(
        &archive.state,
        "zed-get-thread",
        json!({
            "id": "thread-a",
            "filters": [{"type": "voice", "value": "user"}]
        }),
    );

    let items = text_items(&result);
    let messages = items[1]["thread"]["messages"].as_array().unwrap().clone();
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.get("User").is_some()));
}

#[test]
fn get_thread_page_is_a_start_index_with_a_window_of_ten() {
    let messages: Vec<Value> = (0..15)
        .map(|i| json!({"Agent": {"content": [{"Text": format!("message {i}")}]}}))
        .collect();
    let archive = create_archive(&[(
        "long",
        "long thread",
        "2024-01-01T00:00:00.000Z",
        compress_doc(&json!({"messages": messages, "updated_at": "2024-01-01T00:00:00.000Z"})),
    )]);

    let result = call(
        &archive.state,
        "zed-get-thread",
        json!({"id": "long", "page": 12}),
    );
    let items = text_items(&result);
    let returned = items[1]["thread"]["messages"].as_array().unwrap().clone();
    assert_eq!(returned.len(), 3);
    assert_eq!(returned[0]["Agent"]["content"][0]["Text"], "message 12");
}

#[test]
fn get_thread_with_corrupt_blob_surfaces_null_thread() {
    let archive = create_archive(&[(
        "broken",
        "unreadable",
        "2024-01-01T00:00:00.000Z",
        vec![0xAB; 32],
    )]);

    let result = call(&archive.state, "zed-get-thread", json!({"id": "broken"}));
    assert!(result.is_error.is_none());
    let items = text_items(&result);
    assert_eq!(items[1]["id"], "broken");
    assert!(items[1].get("thread").is_none());
}

#[test]
fn legacy_documents_are_migrated_on_read() {
    let archive = create_archive(&[(
        "legacy",
        "old format thread",
        "2023-06-01T00:00:00.000Z",
        compress_doc(&json!({
            "messages": [
                {
                    "role": "user",
                    "segments": [{"type": "text", "text": "hello from 0.2.0"}],
                    "tool_uses": []
                },
                {
                    "role": "assistant",
                    "segments": [{"type": "text", "text": "migrated reply"}],
                    "tool_uses": [{"id": "t1", "name": "grep", "input": {"pattern": "x"}}]
                }
            ],
            "updated_at": "2023-06-01T00:00:00.000Z",
            "version": "0.2.0"
        })),
    )]);

    let result = call(&archive.state, "zed-get-thread", json!({"id": "legacy"}));
    let items = text_items(&result);
    let messages = items[1]["thread"]["messages"].as_array().unwrap().clone();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[0]["User"]["content"][0]["Text"],
        "hello from 0.2.0"
    );
    let agent_content = messages[1]["Agent"]["content"].as_array().unwrap().clone();
    assert_eq!(agent_content[0]["Text"], "migrated reply");
    assert_eq!(agent_content[1]["ToolUse"]["name"], "grep");
}

#[test]
fn search_threads_matches_summaries_case_insensitively() {
    let archive = default_archive();
    let result = call(
        &archive.state,
        "zed-search-threads",
        json!({"query": "REFACTOR"}),
    );

    let items = text_items(&result);
    assert_eq!(items[0]["summary"], "Thread Titles Search Results");
    assert_eq!(items[0]["result_count"], 1);
    assert_eq!(items[1]["id"], "thread-b");
}

#[test]
fn search_threads_requires_a_query() {
    let archive = default_archive();
    let result = call(&archive.state, "zed-search-threads", json!({}));
    assert_eq!(result.is_error, Some(true));
}

#[test]
fn search_content_finds_matches_with_context() {
    let archive = default_archive();
    let result = call(
        &archive.state,
        "zed-search-thread-content",
        json!({"query": "error"}),
    );

    let items = text_items(&result);
    assert_eq!(items[0]["result_count"], 2);

    // thread-a is more recent, so its match comes first.
    assert_eq!(items[1]["thread_id"], "thread-a");
    assert_eq!(items[1]["message_index"], 1);
    assert_eq!(items[1]["match_text"], "error");
    assert_eq!(items[1]["context_before"], "let me look at the ");
    assert_eq!(items[1]["message_role"], "assistant");

    assert_eq!(items[2]["thread_id"], "thread-b");
}

#[test]
fn search_content_respects_case_sensitivity_flag() {
    let archive = default_archive();
    let result = call(
        &archive.state,
        "zed-search-thread-content",
        json!({"query": "ERROR", "caseInsensitive": false}),
    );
    let items = text_items(&result);
    assert_eq!(items[0]["result_count"], 0);
    assert_eq!(items.len(), 1);
}

#[test]
fn search_content_pages_never_error() {
    let archive = default_archive();
    for page in [-1, 99] {
        let result = call(
            &archive.state,
            "zed-search-thread-content",
            json!({"query": "error", "page": page}),
        );
        assert!(result.is_error.is_none());
        let items = text_items(&result);
        assert_eq!(items[0]["result_count"], 0);
    }
}

#[test]
fn get_message_paginates_characters() {
    let archive = default_archive();

    let result = call(
        &archive.state,
        "zed-get-message",
        json!({"threadID": "thread-a", "messageIndex": 0, "offset": 4, "limit": 4}),
    );
    let items = text_items(&result);
    let message = &items[1];
    assert_eq!(message["role"], "user");
    assert_eq!(message["message_id"], "m1");
    assert_eq!(message["content"], "does");
    assert_eq!(message["total_length"], 24);
    assert_eq!(message["returned_length"], 4);
    assert_eq!(message["has_more"], true);
    assert_eq!(message["next_offset"], 8);
}

#[test]
fn get_message_final_page_has_no_next_offset() {
    let archive = default_archive();
    let result = call(
        &archive.state,
        "zed-get-message",
        json!({"threadID": "thread-a", "messageIndex": 0}),
    );
    let items = text_items(&result);
    let message = &items[1];
    assert_eq!(message["content"], "why does this test fail?");
    assert_eq!(message["has_more"], false);
    assert!(message.get("next_offset").is_none());
}

#[test]
fn get_message_validates_its_parameters() {
    let archive = default_archive();

    for (arguments, expected) in [
        (json!({"messageIndex": 0}), "threadID"),
        (json!({"threadID": "thread-a"}), "messageIndex"),
        (
            json!({"threadID": "thread-a", "messageIndex": -1}),
            "messageIndex must be >= 0",
        ),
        (
            json!({"threadID": "thread-a", "messageIndex": 0, "offset": -2}),
            "offset must be >= 0",
        ),
        (
            json!({"threadID": "thread-a", "messageIndex": 0, "limit": 0}),
            "limit must be > 0",
        ),
        (
            json!({"threadID": "thread-a", "messageIndex": 42}),
            "out of range",
        ),
    ] {
        let result = call(&archive.state, "zed-get-message", arguments);
        assert_eq!(result.is_error, Some(true));
        let ToolContent::Text { text } = &result.content[0];
        assert!(text.contains(expected), "expected {expected:?} in {text:?}");
    }
}

#[test]
fn read_resource_serves_known_uris_and_rejects_others() {
    let archive = default_archive();

    let response = archive
        .state
        .handle_request(request("resources/read", json!({"uri": "zedchat://status"})));
    let contents = response.result.unwrap()["contents"].clone();
    assert_eq!(contents[0]["mimeType"], "application/json");

    let response = archive
        .state
        .handle_request(request("resources/read", json!({"uri": "zedchat://nope"})));
    assert_eq!(response.error.unwrap().code, -32602);
}
