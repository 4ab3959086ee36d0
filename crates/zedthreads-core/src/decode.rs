//! Versioned thread document decoding.
//!
//! Thread blobs decompress to JSON documents whose message shape differs
//! by schema version, and the version is not always recorded explicitly;
//! it is inferred structurally per message: a flat `role` field marks the
//! legacy 0.2.0 shape (migrated on read), a tagged single-key
//! `User`/`Agent` object marks the current 0.3.0 shape.

use crate::decompress::decompress;
use crate::error::DecodeError;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use zedthreads_types::{
    AgentMessage, Content, LegacyMessage, Mention, Message, ModelInfo, Thread, ThreadRecord,
    ToolUse, UserMessage,
};

/// Top-level document fields, shared by both schema versions. Messages are
/// kept raw here so each one can be version-dispatched individually.
#[derive(Deserialize)]
struct ThreadDoc {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    messages: Vec<Value>,
    #[serde(default)]
    updated_at: String,
    #[serde(default)]
    detailed_summary: Option<String>,
    #[serde(default)]
    model: Option<ModelInfo>,
    #[serde(default)]
    completion_mode: Option<String>,
    #[serde(default)]
    profile: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

/// Decode decompressed bytes into a thread, migrating legacy messages to
/// the current model. Decoding the same bytes twice yields structurally
/// identical threads, modulo the fresh ids minted during legacy migration.
pub fn decode_thread(raw: &[u8]) -> Result<Thread, DecodeError> {
    let doc: ThreadDoc =
        serde_json::from_slice(raw).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let mut messages = Vec::with_capacity(doc.messages.len());
    for value in doc.messages {
        messages.push(decode_message(value)?);
    }

    Ok(Thread {
        title: doc.title,
        messages,
        updated_at: doc.updated_at,
        detailed_summary: doc.detailed_summary,
        model: doc.model,
        completion_mode: doc.completion_mode,
        profile: doc.profile,
        version: doc.version,
    })
}

/// Decompress and decode one archive record.
pub fn decode_record(record: &ThreadRecord) -> crate::Result<Thread> {
    let raw = decompress(&record.data)?;
    Ok(decode_thread(&raw)?)
}

/// Lenient variant for batch scans: a record that fails to decompress or
/// decode is reported as "no content" rather than an error, so one bad
/// record never aborts a scan over many.
pub fn try_decode_record(record: &ThreadRecord) -> Option<Thread> {
    match decode_record(record) {
        Ok(thread) => Some(thread),
        Err(e) => {
            debug!(
                target: "zedthreads::decode",
                "Skipping thread {}: {}",
                record.id,
                e
            );
            None
        }
    }
}

/// Extract the sole `(key, value)` entry of a single-key tagged object.
/// This is the decode half of the tagged-union encoding used throughout
/// the message model.
fn single_tag(map: &Map<String, Value>) -> Option<(&str, &Value)> {
    if map.len() != 1 {
        return None;
    }
    map.iter().next().map(|(key, value)| (key.as_str(), value))
}

fn decode_message(value: Value) -> Result<Message, DecodeError> {
    // `Noop` placeholders serialize as a bare tag.
    if value.as_str() == Some("Noop") {
        return Ok(Message::Noop);
    }

    let Value::Object(map) = value else {
        return Err(DecodeError::Malformed(format!(
            "message is not a JSON object: {value}"
        )));
    };

    // Legacy 0.2.0 messages are flat objects with a `role` field.
    if map.contains_key("role") {
        let legacy: LegacyMessage = serde_json::from_value(Value::Object(map))
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;
        return Ok(legacy.into_message());
    }

    let Some((tag, payload)) = single_tag(&map) else {
        let keys = map.keys().cloned().collect::<Vec<_>>().join(", ");
        return Err(DecodeError::UnrecognizedMessageTag(keys));
    };

    match tag {
        "User" => {
            let payload = payload.as_object().ok_or_else(|| {
                DecodeError::Malformed("user message payload is not an object".to_string())
            })?;
            let id = payload
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| DecodeError::Malformed("user message missing `id`".to_string()))?
                .to_string();
            Ok(Message::User(UserMessage {
                id,
                content: decode_content_list(payload.get("content")),
            }))
        }
        "Agent" => {
            let payload = payload.as_object().ok_or_else(|| {
                DecodeError::Malformed("agent message payload is not an object".to_string())
            })?;
            Ok(Message::Agent(AgentMessage {
                content: decode_content_list(payload.get("content")),
            }))
        }
        "Noop" => Ok(Message::Noop),
        other => Err(DecodeError::UnrecognizedMessageTag(other.to_string())),
    }
}

fn decode_content_list(value: Option<&Value>) -> Vec<Content> {
    match value.and_then(Value::as_array) {
        Some(entries) => entries.iter().map(decode_content).collect(),
        None => Vec::new(),
    }
}

/// Decode one content entry. Unknown tags and malformed payloads fall back
/// to `Content::Other` carrying the raw JSON: a single bad entry must not
/// abort decoding of the rest of the thread.
fn decode_content(value: &Value) -> Content {
    let fallback = || Content::Other(value.to_string());

    let Some(map) = value.as_object() else {
        return fallback();
    };
    let Some((tag, payload)) = single_tag(map) else {
        return fallback();
    };

    match tag {
        "Text" => match payload.as_str() {
            Some(text) => Content::Text(text.to_string()),
            None => fallback(),
        },
        "ToolUse" => serde_json::from_value::<ToolUse>(payload.clone())
            .map(Content::ToolUse)
            .unwrap_or_else(|_| fallback()),
        "Mention" => serde_json::from_value::<Mention>(payload.clone())
            .map(Content::Mention)
            .unwrap_or_else(|_| fallback()),
        _ => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn current_doc() -> Vec<u8> {
        bytes(json!({
            "title": "Fixing the build",
            "messages": [
                {"User": {"id": "m1", "content": [{"Text": "hi"}]}},
                {"Agent": {"content": [
                    {"Text": "hello"},
                    {"ToolUse": {"id": "toolu_1", "name": "read_file",
                                 "raw_input": "{\"path\":\"src/main.rs\"}"}}
                ]}}
            ],
            "updated_at": "2024-01-01T00:00:00.000Z",
            "version": "0.3.0"
        }))
    }

    #[test]
    fn decodes_current_format() {
        let thread = decode_thread(&current_doc()).unwrap();
        assert_eq!(thread.title.as_deref(), Some("Fixing the build"));
        assert_eq!(thread.updated_at, "2024-01-01T00:00:00.000Z");
        assert_eq!(thread.messages.len(), 2);

        match &thread.messages[0] {
            Message::User(user) => {
                assert_eq!(user.id, "m1");
                assert_eq!(user.content, vec![Content::Text("hi".to_string())]);
            }
            other => panic!("expected user message, got {other:?}"),
        }
        assert!(thread.messages[1].has_tool_use());
    }

    #[test]
    fn decoding_is_idempotent() {
        let raw = current_doc();
        assert_eq!(decode_thread(&raw).unwrap(), decode_thread(&raw).unwrap());
    }

    #[test]
    fn decodes_legacy_format_via_migration() {
        let raw = bytes(json!({
            "messages": [
                {
                    "role": "user",
                    "segments": [{"type": "text", "text": "find the bug"}],
                    "tool_uses": []
                },
                {
                    "role": "assistant",
                    "segments": [
                        {"type": "image", "text": null},
                        {"type": "text", "text": "hello"}
                    ],
                    "tool_uses": [
                        {"id": "toolu_1", "name": "grep", "input": {"pattern": "bug"}}
                    ],
                    "tool_results": [{"tool_use_id": "toolu_1", "is_error": false}]
                }
            ],
            "updated_at": "2023-06-01T00:00:00.000Z",
            "version": "0.2.0"
        }));

        let thread = decode_thread(&raw).unwrap();
        assert_eq!(thread.messages.len(), 2);
        assert!(matches!(thread.messages[0], Message::User(_)));

        let content = thread.messages[1].content();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0], Content::Text("hello".to_string()));
        assert!(matches!(content[1], Content::ToolUse(_)));
    }

    #[test]
    fn legacy_hidden_message_keeps_its_index_as_noop() {
        let raw = bytes(json!({
            "messages": [
                {"role": "user", "segments": [{"type": "text", "text": "one"}], "tool_uses": []},
                {"role": "assistant", "segments": [], "tool_uses": [], "is_hidden": true},
                {"role": "assistant", "segments": [{"type": "text", "text": "three"}], "tool_uses": []}
            ],
            "updated_at": ""
        }));

        let thread = decode_thread(&raw).unwrap();
        assert_eq!(thread.messages.len(), 3);
        assert_eq!(thread.messages[1], Message::Noop);
        assert_eq!(thread.messages[2].searchable_text(), "three");
    }

    #[test]
    fn unknown_content_tag_falls_back_to_other() {
        let raw = bytes(json!({
            "messages": [
                {"Agent": {"content": [
                    {"Image": {"data": "..."}},
                    {"Text": "still here"}
                ]}}
            ],
            "updated_at": ""
        }));

        let thread = decode_thread(&raw).unwrap();
        let content = thread.messages[0].content();
        assert!(matches!(&content[0], Content::Other(raw) if raw.contains("Image")));
        assert_eq!(content[1], Content::Text("still here".to_string()));
        // Unknown entries contribute nothing to search.
        assert_eq!(thread.messages[0].searchable_text(), "still here");
    }

    #[test]
    fn malformed_tool_use_payload_falls_back_to_other() {
        let raw = bytes(json!({
            "messages": [
                {"Agent": {"content": [{"ToolUse": {"name": 42}}]}}
            ],
            "updated_at": ""
        }));

        let thread = decode_thread(&raw).unwrap();
        assert!(matches!(
            thread.messages[0].content()[0],
            Content::Other(_)
        ));
    }

    #[test]
    fn decodes_mentions_with_selection_ranges() {
        let raw = bytes(json!({
            "messages": [
                {"User": {"id": "m1", "content": [
                    {"Mention": {
                        "uri": {"Selection": {
                            "abs_path": "/work/src/lib.rs",
                            "line_range": {"start": 10, "end": 20}
                        }},
                        "content": "src/lib.rs:10-20"
                    }},
                    {"Mention": {"uri": {}, "content": "bare mention"}}
                ]}}
            ],
            "updated_at": ""
        }));

        let thread = decode_thread(&raw).unwrap();
        let content = thread.messages[0].content();
        match &content[0] {
            Content::Mention(mention) => {
                let selection = mention.uri.selection.as_ref().unwrap();
                assert_eq!(selection.line_range.start, 10);
                assert_eq!(selection.line_range.end, 20);
            }
            other => panic!("expected mention, got {other:?}"),
        }
        match &content[1] {
            Content::Mention(mention) => {
                assert!(mention.uri.file.is_none());
                assert!(mention.uri.selection.is_none());
            }
            other => panic!("expected bare mention, got {other:?}"),
        }
        assert_eq!(
            thread.messages[0].searchable_text(),
            "src/lib.rs:10-20bare mention"
        );
    }

    #[test]
    fn unrecognized_message_tag_is_an_error() {
        let raw = bytes(json!({
            "messages": [{"System": {"content": []}}],
            "updated_at": ""
        }));

        match decode_thread(&raw) {
            Err(DecodeError::UnrecognizedMessageTag(tag)) => assert_eq!(tag, "System"),
            other => panic!("expected unrecognized tag error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(
            decode_thread(b"{not json"),
            Err(DecodeError::Malformed(_))
        ));
    }
}
