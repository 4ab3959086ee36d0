//! The current (0.3.0) thread model.
//!
//! Threads are stored as JSON documents in which messages and message
//! content are tagged single-key objects (`{"User": {...}}`,
//! `{"Text": "..."}`). The types here mirror that wire shape; decoding of
//! the tagged unions lives in `zedthreads-core` so that version dispatch
//! and error classification stay in one place.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// A fully decoded chat thread with all messages and metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thread {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub messages: Vec<Message>,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Model/provider pair recorded on a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// A message in a thread.
///
/// `Noop` is a placeholder that keeps message indices stable for entries
/// that carry no visible content (e.g. hidden legacy messages).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Message {
    User(UserMessage),
    Agent(AgentMessage),
    Noop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    pub id: String,
    pub content: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub content: Vec<Content>,
}

/// Content within a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Content {
    Text(String),
    ToolUse(ToolUse),
    Mention(Mention),
    /// Fallback for content entries with an unknown tag or malformed
    /// payload, carrying the raw JSON text of the entry.
    Other(String),
}

/// A tool invocation recorded inside a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Map<String, Value>>,
}

/// A file or selection mention embedded in a message, with display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub uri: MentionUri,
    pub content: String,
}

/// Reference container for a mention. Both references are optional; a bare
/// mention with only display text is legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionUri {
    #[serde(rename = "File", default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
    #[serde(
        rename = "Selection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub selection: Option<SelectionRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub abs_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRef {
    pub abs_path: PathBuf,
    pub line_range: LineRange,
}

/// Half-open line range of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl Message {
    /// Content entries of this message (empty for `Noop`).
    pub fn content(&self) -> &[Content] {
        match self {
            Message::User(user) => &user.content,
            Message::Agent(agent) => &agent.content,
            Message::Noop => &[],
        }
    }

    /// Role label used in tool output.
    pub fn role_name(&self) -> &'static str {
        match self {
            Message::User(_) => "user",
            Message::Agent(_) => "assistant",
            Message::Noop => "noop",
        }
    }

    /// Whether this message contains at least one tool use entry.
    pub fn has_tool_use(&self) -> bool {
        self.content()
            .iter()
            .any(|c| matches!(c, Content::ToolUse(_)))
    }

    /// The text this message exposes to substring search: every `Text`
    /// fragment, mention display string, and tool-use raw input,
    /// concatenated in content order with no separator. The concatenation
    /// order is what makes match offsets reproducible.
    pub fn searchable_text(&self) -> String {
        let mut text = String::new();
        for content in self.content() {
            match content {
                Content::Text(fragment) => text.push_str(fragment),
                Content::Mention(mention) => text.push_str(&mention.content),
                Content::ToolUse(tool_use) => {
                    if let Some(raw_input) = &tool_use.raw_input {
                        text.push_str(raw_input);
                    }
                }
                Content::Other(_) => {}
            }
        }
        text
    }
}
