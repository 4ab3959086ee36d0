//! Thread message model for the legacy 0.2.0 on-disk format.
//!
//! The legacy format uses a flat structure with a `role` field instead of
//! the tagged `User`/`Agent` wrapper, and splits message content into
//! `segments` and `tool_uses`. Legacy documents are migrated to the current
//! model on read; nothing ever writes the legacy shape back.

use crate::thread::{AgentMessage, Content, Message, ToolUse, UserMessage};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// A message in the 0.2.0 format.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyMessage {
    #[serde(default)]
    pub id: Option<i64>,
    pub role: LegacyRole,
    #[serde(default)]
    pub segments: Vec<LegacySegment>,
    #[serde(default)]
    pub tool_uses: Vec<LegacyToolUse>,
    /// Tool results are not part of the current content model and are
    /// dropped by migration; kept raw so decoding stays lenient.
    #[serde(default)]
    pub tool_results: Vec<Value>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub is_hidden: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacySegment {
    #[serde(rename = "type")]
    pub kind: LegacySegmentKind,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacySegmentKind {
    Text,
    Code,
    Image,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyToolUse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub input: Map<String, Value>,
}

impl LegacyMessage {
    /// Migrate this message to the current model.
    ///
    /// Segment text becomes `Text` entries in segment order (segments with
    /// no text are dropped), followed by one `ToolUse` per legacy tool use
    /// with the input map carried through verbatim and `raw_input` unset.
    /// User messages get a freshly generated id: the legacy numeric `id`
    /// is a different kind of key and is not reused as message identity.
    /// Hidden messages become `Noop` placeholders so message indices stay
    /// stable across migration.
    pub fn into_message(self) -> Message {
        if self.is_hidden.unwrap_or(false) {
            return Message::Noop;
        }

        let mut content = Vec::with_capacity(self.segments.len() + self.tool_uses.len());
        for segment in self.segments {
            if let Some(text) = segment.text {
                content.push(Content::Text(text));
            }
        }
        for tool_use in self.tool_uses {
            content.push(Content::ToolUse(ToolUse {
                id: tool_use.id,
                name: tool_use.name,
                raw_input: None,
                input: Some(tool_use.input),
            }));
        }

        match self.role {
            LegacyRole::User => Message::User(UserMessage {
                id: Uuid::new_v4().to_string(),
                content,
            }),
            LegacyRole::Assistant => Message::Agent(AgentMessage { content }),
        }
    }
}
