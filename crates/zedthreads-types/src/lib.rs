//! Shared data model for the Zed thread archive.

mod filter;
mod legacy;
mod record;
mod search;
mod thread;

pub use filter::{ThreadFilter, Voice};
pub use legacy::{LegacyMessage, LegacyRole, LegacySegment, LegacySegmentKind, LegacyToolUse};
pub use record::{parse_last_update, ConsumableThread, ThreadRecord};
pub use search::SearchMatch;
pub use thread::{
    AgentMessage, Content, FileRef, LineRange, Mention, MentionUri, Message, ModelInfo,
    SelectionRef, Thread, ToolUse, UserMessage,
};
