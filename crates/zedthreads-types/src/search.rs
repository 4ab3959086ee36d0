//! Search result records.

use serde::{Deserialize, Serialize};

/// A single positioned occurrence of a search query inside one message.
///
/// `match_position` is a character offset into the message's searchable
/// text; the context fields are clamped to the message bounds and never
/// cross into neighbouring messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub thread_id: String,
    pub thread_summary: String,
    pub thread_message_count: usize,
    pub message_index: usize,
    pub match_position: usize,
    pub context_before: String,
    pub match_text: String,
    pub context_after: String,
    pub message_role: String,
}
