//! Declarative message filters.

use crate::thread::Message;

/// Which side of the conversation a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    User,
    Agent,
}

/// A predicate over a single message. Applying a set of filters keeps only
/// messages for which every filter holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadFilter {
    Voice(Voice),
    /// Case-insensitive substring match against the message's searchable
    /// text. Always case-insensitive, unlike the content search tool where
    /// sensitivity is caller-controlled.
    Query(String),
    IsTool(bool),
    /// No thinking content variant exists in the model yet, so this filter
    /// passes every message through.
    IsThinking(bool),
}

impl ThreadFilter {
    /// Whether `message` satisfies this filter.
    pub fn matches(&self, message: &Message) -> bool {
        match self {
            ThreadFilter::Voice(Voice::User) => matches!(message, Message::User(_)),
            ThreadFilter::Voice(Voice::Agent) => matches!(message, Message::Agent(_)),
            ThreadFilter::Query(query) => message
                .searchable_text()
                .to_lowercase()
                .contains(&query.to_lowercase()),
            ThreadFilter::IsTool(wanted) => message.has_tool_use() == *wanted,
            ThreadFilter::IsThinking(_) => true,
        }
    }

    /// Parse a `(type, value)` pair as supplied by tool callers. Unknown
    /// types and invalid voice values yield `None` and are skipped.
    pub fn parse(kind: &str, value: &str) -> Option<Self> {
        match kind {
            "voice" => match value {
                "user" => Some(ThreadFilter::Voice(Voice::User)),
                "agent" => Some(ThreadFilter::Voice(Voice::Agent)),
                _ => None,
            },
            "query" => Some(ThreadFilter::Query(value.to_string())),
            "isTool" => Some(ThreadFilter::IsTool(value.parse().unwrap_or(true))),
            "isThinking" => Some(ThreadFilter::IsThinking(value.parse().unwrap_or(true))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::{AgentMessage, Content, ToolUse, UserMessage};

    fn user(text: &str) -> Message {
        Message::User(UserMessage {
            id: "m1".to_string(),
            content: vec![Content::Text(text.to_string())],
        })
    }

    fn agent_with_tool() -> Message {
        Message::Agent(AgentMessage {
            content: vec![Content::ToolUse(ToolUse {
                id: "toolu_1".to_string(),
                name: "read_file".to_string(),
                raw_input: None,
                input: None,
            })],
        })
    }

    #[test]
    fn voice_filter_selects_by_role_and_excludes_noop() {
        let user_filter = ThreadFilter::Voice(Voice::User);
        assert!(user_filter.matches(&user("hi")));
        assert!(!user_filter.matches(&agent_with_tool()));
        assert!(!user_filter.matches(&Message::Noop));

        let agent_filter = ThreadFilter::Voice(Voice::Agent);
        assert!(agent_filter.matches(&agent_with_tool()));
        assert!(!agent_filter.matches(&Message::Noop));
    }

    #[test]
    fn query_filter_is_case_insensitive() {
        let filter = ThreadFilter::Query("HELLO".to_string());
        assert!(filter.matches(&user("well, hello there")));
        assert!(!filter.matches(&user("goodbye")));
    }

    #[test]
    fn is_tool_filter_checks_tool_use_presence() {
        assert!(ThreadFilter::IsTool(true).matches(&agent_with_tool()));
        assert!(!ThreadFilter::IsTool(true).matches(&user("hi")));
        assert!(ThreadFilter::IsTool(false).matches(&user("hi")));
        // A noop message contains no tool uses.
        assert!(ThreadFilter::IsTool(false).matches(&Message::Noop));
    }

    #[test]
    fn is_thinking_passes_everything_through() {
        for wanted in [true, false] {
            let filter = ThreadFilter::IsThinking(wanted);
            assert!(filter.matches(&user("hi")));
            assert!(filter.matches(&agent_with_tool()));
            assert!(filter.matches(&Message::Noop));
        }
    }

    #[test]
    fn parse_accepts_known_kinds_and_rejects_the_rest() {
        assert_eq!(
            ThreadFilter::parse("voice", "agent"),
            Some(ThreadFilter::Voice(Voice::Agent))
        );
        assert_eq!(
            ThreadFilter::parse("query", "needle"),
            Some(ThreadFilter::Query("needle".to_string()))
        );
        assert_eq!(
            ThreadFilter::parse("isTool", "false"),
            Some(ThreadFilter::IsTool(false))
        );
        assert_eq!(
            ThreadFilter::parse("isTool", "not-a-bool"),
            Some(ThreadFilter::IsTool(true))
        );
        assert_eq!(ThreadFilter::parse("voice", "narrator"), None);
        assert_eq!(ThreadFilter::parse("unknown", "x"), None);
    }
}
