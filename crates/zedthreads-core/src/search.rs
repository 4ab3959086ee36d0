//! Substring search across decoded threads.
//!
//! Queries are literal substrings (no wildcard or regex syntax). Matching
//! and context extraction work in characters, not bytes, so offsets are
//! stable for non-ASCII content. Case-insensitive matching folds one
//! character at a time, keeping match offsets aligned with the original
//! text.

use crate::decode::try_decode_record;
use rayon::prelude::*;
use zedthreads_types::{SearchMatch, Thread, ThreadRecord};

/// Fixed number of matches per result page.
pub const RESULTS_PER_PAGE: usize = 10;

/// Characters of context captured on each side of a match.
pub const CONTEXT_CHARS: usize = 100;

struct TextMatch {
    position: usize,
    context_before: String,
    match_text: String,
    context_after: String,
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn chars_match(a: char, b: char, case_insensitive: bool) -> bool {
    if case_insensitive {
        fold(a) == fold(b)
    } else {
        a == b
    }
}

/// Char offset of the first occurrence of `needle` in `haystack`.
fn find_in_chars(haystack: &[char], needle: &[char], case_insensitive: bool) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&start| {
        needle
            .iter()
            .enumerate()
            .all(|(offset, &qc)| chars_match(haystack[start + offset], qc, case_insensitive))
    })
}

/// Locate the first occurrence of `query` in `text` and capture up to
/// `CONTEXT_CHARS` characters of context on each side, clamped to the
/// text bounds.
fn locate(text: &str, query: &str, case_insensitive: bool) -> Option<TextMatch> {
    let chars: Vec<char> = text.chars().collect();
    let needle: Vec<char> = query.chars().collect();
    let position = find_in_chars(&chars, &needle, case_insensitive)?;

    let before_start = position.saturating_sub(CONTEXT_CHARS);
    let match_end = position + needle.len();
    let after_end = (match_end + CONTEXT_CHARS).min(chars.len());

    Some(TextMatch {
        position,
        context_before: chars[before_start..position].iter().collect(),
        match_text: chars[position..match_end].iter().collect(),
        context_after: chars[match_end..after_end].iter().collect(),
    })
}

/// Index of the first message at or after `from` whose searchable text
/// contains `query`. Messages with empty searchable text are never
/// candidates.
pub fn next_match(thread: &Thread, query: &str, case_insensitive: bool, from: usize) -> Option<usize> {
    let needle: Vec<char> = query.chars().collect();
    (from..thread.messages.len()).find(|&index| {
        let text = thread.messages[index].searchable_text();
        if text.is_empty() {
            return false;
        }
        let chars: Vec<char> = text.chars().collect();
        find_in_chars(&chars, &needle, case_insensitive).is_some()
    })
}

/// Find every matching message of one thread (or only the first when
/// `only_first_match` is set), emitting one positioned match record per
/// matching message.
pub fn search_thread(
    thread: &Thread,
    thread_id: &str,
    thread_summary: &str,
    query: &str,
    case_insensitive: bool,
    only_first_match: bool,
) -> Vec<SearchMatch> {
    let mut matches = Vec::new();

    for (index, message) in thread.messages.iter().enumerate() {
        let text = message.searchable_text();
        if text.is_empty() {
            continue;
        }
        let Some(found) = locate(&text, query, case_insensitive) else {
            continue;
        };

        matches.push(SearchMatch {
            thread_id: thread_id.to_string(),
            thread_summary: thread_summary.to_string(),
            thread_message_count: thread.messages.len(),
            message_index: index,
            match_position: found.position,
            context_before: found.context_before,
            match_text: found.match_text,
            context_after: found.context_after,
            message_role: message.role_name().to_string(),
        });

        if only_first_match {
            break;
        }
    }

    matches
}

/// Scan every record concurrently and flatten the per-thread matches in
/// record order. Records are expected most-recently-updated first, as the
/// store returns them; the order-preserving collect keeps results
/// deterministic regardless of scheduling. Records that fail to
/// decompress or decode are skipped.
pub fn search_records(
    records: &[ThreadRecord],
    query: &str,
    case_insensitive: bool,
    only_first_match: bool,
) -> Vec<SearchMatch> {
    records
        .par_iter()
        .map(|record| match try_decode_record(record) {
            Some(thread) => search_thread(
                &thread,
                &record.id,
                &record.summary,
                query,
                case_insensitive,
                only_first_match,
            ),
            None => Vec::new(),
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

/// Select one fixed-size page of an ordered result list. A page index past
/// the last chunk, or a negative one, yields an empty list rather than an
/// error.
pub fn page_of<T>(items: Vec<T>, page: i64) -> Vec<T> {
    if page < 0 {
        return Vec::new();
    }
    let start = (page as usize).saturating_mul(RESULTS_PER_PAGE);
    items
        .into_iter()
        .skip(start)
        .take(RESULTS_PER_PAGE)
        .collect()
}
