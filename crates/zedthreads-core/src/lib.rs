//! Thread content resolution and search engine for the Zed thread archive.
//!
//! The archive hands us opaque rows of `(id, summary, updated_at, blob)`;
//! this crate turns the zstd-compressed blob into a typed thread model
//! (migrating legacy documents on the way), and provides filtering,
//! range clamping, and paged full-text search over decoded threads.

mod db;
mod decode;
mod decompress;
mod error;
mod filter;
mod search;

pub use db::ThreadStore;
pub use decode::{decode_record, decode_thread, try_decode_record};
pub use decompress::{decompress, decompress_streaming};
pub use error::{DecodeError, DecompressError, ThreadsError};
pub use filter::{apply_filters, clamp_messages};
pub use search::{
    next_match, page_of, search_records, search_thread, CONTEXT_CHARS, RESULTS_PER_PAGE,
};

/// Result type for thread archive operations.
pub type Result<T> = std::result::Result<T, ThreadsError>;
