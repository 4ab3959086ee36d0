//! Error types for the thread archive engine.

use thiserror::Error;

/// Failures while expanding a compressed thread blob.
#[derive(Error, Debug)]
pub enum DecompressError {
    /// The codec reported progress inconsistent with the buffers it was
    /// given, or stopped making progress mid-stream.
    #[error("Corrupt compressed stream: {0}")]
    CorruptStream(&'static str),

    #[error("Decompression buffer limit exceeded")]
    BufferLimitExceeded,

    #[error("Decompression did not terminate within {0} iterations")]
    TooManyIterations(usize),

    #[error("Codec error: {0}")]
    Codec(String),
}

/// Failures while decoding decompressed bytes into a thread.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed thread document: {0}")]
    Malformed(String),

    #[error("Message must be tagged `User` or `Agent`, got `{0}`")]
    UnrecognizedMessageTag(String),
}

/// Top-level error for thread archive operations.
#[derive(Error, Debug)]
pub enum ThreadsError {
    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Invalid parameter: {0}")]
    Validation(String),

    #[error("Decompression error: {0}")]
    Decompress(#[from] DecompressError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
