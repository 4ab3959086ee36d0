//! zstd decompression of thread blobs.
//!
//! Blobs are single zstd frames. When the frame header declares a sane
//! content size we decode straight into an exact buffer; otherwise we fall
//! back to a bounded streaming loop that grows its destination buffer as
//! the codec reports progress. The streaming loop carries explicit
//! overflow, stuck-stream, and iteration-bound checks: termination is an
//! algorithmic concern here, not something the buffer types give us.

use crate::error::DecompressError;
use zstd::stream::raw::{Decoder, Operation};

/// Declared content sizes above this are treated as untrusted and routed
/// through the streaming path.
const MAX_DECLARED_SIZE: u64 = 256 * 1024 * 1024;

/// Remaining destination capacity that triggers a buffer grow.
const LOW_WATER: usize = 1024;

/// Hard bound on streaming iterations, so malformed frames cannot spin
/// forever.
const MAX_ITERATIONS: usize = 10_000;

/// Expand one compressed blob into the original bytes. Empty input maps to
/// empty output. Pure and side-effect free; safe to call concurrently on
/// independent inputs.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>, DecompressError> {
    if compressed.is_empty() {
        return Ok(Vec::new());
    }

    match zstd::zstd_safe::get_frame_content_size(compressed) {
        Ok(Some(size)) if size <= MAX_DECLARED_SIZE => {
            zstd::bulk::decompress(compressed, size as usize)
                .map_err(|e| DecompressError::Codec(e.to_string()))
        }
        _ => decompress_streaming(compressed),
    }
}

/// Streaming decompression for frames with an unknown or untrusted
/// declared size.
pub fn decompress_streaming(compressed: &[u8]) -> Result<Vec<u8>, DecompressError> {
    if compressed.is_empty() {
        return Ok(Vec::new());
    }

    let mut decoder = Decoder::new().map_err(|e| DecompressError::Codec(e.to_string()))?;
    let mut dst = vec![0u8; compressed.len().saturating_mul(3).max(4096)];
    let mut total_written = 0usize;
    let mut src_pos = 0usize;

    for _ in 0..MAX_ITERATIONS {
        if dst.len() - total_written < LOW_WATER {
            let grown = dst
                .len()
                .checked_mul(2)
                .ok_or(DecompressError::BufferLimitExceeded)?;
            dst.resize(grown, 0);
        }

        let status = decoder
            .run_on_buffers(&compressed[src_pos..], &mut dst[total_written..])
            .map_err(|e| DecompressError::Codec(e.to_string()))?;

        if status.bytes_read > compressed.len() - src_pos {
            return Err(DecompressError::CorruptStream(
                "reported input consumption exceeds the source slice",
            ));
        }
        if status.bytes_written > dst.len() - total_written {
            return Err(DecompressError::CorruptStream(
                "reported output exceeds the destination slice",
            ));
        }

        src_pos = src_pos
            .checked_add(status.bytes_read)
            .ok_or(DecompressError::CorruptStream("source position overflow"))?;
        total_written = total_written
            .checked_add(status.bytes_written)
            .ok_or(DecompressError::CorruptStream("output length overflow"))?;

        if status.remaining == 0 && src_pos >= compressed.len() {
            dst.truncate(total_written);
            return Ok(dst);
        }

        // No progress with data still pending means the stream is stuck
        // (or the frame was truncated); bail instead of looping.
        if status.bytes_read == 0 && status.bytes_written == 0 {
            return Err(DecompressError::CorruptStream("codec made no progress"));
        }
    }

    Err(DecompressError::TooManyIterations(MAX_ITERATIONS))
}
