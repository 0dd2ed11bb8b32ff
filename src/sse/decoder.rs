//! Incremental decoding of a reply stream
//!
//! Bytes arrive in arbitrary chunks. [`Utf8StreamDecoder`] turns them into
//! text without splitting multi-byte characters, and [`SseDecoder`] keeps the
//! unterminated tail of the text buffered until its newline shows up, so the
//! decoded events never depend on where the chunk boundaries fell.

use crate::sse::events::{SseEvent, SseLine, SseParseError};
use crate::sse::parser::{parse_data_payload, parse_sse_line};

/// Streaming UTF-8 decoder.
///
/// An incomplete sequence at the end of a chunk is held back and completed
/// by the next chunk. Invalid bytes decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));

                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            // Truncated sequence, wait for the rest
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush at end of input. A dangling partial sequence becomes U+FFFD.
    pub fn flush(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }

    /// Number of bytes held back waiting for the rest of a character
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Chunk-level SSE framing.
///
/// Each chunk is appended to the text buffer, the buffer is split on `\n`,
/// and everything but the last piece is a complete line. The last piece stays
/// buffered until more bytes arrive.
#[derive(Debug, Default)]
pub struct SseDecoder {
    utf8: Utf8StreamDecoder,
    buffer: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return the lines it completed, without their `\n`
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.utf8.decode(chunk);
        self.buffer.push_str(&text);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let tail = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, tail);

        complete
            .split('\n')
            .take(complete.matches('\n').count())
            .map(str::to_string)
            .collect()
    }

    /// Feed a chunk and return the events of every complete `data: ` line.
    ///
    /// Malformed payloads come back as `Err` so the caller can log and skip
    /// them. Other lines and other JSON shapes produce nothing.
    pub fn decode(&mut self, chunk: &[u8]) -> Vec<Result<SseEvent, SseParseError>> {
        self.feed(chunk)
            .iter()
            .filter_map(|line| match parse_sse_line(line) {
                SseLine::Data(data) => parse_data_payload(&data).transpose(),
                SseLine::Empty | SseLine::Comment(_) | SseLine::Other(_) => None,
            })
            .collect()
    }

    /// Text received but not yet terminated by a newline
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// End of stream. Returns the unterminated remainder, which is discarded
    /// rather than parsed.
    pub fn finish(&mut self) -> String {
        let tail = self.utf8.flush();
        self.buffer.push_str(&tail);
        std::mem::take(&mut self.buffer)
    }
}
