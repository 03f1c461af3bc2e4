//! Server-Sent Events (SSE) decoding for streamed chat replies.
//!
//! This module turns the raw byte stream of a chat-completions response into
//! the ordered text fragments of the reply.  The body is read line by line;
//! only `data: ` lines matter.  A `[DONE]` payload ends the reply, and so does
//! the end of the body.  Payloads that are not valid JSON are dropped without
//! interrupting the stream.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::observability::{
    STREAM_BYTES, STREAM_DISCARDED_LINES, STREAM_ERRORS, STREAM_FRAGMENTS, STREAM_LINES,
};
use crate::types::ChatChunk;
use crate::{Error, Result};

/// Prefix that marks a line as carrying a payload.
pub const DATA_PREFIX: &[u8] = b"data: ";

/// Payload that ends the reply.
pub const DONE_SENTINEL: &[u8] = b"[DONE]";

/// Longest line the decoder accepts, in bytes.
pub const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

/// A decoded unit of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The next piece of the reply.  May be empty.
    Delta(String),
    /// The server has nothing more to send.
    Done,
}

/// Decodes one line, without its line terminator.
///
/// Returns `None` for lines that carry nothing: lines without the `data: `
/// prefix, payloads that fail to parse, and chunks without any choice.
pub fn decode_line(line: &[u8]) -> Option<StreamEvent> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    if payload == DONE_SENTINEL {
        return Some(StreamEvent::Done);
    }
    match serde_json::from_slice::<ChatChunk>(payload) {
        Ok(chunk) => chunk.first_content().map(StreamEvent::Delta),
        Err(_) => {
            STREAM_DISCARDED_LINES.click();
            None
        }
    }
}

/// Process a stream of bytes into the text fragments of a reply.
///
/// The returned stream ends after `[DONE]`, after the byte stream is
/// exhausted, or right after yielding the first error.  Errors are
/// [`Error::StreamRead`] for transport failures and [`Error::LineTooLong`]
/// for lines over [`MAX_LINE_BYTES`].
pub fn decode_stream<S, E>(byte_stream: S) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    decode_stream_with_limit(byte_stream, MAX_LINE_BYTES)
}

/// Like [`decode_stream`], with a custom line length ceiling.
pub fn decode_stream_with_limit<S, E>(
    byte_stream: S,
    max_line_bytes: usize,
) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    let lines = LineBuffer::new(max_line_bytes);

    stream::unfold(
        (byte_stream, lines),
        move |(mut byte_stream, mut lines)| async move {
            loop {
                if lines.finished {
                    return None;
                }

                // Drain complete lines before reading more.
                match lines.next_event() {
                    Ok(Some(StreamEvent::Delta(text))) => {
                        STREAM_FRAGMENTS.click();
                        return Some((Ok(text), (byte_stream, lines)));
                    }
                    Ok(Some(StreamEvent::Done)) => return None,
                    Ok(None) => {}
                    Err(err) => {
                        STREAM_ERRORS.click();
                        lines.finished = true;
                        return Some((Err(err), (byte_stream, lines)));
                    }
                }

                match byte_stream.next().await {
                    Some(Ok(bytes)) => {
                        STREAM_BYTES.count(bytes.len() as u64);
                        lines.extend(&bytes);
                    }
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        lines.finished = true;
                        return Some((
                            Err(Error::stream_read(
                                format!("Error in HTTP stream: {e}"),
                                Some(Box::new(e)),
                            )),
                            (byte_stream, lines),
                        ));
                    }
                    None => {
                        // End of stream; the last line may lack its newline.
                        lines.finished = true;
                        return match lines.finish() {
                            Ok(Some(StreamEvent::Delta(text))) => {
                                STREAM_FRAGMENTS.click();
                                Some((Ok(text), (byte_stream, lines)))
                            }
                            Ok(_) => None,
                            Err(err) => {
                                STREAM_ERRORS.click();
                                Some((Err(err), (byte_stream, lines)))
                            }
                        };
                    }
                }
            }
        },
    )
}

/// Bytes received but not yet split into lines.
struct LineBuffer {
    buffer: Vec<u8>,
    // Prefix of `buffer` known to hold no newline.
    scanned: usize,
    max_line_bytes: usize,
    finished: bool,
}

impl LineBuffer {
    fn new(max_line_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            max_line_bytes,
            finished: false,
        }
    }

    fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Decodes buffered complete lines until one produces an event.
    fn next_event(&mut self) -> Result<Option<StreamEvent>> {
        loop {
            let Some(offset) = self.buffer[self.scanned..]
                .iter()
                .position(|&b| b == b'\n')
            else {
                self.scanned = self.buffer.len();
                if self.buffer.len() > self.max_line_bytes {
                    return Err(Error::line_too_long(self.max_line_bytes));
                }
                return Ok(None);
            };
            let end = self.scanned + offset;
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            self.scanned = 0;
            if end > self.max_line_bytes {
                return Err(Error::line_too_long(self.max_line_bytes));
            }
            STREAM_LINES.click();
            if let Some(event) = decode_line(trim_cr(&line[..end])) {
                return Ok(Some(event));
            }
        }
    }

    /// Decodes whatever is left once the byte stream has ended.
    fn finish(&mut self) -> Result<Option<StreamEvent>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let line = std::mem::take(&mut self.buffer);
        if line.len() > self.max_line_bytes {
            return Err(Error::line_too_long(self.max_line_bytes));
        }
        STREAM_LINES.click();
        Ok(decode_line(trim_cr(&line)))
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
