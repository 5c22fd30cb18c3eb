use visionary_common::{Result, VisionaryError};

use crate::types::GenerateResponse;

/// Incremental decoder for an Ollama NDJSON body
///
/// Network chunks may end mid-line or mid-codepoint, so bytes are buffered
/// until a newline arrives and only complete lines are decoded.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `done: true` line or an error has been decoded
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Stop decoding after the body itself failed
    pub fn abort(&mut self) {
        self.done = true;
        self.buffer.clear();
    }

    /// Feed a chunk, returning the fragments of every line it completes
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Result<String>> {
        let mut out = Vec::new();
        if self.done {
            return out;
        }

        self.buffer.extend_from_slice(chunk);

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(item) = self.decode_line(&line) {
                out.push(item);
            }
            if self.done {
                self.buffer.clear();
                break;
            }
        }

        out
    }

    /// Decode whatever remains once the body has ended
    ///
    /// A body that ends before its `done: true` line was cut off, which is
    /// reported as a stream error after any fragment still buffered.
    pub fn finish(&mut self) -> Vec<Result<String>> {
        let mut out = Vec::new();
        if self.done {
            return out;
        }

        let rest = std::mem::take(&mut self.buffer);
        if let Some(item) = self.decode_line(&rest) {
            out.push(item);
        }
        if !self.done {
            self.done = true;
            out.push(Err(VisionaryError::provider_stream("stream ended before done")));
        }
        out
    }

    fn decode_line(&mut self, raw: &[u8]) -> Option<Result<String>> {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim(),
            Err(e) => {
                self.done = true;
                return Some(Err(VisionaryError::provider_stream(format!(
                    "Invalid UTF-8 in stream: {}",
                    e
                ))));
            }
        };
        if line.is_empty() {
            return None;
        }

        match serde_json::from_str::<GenerateResponse>(line) {
            Ok(chunk) => {
                if let Some(error) = chunk.error {
                    self.done = true;
                    return Some(Err(VisionaryError::provider_stream(error)));
                }
                if chunk.done {
                    self.done = true;
                }
                if chunk.response.is_empty() {
                    None
                } else {
                    Some(Ok(chunk.response))
                }
            }
            Err(e) => {
                self.done = true;
                Some(Err(VisionaryError::provider_stream(format!(
                    "Malformed stream line: {}",
                    e
                ))))
            }
        }
    }
}
