//! Event stream framing
//!
//! The backend speaks server-sent events (`data: {...}` followed by a blank
//! line, `: heartbeat` comments in between). Newline-delimited JSON is
//! accepted too: a bare line is a complete message on its own.

use crate::error::{ClientError, Result};

/// Longest line kept while waiting for its newline
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

const SKIPPED_FIELDS: [&str; 3] = ["event:", "id:", "retry:"];

/// Incremental line decoder; feed it raw body chunks as they arrive
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk and return every message it completes
    ///
    /// Fails once the pending unterminated line exceeds [`MAX_LINE_BYTES`].
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        self.buffer.extend_from_slice(chunk);
        let mut messages = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\r', '\n']);
            self.line(line, &mut messages);
        }

        if self.buffer.len() > MAX_LINE_BYTES {
            self.buffer.clear();
            self.data.clear();
            return Err(ClientError::StreamFailed(format!(
                "line exceeds {MAX_LINE_BYTES} bytes"
            )));
        }
        Ok(messages)
    }

    /// Flush whatever is left open when the body ends
    pub fn finish(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw);
            self.line(line.trim_end_matches('\r'), &mut messages);
        }
        self.dispatch(&mut messages);
        messages
    }

    fn line(&mut self, line: &str, messages: &mut Vec<String>) {
        if line.is_empty() {
            self.dispatch(messages);
        } else if let Some(rest) = line.strip_prefix("data:") {
            self.data.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        } else if line.starts_with(':') || SKIPPED_FIELDS.iter().any(|f| line.starts_with(f)) {
            // Heartbeat comment, or a field whose content the JSON payload repeats
        } else {
            self.dispatch(messages);
            messages.push(line.to_string());
        }
    }

    fn dispatch(&mut self, messages: &mut Vec<String>) {
        if !self.data.is_empty() {
            messages.push(self.data.join("\n"));
            self.data.clear();
        }
    }
}
