//! Folds streamed answer frames into one final text.
//!
//! Dify streams workflow output as newline-delimited frames in the SSE
//! shape: blank keep-alive lines interleaved with `data: {json}` lines.
//! Only the string `"answer"` field of a frame contributes to the final
//! text; every other frame kind is passed over.

use tracing::trace;

/// Returned instead of an empty string when a run streams no answer text.
pub const EMPTY_ANSWER_FALLBACK: &str =
    "Analysis finished, but the expert system returned no answer.";

/// Incremental accumulator for a streamed workflow answer.
///
/// Chunk boundaries are arbitrary: a frame may arrive split across chunks,
/// even inside a multibyte character, so raw bytes are buffered until a
/// newline completes the line and each line is decoded on its own.
#[derive(Debug, Default)]
pub struct AnswerAggregator {
    buf: Vec<u8>,
    answer: String,
}

impl AnswerAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of the response body.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);

        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line_bytes);
            self.push_line(line.trim());
        }
    }

    /// Finish the stream and return the final text.
    ///
    /// Streams may close without a trailing newline, so any residual
    /// buffered line is processed first.
    #[must_use]
    pub fn finish(mut self) -> String {
        let line = String::from_utf8_lossy(&self.buf).trim().to_string();
        self.push_line(&line);

        if self.answer.is_empty() {
            EMPTY_ANSWER_FALLBACK.to_string()
        } else {
            self.answer
        }
    }

    fn push_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }

        let Some(data) = line
            .strip_prefix("data: ")
            .or_else(|| line.strip_prefix("data:"))
        else {
            return;
        };

        let Ok(frame) = serde_json::from_str::<serde_json::Value>(data) else {
            trace!(line, "skipping unparseable stream frame");
            return;
        };

        if let Some(text) = frame["answer"].as_str() {
            self.answer.push_str(text);
        }
    }
}
