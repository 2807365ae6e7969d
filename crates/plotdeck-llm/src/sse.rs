//! Server-sent-event parsing for streamed completions.
//!
//! The upstream emits one `data:` line per incremental delta, terminated
//! by the `data: [DONE]` sentinel. Malformed lines are skipped rather
//! than failing the whole stream: a single bad event must never abort an
//! in-flight generation.

use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;
use tracing::trace;

/// Classification of a single SSE line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// An incremental content delta.
    Token(String),
    /// The stream-termination sentinel.
    Done,
    /// Blank, non-`data:`, malformed, or empty-delta line.
    Skip,
}

/// Parse one SSE line into a token, the done sentinel, or a skip.
pub fn parse_sse_line(line: &str) -> SseLine {
    let line = line.trim();
    let Some(data) = line.strip_prefix("data:") else {
        return SseLine::Skip;
    };
    let data = data.trim();
    if data == "[DONE]" {
        return SseLine::Done;
    }
    let Ok(event) = serde_json::from_str::<serde_json::Value>(data) else {
        trace!(line = %data, "skipping malformed stream event");
        return SseLine::Skip;
    };
    match event["choices"][0]["delta"]["content"].as_str() {
        Some(delta) if !delta.is_empty() => SseLine::Token(delta.to_owned()),
        _ => SseLine::Skip,
    }
}

/// Relay an SSE byte stream into `tx`, one content delta per send.
///
/// Runs inside a `tokio::spawn` and consumes the stream until the done
/// sentinel, stream end, a transport error, or the receiver going away.
/// Dropping the receiver makes `send` fail, the relay returns, and the
/// upstream response body is dropped with it — caller cancellation
/// closes the upstream connection promptly.
pub async fn relay_sse_stream<S, E>(byte_stream: S, tx: mpsc::Sender<String>)
where
    S: Stream<Item = Result<Bytes, E>>,
{
    use futures::StreamExt;

    // Accumulates raw bytes between line boundaries; SSE events never
    // align with transport chunks.
    let mut buffer = String::new();

    tokio::pin!(byte_stream);

    while let Some(chunk) = byte_stream.next().await {
        let Ok(chunk) = chunk else {
            // Transport error mid-stream: end the token sequence. The
            // caller observes a truncated but well-formed stream.
            return;
        };
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(pos) = buffer.find('\n') {
            let line = buffer[..pos].to_owned();
            buffer.drain(..=pos);
            match parse_sse_line(&line) {
                SseLine::Token(token) => {
                    if tx.send(token).await.is_err() {
                        return;
                    }
                }
                SseLine::Done => return,
                SseLine::Skip => {}
            }
        }
    }

    // Trailing partial line without a final newline.
    if let SseLine::Token(token) = parse_sse_line(&buffer) {
        let _ = tx.send(token).await;
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
