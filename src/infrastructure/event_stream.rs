// Server-sent event streaming utilities
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;

use crate::domain::stream::StreamMessage;

/// Create a server-sent events response from a message stream.
pub fn sse_stream<S, T>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let byte_stream = stream.map(|msg| frame_event(&msg));
    let body = Body::from_stream(byte_stream);

    // NOTE: Events are serialized and framed individually, so the response
    // carries no Content-Encoding header. Compressing per event would break
    // browser EventSource decoding of the stream.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single message as an SSE data frame.
fn frame_event<T: Serialize>(msg: &T) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(msg)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let mut frame = BytesMut::with_capacity(json.len() + 8);
    frame.put_slice(b"data: ");
    frame.put_slice(&json);
    frame.put_slice(b"\n\n");

    Ok(frame.freeze())
}

/// Helper to create a streaming response from a receiver
pub fn stream_from_receiver(
    mut rx: tokio::sync::mpsc::Receiver<StreamMessage>,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        while let Some(msg) = rx.recv().await {
            yield msg;
        }
    };

    match sse_stream(stream) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stream::CompletionEvent;

    #[test]
    fn test_frame_event_format() {
        let msg = StreamMessage::Complete(CompletionEvent {
            widget_count: 8,
            duration_ms: 42,
        });
        let frame = frame_event(&msg).unwrap();

        assert!(frame.starts_with(b"data: {"));
        assert!(frame.ends_with(b"}\n\n"));

        let json: serde_json::Value =
            serde_json::from_slice(&frame[6..frame.len() - 2]).unwrap();
        assert_eq!(json["type"], "complete");
        assert_eq!(json["durationMs"], 42);
    }
}
