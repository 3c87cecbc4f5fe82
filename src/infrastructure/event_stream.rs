// Server-Sent Events client for the backend's /events endpoint
use crate::application::store_api::{EventFeed, EventStream};
use crate::error::ApiError;
use crate::infrastructure::http_client::{HttpBackend, check_status};
use async_stream::stream;
use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use futures::StreamExt;

#[async_trait]
impl EventFeed for HttpBackend {
    async fn subscribe(&self) -> Result<EventStream, ApiError> {
        let response = self
            .client
            .get(self.url("/events"))
            .header("Accept", "text/event-stream")
            .send()
            .await?;
        let response = check_status(response).await?;
        tracing::debug!("Event stream connected");

        Ok(Box::pin(stream! {
            let mut buffer = BytesMut::new();
            let mut byte_stream = std::pin::pin!(response.bytes_stream());

            while let Some(chunk) = byte_stream.next().await {
                match chunk {
                    Ok(chunk) => {
                        push_chunk(&mut buffer, &chunk);
                        while let Some(event) = take_event(&mut buffer) {
                            if let Some(data) = event_data(&event) {
                                yield Ok(data);
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(ApiError::Stream(e.to_string()));
                        return;
                    }
                }
            }
        }))
    }
}

/// Append a chunk, dropping carriage returns so CRLF framing looks like LF.
fn push_chunk(buffer: &mut BytesMut, chunk: &[u8]) {
    buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));
}

/// Split off one complete event (terminated by a blank line), if buffered.
fn take_event(buffer: &mut BytesMut) -> Option<String> {
    let end = buffer.windows(2).position(|w| w == b"\n\n")?;
    let event = buffer.split_to(end);
    buffer.advance(2);
    Some(String::from_utf8_lossy(&event).into_owned())
}

/// The event's `data` payload; multiple data lines are joined with newlines.
/// Comments and events without data yield `None`.
fn event_data(event: &str) -> Option<String> {
    let lines: Vec<&str> = event
        .lines()
        .filter_map(|line| {
            line.strip_prefix("data:")
                .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        })
        .collect();
    if lines.is_empty() {
        return None;
    }
    let data = lines.join("\n");
    if data.trim().is_empty() {
        return None;
    }
    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_event_waits_for_blank_line() {
        let mut buffer = BytesMut::new();
        push_chunk(&mut buffer, b"data: customer_cre");
        assert!(take_event(&mut buffer).is_none());

        push_chunk(&mut buffer, b"ated\n\ndata: order_created\n\n");
        assert_eq!(take_event(&mut buffer).as_deref(), Some("data: customer_created"));
        assert_eq!(take_event(&mut buffer).as_deref(), Some("data: order_created"));
        assert!(take_event(&mut buffer).is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_crlf_framing() {
        let mut buffer = BytesMut::new();
        push_chunk(&mut buffer, b"data: product_created\r\n\r\n");
        let event = take_event(&mut buffer).expect("event");
        assert_eq!(event_data(&event).as_deref(), Some("product_created"));
    }

    #[test]
    fn test_event_data_variants() {
        assert_eq!(event_data("data: order_created").as_deref(), Some("order_created"));
        assert_eq!(event_data("data:order_created").as_deref(), Some("order_created"));
        assert_eq!(
            event_data("event: message\nid: 4\ndata: customer_created").as_deref(),
            Some("customer_created")
        );
        assert_eq!(event_data("data: a\ndata: b").as_deref(), Some("a\nb"));
        assert_eq!(event_data(": keep-alive"), None);
        assert_eq!(event_data("data: "), None);
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let mut buffer = BytesMut::new();
        let payload = "data: caf\u{e9}\n\n".as_bytes();
        let (first, second) = payload.split_at(payload.len() - 3);
        push_chunk(&mut buffer, first);
        assert!(take_event(&mut buffer).is_none());
        push_chunk(&mut buffer, second);

        let event = take_event(&mut buffer).expect("event");
        assert_eq!(event_data(&event).as_deref(), Some("caf\u{e9}"));
    }
}
