//! HTTP client for the cluster REST API.

use std::pin::Pin;
use std::time::Duration;

use futures_util::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::ClientError;
use crate::resource::WatchEvent;

/// Stream of decoded watch events.
pub type WatchEvents = Pin<Box<dyn Stream<Item = Result<WatchEvent, ClientError>> + Send>>;

/// HTTP client for REST API endpoints.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get JSON from an endpoint.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let response = self.send(path, query).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }

    /// Open a long-lived request whose body is newline-delimited watch events.
    pub async fn watch(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<WatchEvents, ClientError> {
        let response = self.send(path, query).await?;
        debug!(path = %path, "Watch established");

        Ok(Box::pin(decode_events(Box::pin(response.bytes_stream()))))
    }

    async fn send(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        Ok(response)
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::Connection(e.to_string())
    } else {
        ClientError::Http(e)
    }
}

/// Longest watch event line accepted; longer lines are discarded.
pub const MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

/// Split a byte stream into newline-delimited JSON watch events.
///
/// A line that fails to decode yields a `Serialization` error and the stream
/// carries on. A transport error is yielded once and ends the stream.
pub fn decode_events<S, B, E>(
    chunks: S,
) -> impl Stream<Item = Result<WatchEvent, ClientError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + Unpin,
    B: AsRef<[u8]> + Send,
    E: Send,
    ClientError: From<E>,
{
    decode_events_with_limit(chunks, MAX_LINE_BYTES)
}

/// Like [`decode_events`], with a custom line length limit.
///
/// A line longer than `max_line` yields one `Serialization` error and is
/// skipped up to its terminating newline.
pub fn decode_events_with_limit<S, B, E>(
    chunks: S,
    max_line: usize,
) -> impl Stream<Item = Result<WatchEvent, ClientError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + Unpin,
    B: AsRef<[u8]> + Send,
    E: Send,
    ClientError: From<E>,
{
    let reader = LineReader {
        chunks,
        buffer: Vec::new(),
        finished: false,
        discarding: false,
    };

    stream::unfold(reader, move |mut reader| async move {
        loop {
            if let Some(line) = extract_line(&mut reader.buffer) {
                if std::mem::take(&mut reader.discarding) {
                    continue;
                }
                if line.len() > max_line {
                    return Some((Err(oversized(max_line)), reader));
                }
                if line.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                return Some((parse_event(&line), reader));
            }

            if reader.buffer.len() > max_line {
                reader.buffer.clear();
                if !reader.discarding {
                    reader.discarding = true;
                    return Some((Err(oversized(max_line)), reader));
                }
            }

            if reader.finished {
                // Trailing line without a newline terminator
                if reader.discarding || reader.buffer.iter().all(u8::is_ascii_whitespace) {
                    return None;
                }
                let line = std::mem::take(&mut reader.buffer);
                return Some((parse_event(&line), reader));
            }

            match reader.chunks.next().await {
                Some(Ok(chunk)) => {
                    trace!(bytes = chunk.as_ref().len(), "Watch chunk");
                    reader.buffer.extend_from_slice(chunk.as_ref());
                }
                Some(Err(e)) => {
                    reader.buffer.clear();
                    reader.finished = true;
                    reader.discarding = false;
                    return Some((Err(ClientError::from(e)), reader));
                }
                None => reader.finished = true,
            }
        }
    })
}

/// State of the line splitter between two yielded events.
struct LineReader<S> {
    chunks: S,
    buffer: Vec<u8>,
    finished: bool,
    /// Dropping the rest of an oversized line.
    discarding: bool,
}

fn parse_event(line: &[u8]) -> Result<WatchEvent, ClientError> {
    serde_json::from_slice(line)
        .map_err(|e: serde_json::Error| ClientError::Serialization(e.to_string()))
}

fn oversized(max_line: usize) -> ClientError {
    ClientError::Serialization(format!("watch event line exceeds {} bytes", max_line))
}

/// Remove one complete line (without the newline) from the front of the buffer.
fn extract_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let end = buffer.iter().position(|b| *b == b'\n')?;
    let mut line: Vec<u8> = buffer.drain(..=end).collect();
    line.pop();
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::WatchEventType;

    fn chunks(
        parts: Vec<Result<&'static str, ClientError>>,
    ) -> impl Stream<Item = Result<&'static str, ClientError>> + Send + Unpin {
        stream::iter(parts)
    }

    #[test]
    fn test_extract_line() {
        let mut buffer = b"one\ntwo\npartial".to_vec();
        assert_eq!(extract_line(&mut buffer), Some(b"one".to_vec()));
        assert_eq!(extract_line(&mut buffer), Some(b"two".to_vec()));
        assert_eq!(extract_line(&mut buffer), None);
        assert_eq!(buffer, b"partial".to_vec());
    }

    #[tokio::test]
    async fn test_decode_events_across_chunk_boundaries() {
        let events: Vec<_> = decode_events(chunks(vec![
            Ok("{\"type\":\"ADDED\",\"obj"),
            Ok("ect\":{}}\n\n{\"type\":\"MODIFIED\",\"object\":{}}\n"),
            Ok("{\"type\":\"DELETED\",\"object\":{}}"),
        ]))
        .collect()
        .await;

        let types: Vec<WatchEventType> = events
            .into_iter()
            .map(|e| e.unwrap().event_type)
            .collect();
        assert_eq!(
            types,
            vec![
                WatchEventType::Added,
                WatchEventType::Modified,
                WatchEventType::Deleted
            ]
        );
    }

    #[tokio::test]
    async fn test_decode_events_reports_bad_line_and_continues() {
        let events: Vec<_> = decode_events(chunks(vec![Ok(
            "not json\n{\"type\":\"MODIFIED\",\"object\":{}}\n",
        )]))
        .collect()
        .await;

        assert_eq!(events.len(), 2);
        assert!(events[0].as_ref().unwrap_err().is_malformed());
        assert!(events[1].is_ok());
    }

    #[tokio::test]
    async fn test_decode_events_ends_after_transport_error() {
        let events: Vec<_> = decode_events(chunks(vec![
            Ok("{\"type\":\"ADDED\",\"object\":{}}\n"),
            Err(ClientError::Connection("reset".into())),
            Ok("{\"type\":\"MODIFIED\",\"object\":{}}\n"),
        ]))
        .collect()
        .await;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], Err(ClientError::Connection(_))));
    }

    #[tokio::test]
    async fn test_oversized_line_is_reported_and_skipped() {
        let events: Vec<_> = decode_events_with_limit(
            chunks(vec![
                Ok("xxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"),
                Ok("xxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"),
                Ok("xxxx\n{\"type\":\"ADDED\",\"object\":{}}\n"),
            ]),
            40,
        )
        .collect()
        .await;

        assert_eq!(events.len(), 2);
        assert!(events[0].as_ref().unwrap_err().is_malformed());
        assert_eq!(
            events[1].as_ref().unwrap().event_type,
            WatchEventType::Added
        );
    }

    #[tokio::test]
    async fn test_event_object_keeps_key_order() {
        let events: Vec<_> = decode_events(chunks(vec![Ok(
            "{\"type\":\"MODIFIED\",\"object\":{\"zeta\":1,\"alpha\":2}}\n",
        )]))
        .collect()
        .await;

        let object = events[0].as_ref().unwrap().object.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
