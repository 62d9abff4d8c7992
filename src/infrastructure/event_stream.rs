// NDJSON streaming utilities for progressive dashboard loading
use crate::domain::dashboard::StreamEvent;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::response::IntoResponse;
use futures::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

/// Turn a receiver of stream events into a newline-delimited JSON response.
/// Each event is one self-describing JSON object per line; response-level
/// compression is left to the tower-http layer.
pub fn stream_from_receiver(rx: tokio::sync::mpsc::Receiver<StreamEvent>) -> impl IntoResponse {
    let line_stream = ReceiverStream::new(rx).map(|event| serialize_line(&event));
    let body = Body::from_stream(line_stream);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(body);

    match response {
        Ok(response) => response,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

fn serialize_line(event: &StreamEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event).map(|mut line| {
        line.push('\n');
        line
    })
}
