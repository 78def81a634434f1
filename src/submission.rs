//! Backend submission contract and the async completion path.
//!
//! Sending to the backend is the only operation in the system that
//! suspends. Completion re-enters the engine synchronously: the confirmed
//! item always lands in the backlog, and is spawned only if the overlay is
//! still enabled when the response arrives. Failures surface once and are
//! never retried; there is no cancellation of in-flight submissions.

use crate::engine::DanmakuEngine;
use crate::error::{Error, Result};
use crate::item::{DanmakuItem, Origin, validate_text};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

/// POST body for the send-danmaku endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub message: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: Origin,
}

/// Response body: `{success, danmaku_id, danmaku_text | error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default)]
    pub danmaku_id: Option<String>,
    #[serde(default)]
    pub danmaku_text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Async seam to the backend. Implementations deliver one request and await
/// its response; they must not retry internally.
///
/// Everything runs on one cooperative timeline, so the returned futures
/// carry no `Send` bound.
#[allow(async_fn_in_trait)]
pub trait SubmissionTransport {
    async fn send(&self, request: SubmissionRequest) -> Result<SubmissionResponse>;
}

/// Submit `text` through `transport` and admit the confirmed item.
///
/// Validation happens up front so the backend only sees well-formed text.
/// Admission happens at completion time: if the overlay was disabled while
/// the request was in flight, the item still enters the backlog but is not
/// spawned. Returns the server-assigned item id.
pub async fn submit_via<T: SubmissionTransport>(
    transport: &T,
    engine: &DanmakuEngine,
    text: &str,
    user_id: &str,
    origin: Origin,
) -> Result<String> {
    let trimmed = validate_text(text, origin)?.to_string();

    let response = transport
        .send(SubmissionRequest {
            message: trimmed.clone(),
            user_id: user_id.to_string(),
            kind: origin,
        })
        .await?;

    if !response.success {
        let reason = response
            .error
            .unwrap_or_else(|| "backend rejected submission".to_string());
        return Err(Error::Submission(reason));
    }
    let id = response
        .danmaku_id
        .ok_or_else(|| Error::Submission("response missing danmaku_id".to_string()))?;
    let text = response.danmaku_text.unwrap_or(trimmed);

    let item = DanmakuItem::new(id, &text, origin, chrono::Utc::now().timestamp_millis())?;
    let item_id = item.id.clone();
    engine.admit(item);
    Ok(item_id)
}

type PendingReply = oneshot::Sender<Result<SubmissionResponse>>;

/// In-process transport backed by a request channel with oneshot replies.
/// Stands in for the HTTP backend in tests and the demo binary.
#[derive(Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<(SubmissionRequest, PendingReply)>,
}

impl ChannelTransport {
    pub fn new() -> (
        Self,
        mpsc::UnboundedReceiver<(SubmissionRequest, PendingReply)>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SubmissionTransport for ChannelTransport {
    async fn send(&self, request: SubmissionRequest) -> Result<SubmissionResponse> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send((request, reply_tx))
            .map_err(|_| Error::Submission("backend unavailable".to_string()))?;
        reply_rx
            .await
            .map_err(|_| Error::Submission("backend dropped the request".to_string()))?
    }
}
