//! In-memory transport for unit tests

use super::transport::{ApiRequest, Transport};
use crate::auth::TENANT_ACCESS_TOKEN_PATH;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum Reply {
    Json(JsonValue),
    Status(u16),
}

/// Replays scripted replies in order and records every request.
///
/// Requests to the tenant token endpoint are answered separately with a
/// fixed token and never consume the script.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
    token_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Script of successful JSON bodies
    pub fn json(bodies: impl IntoIterator<Item = JsonValue>) -> Self {
        Self::new(bodies.into_iter().map(Reply::Json))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<JsonValue> {
        if request.url.ends_with(TENANT_ACCESS_TOKEN_PATH) {
            let n = self.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
            return Ok(json!({
                "code": 0,
                "msg": "ok",
                "tenant_access_token": format!("t-{n}"),
                "expire": 7200
            }));
        }

        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(Error::http_status(status, "scripted failure")),
            None => Err(Error::Other("script exhausted".to_string())),
        }
    }
}
