//! Scripted [`HttpSend`] used by unit tests across the crate.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::{SageError, SageResult};
use super::http::{HttpReply, HttpSend, OutboundRequest};

/// Replays canned replies in order and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedSender {
    replies: Mutex<VecDeque<SageResult<HttpReply>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedSender {
    pub(crate) fn new(replies: Vec<HttpReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push_error(&self, err: SageError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of recorded requests whose URL starts with `prefix`.
    pub(crate) fn count_to(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl HttpSend for ScriptedSender {
    async fn send(&self, request: OutboundRequest) -> SageResult<HttpReply> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SageError::transport("no scripted reply left")))
    }
}
