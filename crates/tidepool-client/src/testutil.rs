//! In-memory fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use tidepool_proto::{Cursor, PullReply, PullRequest};

use crate::error::ClientResult;
use crate::sink::DisplaySink;
use crate::transport::ChatTransport;

/// Transport that replays scripted pull outcomes. Once the script is
/// exhausted, further pulls park forever, which keeps a spawned engine loop
/// quiet while assertions run.
pub(crate) struct ScriptedTransport {
    bootstrap_cursor: Cursor,
    pulls: Mutex<VecDeque<ClientResult<PullReply>>>,
    pull_requests: Mutex<Vec<PullRequest>>,
    pushes: Mutex<Vec<String>>,
    push_results: Mutex<VecDeque<ClientResult<()>>>,
}

impl ScriptedTransport {
    pub(crate) fn new(bootstrap_cursor: Cursor) -> Self {
        Self {
            bootstrap_cursor,
            pulls: Mutex::new(VecDeque::new()),
            pull_requests: Mutex::new(Vec::new()),
            pushes: Mutex::new(Vec::new()),
            push_results: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn script_pull(&self, result: ClientResult<PullReply>) {
        self.pulls.lock().unwrap().push_back(result);
    }

    pub(crate) fn script_push(&self, result: ClientResult<()>) {
        self.push_results.lock().unwrap().push_back(result);
    }

    pub(crate) fn pull_requests(&self) -> Vec<PullRequest> {
        self.pull_requests.lock().unwrap().clone()
    }

    pub(crate) fn pushed(&self) -> Vec<String> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn bootstrap(&self) -> ClientResult<Cursor> {
        Ok(self.bootstrap_cursor)
    }

    async fn pull(&self, request: &PullRequest) -> ClientResult<PullReply> {
        self.pull_requests.lock().unwrap().push(request.clone());
        let next = self.pulls.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }

    async fn push(&self, text: &str) -> ClientResult<()> {
        self.pushes.lock().unwrap().push(text.to_string());
        self.push_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Sink that records everything rendered to it.
#[derive(Default)]
pub(crate) struct RecordingSink {
    messages: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl DisplaySink for RecordingSink {
    fn render_message(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }

    fn render_error(&self, text: &str) {
        self.errors.lock().unwrap().push(text.to_string());
    }
}
