use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

use tidepool_proto::{PullReply, PullRequest};

use crate::config::ChatConfig;
use crate::session::ChatSession;
use crate::sink::DisplaySink;
use crate::transport::ChatTransport;

/// Classification of one completed pull cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// New data arrived; the cursor advanced and a message was rendered.
    Advanced,
    /// The server-side wait expired with nothing new.
    Idle,
    /// Transport or protocol failure; rendered to the sink and absorbed.
    Failed,
}

/// The self-rescheduling pull loop.
///
/// Owns the [`ChatSession`] for its lifetime, which makes the single-writer
/// cursor invariant structural: one engine, one sequential loop, never two
/// pulls in flight. Every cycle, whether it ends in data, idle or failure,
/// schedules exactly one successor; the loop has no terminal state and
/// stops only when its task is torn down.
pub struct PollEngine<T: ChatTransport> {
    transport: Arc<T>,
    session: ChatSession,
    sink: Arc<dyn DisplaySink>,
    topic: String,
    wait_secs: u64,
    failure_backoff: Option<Duration>,
}

impl<T: ChatTransport> PollEngine<T> {
    pub fn new(
        transport: Arc<T>,
        session: ChatSession,
        sink: Arc<dyn DisplaySink>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            transport,
            session,
            sink,
            topic: config.topic.clone(),
            wait_secs: config.poll_wait_secs,
            failure_backoff: config.failure_backoff,
        }
    }

    /// Current synchronization position.
    pub fn cursor(&self) -> tidepool_proto::Cursor {
        self.session.cursor()
    }

    /// Runs one pull cycle: build the request from the current cursor, issue
    /// it, classify the outcome. [`PollEngine::run`] is nothing but this in
    /// a loop; tests drive it directly.
    pub async fn cycle(&mut self) -> PollOutcome {
        let request = PullRequest {
            since: self.session.cursor(),
            wait_secs: self.wait_secs,
            topic: self.topic.clone(),
        };

        match self.transport.pull(&request).await {
            Ok(PullReply::Data { text, cursor }) => {
                self.session.advance(cursor);
                debug!(target: "tidepool.poll", %cursor, "message received");
                self.sink.render_message(&text);
                PollOutcome::Advanced
            }
            Ok(PullReply::Idle { cursor }) => {
                // The server echoes the same or an equivalent cursor on an
                // idle window; the monotonic advance makes this a no-op.
                self.session.advance(cursor);
                debug!(target: "tidepool.poll", %cursor, "idle window");
                PollOutcome::Idle
            }
            Err(err) => {
                warn!(target: "tidepool.poll", error = %err, "pull failed");
                self.sink.render_error(&format!("failed to pull: {err}"));
                if let Some(delay) = self.failure_backoff {
                    sleep(delay).await;
                }
                PollOutcome::Failed
            }
        }
    }

    /// Pulls forever. Failures are rendered and absorbed; by default the
    /// next cycle starts immediately, with `failure_backoff` as the only
    /// opt-in brake.
    pub async fn run(mut self) {
        loop {
            self.cycle().await;
        }
    }

    pub fn spawn(self) -> JoinHandle<()>
    where
        T: 'static,
    {
        tokio::spawn(self.run())
    }
}
