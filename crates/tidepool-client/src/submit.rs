use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::sink::DisplaySink;
use crate::transport::ChatTransport;

/// Sends outgoing messages. Deliberately does not touch the transcript: the
/// authoritative, server-ordered copy of a submitted message arrives through
/// the poll engine's next cycle, which avoids double-rendering and guessing
/// the server-assigned position.
pub struct SubmitClient<T: ChatTransport> {
    transport: Arc<T>,
    sink: Arc<dyn DisplaySink>,
}

impl<T: ChatTransport> SubmitClient<T> {
    pub fn new(transport: Arc<T>, sink: Arc<dyn DisplaySink>) -> Self {
        Self { transport, sink }
    }

    /// Submits one message. Empty or all-whitespace text is rejected locally
    /// without a network exchange. On wire failure the error is rendered to
    /// the sink and returned, so the caller can leave its input intact for a
    /// manual retry; on success the caller is expected to clear its input.
    pub async fn submit(&self, text: &str) -> ClientResult<()> {
        if text.trim().is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        match self.transport.push(text).await {
            Ok(()) => {
                debug!(target: "tidepool.submit", "message accepted");
                Ok(())
            }
            Err(err) => {
                warn!(target: "tidepool.submit", error = %err, "push failed");
                self.sink.render_error(&format!("failed to submit: {err}"));
                Err(err)
            }
        }
    }
}
