//! Tidepool client: keeps a chat transcript synchronized over a cursor-based
//! long-poll protocol.
//!
//! Responsibilities:
//! - bootstrapping the synchronization cursor against the start endpoint
//! - running the self-rescheduling pull loop that feeds the display sink
//! - submitting outgoing messages without touching the transcript locally
//! - classifying server idle windows apart from transport/protocol failures
//!
//! The pieces compose around two seams: [`ChatTransport`] abstracts the wire
//! (the [`HttpTransport`] implementation speaks the real protocol) and
//! [`DisplaySink`] abstracts rendering. A typical session:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tidepool_client::{
//!     ChatConfig, ChatSession, DisplaySink, HttpTransport, PollEngine, SubmitClient,
//! };
//!
//! struct Stdout;
//!
//! impl DisplaySink for Stdout {
//!     fn render_message(&self, text: &str) {
//!         println!("{text}");
//!     }
//!     fn render_error(&self, text: &str) {
//!         eprintln!("{text}");
//!     }
//! }
//!
//! # async fn example() -> Result<(), tidepool_client::ClientError> {
//! let config = ChatConfig::new("http://127.0.0.1:8080");
//! let transport = Arc::new(HttpTransport::new(&config)?);
//! let sink: Arc<dyn DisplaySink> = Arc::new(Stdout);
//!
//! let session = ChatSession::bootstrap(transport.as_ref()).await?;
//! let poller = PollEngine::new(transport.clone(), session, sink.clone(), &config).spawn();
//!
//! let submitter = SubmitClient::new(transport, sink);
//! submitter.submit("hello").await?;
//! # poller.abort();
//! # Ok(())
//! # }
//! ```

mod config;
mod engine;
mod error;
mod session;
mod sink;
mod submit;
mod transport;

pub use config::ChatConfig;
pub use engine::{PollEngine, PollOutcome};
pub use error::{ClientError, ClientResult};
pub use session::ChatSession;
pub use sink::DisplaySink;
pub use submit::SubmitClient;
pub use transport::{ChatTransport, HttpTransport};

pub use tidepool_proto::{Cursor, PullReply, PullRequest};

#[cfg(test)]
pub(crate) mod testutil;
