//! Wire contract for the tidepool chat long-poll protocol.
//! Keeping this in a dedicated crate allows the message shapes to be shared
//! with future non-CLI frontends without pulling in the runtime code.
//!
//! The protocol is deliberately thin: a one-shot bootstrap returning the id
//! of the newest message the server knows about, a long-poll pull keyed on
//! that id, and a push. Success on the wire is signalled solely by the
//! presence of an `ok` key, so every decoder here treats any structurally
//! unexpected payload as a [`WireError`] rather than trusting the shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Server-assigned position in the message stream.
///
/// Opaque to the client apart from ordering: the server hands one out at
/// bootstrap and with every pull reply, and the client echoes the latest one
/// back as `since`. No arithmetic is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(i64);

impl Cursor {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum WireError {
    #[error("unexpected pull payload: {0}")]
    MalformedPull(String),
    #[error("push rejected by server: {0}")]
    PushRejected(String),
}

/// Reply shape advertised by the bootstrap endpoint.
///
/// The capitalised field name is the wire contract, not a style choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapReply {
    #[serde(rename = "LastMessageId")]
    pub last_message_id: Cursor,
}

/// Parameters for one long-poll pull, built fresh every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Newest cursor the client has already consumed.
    pub since: Cursor,
    /// Server-side wait budget in seconds; the server may hold the request
    /// open this long waiting for new data.
    pub wait_secs: u64,
    /// Channel identifier scoping the message stream.
    pub topic: String,
}

impl PullRequest {
    /// Query pairs in the order the original endpoint documents them.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("since", self.since.to_string()),
            ("timeout", self.wait_secs.to_string()),
            ("topic", self.topic.clone()),
        ]
    }
}

/// Decoded outcome of a pull exchange that produced a well-formed envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullReply {
    /// The server delivered a message and the cursor to resume from.
    Data { text: String, cursor: Cursor },
    /// The server-side wait expired with nothing new. Not an error.
    Idle { cursor: Cursor },
}

impl PullReply {
    pub fn cursor(&self) -> Cursor {
        match self {
            PullReply::Data { cursor, .. } | PullReply::Idle { cursor } => *cursor,
        }
    }
}

/// Body of a push exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushRequest {
    pub message: String,
}

/// Decodes a pull response body.
///
/// The success marker is the presence of an `ok` key whose value is an
/// object; a `text` member inside it carries a message, its absence means
/// the server-side wait expired. Everything else is malformed.
pub fn decode_pull_reply(payload: &Value) -> Result<PullReply, WireError> {
    let envelope = payload
        .as_object()
        .ok_or_else(|| WireError::MalformedPull(summarize(payload)))?;

    let ok = match envelope.get("ok") {
        Some(Value::Object(fields)) => fields,
        _ => return Err(WireError::MalformedPull(summarize(payload))),
    };

    let cursor = envelope
        .get("timestamp")
        .and_then(Value::as_i64)
        .map(Cursor::new)
        .ok_or_else(|| WireError::MalformedPull(summarize(payload)))?;

    match ok.get("text") {
        Some(Value::String(text)) => Ok(PullReply::Data {
            text: text.clone(),
            cursor,
        }),
        None => Ok(PullReply::Idle { cursor }),
        Some(_) => Err(WireError::MalformedPull(summarize(payload))),
    }
}

/// Decodes a push response body. The server guarantees no structured error
/// schema, only the `ok` success marker.
pub fn decode_push_receipt(payload: &Value) -> Result<(), WireError> {
    match payload.as_object() {
        Some(envelope) if envelope.contains_key("ok") => Ok(()),
        _ => Err(WireError::PushRejected(summarize(payload))),
    }
}

const SUMMARY_LIMIT: usize = 256;

/// Compact rendering of an offending payload for error messages. Bounded so
/// a hostile body cannot flood the sink.
fn summarize(payload: &Value) -> String {
    let mut rendered = payload.to_string();
    if rendered.len() > SUMMARY_LIMIT {
        let cut = (0..=SUMMARY_LIMIT)
            .rev()
            .find(|i| rendered.is_char_boundary(*i))
            .unwrap_or(0);
        rendered.truncate(cut);
        rendered.push('…');
    }
    rendered
}
