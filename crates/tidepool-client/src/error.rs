use thiserror::Error;

/// Failure classes the synchronization loop distinguishes.
///
/// A server-side long-poll timeout is not represented here: it is a normal
/// pull outcome ([`crate::PullReply::Idle`]), not an error. Only
/// [`ClientError::Initialize`] is fatal to a session; the pull loop absorbs
/// everything else and submit failures are left for the caller to retry.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The one-shot cursor bootstrap failed. No recovery path: polling never
    /// starts for this session.
    #[error("session bootstrap failed: {0}")]
    Initialize(String),

    /// The exchange could not be completed at the network layer.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but lacked the expected success marker or shape.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Submit contract violation caught locally; no network exchange made.
    #[error("message text is empty")]
    EmptyMessage,

    /// The client configuration could not be turned into usable endpoints.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<tidepool_proto::WireError> for ClientError {
    fn from(err: tidepool_proto::WireError) -> Self {
        ClientError::Protocol(err.to_string())
    }
}
