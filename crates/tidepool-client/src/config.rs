use std::env;
#[cfg(test)]
use std::sync::Mutex;
use std::time::Duration;

/// Client configuration for one chat session.
///
/// Everything has a default matching the reference deployment; callers
/// usually only override `base_url` and `topic`.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Server address, with or without a scheme ("host:port" is accepted).
    pub base_url: String,
    /// Channel identifier scoping the message stream.
    pub topic: String,
    /// Server-side wait budget for each pull, in seconds.
    pub poll_wait_secs: u64,
    /// Optional delay inserted after a failed pull cycle. `None` preserves
    /// the original behavior of retrying immediately and indefinitely.
    pub failure_backoff: Option<Duration>,
    /// Path of the one-shot bootstrap endpoint.
    pub start_path: String,
    /// Path of the long-poll pull endpoint.
    pub pull_path: String,
    /// Path of the push endpoint.
    pub push_path: String,
    /// TCP connect timeout for all exchanges.
    pub connect_timeout: Duration,
}

impl ChatConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(server) = env::var("TIDEPOOL_SERVER") {
            config.base_url = server;
        }
        if let Ok(topic) = env::var("TIDEPOOL_TOPIC") {
            config.topic = topic;
        }
        config
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            topic: "test".to_string(),
            poll_wait_secs: 5,
            failure_backoff: None,
            start_path: "/chat/start".to_string(),
            pull_path: "/chat/pullsince".to_string(),
            push_path: "/chat/push".to_string(),
            connect_timeout: Duration::from_secs(2),
        }
    }
}
