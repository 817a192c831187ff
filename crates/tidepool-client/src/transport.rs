use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use tidepool_proto::{
    decode_pull_reply, decode_push_receipt, BootstrapReply, Cursor, PullReply, PullRequest,
    PushRequest,
};

use crate::config::ChatConfig;
use crate::error::{ClientError, ClientResult};

/// Wire seam for the three protocol exchanges. The poll engine, session and
/// submit client only ever talk to this trait, so tests can script outcomes
/// without a server.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// One-shot request for the newest message id known to the server.
    async fn bootstrap(&self) -> ClientResult<Cursor>;

    /// One long-poll pull. The server may hold the request open up to the
    /// wait budget embedded in `request`.
    async fn pull(&self, request: &PullRequest) -> ClientResult<PullReply>;

    /// Sends one outgoing message.
    async fn push(&self, text: &str) -> ClientResult<()>;
}

// Headroom on top of the server-side wait budget before the client gives up
// on a pull; bootstrap and push exchanges get the flat budget.
const EXCHANGE_TIMEOUT_SECS: u64 = 10;

/// [`ChatTransport`] over HTTP/JSON, speaking the original endpoint contract.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    start_url: Url,
    pull_url: Url,
    push_url: Url,
    pull_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ChatConfig) -> ClientResult<Self> {
        let base = normalize_base_url(&config.base_url);
        let base = Url::parse(&base)
            .map_err(|err| ClientError::Config(format!("invalid base url {base:?}: {err}")))?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .no_proxy()
            .build()
            .map_err(|err| ClientError::Config(format!("http client: {err}")))?;

        Ok(Self {
            http,
            start_url: endpoint(&base, &config.start_path)?,
            pull_url: endpoint(&base, &config.pull_path)?,
            push_url: endpoint(&base, &config.push_path)?,
            pull_timeout: Duration::from_secs(config.poll_wait_secs + EXCHANGE_TIMEOUT_SECS),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn bootstrap(&self) -> ClientResult<Cursor> {
        let response = self
            .http
            .get(self.start_url.clone())
            .timeout(Duration::from_secs(EXCHANGE_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|err| ClientError::Initialize(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Initialize(format!(
                "start endpoint returned {}",
                response.status()
            )));
        }

        let reply = response
            .json::<BootstrapReply>()
            .await
            .map_err(|err| ClientError::Initialize(err.to_string()))?;
        debug!(target: "tidepool.http", cursor = %reply.last_message_id, "bootstrap complete");
        Ok(reply.last_message_id)
    }

    async fn pull(&self, request: &PullRequest) -> ClientResult<PullReply> {
        let response = self
            .http
            .get(self.pull_url.clone())
            .query(&request.query_pairs())
            .timeout(self.pull_timeout)
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Transport(format!(
                "pull endpoint returned {}",
                response.status()
            )));
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|err| ClientError::Protocol(format!("undecodable pull body: {err}")))?;
        Ok(decode_pull_reply(&payload)?)
    }

    async fn push(&self, text: &str) -> ClientResult<()> {
        let body = PushRequest {
            message: text.to_string(),
        };
        let response = self
            .http
            .post(self.push_url.clone())
            .timeout(Duration::from_secs(EXCHANGE_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Transport(format!(
                "push endpoint returned {}",
                response.status()
            )));
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|err| ClientError::Protocol(format!("undecodable push body: {err}")))?;
        Ok(decode_push_receipt(&payload)?)
    }
}

// Normalize localhost to IPv4 to avoid IPv6 (::1) preference, and accept
// bare "host:port" addresses by assuming http.
fn normalize_base_url(raw: &str) -> String {
    let server = if raw.contains("localhost") {
        raw.replace("localhost", "127.0.0.1")
    } else {
        raw.to_string()
    };
    if server.starts_with("http://") || server.starts_with("https://") {
        server
    } else {
        format!("http://{server}")
    }
}

fn endpoint(base: &Url, path: &str) -> ClientResult<Url> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Config("endpoint path must not be empty".into()));
    }
    let normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    base.join(&normalized)
        .map_err(|err| ClientError::Config(format!("invalid endpoint path {path:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_bare_addresses() {
        assert_eq!(
            normalize_base_url("localhost:8080"),
            "http://127.0.0.1:8080"
        );
        assert_eq!(
            normalize_base_url("https://chat.example.com"),
            "https://chat.example.com"
        );
        assert_eq!(
            normalize_base_url("chat.example.com:9000"),
            "http://chat.example.com:9000"
        );
    }

    #[test]
    fn builds_endpoints_from_config_paths() {
        let transport = HttpTransport::new(&ChatConfig::new("localhost:8080")).expect("transport");
        assert_eq!(
            transport.start_url.as_str(),
            "http://127.0.0.1:8080/chat/start"
        );
        assert_eq!(
            transport.pull_url.as_str(),
            "http://127.0.0.1:8080/chat/pullsince"
        );
        assert_eq!(
            transport.push_url.as_str(),
            "http://127.0.0.1:8080/chat/push"
        );
    }

    #[test]
    fn accepts_paths_without_leading_slash() {
        let mut config = ChatConfig::new("example.com");
        config.push_path = "chat/push".into();
        let transport = HttpTransport::new(&config).expect("transport");
        assert_eq!(transport.push_url.as_str(), "http://example.com/chat/push");
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = HttpTransport::new(&ChatConfig::new("http://")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn rejects_empty_endpoint_path() {
        let mut config = ChatConfig::new("example.com");
        config.pull_path = "  ".into();
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
