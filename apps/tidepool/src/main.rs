use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tracing::warn;

use tidepool_client::{
    ChatConfig, ChatSession, ClientError, DisplaySink, HttpTransport, PollEngine, SubmitClient,
};

#[derive(Parser, Debug)]
#[command(name = "tidepool", about = "Follow and post to a tidepool chat channel")]
struct Cli {
    #[arg(long, env = "TIDEPOOL_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    #[arg(long, env = "TIDEPOOL_TOPIC", default_value = "test")]
    topic: String,

    #[arg(long, default_value_t = 5, help = "Server-side wait budget per pull, in seconds")]
    wait: u64,

    #[arg(long, help = "Delay after a failed pull cycle, in milliseconds (default: retry immediately)")]
    failure_backoff_ms: Option<u64>,
}

/// Messages go to stdout in arrival order; errors go to stderr so a piped
/// transcript stays clean.
struct TerminalSink;

impl DisplaySink for TerminalSink {
    fn render_message(&self, text: &str) {
        println!("{text}");
    }

    fn render_error(&self, text: &str) {
        eprintln!("!! {text}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to WARN level if RUST_LOG is not set
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ChatConfig::new(cli.server);
    config.topic = cli.topic;
    config.poll_wait_secs = cli.wait;
    config.failure_backoff = cli.failure_backoff_ms.map(Duration::from_millis);

    let transport = Arc::new(HttpTransport::new(&config)?);
    let sink: Arc<dyn DisplaySink> = Arc::new(TerminalSink);

    // One-shot cursor handshake; there is no recovery path if it fails.
    let session = match ChatSession::bootstrap(transport.as_ref()).await {
        Ok(session) => session,
        Err(err) => {
            sink.render_error(&format!("cannot start chat session: {err}"));
            std::process::exit(1);
        }
    };

    let mut poller = PollEngine::new(transport.clone(), session, sink.clone(), &config).spawn();
    let submitter = SubmitClient::new(transport, sink);

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        tokio::select! {
            _ = &mut poller => {
                warn!("poll loop exited unexpectedly");
                break;
            }
            line = lines.next_line() => match line? {
                Some(text) => match submitter.submit(&text).await {
                    // Enter already consumed the input line; nothing to clear.
                    Ok(()) => {}
                    // Blank lines are not messages.
                    Err(ClientError::EmptyMessage) => {}
                    // Rendered to the sink; the user can resend the text.
                    Err(_) => {}
                },
                None => break,
            },
        }
    }

    poller.abort();
    Ok(())
}
