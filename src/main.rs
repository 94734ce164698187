use todoer::commands::Cli;
use todoer::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber when debug output was requested.
///
/// Without `TODOER_DEBUG` or `RUST_LOG` the message macros print straight to
/// the terminal and no subscriber is needed.
fn init_tracing() {
    if !is_debug_mode() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("todoer=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    Cli::menu().await
}
