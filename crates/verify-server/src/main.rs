use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use verify_server::{init_tracing, router, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let addr = args.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "verify-server listening");

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;

    info!("verify-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to install SIGINT handler");
        std::future::pending::<()>().await;
    }
    info!("received SIGINT");
}
