use anyhow::{Context, Result};
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

use crate::calculator;

/// Serves the calculator API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("listener has no local address")?;
    info!(%addr, "calc-api listening");

    axum::serve(listener, calculator::router())
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("calc-api stopped");
    Ok(())
}
