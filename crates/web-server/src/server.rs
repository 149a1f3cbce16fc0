//! The accept loop: one task per connection, with the connection-level
//! timeouts that `axum::serve` has no knobs for.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::conn::auto::Builder,
    service::TowerToHyperService,
};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::watch,
    task::JoinSet,
};
use tower::ServiceExt;

/// How long a client may take to send the request head.
pub const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(10);
/// How long a connection may sit without a request before it is closed.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-connection limits enforced by [`serve`].
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    pub header_read: Duration,
    pub idle: Duration,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self { header_read: HEADER_READ_TIMEOUT, idle: IDLE_TIMEOUT }
    }
}

/// Serves `app` on `listener` until `shutdown` resolves, then waits for open
/// connections to finish their in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Router, limits: ConnectionLimits, shutdown: F)
where
    F: Future<Output = ()>,
{
    let (close_tx, close_rx) = watch::channel(false);
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tracing::trace!(%peer, "Accepted connection.");
                    connections.spawn(serve_connection(stream, app.clone(), limits, close_rx.clone()));
                }
                Err(e) => tracing::warn!("Failed to accept connection: {}", e),
            },
            // Reap finished connections so the set does not grow unbounded.
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            () = &mut shutdown => break,
        }
    }

    drop(listener);
    // Receivers only fail to see this if their connection already ended.
    let _ = close_tx.send(true);
    tracing::info!(open = connections.len(), "Draining open connections.");
    while connections.join_next().await.is_some() {}
}

async fn serve_connection(
    stream: TcpStream,
    app: Router,
    limits: ConnectionLimits,
    mut close: watch::Receiver<bool>,
) {
    // Bumped when a request starts and again when its response is ready.
    let (activity_tx, mut activity) = watch::channel(());
    let activity_tx = Arc::new(activity_tx);
    let service = tower::service_fn(move |request: Request<Incoming>| {
        let app = app.clone();
        let activity = activity_tx.clone();
        async move {
            activity.send_replace(());
            let response = app.oneshot(request).await;
            activity.send_replace(());
            response
        }
    });

    let mut builder = Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(limits.header_read)
        .keep_alive(true);

    let conn = builder.serve_connection_with_upgrades(
        TokioIo::new(stream),
        TowerToHyperService::new(service),
    );
    tokio::pin!(conn);

    let mut closing = false;
    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!("Connection ended with error: {}", e);
                }
                return;
            }
            idle = tokio::time::timeout(limits.idle, activity.changed()), if !closing => {
                // `Ok(Err(_))` means the service is gone; the connection is finishing anyway.
                if !matches!(idle, Ok(Ok(()))) {
                    tracing::debug!("Closing idle connection.");
                    conn.as_mut().graceful_shutdown();
                    closing = true;
                }
            }
            _ = close.changed(), if !closing => {
                conn.as_mut().graceful_shutdown();
                closing = true;
            }
        }
    }
}

/// Waits for CTRL+C or, on unix, SIGTERM.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received CTRL+C, starting graceful shutdown."),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown."),
    }
}
