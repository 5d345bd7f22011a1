//! HTTP host for the payment API: listener, request timeout and graceful
//! shutdown on `SIGINT`/`SIGTERM`.

use axum::Router;
use axum::http::StatusCode;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServeConfig;
use crate::error::AppError;
use crate::http;

/// Build the router with its middleware stack.
pub fn router(config: &ServeConfig) -> Router {
    let store = Arc::new(config.store.build());
    with_middleware(http::app(store), config.request_timeout())
}

/// Wrap `app` with request tracing and a per-request timeout answered with
/// `408 Request Timeout`.
fn with_middleware(app: Router, request_timeout: Duration) -> Router {
    app.layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}

/// Bind the configured address and serve until a shutdown signal arrives.
pub async fn serve(config: ServeConfig) -> Result<(), AppError> {
    let listener = TcpListener::bind(config.addr).await?;
    info!(
        addr = %listener.local_addr()?,
        shards = config.store.shards,
        "payment service listening"
    );

    run_until(
        listener,
        router(&config),
        shutdown_signal(),
        config.shutdown_timeout(),
    )
    .await
}

/// Serve `router` on `listener` until `signal` resolves, then stop accepting
/// connections and give in-flight requests `grace` to finish.
pub async fn run_until(
    listener: TcpListener,
    router: Router,
    signal: impl Future<Output = ()>,
    grace: Duration,
) -> Result<(), AppError> {
    let (stop, stopped) = oneshot::channel::<()>();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = stopped.await;
    });
    let mut handle = tokio::spawn(server.into_future());

    tokio::select! {
        joined = &mut handle => {
            // server exited without being asked to
            joined??;
            return Ok(());
        }
        () = signal => {}
    }

    info!("shutting down gracefully");
    let _ = stop.send(());

    match tokio::time::timeout(grace, &mut handle).await {
        Ok(joined) => joined??,
        Err(_) => {
            warn!(grace_secs = grace.as_secs(), "forcing shutdown");
            handle.abort();
        }
    }

    info!("payment service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(reason = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(reason = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
