//! HTTP server startup and lifecycle management.

use std::future::IntoFuture;
use std::io;
use std::time::{Duration, Instant};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::{ServerError, ServerResult, shutdown_signal};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the configured address and serves `app` until a shutdown signal.
///
/// After the signal, in-flight requests get the configured shutdown timeout
/// to finish before the server stops waiting for them.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the address cannot be
/// bound, or the server fails while running.
pub async fn serve_http(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    if let Err(validation_error) = server_config.validate() {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            error = %validation_error,
            "Invalid server configuration"
        );

        return Err(ServerError::InvalidConfig(validation_error.to_string()));
    }

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
        ServerError::bind_error(server_addr, err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server bound to all interfaces (0.0.0.0) - ensure firewall is configured"
        );
    }

    let start_time = Instant::now();
    let shutdown_timeout = server_config.shutdown_timeout();
    let (signalled_tx, signalled_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal(shutdown_timeout).await;
            let _ = signalled_tx.send(true);
        })
        .into_future();

    let result = tokio::select! {
        result = server => result,
        () = drain_deadline(signalled_rx, shutdown_timeout) => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                timeout_secs = shutdown_timeout.as_secs(),
                "Shutdown timeout elapsed with requests still in flight"
            );
            Ok(())
        }
    };

    handle_result(result, start_time)
}

/// Resolves `timeout` after the shutdown signal fired.
async fn drain_deadline(mut signalled: watch::Receiver<bool>, timeout: Duration) {
    if signalled.wait_for(|fired| *fired).await.is_err() {
        std::future::pending::<()>().await;
    }

    tokio::time::sleep(timeout).await;
}

fn handle_result(result: io::Result<()>, start_time: Instant) -> ServerResult<()> {
    let uptime = start_time.elapsed();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs = uptime.as_secs(),
                "Server shut down gracefully"
            );
            Ok(())
        }
        Err(err) => {
            let err = ServerError::Runtime(err);
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %err,
                code = err.error_code(),
                suggestion = err.suggestion(),
                uptime_secs = uptime.as_secs(),
                "Server encountered an error"
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_invalid_config_before_binding() {
        let config = ServerConfig {
            port: 80,
            ..ServerConfig::default()
        };

        let result = serve_http(Router::new(), config).await;
        assert!(matches!(result, Err(ServerError::InvalidConfig(_))));
    }

    #[test]
    fn runtime_error_is_reported() {
        let result = handle_result(Err(io::Error::other("boom")), Instant::now());
        assert!(matches!(result, Err(ServerError::Runtime(_))));
    }
}
