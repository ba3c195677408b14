//! HTTP binding of the Dockwarden control plane.
//!
//! Handlers translate requests into [`ControlPlane`](dockwarden_control::ControlPlane)
//! calls on tokio's blocking pool, since every engine call blocks until the
//! engine answers. Sessions travel as `Authorization: Bearer <token>`.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod auth;
pub mod body;
pub mod dto;
pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use dockwarden_control::ControlPlane;

pub use routes::router;

/// Serves the HTTP binding on `addr` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(
    plane: Arc<ControlPlane>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "control plane listening");
    axum::serve(listener, router(plane))
        .with_graceful_shutdown(shutdown)
        .await
}
