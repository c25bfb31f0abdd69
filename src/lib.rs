//! Pocket Ledger is a REST API backend for a personal finance app.
//!
//! It manages user accounts, income/expense categories (built-in and
//! per-user, with drag-and-drop display ordering) and transactions, and
//! serves aggregate statistics over a user's ledger. Clients authenticate
//! with JWT bearer tokens and every response is wrapped in a uniform
//! `{code, msg, data}` envelope.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

pub mod auth;
pub mod db;
mod error;
mod logging;
pub mod models;
mod money;
pub mod pagination;
pub mod response;
mod routes;
mod state;
pub mod stores;

pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routes::{build_router, endpoints};
pub use state::AppState;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
