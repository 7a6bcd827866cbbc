/// This module holds the webserver specific details,
/// in our case all the axum related code.
mod error;
pub mod routes;

pub use self::error::Error;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, routing::Router, BoxError, Json};
use common::err_context::ErrorContextExt;
use serde_json::Value;
use std::future::Future;
use std::net::TcpListener;
use std::pin::Pin;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::domain::SubscriptionService;

#[derive(Clone)]
pub struct AppState {
    pub service: SubscriptionService,
}

pub type AppServer = Pin<Box<dyn Future<Output = Result<(), hyper::Error>> + Send>>;

/// Builds the router with all the routes and middlewares.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(routes::routes(state))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(request_timeout),
        )
}

/// Serves the router on the listener until a shutdown signal is received.
pub fn new(
    listener: TcpListener,
    state: AppState,
    request_timeout: Duration,
) -> Result<AppServer, Error> {
    let app = router(state, request_timeout);

    let server = axum::Server::from_tcp(listener)
        .context("Could not create server from listener")?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal());

    Ok(Box::pin(server))
}

/// Completes on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Could not install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Could not install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(serde_json::json!({
                "status": "fail",
                "message": "Request timed out",
                "code": "request/timeout"
            })),
        )
    } else {
        tracing::error!("Unhandled internal error: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "status": "fail",
                "message": "Internal server error",
                "code": "internal_error"
            })),
        )
    }
}
