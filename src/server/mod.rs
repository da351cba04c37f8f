//! HTTP server.
//!
//! Wires the API routes to shared state, wraps them in the request
//! middleware stack and runs them on a listener until cancelled.

pub mod api;

use crate::db::pool::DbPool;
use crate::error::AppError;
use api::ApiErr;
use axum::error_handling::HandleErrorLayer;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Router};
use std::any::Any;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower_http::catch_panic::CatchPanicLayer;

/// Shared state for the axum routes.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Build the application router.
///
/// Requests that take longer than `request_timeout` are abandoned with a
/// TIMEOUT error; any open transaction is dropped and rolled back with them.
pub fn router(db: DbPool, request_timeout: Duration) -> Router {
    api::api_routes().with_state(AppState { db }).layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(middleware::from_fn(log_requests))
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(request_timeout)),
    )
}

/// Serve `app` on `listener` until `cancel` fires.
///
/// In-flight requests get `shutdown_timeout` to finish after cancellation;
/// whatever is still running then is aborted.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    cancel: CancellationToken,
    shutdown_timeout: Duration,
) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("Server listening on http://{}", addr);
    }

    let cancel_clone = cancel.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        cancel_clone.cancelled().await;
    });
    let mut task = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut task => {
            result??;
            return Ok(());
        }
        _ = cancel.cancelled() => {}
    }

    log::info!("Shutting down, draining connections for up to {:?}", shutdown_timeout);

    match tokio::time::timeout(shutdown_timeout, &mut task).await {
        Ok(result) => result??,
        Err(_) => {
            log::warn!("Shutdown timeout elapsed, aborting open connections");
            task.abort();
        }
    }

    log::info!("Server stopped");
    Ok(())
}

/// Log method, path, status and latency of every request.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} {} {}ms",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// Render errors raised by the timeout layer.
async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<Elapsed>() {
        ApiErr(AppError::Timeout).into_response()
    } else {
        ApiErr(AppError::internal(format!("middleware error: {}", err))).into_response()
    }
}

/// Render a handler panic as an internal error.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiErr(AppError::internal(format!("handler panicked: {}", detail))).into_response()
}
