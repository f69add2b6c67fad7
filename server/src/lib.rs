//! HTTP transport for the todo resource.
//!
//! Routes `/todos` and `/todos/{id}` onto `TodoResource` and maps its
//! errors to status codes: validation failures are 400, unknown or malformed
//! ids are 404, store failures are 500.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use todo_core::TodoResource;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;

pub fn app(resource: TodoResource) -> Router {
    routes::router(resource).layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener, resource: TodoResource) -> Result<(), std::io::Error> {
    axum::serve(listener, app(resource)).await
}

/// Serve until `shutdown` completes, then drain in-flight requests.
pub async fn run_until<F>(
    listener: TcpListener,
    resource: TodoResource,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(resource))
        .with_graceful_shutdown(shutdown)
        .await
}
