//! JSON REST layer over the same services the CLI uses.

pub mod auth;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use axum::{
    Json, Router,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub use state::AppState;

use routes::{employees, projects, tasks, timesheet, workstreams};

/// Build the application router. Also used by the HTTP tests.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(auth::EMPLOYEE_HEADER)])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .route("/employees", get(employees::list).post(employees::create))
        .route(
            "/employees/{id}",
            get(employees::show)
                .put(employees::update)
                .delete(employees::remove),
        )
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{id}",
            get(projects::show)
                .put(projects::update)
                .delete(projects::remove),
        )
        .route(
            "/workstreams",
            get(workstreams::list).post(workstreams::create),
        )
        .route(
            "/workstreams/{id}",
            get(workstreams::show)
                .put(workstreams::update)
                .delete(workstreams::remove),
        )
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/tasks/{id}",
            get(tasks::show).put(tasks::update).delete(tasks::remove),
        )
        .route("/timesheet/week", get(timesheet::week))
        .route("/timesheet/day", get(timesheet::day))
        .route("/timesheet/submit", post(timesheet::submit))
        .route("/timesheet/reopen", post(timesheet::reopen))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// Install the `RUST_LOG`-driven subscriber. Safe to call more than once.
pub fn init_tracing() {
    // A subscriber may already be installed (tests, embedding).
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

/// Run the server until Ctrl+C / SIGTERM.
pub async fn start_server(cfg: Config, bind: &str, port: u16) -> AppResult<()> {
    init_tracing();

    info!("Opening database {}", cfg.database);
    let pool = DbPool::open(&cfg.database)?;
    let state = AppState::new(pool, cfg);

    let address = format!("{bind}:{port}");
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
}
