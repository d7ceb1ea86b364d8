use std::net::SocketAddr;

use axum::{routing::get, Router};

use crate::repository::RunRepository;

mod handlers;
mod models;

use handlers::{create_run, delete_run, get_run, health, list_runs, not_found, update_run};

#[derive(Clone)]
pub struct AppState<R: RunRepository> {
    pub repo: R,
    pub started_at: std::time::SystemTime,
}

pub fn router<R: RunRepository + Clone + Send + Sync + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route("/health", get(health::<R>))
        .route("/api/runs", get(list_runs::<R>).post(create_run::<R>))
        .route(
            "/api/runs/:id",
            get(get_run::<R>)
                .put(update_run::<R>)
                .delete(delete_run::<R>),
        )
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<R: RunRepository + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    repo: R,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST service on http://{}", addr);

    let state = AppState {
        repo,
        started_at: std::time::SystemTime::now(),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
