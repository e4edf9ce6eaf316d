use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{handle_create_task, handle_health, handle_list_tasks, handle_update_status};
use crate::extract::TaskExtractor;
use crate::notify::Notifier;
use crate::task::TaskStore;

/// Shared collaborators handed to every request.
pub struct AppState {
    pub store: Arc<TaskStore>,
    pub extractor: Arc<TaskExtractor>,
    pub notifier: Arc<dyn Notifier>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // The browser front-end is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/tasks", get(handle_list_tasks).post(handle_create_task))
        .route("/api/tasks/:id", put(handle_update_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct TaskServer {
    pub port: u16,
    pub state: Arc<AppState>,
}

impl TaskServer {
    pub fn new(port: u16, state: Arc<AppState>) -> Self {
        Self { port, state }
    }

    pub async fn start(&self) -> Result<(), String> {
        let app = build_router(self.state.clone());
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(%addr, "voice-tasks listening");
        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await
            .map_err(|err| err.to_string())
    }
}
