use std::sync::Arc;

use anyhow::anyhow;
use tracing::info;

use voice_tasks_rs::api::TaskServer;
use voice_tasks_rs::config::AppConfig;
use voice_tasks_rs::helpers::{build_app_state, init_tracing};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config);
    info!(version = env!("CARGO_PKG_VERSION"), "voice-tasks starting");

    // Built before the runtime and dropped after it (blocking HTTP clients inside).
    let state = Arc::new(build_app_state(&config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let server = TaskServer::new(config.port, state.clone());
    let result = runtime.block_on(server.start());
    drop(server);
    drop(runtime);

    result.map_err(|err| anyhow!("server error: {}", err))
}
