use std::sync::Arc;
use std::time::Duration;

use typeracing::routes;
use typeracing::state::AppState;
use typeracing::store::memory::{MemoryStore, spawn_sweep_task};
use typeracing::store::redis::RedisStore;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let state = match std::env::var("REDIS_URL") {
        Ok(url) => {
            let store = RedisStore::connect(&url)
                .await
                .expect("failed to connect to redis");
            tracing::info!("room store: redis");
            AppState::new(Arc::new(store))
        }
        Err(_) => {
            let store = MemoryStore::new();
            let sweep_secs = env_parse("ROOM_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS);
            // The sweep task lives as long as the process; the handle is not
            // joined.
            let _sweep = spawn_sweep_task(store.clone(), Duration::from_secs(sweep_secs));
            tracing::info!("room store: in-memory (REDIS_URL not set)");
            AppState::new(Arc::new(store))
        }
    };

    let port: u16 = env_parse("PORT", DEFAULT_PORT);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("failed to bind listener");
    tracing::info!(port, "typeracing server listening");
    axum::serve(listener, app).await.expect("server error");
}
