// Framework bootstrap for the game server runtime.

use crate::frameworks::config;
use crate::interface_adapters::net::{list_rooms_handler, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{RoomRegistry, RoomSettings};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/rooms", get(list_rooms_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::new(config::bind_host(), config::http_port());

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Arc<AppState> {
    // Rooms are created on demand by clients; the server starts with none.
    let room_registry = Arc::new(RoomRegistry::new(RoomSettings {
        tick_interval: config::TICK_INTERVAL,
        id_attempts: config::ROOM_ID_ATTEMPTS,
    }));
    tracing::debug!(
        tick_interval_ms = config::TICK_INTERVAL.as_millis(),
        "room registry configured"
    );

    Arc::new(AppState {
        room_registry,
        outbound_capacity: config::OUTBOUND_CHANNEL_CAPACITY,
    })
}
