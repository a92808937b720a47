use std::sync::Arc;

use cardroom::{
    room::start_cleanup_task, serve, AppState, CommandDispatcher, RoomRegistry, ServerConfig,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardroom=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    info!(?config, "Starting card room server");

    let registry = Arc::new(RoomRegistry::new(config.max_deal_attempts));
    let dispatcher = Arc::new(CommandDispatcher::with_pending_rules(registry.clone()));
    let app_state = AppState::new(registry.clone(), dispatcher);

    if let Some(cleanup) = config.cleanup.clone() {
        tokio::spawn(start_cleanup_task(registry, cleanup));
    }

    let listener = TcpListener::bind(&config.bind_addr).await?;
    serve(listener, app_state).await
}
