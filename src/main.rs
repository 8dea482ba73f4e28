use cuescore::{
    build_router, AppState, InMemoryPlayerRoster, InMemorySnapshotStore, InMemoryStatsRepository,
    MatchService, ServerConfig, StatsService,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cuescore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    info!(?config, "Starting cue-sports scoring server");

    // In-memory collaborators; swap these for durable ones in a deployment
    let roster = Arc::new(InMemoryPlayerRoster::new());
    let stats_service = Arc::new(
        StatsService::new(Arc::new(InMemoryStatsRepository::new()))
            .with_recent_games(config.recent_games),
    );
    let snapshots = Arc::new(InMemorySnapshotStore::new());
    let match_service = Arc::new(MatchService::new(
        roster.clone(),
        stats_service.clone(),
        snapshots,
    ));

    if let Err(err) = match_service.recover().await {
        warn!(error = %err, "Starting without recovered state");
    }

    let app_state = AppState::new(roster, match_service, stats_service);
    let app = build_router(app_state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await
}
