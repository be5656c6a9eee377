use pizza_restaurant_service::{establish_pool, router, run_migrations, AppState, Config};
use tokio::net::TcpListener;
use tracing::info;

pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let pool = establish_pool(&config)?;
    run_migrations(&pool)?;
    info!("Using database {}", config.database_url);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    let app = router(AppState::new(pool));
    info!("Pizza restaurant service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Pizza restaurant service stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {e}"),
    }
}
