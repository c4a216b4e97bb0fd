use anyhow::{Context, Result};

use skrytki_core::schema::{Database, Pool};
use skrytki_etl::Config;
use skrytki_search::LookupService;
use skrytki_web::{router, AppState};

pub async fn run_serve(config: &Config, bind: Option<String>) -> Result<()> {
    let addr = bind.unwrap_or_else(|| config.bind_address.clone());

    // Create the schema so an unloaded database answers with empty results.
    // If the database cannot be opened the server still starts and reports
    // 503 until it can.
    match Database::open(&config.database_path) {
        Ok(db) => match db.last_load() {
            Ok(Some(run)) => tracing::info!(
                "Serving {} entities from load {} ({})",
                run.entities,
                run.run_id,
                run.loaded_at
            ),
            Ok(None) => tracing::warn!("No data loaded yet; run `skrytki load` first"),
            Err(e) => tracing::warn!("Could not read load history: {e}"),
        },
        Err(e) => tracing::error!(
            "Database {} is not available: {e}",
            config.database_path.display()
        ),
    }

    let pool = Pool::new(&config.database_path, config.pool_size);
    let service = LookupService::new(pool.clone(), config.request_timeout());
    let app = router(AppState::new(service).with_default_limit(config.default_limit));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
    }
}
