use tracing_subscriber::EnvFilter;

use clinic_api::api::server::start_server;
use clinic_api::api::types::ApiContext;
use clinic_api::config::{Config, APP_NAME, APP_VERSION};
use clinic_api::db::open_database;
use clinic_api::uploads::ImageStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    tracing::info!(
        name = APP_NAME,
        version = APP_VERSION,
        data_dir = %config.data_dir.display(),
        "Starting"
    );

    std::fs::create_dir_all(&config.data_dir)?;

    // Open once at startup so migrations run before the first request.
    let db_path = config.db_path();
    open_database(&db_path)?;

    let images = ImageStore::new(config.uploads_dir());
    images.ensure_dirs()?;

    let ctx = ApiContext::new(db_path, images);
    let mut server = start_server(ctx, config.bind_addr).await?;
    tracing::info!(addr = %server.local_addr, "Listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    server.shutdown();

    Ok(())
}
