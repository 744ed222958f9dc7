use clap::Parser;
use feedboard::{config, create_app_with_origins, logging, setup_database};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let args = config::CliArgs::parse();
    let debug = args.debug;
    let config = config::get_config(args);

    let _guard = logging::init_logging(config.log_format, config.log_dir.as_deref(), debug)
        .map_err(|err| anyhow::anyhow!("failed to initialize logging: {}", err))?;

    // Initialize the database pool and bring the schema up to date
    let pool = Arc::new(setup_database(&config.database_url)?);

    let app = create_app_with_origins(pool, &config.cors_origins);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
