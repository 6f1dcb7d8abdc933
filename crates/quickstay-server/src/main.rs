//! QuickStay Server - Main entry point

use anyhow::Result;
use quickstay_common::logging::{init_logging, LogConfig};
use tracing::info;

use quickstay_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be read before the logging variables are
    dotenvy::dotenv().ok();

    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("quickstay-server")
        .filter_directives("quickstay_server=debug,tower_http=debug,sqlx=info")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    info!("Starting QuickStay Server");

    let config = Config::load()?;
    info!(
        environment = ?config.server.environment,
        backend = ?config.server.backend,
        "Configuration loaded - server will bind to {}:{}",
        config.server.host,
        config.server.port
    );

    api::serve(config).await
}
