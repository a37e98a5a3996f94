pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use std::error::Error;
use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::bootstrap::build_catalog;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{add_log, start_server, HttpState, LogEntry};

pub async fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));

    let catalog = Arc::new(build_catalog(&config, &logs)?);

    let state = HttpState::new(catalog, &config, logs.clone());
    let server = start_server(state, &config).map_err(|err| {
        error!(error = %err, host = %config.host, port = config.port, "Failed to bind HTTP server");
        err
    })?;

    info!(
        "{} v{} listening on http://{}:{}",
        config.app_name, config.app_version, config.host, config.port
    );
    add_log(
        &logs,
        "INFO",
        "HttpApi",
        &format!("Listening on http://{}:{}", config.host, config.port),
    );

    server.await?;
    Ok(())
}
