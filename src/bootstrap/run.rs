use std::path::PathBuf;

use anyhow::Context;
use gc_app::settings::CommissioningSettings;
use gc_core::CommissioningConfig;
use tokio::io::BufReader;
use tracing::{info, warn};

use super::config::default_data_dir;
use super::tracing::init_tracing_subscriber;
use super::wiring::wire_commissioning;
use crate::dispatch::CommandDispatcher;

const LOG_DIR_NAME: &str = "logs";

/// Run the commissioning node: stdin commands in, stdout responses out.
///
/// Returns when stdin reaches EOF or on Ctrl-C.
pub async fn run_app(mut config: CommissioningConfig) -> anyhow::Result<()> {
    if config.data_dir.as_os_str().is_empty() {
        config.data_dir = default_data_dir()?;
    }
    let log_dir: PathBuf = config.data_dir.join(LOG_DIR_NAME);
    init_tracing_subscriber(Some(&log_dir))?;

    let settings =
        CommissioningSettings::from_config(&config).context("Invalid commissioning settings")?;
    let runtime = wire_commissioning(&settings).await?;
    let dispatcher = CommandDispatcher::new(runtime);

    info!(
        terms_and_conditions = settings.terms_and_conditions.is_some(),
        "commissioning node ready"
    );

    tokio::select! {
        result = dispatcher.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout()) => {
            result.context("Command stream failed")?;
            info!("command stream closed");
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(err) = signal {
                warn!(error = %err, "failed to listen for shutdown signal");
            }
            info!("shutdown requested");
        }
    }

    Ok(())
}
