use std::path::PathBuf;

use gencomm_lib::bootstrap::{load_config_or_default, run_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional first argument: path to a TOML config file
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config_or_default(config_path)?;
    run_app(config).await
}
