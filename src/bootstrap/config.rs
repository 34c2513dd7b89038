//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read TOML configuration files / 读取 TOML 配置文件
//! - ✅ Parse TOML into CommissioningConfig DTO / 将 TOML 解析为 CommissioningConfig DTO
//! - ✅ Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No business rules / 禁止业务规则**
//!
//! Defaults and validation live in `gc_app::settings`.

use std::path::PathBuf;

use anyhow::Context;
use gc_core::CommissioningConfig;

const APP_DIR_NAME: &str = "gencomm";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// Pure data loading: missing sections become empty values, out-of-range
/// numbers are accepted as-is.
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<CommissioningConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    CommissioningConfig::from_toml(&toml_value)
}

/// `<config dir>/gencomm/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load an explicit config file, or the default one when it exists.
///
/// An explicit path must exist. A missing default file yields
/// [`CommissioningConfig::empty`].
pub fn load_config_or_default(
    explicit_path: Option<PathBuf>,
) -> anyhow::Result<CommissioningConfig> {
    if let Some(path) = explicit_path {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(path),
        _ => Ok(CommissioningConfig::empty()),
    }
}

/// Directory used when the config leaves `[storage] data_dir` empty.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .context("Failed to resolve local data directory")
}
