//! # Pure Data Module / 纯数据模块
//!
//! Configuration DTO for the commissioning server. TOML in, facts out.
//!
//! No validation and no default values live here: a missing key becomes an
//! empty string, `0` or `false`. Policy is applied by
//! `gc_app::settings::CommissioningSettings`.
//!
//! 此模块只包含数据结构定义，禁止业务逻辑、验证逻辑与默认值计算。

use std::path::PathBuf;

/// Commissioning configuration DTO (pure data, no logic)
/// 配网配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissioningConfig {
    /// Directory holding persisted state (empty = caller decides)
    pub data_dir: PathBuf,

    /// `[fail_safe] expiry_length_seconds`
    pub fail_safe_expiry_length_seconds: u16,

    /// `[fail_safe] max_cumulative_seconds`
    pub max_cumulative_failsafe_seconds: u16,

    /// `[device] location_capability`: "indoor", "outdoor", "indoor_outdoor"
    /// or empty. Unknown strings are kept as-is.
    pub location_capability: String,

    pub supports_concurrent_connection: bool,

    pub terms_and_conditions_enabled: bool,
    pub required_acknowledgements: u16,
    pub required_version: u16,

    /// `[terms_and_conditions] provider`: "transactional", "durable" or empty.
    pub terms_and_conditions_provider: String,

    /// `[commissioning_window] open`
    pub commissioning_window_open: bool,
}

fn section<'a>(toml_value: &'a toml::Value, table: &str, key: &str) -> Option<&'a toml::Value> {
    toml_value.get(table).and_then(|t| t.get(key))
}

fn integer(toml_value: &toml::Value, table: &str, key: &str) -> i64 {
    section(toml_value, table, key)
        .and_then(|v| v.as_integer())
        .unwrap_or(0)
}

fn string(toml_value: &toml::Value, table: &str, key: &str) -> String {
    section(toml_value, table, key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn boolean(toml_value: &toml::Value, table: &str, key: &str) -> bool {
    section(toml_value, table, key)
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

impl CommissioningConfig {
    /// Create CommissioningConfig from TOML value
    /// 从 TOML 值创建 CommissioningConfig
    ///
    /// Integers are narrowed without range checks; the truncated value is the
    /// fact handed to the policy layer.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            data_dir: PathBuf::from(string(toml_value, "storage", "data_dir")),
            fail_safe_expiry_length_seconds: integer(toml_value, "fail_safe", "expiry_length_seconds")
                as u16,
            max_cumulative_failsafe_seconds: integer(toml_value, "fail_safe", "max_cumulative_seconds")
                as u16,
            location_capability: string(toml_value, "device", "location_capability"),
            supports_concurrent_connection: boolean(
                toml_value,
                "device",
                "supports_concurrent_connection",
            ),
            terms_and_conditions_enabled: boolean(toml_value, "terms_and_conditions", "enabled"),
            required_acknowledgements: integer(
                toml_value,
                "terms_and_conditions",
                "required_acknowledgements",
            ) as u16,
            required_version: integer(toml_value, "terms_and_conditions", "required_version") as u16,
            terms_and_conditions_provider: string(toml_value, "terms_and_conditions", "provider"),
            commissioning_window_open: boolean(toml_value, "commissioning_window", "open"),
        })
    }

    /// Create empty CommissioningConfig (all empty/default values)
    /// 创建空的 CommissioningConfig
    pub fn empty() -> Self {
        Self {
            data_dir: PathBuf::new(),
            fail_safe_expiry_length_seconds: 0,
            max_cumulative_failsafe_seconds: 0,
            location_capability: String::new(),
            supports_concurrent_connection: false,
            terms_and_conditions_enabled: false,
            required_acknowledgements: 0,
            required_version: 0,
            terms_and_conditions_provider: String::new(),
            commissioning_window_open: false,
        }
    }

    /// Same as [`CommissioningConfig::empty`] with `data_dir` set.
    ///
    /// The base directory is computed by the caller (e.g. with the `dirs` crate).
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Self::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    #[test]
    fn test_from_toml_reads_every_section() {
        let toml_str = r#"
            [storage]
            data_dir = "/var/lib/gencomm"

            [fail_safe]
            expiry_length_seconds = 120
            max_cumulative_seconds = 600

            [device]
            location_capability = "indoor_outdoor"
            supports_concurrent_connection = true

            [terms_and_conditions]
            enabled = true
            required_acknowledgements = 3
            required_version = 2
            provider = "durable"

            [commissioning_window]
            open = true
        "#;
        let toml_value: Value = toml::from_str(toml_str).unwrap();

        let config = CommissioningConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/gencomm"));
        assert_eq!(config.fail_safe_expiry_length_seconds, 120);
        assert_eq!(config.max_cumulative_failsafe_seconds, 600);
        assert_eq!(config.location_capability, "indoor_outdoor");
        assert!(config.supports_concurrent_connection);
        assert!(config.terms_and_conditions_enabled);
        assert_eq!(config.required_acknowledgements, 3);
        assert_eq!(config.required_version, 2);
        assert_eq!(config.terms_and_conditions_provider, "durable");
        assert!(config.commissioning_window_open);
    }

    #[test]
    fn test_from_toml_missing_values_are_empty_facts() {
        let toml_value: Value = toml::from_str("[fail_safe]\n").unwrap();

        let config = CommissioningConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config, CommissioningConfig::empty());
    }

    #[test]
    fn test_from_toml_does_not_validate_ranges() {
        let toml_str = r#"
            [terms_and_conditions]
            required_version = 70000
        "#;
        let toml_value: Value = toml::from_str(toml_str).unwrap();

        let config = CommissioningConfig::from_toml(&toml_value).unwrap();

        // 70000 as u16 = 4464
        assert_eq!(config.required_version, 4464);
    }
}
