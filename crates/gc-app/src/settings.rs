//! Policy layer over [`CommissioningConfig`]: defaults and validation.

use std::path::PathBuf;
use std::time::Duration;

use gc_core::commissioning::{BasicCommissioningInfo, RegulatoryLocationType};
use gc_core::{CommissioningConfig, TermsAndConditions};
use thiserror::Error;

pub const DEFAULT_FAIL_SAFE_EXPIRY_LENGTH_SECONDS: u16 = 60;
pub const DEFAULT_MAX_CUMULATIVE_FAILSAFE_SECONDS: u16 = 900;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown location capability '{0}'")]
    UnknownLocationCapability(String),

    #[error("unknown terms and conditions provider '{0}'")]
    UnknownTermsProvider(String),

    #[error("max cumulative fail-safe ({max_cumulative}s) is shorter than the expiry length ({expiry_length}s)")]
    MaxCumulativeBelowExpiryLength { expiry_length: u16, max_cumulative: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermsProviderKind {
    /// Acceptance is held per session and committed on completion.
    Transactional,
    /// Acceptance is persisted as soon as it is recorded.
    Durable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermsSettings {
    pub requirements: TermsAndConditions,
    pub provider: TermsProviderKind,
}

/// Validated runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissioningSettings {
    pub data_dir: PathBuf,
    pub fail_safe_expiry_length_seconds: u16,
    pub max_cumulative_failsafe_seconds: u16,
    pub location_capability: RegulatoryLocationType,
    pub supports_concurrent_connection: bool,
    /// `None` when terms and conditions are disabled.
    pub terms_and_conditions: Option<TermsSettings>,
    pub commissioning_window_open: bool,
}

fn or_default(value: u16, default: u16) -> u16 {
    if value == 0 {
        default
    } else {
        value
    }
}

fn parse_location_capability(raw: &str) -> Result<RegulatoryLocationType, SettingsError> {
    match raw {
        "" | "indoor_outdoor" => Ok(RegulatoryLocationType::IndoorOutdoor),
        "indoor" => Ok(RegulatoryLocationType::Indoor),
        "outdoor" => Ok(RegulatoryLocationType::Outdoor),
        other => Err(SettingsError::UnknownLocationCapability(other.to_string())),
    }
}

fn parse_provider(raw: &str) -> Result<TermsProviderKind, SettingsError> {
    match raw {
        "" | "transactional" => Ok(TermsProviderKind::Transactional),
        "durable" => Ok(TermsProviderKind::Durable),
        other => Err(SettingsError::UnknownTermsProvider(other.to_string())),
    }
}

impl CommissioningSettings {
    pub fn from_config(config: &CommissioningConfig) -> Result<Self, SettingsError> {
        let expiry_length = or_default(
            config.fail_safe_expiry_length_seconds,
            DEFAULT_FAIL_SAFE_EXPIRY_LENGTH_SECONDS,
        );
        let max_cumulative = or_default(
            config.max_cumulative_failsafe_seconds,
            DEFAULT_MAX_CUMULATIVE_FAILSAFE_SECONDS,
        );
        if max_cumulative < expiry_length {
            return Err(SettingsError::MaxCumulativeBelowExpiryLength {
                expiry_length,
                max_cumulative,
            });
        }

        let terms_and_conditions = if config.terms_and_conditions_enabled {
            Some(TermsSettings {
                requirements: TermsAndConditions::new(
                    config.required_acknowledgements,
                    config.required_version,
                ),
                provider: parse_provider(&config.terms_and_conditions_provider)?,
            })
        } else {
            None
        };

        Ok(Self {
            data_dir: config.data_dir.clone(),
            fail_safe_expiry_length_seconds: expiry_length,
            max_cumulative_failsafe_seconds: max_cumulative,
            location_capability: parse_location_capability(&config.location_capability)?,
            supports_concurrent_connection: config.supports_concurrent_connection,
            terms_and_conditions,
            commissioning_window_open: config.commissioning_window_open,
        })
    }

    pub fn max_cumulative_failsafe(&self) -> Duration {
        Duration::from_secs(u64::from(self.max_cumulative_failsafe_seconds))
    }

    pub fn basic_commissioning_info(&self) -> BasicCommissioningInfo {
        BasicCommissioningInfo {
            fail_safe_expiry_length_seconds: self.fail_safe_expiry_length_seconds,
            max_cumulative_failsafe_seconds: self.max_cumulative_failsafe_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gets_defaults() {
        let settings = CommissioningSettings::from_config(&CommissioningConfig::empty()).unwrap();

        assert_eq!(settings.fail_safe_expiry_length_seconds, 60);
        assert_eq!(settings.max_cumulative_failsafe_seconds, 900);
        assert_eq!(settings.location_capability, RegulatoryLocationType::IndoorOutdoor);
        assert_eq!(settings.terms_and_conditions, None);
    }

    #[test]
    fn enabled_terms_default_to_transactional_provider() {
        let config = CommissioningConfig {
            terms_and_conditions_enabled: true,
            required_acknowledgements: 1,
            required_version: 1,
            ..CommissioningConfig::empty()
        };

        let settings = CommissioningSettings::from_config(&config).unwrap();

        assert_eq!(
            settings.terms_and_conditions,
            Some(TermsSettings {
                requirements: TermsAndConditions::new(1, 1),
                provider: TermsProviderKind::Transactional,
            })
        );
    }

    #[test]
    fn max_cumulative_below_expiry_is_rejected() {
        let config = CommissioningConfig {
            fail_safe_expiry_length_seconds: 120,
            max_cumulative_failsafe_seconds: 60,
            ..CommissioningConfig::empty()
        };

        assert_eq!(
            CommissioningSettings::from_config(&config),
            Err(SettingsError::MaxCumulativeBelowExpiryLength {
                expiry_length: 120,
                max_cumulative: 60,
            })
        );
    }

    #[test]
    fn unknown_values_are_rejected() {
        let config = CommissioningConfig {
            location_capability: "underwater".to_string(),
            ..CommissioningConfig::empty()
        };
        assert!(matches!(
            CommissioningSettings::from_config(&config),
            Err(SettingsError::UnknownLocationCapability(_))
        ));

        let config = CommissioningConfig {
            terms_and_conditions_enabled: true,
            terms_and_conditions_provider: "eventual".to_string(),
            ..CommissioningConfig::empty()
        };
        assert!(matches!(
            CommissioningSettings::from_config(&config),
            Err(SettingsError::UnknownTermsProvider(_))
        ));
    }
}
