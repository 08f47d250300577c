//! Addressable configuration keys.
//!
//! Each key is named `section.key` on the command line and maps to one
//! field of [`ConfigFile`]. `set` validates the single value; cross-field
//! rules are checked by [`ConfigFile::validate`].

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::file::{ConfigError, ConfigFile};
use crate::logging::is_valid_level;

/// A settable configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ApiBaseUrl,
    ApiTimeout,
    ApiToken,
    ProximityDiscoveryRadiusKm,
    ProximityScanRadiusKm,
    InterpretConfidenceHighThreshold,
    CapacityCriticalRatio,
    CapacityWarningRatio,
    RegistryCacheTtl,
    LoggingLevel,
    LoggingDirectory,
}

const ALL_KEYS: [ConfigKey; 11] = [
    ConfigKey::ApiBaseUrl,
    ConfigKey::ApiTimeout,
    ConfigKey::ApiToken,
    ConfigKey::ProximityDiscoveryRadiusKm,
    ConfigKey::ProximityScanRadiusKm,
    ConfigKey::InterpretConfidenceHighThreshold,
    ConfigKey::CapacityCriticalRatio,
    ConfigKey::CapacityWarningRatio,
    ConfigKey::RegistryCacheTtl,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingDirectory,
];

impl ConfigKey {
    /// Every key, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::ApiBaseUrl | ConfigKey::ApiTimeout | ConfigKey::ApiToken => "api",
            ConfigKey::ProximityDiscoveryRadiusKm | ConfigKey::ProximityScanRadiusKm => "proximity",
            ConfigKey::InterpretConfidenceHighThreshold => "interpret",
            ConfigKey::CapacityCriticalRatio | ConfigKey::CapacityWarningRatio => "capacity",
            ConfigKey::RegistryCacheTtl => "registry",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::ApiBaseUrl => "base_url",
            ConfigKey::ApiTimeout => "timeout",
            ConfigKey::ApiToken => "token",
            ConfigKey::ProximityDiscoveryRadiusKm => "discovery_radius_km",
            ConfigKey::ProximityScanRadiusKm => "scan_radius_km",
            ConfigKey::InterpretConfidenceHighThreshold => "confidence_high_threshold",
            ConfigKey::CapacityCriticalRatio => "critical_ratio",
            ConfigKey::CapacityWarningRatio => "warning_ratio",
            ConfigKey::RegistryCacheTtl => "cache_ttl",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// `section.key`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Keys that may be left empty.
    pub fn is_optional(&self) -> bool {
        matches!(self, ConfigKey::ApiToken | ConfigKey::LoggingDirectory)
    }

    /// Whether `get` should be masked when displayed.
    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigKey::ApiToken)
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ApiBaseUrl => config.api.base_url.clone(),
            ConfigKey::ApiTimeout => config.api.timeout_secs.to_string(),
            ConfigKey::ApiToken => config.api.token.clone().unwrap_or_default(),
            ConfigKey::ProximityDiscoveryRadiusKm => {
                config.proximity.discovery_radius_km.to_string()
            }
            ConfigKey::ProximityScanRadiusKm => config.proximity.scan_radius_km.to_string(),
            ConfigKey::InterpretConfidenceHighThreshold => {
                config.interpret.confidence_high_threshold.to_string()
            }
            ConfigKey::CapacityCriticalRatio => config.capacity.critical_ratio.to_string(),
            ConfigKey::CapacityWarningRatio => config.capacity.warning_ratio.to_string(),
            ConfigKey::RegistryCacheTtl => config.registry.ttl.as_secs().to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse and store `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::ApiBaseUrl => {
                let url = reqwest::Url::parse(value)
                    .map_err(|e| ConfigError::invalid(*self, e.to_string()))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(ConfigError::invalid(*self, "must be an http(s) URL"));
                }
                config.api.base_url = value.trim_end_matches('/').to_string();
            }
            ConfigKey::ApiTimeout => {
                let secs: u64 = self.parse_number(value)?;
                if secs == 0 {
                    return Err(ConfigError::invalid(*self, "must be at least 1 second"));
                }
                config.api.timeout_secs = secs;
            }
            ConfigKey::ApiToken => {
                config.api.token = (!value.is_empty()).then(|| value.to_string());
            }
            ConfigKey::ProximityDiscoveryRadiusKm => {
                config.proximity.discovery_radius_km = self.parse_positive(value)?;
            }
            ConfigKey::ProximityScanRadiusKm => {
                config.proximity.scan_radius_km = self.parse_positive(value)?;
            }
            ConfigKey::InterpretConfidenceHighThreshold => {
                config.interpret.confidence_high_threshold = self.parse_unit_ratio(value)?;
            }
            ConfigKey::CapacityCriticalRatio => {
                config.capacity.critical_ratio = self.parse_unit_ratio(value)?;
            }
            ConfigKey::CapacityWarningRatio => {
                config.capacity.warning_ratio = self.parse_unit_ratio(value)?;
            }
            ConfigKey::RegistryCacheTtl => {
                config.registry.ttl = Duration::from_secs(self.parse_number(value)?);
            }
            ConfigKey::LoggingLevel => {
                if !is_valid_level(value) {
                    return Err(ConfigError::invalid(
                        *self,
                        "expected one of trace, debug, info, warn, error",
                    ));
                }
                config.logging.level = value.to_ascii_lowercase();
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = (!value.is_empty()).then(|| PathBuf::from(value));
            }
        }
        Ok(())
    }

    fn parse_number<T: FromStr>(&self, value: &str) -> Result<T, ConfigError> {
        value
            .parse()
            .map_err(|_| ConfigError::invalid(*self, format!("'{}' is not a number", value)))
    }

    fn parse_positive(&self, value: &str) -> Result<f64, ConfigError> {
        let n: f64 = self.parse_number(value)?;
        if !n.is_finite() || n <= 0.0 {
            return Err(ConfigError::invalid(*self, "must be a positive number"));
        }
        Ok(n)
    }

    fn parse_unit_ratio(&self, value: &str) -> Result<f64, ConfigError> {
        let n: f64 = self.parse_number(value)?;
        if !(n > 0.0 && n <= 1.0) {
            return Err(ConfigError::invalid(*self, "must be in (0, 1]"));
        }
        Ok(n)
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
