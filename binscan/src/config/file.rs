//! INI-backed configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use super::keys::ConfigKey;
use crate::api::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::bins::SeverityThresholds;
use crate::logging::LoggingConfig;
use crate::outcome::InterpretConfig;
use crate::proximity::ProximityConfig;
use crate::registry::RegistryCacheConfig;
use crate::scan::ScanConfig;

/// Name of the per-user configuration directory under `$HOME`.
pub const CONFIG_DIR_NAME: &str = ".binscan";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors reading, validating or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, String),

    #[error("Failed to write config file {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: ConfigKey, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.name(),
            reason: reason.into(),
        }
    }
}

/// `[api]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Bearer token for `/predict` and admin calls.
    pub token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
        }
    }
}

impl ApiSettings {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone()).with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// Parsed `~/.binscan/config.ini`.
///
/// Missing files and missing keys fall back to defaults. Values are checked
/// individually as they are read and then cross-checked as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub api: ApiSettings,
    pub proximity: ProximityConfig,
    pub interpret: InterpretConfig,
    pub capacity: SeverityThresholds,
    pub registry: RegistryCacheConfig,
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e.to_string()))?;
        Self::from_ini(&ini)
    }

    /// Parse INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text)
            .map_err(|e| ConfigError::Read(PathBuf::from("<string>"), e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            let Some(value) = ini.get_from(Some(key.section()), key.key_name()) else {
                continue;
            };
            if value.trim().is_empty() && !key.is_optional() {
                continue;
            }
            key.set(&mut config, value)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.proximity.scan_radius_km > self.proximity.discovery_radius_km {
            return Err(ConfigError::invalid(
                ConfigKey::ProximityScanRadiusKm,
                format!(
                    "scan radius ({} km) exceeds discovery radius ({} km)",
                    self.proximity.scan_radius_km, self.proximity.discovery_radius_km
                ),
            ));
        }
        if self.capacity.warning_ratio > self.capacity.critical_ratio {
            return Err(ConfigError::invalid(
                ConfigKey::CapacityWarningRatio,
                format!(
                    "warning ratio ({}) exceeds critical ratio ({})",
                    self.capacity.warning_ratio, self.capacity.critical_ratio
                ),
            ));
        }
        Ok(())
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Write every key to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Write(path.to_path_buf(), e))?;
        }
        self.to_ini()
            .write_to_file(path)
            .map_err(|e| ConfigError::Write(path.to_path_buf(), e))?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Scan session settings.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::default()
            .with_proximity(self.proximity)
            .with_interpret(self.interpret)
    }

    pub fn api_config(&self) -> ApiConfig {
        self.api.api_config()
    }
}

/// `~/.binscan`, or `./.binscan` when no home directory is known.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// `~/.binscan/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.proximity.scan_radius_km, 0.03);
        assert_eq!(config.registry.ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_parse_sections() {
        let config = ConfigFile::parse(
            "[api]\n\
             base_url = https://bins.example.org/api\n\
             timeout = 10\n\
             token = abc\n\
             [proximity]\n\
             discovery_radius_km = 5\n\
             scan_radius_km = 0.05\n\
             [capacity]\n\
             critical_ratio = 0.95\n\
             [logging]\n\
             directory =\n",
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://bins.example.org/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.token.as_deref(), Some("abc"));
        assert_eq!(config.proximity.discovery_radius_km, 5.0);
        assert_eq!(config.proximity.scan_radius_km, 0.05);
        assert_eq!(config.capacity.critical_ratio, 0.95);
        assert_eq!(config.capacity.warning_ratio, 0.6);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_empty_numeric_value_keeps_default() {
        let config = ConfigFile::parse("[api]\ntimeout =\n").unwrap();
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_rejects_scan_radius_above_discovery() {
        let err = ConfigFile::parse(
            "[proximity]\ndiscovery_radius_km = 0.01\nscan_radius_km = 0.03\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("proximity.scan_radius_km"));
    }

    #[test]
    fn test_rejects_inverted_ratios() {
        assert!(ConfigFile::parse("[capacity]\nwarning_ratio = 0.95\ncritical_ratio = 0.9\n").is_err());
    }

    #[test]
    fn test_rejects_garbage_number() {
        let err = ConfigFile::parse("[registry]\ncache_ttl = soon\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.api.token = Some("t0ken".to_string());
        config.proximity.scan_radius_km = 0.05;
        config.logging.level = "debug".to_string();
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_scan_config_carries_settings() {
        let mut config = ConfigFile::default();
        config.interpret.confidence_high_threshold = 0.8;
        let scan = config.scan_config();
        assert_eq!(scan.interpret.confidence_high_threshold, 0.8);
        assert_eq!(scan.proximity, config.proximity);
    }

    #[test]
    fn test_config_path_layout() {
        let path = config_file_path();
        assert!(path.ends_with(".binscan/config.ini"));
    }
}
