//! Shared setup for commands that talk to the remote services.

use binscan::classifier::HttpClassifier;
use binscan::config::ConfigFile;
use binscan::logging::{init_logging, LoggingGuard};
use binscan::registry::{AdminCredential, CachedRegistry, HttpRegistry};
use binscan::scan::UserContext;

use crate::error::CliError;

/// Loaded configuration plus the logging guard for one CLI invocation.
pub struct CliRunner {
    config: ConfigFile,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load config, apply a `--log-level` override and start logging.
    pub fn new(log_level: Option<&str>) -> Result<Self, CliError> {
        let mut config = ConfigFile::load()?;
        if let Some(level) = log_level {
            config.logging.level = level.to_string();
        }
        let logging = init_logging(&config.logging)?;
        tracing::debug!(base_url = %config.api.base_url, "CLI runner ready");
        Ok(Self {
            config,
            _logging: logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Registry client honouring `registry.cache_ttl`.
    pub fn registry(&self) -> Result<CachedRegistry<HttpRegistry>, CliError> {
        let http = HttpRegistry::new(self.config.api_config())?;
        Ok(CachedRegistry::new(http, self.config.registry))
    }

    pub fn classifier(&self) -> Result<HttpClassifier, CliError> {
        HttpClassifier::new(self.config.api_config()).map_err(|e| CliError::Client(e.to_string()))
    }

    /// The scanning user. Authenticated when `api.token` is set.
    pub fn user(&self) -> UserContext {
        match &self.config.api.token {
            Some(token) => UserContext::with_token(token.clone()),
            None => UserContext::anonymous(),
        }
    }

    /// Admin capability from `--token`, else `api.token`.
    pub fn admin_credential(&self, cli_token: Option<String>) -> Result<AdminCredential, CliError> {
        cli_token
            .or_else(|| self.config.api.token.clone())
            .and_then(AdminCredential::bearer)
            .ok_or_else(|| {
                CliError::Config(
                    "Admin commands need a token. Use --token or set token in config.ini [api] section."
                        .to_string(),
                )
            })
    }
}
