//! Layered configuration loading.

use crate::{LedgerguardConfig, Paths};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Merges every configuration source for one project directory.
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    include_user_config: bool,
    env_vars: Option<config::Map<String, String>>,
}

impl ConfigLoader {
    /// Loader rooted at the current directory.
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "LGD".to_string(),
            include_user_config: true,
            env_vars: None,
        }
    }

    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "LGD")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Skip ~/.config/ledgerguard/config.toml
    pub fn without_user_config(mut self) -> Self {
        self.include_user_config = false;
        self
    }

    /// Read environment overrides from `vars` instead of the process
    /// environment.
    pub fn with_env_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// `LGD_LEDGER__NAME_INDEX=false` sets `ledger.name_index`.
    fn environment(&self) -> config::Environment {
        config::Environment::with_prefix(&self.env_prefix)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(self.env_vars.clone())
    }

    /// Merges all sources, later ones winning key by key, then validates.
    pub fn load(self) -> Result<LedgerguardConfig> {
        let mut builder = config::Config::builder();

        // 1. Built-in defaults
        let defaults = LedgerguardConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2-4. User, project and local files, each overriding the last
        for file in Paths::new().existing_files(&self.project_dir, self.include_user_config) {
            builder = builder.add_source(
                config::File::from(file)
                    .required(true)
                    .format(config::FileFormat::Toml),
            );
        }

        // 5. Environment variables
        builder = builder.add_source(self.environment());

        let config = builder.build().context("Failed to build configuration")?;

        let ledgerguard_config: LedgerguardConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        ledgerguard_config
            .validate()
            .context("Configuration failed validation")?;

        Ok(ledgerguard_config)
    }

    /// Falls back to defaults when any source is unreadable or invalid.
    pub fn load_or_default(self) -> LedgerguardConfig {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
