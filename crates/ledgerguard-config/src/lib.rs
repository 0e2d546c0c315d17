//! Configuration management for ledgerguard
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (LGD_* prefix, `__` between section and key)
//! 2. ledgerguard.local.toml (gitignored, local overrides)
//! 3. ledgerguard.toml (git-tracked, project config)
//! 4. ~/.config/ledgerguard/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Default structural bytes charged per ledger entry.
pub const DEFAULT_ENTRY_OVERHEAD_BYTES: u64 = 34;

/// Main ledgerguard configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerguardConfig {
    pub ledger: LedgerConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub entry_overhead_bytes: u64,
    pub name_index: bool,
    pub decision_recording: DecisionRecordingMode,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            entry_overhead_bytes: DEFAULT_ENTRY_OVERHEAD_BYTES,
            name_index: true,
            decision_recording: DecisionRecordingMode::FinalizeInPlace,
        }
    }
}

/// How granted requests are written to the chain.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionRecordingMode {
    #[default]
    FinalizeInPlace,
    AppendDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl LedgerguardConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Parse a single TOML document over the built-in defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: "inline document".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration that never mutates a recorded entry
    pub fn immutable_history() -> Self {
        Self {
            ledger: LedgerConfig {
                decision_recording: DecisionRecordingMode::AppendDecision,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.entry_overhead_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "ledger.entry_overhead_bytes",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
