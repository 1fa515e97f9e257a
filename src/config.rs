//! On-disk configuration for the minter and verifier
//!
//! Stored as JSON. Missing keys fall back to defaults, so a file only needs
//! the values it changes.

use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::{
    HashcashError, MinterConfig, SearchLimits, Verifier, DEFAULT_ATTEMPT_BUDGET, DEFAULT_BITS,
};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Invalid config file format: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("Invalid minter settings: {0}")]
    InvalidSettings(#[from] HashcashError),
}

/// Minting and verification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Denominations, layout and buffer sizing
    pub minter: MinterConfig,
    /// Denomination agreed for version 0 stamps, which do not carry one
    pub legacy_bits: u32,
    /// Worker threads for minting (default: one)
    pub threads: Option<usize>,
    /// Attempt ceiling per search
    pub max_attempts: u64,
    /// Give up after this many seconds
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            minter: MinterConfig::default(),
            legacy_bits: DEFAULT_BITS,
            threads: None,
            max_attempts: DEFAULT_ATTEMPT_BUDGET,
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.minter.validate()?;
        if self.threads == Some(0) {
            return Err(HashcashError::InvalidArgument("threads must be at least 1".into()).into());
        }
        Ok(())
    }

    pub fn verifier(&self) -> Verifier {
        Verifier::new().with_legacy_bits(self.legacy_bits)
    }

    pub fn search_limits(&self) -> SearchLimits {
        let limits = SearchLimits::new().with_max_attempts(self.max_attempts);
        match self.timeout_secs {
            Some(secs) => limits.with_timeout(Duration::from_secs(secs)),
            None => limits,
        }
    }
}

/// Get the default config file path
#[cfg(feature = "cli")]
pub fn default_config_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".hashcash").join("config.json")
}

/// Ensure the config directory exists
#[cfg(feature = "cli")]
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_path = default_config_path();
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(config_path)
}
