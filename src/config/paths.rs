//! Path resolution for momentum configuration and data files.
//!
//! All momentum data is stored in `~/.momentum/`:
//! - `config.yaml` - Main configuration file
//! - `momentum.db` - SQLite database for the token economy

use std::path::PathBuf;

use crate::error::MomentumError;

/// Paths to momentum configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.momentum/`
    pub root: PathBuf,
    /// Config file: `~/.momentum/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.momentum/momentum.db`
    pub database: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, MomentumError> {
        let home = std::env::var("HOME").map_err(|_| {
            MomentumError::Config("Could not determine home directory".to_string())
        })?;

        let root = PathBuf::from(home).join(".momentum");

        Ok(Self {
            config_file: root.join("config.yaml"),
            database: root.join("momentum.db"),
            root,
        })
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("momentum.db"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), MomentumError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                MomentumError::Config(format!(
                    "Failed to create directory {:?}: {}",
                    self.root, e
                ))
            })?;
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".momentum"))
        })
    }
}
