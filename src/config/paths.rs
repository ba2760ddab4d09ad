//! Path management for Finsight
//!
//! ## Path Resolution Order
//!
//! 1. `FINSIGHT_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/finsight` or `~/.config/finsight`
//! 3. Windows: `%APPDATA%\finsight`

use std::path::{Path, PathBuf};

use crate::error::FinsightError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "FINSIGHT_DATA_DIR";

const APP_DIR: &str = "finsight";

/// Locations Finsight reads settings from and writes reports to
#[derive(Debug, Clone)]
pub struct FinsightPaths {
    base_dir: PathBuf,
}

impl FinsightPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns a config error if no home or application data directory
    /// can be determined.
    pub fn new() -> Result<Self, FinsightError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, embedding)
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Default destination for exported reports
    pub fn reports_dir(&self) -> PathBuf {
        self.base_dir.join("reports")
    }

    pub fn ensure_directories(&self) -> Result<(), FinsightError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FinsightError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.reports_dir())
            .map_err(|e| FinsightError::Io(format!("Failed to create reports directory: {}", e)))?;

        Ok(())
    }

    /// Whether `finsight init` has written a settings file
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, FinsightError> {
    let config_base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var_os("HOME").ok_or_else(|| {
                FinsightError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, FinsightError> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| FinsightError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_under_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinsightPaths::with_base_dir(temp_dir.path());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.reports_dir(), temp_dir.path().join("reports"));
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_data_dir_override() {
        let temp_dir = TempDir::new().unwrap();
        std::env::set_var(DATA_DIR_ENV, temp_dir.path());

        let paths = FinsightPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        std::env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinsightPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().is_dir());
        assert!(paths.reports_dir().is_dir());
    }
}
