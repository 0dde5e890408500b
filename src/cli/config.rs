//! Configuration file
//!
//! Optional JSON file, every key defaulted:
//!
//! ```text
//! {
//!   "data_file": "data.json",
//!   "code_allocation": "legacy",
//!   "unknown_fields": "warn",
//!   "file_lock": false,
//!   "log_level": "warn"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::document::FileLock;
use crate::observability::LogLevel;
use crate::repository::{Repository, RepositoryOptions, UnknownFieldPolicy};
use crate::table::AllocationPolicy;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path of the persisted document (default "data.json")
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// "legacy" or "monotonic" (default "legacy")
    #[serde(default = "default_code_allocation")]
    pub code_allocation: String,

    /// "warn" or "reject" (default "warn")
    #[serde(default = "default_unknown_fields")]
    pub unknown_fields: String,

    /// Hold an exclusive lock on `<data_file>.lock` across each operation
    #[serde(default)]
    pub file_lock: bool,

    /// trace, info, warn or error (default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_file() -> String {
    "data.json".to_string()
}
fn default_code_allocation() -> String {
    AllocationPolicy::default().as_str().to_string()
}
fn default_unknown_fields() -> String {
    UnknownFieldPolicy::default().as_str().to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            code_allocation: default_code_allocation(),
            unknown_fields: default_unknown_fields(),
            file_lock: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Loads the config file if given, then applies command-line overrides.
    pub fn resolve(config_path: Option<&Path>, data_file: Option<&Path>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(path) = data_file {
            config.data_file = path.display().to_string();
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_file.trim().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }
        self.allocation_policy()?;
        self.unknown_field_policy()?;
        self.log_level()?;
        Ok(())
    }

    /// Get data file as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_file)
    }

    pub fn allocation_policy(&self) -> CliResult<AllocationPolicy> {
        self.code_allocation.parse().map_err(CliError::Config)
    }

    pub fn unknown_field_policy(&self) -> CliResult<UnknownFieldPolicy> {
        self.unknown_fields.parse().map_err(CliError::Config)
    }

    pub fn log_level(&self) -> CliResult<LogLevel> {
        self.log_level.parse().map_err(CliError::Config)
    }

    pub fn repository_options(&self) -> CliResult<RepositoryOptions> {
        Ok(RepositoryOptions {
            allocation: self.allocation_policy()?,
            unknown_fields: self.unknown_field_policy()?,
        })
    }

    /// Builds the repository this configuration describes.
    pub fn open_repository(&self) -> CliResult<Repository> {
        let repository =
            Repository::json_file(self.data_path()).with_options(self.repository_options()?);
        if self.file_lock {
            return Ok(repository.with_lock(FileLock::for_document(self.data_path())));
        }
        Ok(repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data_file, "data.json");
        assert_eq!(config.allocation_policy().unwrap(), AllocationPolicy::Legacy);
        assert_eq!(config.unknown_field_policy().unwrap(), UnknownFieldPolicy::Warn);
        assert_eq!(config.log_level().unwrap(), LogLevel::Warn);
        assert!(!config.file_lock);
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("schooldb.json");
        fs::write(
            &path,
            r#"{"data_file": "school.json", "code_allocation": "monotonic", "unknown_fields": "reject"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let options = config.repository_options().unwrap();
        assert_eq!(options.allocation, AllocationPolicy::Monotonic);
        assert_eq!(options.unknown_fields, UnknownFieldPolicy::Reject);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("schooldb.json");

        fs::write(&path, r#"{"code_allocation": "random"}"#).unwrap();
        assert_eq!(Config::load(&path).unwrap_err().code(), "SCHOOL_CLI_CONFIG_ERROR");

        fs::write(&path, r#"{"data_file": "  "}"#).unwrap();
        assert!(Config::load(&path).is_err());

        fs::write(&path, r#"{"log_level": "loud"}"#).unwrap();
        assert!(Config::load(&path).is_err());

        fs::write(&path, "not json").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(&temp.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_data_file_override() {
        let config = Config::resolve(None, Some(Path::new("/tmp/other.json"))).unwrap();
        assert_eq!(config.data_path(), Path::new("/tmp/other.json"));
    }
}
