//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax-year
//! configurations from YAML, either the compiled-in set or a directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::store::TaxYearStore;
use super::types::TaxYearConfig;

/// The tax years shipped with the engine, as (source name, YAML text).
const BUILTIN_TAX_YEARS: &[(&str, &str)] = &[
    (
        "builtin:2024.yaml",
        include_str!("../../config/tax_years/2024.yaml"),
    ),
    (
        "builtin:2025.yaml",
        include_str!("../../config/tax_years/2025.yaml"),
    ),
];

/// Loads and provides access to tax-year configuration.
///
/// Every record held by a `ConfigLoader` has passed
/// [`TaxYearConfig::validate`], and the loader never changes after
/// construction.
///
/// # Directory Structure
///
/// A configuration directory holds one YAML file per tax year:
/// ```text
/// config/tax_years/
/// ├── 2024.yaml
/// └── 2025.yaml
/// ```
///
/// # Example
///
/// ```
/// use colombia_tax_engine::config::{ConfigLoader, TaxYearStore};
///
/// let loader = ConfigLoader::builtin()?;
/// let config = loader.lookup(2025)?;
/// assert_eq!(config.unit_value.to_string(), "49799");
/// # Ok::<(), colombia_tax_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    configs: BTreeMap<i32, TaxYearConfig>,
}

impl ConfigLoader {
    /// Loads the tax years compiled into the engine.
    pub fn builtin() -> EngineResult<Self> {
        let configs = BUILTIN_TAX_YEARS
            .iter()
            .map(|(name, content)| Self::parse_yaml(name, content))
            .collect::<EngineResult<Vec<_>>>()?;

        Self::from_configs(configs)
    }

    /// Loads every `*.yaml` file in `path`, one tax year per file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The directory is missing or holds no YAML files (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - Any record breaks a table invariant or repeats a year
    ///   (`InvalidConfiguration`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use colombia_tax_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/tax_years")?;
    /// # Ok::<(), colombia_tax_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax year files found)", dir_str),
            });
        }

        // Sorted so duplicate-year errors are reported deterministically.
        files.sort();

        let mut configs = Vec::with_capacity(files.len());
        for file in &files {
            configs.push(Self::load_yaml(file)?);
        }

        debug!(path = %dir_str, files = files.len(), "Loaded tax year files");

        Self::from_configs(configs)
    }

    /// Builds a loader from in-memory records, validating each one.
    pub fn from_configs(configs: Vec<TaxYearConfig>) -> EngineResult<Self> {
        let mut by_year = BTreeMap::new();

        for config in configs {
            config.validate()?;
            let year = config.year;
            if by_year.insert(year, config).is_some() {
                return Err(EngineError::InvalidConfiguration {
                    year,
                    message: "year is defined more than once".to_string(),
                });
            }
        }

        Ok(Self { configs: by_year })
    }

    /// Loads and parses a YAML file.
    fn load_yaml(path: &Path) -> EngineResult<TaxYearConfig> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&path_str, &content)
    }

    fn parse_yaml(source: &str, content: &str) -> EngineResult<TaxYearConfig> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: source.to_string(),
            message: e.to_string(),
        })
    }
}

impl TaxYearStore for ConfigLoader {
    fn lookup(&self, year: i32) -> EngineResult<&TaxYearConfig> {
        self.configs
            .get(&year)
            .ok_or(EngineError::ConfigurationNotFound { year })
    }

    fn years(&self) -> Vec<i32> {
        self.configs.keys().copied().collect()
    }
}
