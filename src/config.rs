//! Configuration file support
//!
//! Loads computation settings from `laplacian-centrality.toml` (or an explicit
//! path), then applies environment overrides. CLI flags are applied on top by
//! the binary.
//!
//! # Configuration Format
//!
//! ```toml
//! [centrality]
//! normalized = true
//! unnormalized_score = "deflated-energy"   # or "energy-drop"
//! energy_backend = "dense"                 # or "trace"
//! max_eigen_iterations = 20000
//! parallel = true
//! threads = 8
//!
//! [directed]
//! walk_type = "pagerank"                   # random, lazy, pagerank; omit to auto-select
//! alpha = 0.95
//! ```
//!
//! # Environment
//!
//! - `LAPLACIAN_CENTRALITY_THREADS` overrides `centrality.threads`
//! - `LAPLACIAN_CENTRALITY_WALK_TYPE` overrides `directed.walk_type`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::centrality::CentralityOptions;
use crate::directed::{DirectedLaplacianConfig, WalkType};
use crate::errors::CentralityError;

pub const CONFIG_FILE_NAME: &str = "laplacian-centrality.toml";
pub const THREADS_ENV: &str = "LAPLACIAN_CENTRALITY_THREADS";
pub const WALK_TYPE_ENV: &str = "LAPLACIAN_CENTRALITY_WALK_TYPE";

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {name}: {message}")]
    Env { name: &'static str, message: String },

    #[error(transparent)]
    Invalid(#[from] CentralityError),
}

/// On-disk configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityConfig {
    pub centrality: CentralitySection,
    pub directed: DirectedLaplacianConfig,
}

/// `[centrality]` table; same fields as `CentralityOptions` minus the
/// directed parameters, which live in their own table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralitySection {
    pub normalized: bool,
    pub unnormalized_score: crate::centrality::UnnormalizedScore,
    pub energy_backend: crate::energy::EnergyBackend,
    pub max_eigen_iterations: Option<usize>,
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl Default for CentralitySection {
    fn default() -> Self {
        let defaults = CentralityOptions::default();
        Self {
            normalized: defaults.normalized,
            unnormalized_score: defaults.unnormalized_score,
            energy_backend: defaults.energy_backend,
            max_eigen_iterations: defaults.max_eigen_iterations,
            parallel: defaults.parallel,
            threads: defaults.threads,
        }
    }
}

impl CentralityConfig {
    /// Load config with priority:
    /// 1. Environment variables (highest)
    /// 2. `path`, or `laplacian-centrality.toml` in the working directory
    /// 3. Defaults
    ///
    /// An explicit `path` must exist; the implicit file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = PathBuf::from(CONFIG_FILE_NAME);
                if implicit.exists() {
                    Self::from_file(&implicit)?
                } else {
                    debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    Self::default()
                }
            }
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(THREADS_ENV) {
            let threads = value.trim().parse::<usize>().map_err(|_| ConfigError::Env {
                name: THREADS_ENV,
                message: format!("'{}' is not a valid number", value),
            })?;
            self.centrality.threads = Some(threads);
        }
        if let Some(value) = lookup(WALK_TYPE_ENV) {
            let walk_type = value.parse::<WalkType>().map_err(|e| ConfigError::Env {
                name: WALK_TYPE_ENV,
                message: e.to_string(),
            })?;
            self.directed.walk_type = Some(walk_type);
        }
        Ok(())
    }

    /// Options for a computation. The directed parameters are always
    /// attached; undirected graphs ignore them.
    pub fn to_options(&self) -> Result<CentralityOptions, ConfigError> {
        let section = &self.centrality;
        let options = CentralityOptions {
            normalized: section.normalized,
            unnormalized_score: section.unnormalized_score,
            directed: Some(self.directed),
            energy_backend: section.energy_backend,
            max_eigen_iterations: section.max_eigen_iterations,
            parallel: section.parallel,
            threads: section.threads,
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centrality::UnnormalizedScore;
    use crate::energy::EnergyBackend;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = CentralityConfig::from_toml_str("").unwrap();
        assert_eq!(config, CentralityConfig::default());

        let options = config.to_options().unwrap();
        assert!(options.normalized);
        assert!(options.parallel);
        assert_eq!(options.directed, Some(DirectedLaplacianConfig::default()));
    }

    #[test]
    fn test_full_file() {
        let config = CentralityConfig::from_toml_str(
            r#"
            [centrality]
            normalized = false
            unnormalized_score = "energy-drop"
            energy_backend = "trace"
            max_eigen_iterations = 500
            parallel = false
            threads = 3

            [directed]
            walk_type = "lazy"
            alpha = 0.5
            "#,
        )
        .unwrap();

        let options = config.to_options().unwrap();
        assert!(!options.normalized);
        assert_eq!(options.unnormalized_score, UnnormalizedScore::EnergyDrop);
        assert_eq!(options.energy_backend, EnergyBackend::Trace);
        assert_eq!(options.max_eigen_iterations, Some(500));
        assert!(!options.parallel);
        assert_eq!(options.threads, Some(3));
        let directed = options.directed.unwrap();
        assert_eq!(directed.walk_type, Some(WalkType::Lazy));
        assert_eq!(directed.alpha, 0.5);
    }

    #[test]
    fn test_unknown_walk_type_is_parse_error() {
        let result = CentralityConfig::from_toml_str("[directed]\nwalk_type = \"teleport\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = CentralityConfig::from_toml_str("[centrality]\nthreads = 0\n").unwrap();
        assert!(matches!(config.to_options(), Err(ConfigError::Invalid(_))));

        let config =
            CentralityConfig::from_toml_str("[directed]\nwalk_type = \"pagerank\"\nalpha = 1.5\n").unwrap();
        assert!(matches!(config.to_options(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = CentralityConfig::from_toml_str("[centrality]\nthreads = 2\n").unwrap();
        config
            .apply_env(env(&[(THREADS_ENV, "6"), (WALK_TYPE_ENV, "random")]))
            .unwrap();
        assert_eq!(config.centrality.threads, Some(6));
        assert_eq!(config.directed.walk_type, Some(WalkType::Random));
    }

    #[test]
    fn test_bad_env_values() {
        let mut config = CentralityConfig::default();
        let err = config.apply_env(env(&[(THREADS_ENV, "many")])).unwrap_err();
        assert!(err.to_string().contains(THREADS_ENV));

        let err = config.apply_env(env(&[(WALK_TYPE_ENV, "teleport")])).unwrap_err();
        assert!(err.to_string().contains(WALK_TYPE_ENV));
    }

    #[test]
    fn test_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[centrality]\nnormalized = \"yes\"\n").unwrap();

        let err = CentralityConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));

        let missing = CentralityConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
