use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::{fs, io};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid configuration in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid section catalog: {0}")]
    Catalog(String),
}

/// Runtime settings of the dashboard.
///
/// Resolved as built-in defaults, then an optional TOML file, then
/// command-line flags and `RISK_DASHBOARD_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub bind: SocketAddr,
    pub model_path: PathBuf,
    pub asset_root: PathBuf,
    pub catalog_path: PathBuf,
    pub dataset_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            model_path: PathBuf::from("assets/model/tree_model.json"),
            asset_root: PathBuf::from("assets"),
            catalog_path: PathBuf::from("assets/dashboard.toml"),
            dataset_path: PathBuf::from("assets/data/environmental_risk_data.csv"),
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<SocketAddr>,
    pub model_path: Option<PathBuf>,
    pub asset_root: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub dataset_path: Option<PathBuf>,
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, or the given file when one is provided.
    pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
        if let Some(path) = &overrides.model_path {
            self.model_path = path.clone();
        }
        if let Some(path) = &overrides.asset_root {
            self.asset_root = path.clone();
        }
        if let Some(path) = &overrides.catalog_path {
            self.catalog_path = path.clone();
        }
        if let Some(path) = &overrides.dataset_path {
            self.dataset_path = path.clone();
        }
    }
}
