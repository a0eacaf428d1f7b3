// src/config.rs

use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::admin::BackendConfig;
use crate::catalog::CatalogFields;
use crate::table::{MatchMode, EURO};

pub const DEFAULT_CSV_URL: &str = "output/catalogo_output.csv";

pub const ENV_CSV_URL: &str = "CATALOGO_CSV_URL";
pub const ENV_BACKEND_URL: &str = "CATALOGO_BACKEND_URL";
pub const ENV_ANON_KEY: &str = "CATALOGO_ANON_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Runtime settings: YAML file first, then environment overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog CSV location, `http(s)` URL or local path.
    pub csv_url: String,
    pub currency_symbol: String,
    /// Resolve catalog fields by exact header name only.
    pub strict_match: bool,
    pub fields: CatalogFields,
    pub backend: BackendConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_CSV_URL.to_string(),
            currency_symbol: EURO.to_string(),
            strict_match: false,
            fields: CatalogFields::default(),
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    /// Read `path` if given (defaults otherwise) and apply the process
    /// environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Apply `CATALOGO_*` overrides; blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(csv_url) = get(ENV_CSV_URL) {
            self.csv_url = csv_url;
        }
        if let Some(raw) = get(ENV_BACKEND_URL) {
            let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
                var: ENV_BACKEND_URL,
                source,
            })?;
            self.backend.url = Some(url);
        }
        if let Some(key) = get(ENV_ANON_KEY) {
            self.backend.anon_key = Some(key);
        }
        Ok(())
    }

    pub fn match_mode(&self) -> MatchMode {
        if self.strict_match {
            MatchMode::ExactOnly
        } else {
            MatchMode::ExactThenSubstring
        }
    }

    /// Catalog alias table with the configured match mode applied.
    pub fn catalog_fields(&self) -> CatalogFields {
        self.fields.clone().with_mode(self.match_mode())
    }
}
