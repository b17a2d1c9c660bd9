//! Engine configuration loaded from TOML.

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: &'static str,
    },
}

///
/// EngineConfig
///
/// Startup settings shared by every operation call.
/// Every field is optional in the TOML source.
///

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub data_path: Option<PathBuf>,

    /// Reject unrecognized argument keys instead of ignoring them.
    pub strict_arguments: bool,

    pub memoize_rank_order: bool,
    pub log_level: String,
    pub limits: LimitsConfig,
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.limits.similar_min_similarity) {
            return Err(ConfigError::Invalid {
                field: "limits.similar_min_similarity",
                message: "must lie within [0, 1]",
            });
        }
        if self.limits.bin_size == 0 {
            return Err(ConfigError::Invalid {
                field: "limits.bin_size",
                message: "must be positive",
            });
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            strict_arguments: false,
            memoize_rank_order: true,
            log_level: "info".to_string(),
            limits: LimitsConfig::default(),
        }
    }
}

///
/// LimitsConfig
/// Per-operation defaults applied when a request omits them.
///

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub filter: usize,
    pub stat_range: usize,
    pub top: usize,
    pub generation: usize,
    pub type_combination: usize,
    pub ability: usize,
    pub extreme: usize,
    pub similar: usize,
    pub resistant: usize,
    pub similar_min_similarity: f64,
    pub bin_size: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            filter: 20,
            stat_range: 20,
            top: 10,
            generation: 50,
            type_combination: 50,
            ability: 50,
            extreme: 5,
            similar: 5,
            resistant: 20,
            similar_min_similarity: 0.7,
            bin_size: 100,
        }
    }
}

///
/// TESTS
///
