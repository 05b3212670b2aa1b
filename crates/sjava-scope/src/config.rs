use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings shared by the scope factory and the front end that drives it.
///
/// ```toml
/// main_tag = "main"
/// conditional_tag = "ifWhile"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Block tag that produces the root scope.
    pub main_tag: String,

    /// Block tag that produces an `if`/`while` scope. Any other tag names a method.
    pub conditional_tag: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            main_tag: default_main_tag(),
            conditional_tag: default_conditional_tag(),
        }
    }
}

pub fn default_main_tag() -> String {
    "main".to_string()
}

pub fn default_conditional_tag() -> String {
    "ifWhile".to_string()
}

impl ResolverConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ResolverConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.main_tag.trim().is_empty() || self.conditional_tag.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "block tags must not be empty".to_string(),
            });
        }
        if self.main_tag == self.conditional_tag {
            return Err(ConfigError::Invalid {
                message: format!(
                    "`main_tag` and `conditional_tag` are both `{}`",
                    self.main_tag
                ),
            });
        }
        Ok(())
    }
}
