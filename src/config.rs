//! Configuration for template parsing and gap input.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file) yields the stock `{[`/`]}` delimiters, a space filler and the
//! printable-ASCII whitelist. Unknown fields are ignored.
//!
//! ```toml
//! [template]
//! open = "{["
//! close = "]}"
//! filler = "_"
//!
//! [input]
//! allow_non_ascii = true
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    #[serde(default = "TemplateConfig::default_open")]
    pub open: String,
    #[serde(default = "TemplateConfig::default_close")]
    pub close: String,
    /// Placeholder written into unfilled gap cells.
    #[serde(default = "TemplateConfig::default_filler")]
    pub filler: char,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            open: Self::default_open(),
            close: Self::default_close(),
            filler: Self::default_filler(),
        }
    }
}

impl TemplateConfig {
    fn default_open() -> String {
        "{[".to_string()
    }
    fn default_close() -> String {
        "]}".to_string()
    }
    const fn default_filler() -> char {
        ' '
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct InputConfig {
    /// Accept any non-control character instead of printable ASCII only.
    #[serde(default)]
    pub allow_non_ascii: bool,
}

impl InputConfig {
    /// Whether a typed cell (one grapheme cluster) may enter a gap.
    pub fn accepts(&self, cell: &str) -> bool {
        !cell.is_empty()
            && cell.chars().all(|c| {
                if self.allow_non_ascii {
                    !c.is_control()
                } else {
                    c == ' ' || c.is_ascii_graphic()
                }
            })
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(target: "gaps.config", path = %path.display(), ?config, "config_loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.template;
        if t.open.is_empty() || t.close.is_empty() {
            return Err(ConfigError::Invalid("gap delimiters must not be empty"));
        }
        if t.open == t.close {
            return Err(ConfigError::Invalid("open and close delimiters must differ"));
        }
        if t.open.contains('\n') || t.close.contains('\n') {
            return Err(ConfigError::Invalid("gap delimiters must not span lines"));
        }
        if t.filler == '\n' || t.filler == '\r' {
            return Err(ConfigError::Invalid("filler must not be a line break"));
        }
        Ok(())
    }
}
