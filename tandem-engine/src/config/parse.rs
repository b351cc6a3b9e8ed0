//! TOML configuration parsing

use core::fmt;

use tandem_core::config::EngineConfig;
use tandem_core::EngineError;

use crate::fmt::debug;

/// Configuration parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Document is not valid TOML or has wrongly typed values
    TomlParse,
    /// Document parsed but the values are out of range
    Invalid(EngineError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TomlParse => f.write_str("configuration is not valid TOML"),
            ConfigError::Invalid(e) => write!(f, "configuration rejected: {}", e),
        }
    }
}

impl From<EngineError> for ConfigError {
    fn from(e: EngineError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Parse a TOML document into a validated [`EngineConfig`]
///
/// Missing keys and sections take their defaults.
pub fn parse_config(input: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig = ::toml::from_str(input).map_err(|_| {
        debug!("TOML document did not deserialize");
        ConfigError::TomlParse
    })?;
    config.validate()?;
    Ok(config)
}
