use std::path::Path;

use crate::dtype::{to_primitive_type, PrimitiveType};
use crate::error::ConfigError;

/// Types that generic `float` / `int` dtypes resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeDefaults {
    /// Resolution of `float`. Must be a real type.
    pub default_fp: PrimitiveType,
    /// Resolution of `int`. Must be an integral type.
    pub default_ip: PrimitiveType,
}

impl Default for TypeDefaults {
    fn default() -> Self {
        Self {
            default_fp: PrimitiveType::F32,
            default_ip: PrimitiveType::I32,
        }
    }
}

/// Configuration for a kernel-build context.
///
/// The limits bound the number of typed slots a single kernel may
/// declare; template parameters do not count against them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    pub types: TypeDefaults,
    /// Maximum number of declared arguments per kernel.
    pub max_num_args: usize,
    /// Maximum number of declared return values per kernel.
    pub max_num_rets: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            types: TypeDefaults::default(),
            max_num_args: 8,
            max_num_rets: 1,
        }
    }
}

impl CoreConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse_toml(&content, path)
    }

    /// Parse the `[types]` / `[limits]` subset of TOML this config uses.
    /// Missing keys keep their built-in defaults.
    pub fn parse_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let err = |message: String| ConfigError::Invalid {
            path: path.display().to_string(),
            message,
        };

        let mut config = Self::default();
        let mut section = String::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                section = trimmed[1..trimmed.len() - 1].trim().to_string();
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(err(format!("expected 'key = value', found '{}'", trimmed)));
            };
            let key = key.trim();
            let value = value.trim();
            let unquoted = value.trim_matches('"');

            match (section.as_str(), key) {
                ("types", "default_fp") => {
                    config.types.default_fp = to_primitive_type(unquoted)
                        .map_err(|_| err(format!("invalid types.default_fp: {}", value)))?;
                }
                ("types", "default_ip") => {
                    config.types.default_ip = to_primitive_type(unquoted)
                        .map_err(|_| err(format!("invalid types.default_ip: {}", value)))?;
                }
                ("limits", "max_args") => {
                    config.max_num_args = value
                        .parse()
                        .map_err(|_| err(format!("invalid limits.max_args: {}", value)))?;
                }
                ("limits", "max_rets") => {
                    config.max_num_rets = value
                        .parse()
                        .map_err(|_| err(format!("invalid limits.max_rets: {}", value)))?;
                }
                _ => {}
            }
        }

        if !config.types.default_fp.is_real() {
            return Err(err(format!(
                "types.default_fp must be a real type, got {}",
                config.types.default_fp
            )));
        }
        if !config.types.default_ip.is_integral() {
            return Err(err(format!(
                "types.default_ip must be an integral type, got {}",
                config.types.default_ip
            )));
        }
        if config.max_num_args == 0 {
            return Err(err("limits.max_args must be > 0".to_string()));
        }
        if config.max_num_rets == 0 {
            return Err(err("limits.max_rets must be > 0".to_string()));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests;
