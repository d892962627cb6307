//! Format-detecting config loader with `${VAR}` / `$VAR` environment
//! substitution.

use config::{Config as Cfg, File, FileFormat};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

use crate::schema::KernelConfig;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parsing error: {0}")]
    Parse(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Detect the config format from a file's extension (`.toml`, `.yaml`/`.yml`,
/// `.json`).
pub fn detect_format(path: &str) -> ConfigResult<FileFormat> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ConfigError::UnsupportedFormat("no file extension".to_string()))?;

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Substitute `${VAR_NAME}` and `$VAR_NAME` with the current environment's
/// values. Unresolvable references are left untouched.
pub fn substitute_env_vars(content: &str) -> String {
    let re_braced = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex");
    let braced = re_braced.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });

    let re_simple = Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)\b").expect("static regex");
    re_simple
        .replace_all(&braced, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Load and deserialize any config type from a file path, auto-detecting
/// format and substituting environment variables first.
pub fn load_config<T: DeserializeOwned>(path: &str) -> ConfigResult<T> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    from_str(&content, format)
}

/// Deserialize from an in-memory string with an explicit format.
pub fn from_str<T: DeserializeOwned>(content: &str, format: FileFormat) -> ConfigResult<T> {
    let substituted = substitute_env_vars(content);
    let built = Cfg::builder()
        .add_source(File::from_str(&substituted, format))
        .build()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    built
        .try_deserialize()
        .map_err(|e| ConfigError::Deserialize(e.to_string()))
}

/// Load a [`KernelConfig`] and validate it against §6's structural
/// constraints (non-empty workers, `timeout_ms >= 1000`, HTTPS-only
/// streamable endpoints).
pub fn load_kernel_config(path: &str) -> ConfigResult<KernelConfig> {
    let cfg: KernelConfig = load_config(path)?;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn validate(cfg: &KernelConfig) -> ConfigResult<()> {
    if cfg.workers.is_empty() {
        return Err(ConfigError::Invalid("workers list must be non-empty".into()));
    }
    for w in &cfg.workers {
        if w.capabilities.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "worker '{}' has no capabilities",
                w.name
            )));
        }
    }
    if cfg.bridge.timeout_ms < 1000 {
        return Err(ConfigError::Invalid(
            "bridge.options.timeout must be >= 1000ms".into(),
        ));
    }
    for http in &cfg.mcp.streamable_http {
        if !http.url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "streamable-http endpoint '{}' must use https",
                http.name
            )));
        }
    }
    Ok(())
}
