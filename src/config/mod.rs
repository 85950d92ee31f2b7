mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./streamforge.toml", "~/.config/streamforge/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.parser.chunk_size == Some(0) {
        anyhow::bail!("parser.chunk_size must be greater than 0");
    }

    if let Some(base_url) = &config.parser.base_url {
        url::Url::parse(base_url)
            .with_context(|| format!("parser.base_url is not an absolute URL: {base_url}"))?;
    }

    if !config.parser.base_time.is_finite() {
        anyhow::bail!("parser.base_time must be a finite number");
    }

    for tag in &config.parser.ignore_tags {
        if tag.trim().is_empty() {
            anyhow::bail!("parser.ignore_tags contains an empty entry");
        }
    }

    for name in config.define.keys() {
        if name.is_empty() || name.contains(['{', '}', '$']) {
            anyhow::bail!("Invalid define name: {:?}", name);
        }
    }

    Ok(())
}
