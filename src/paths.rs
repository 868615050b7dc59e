//! Configuration file locations.
//!
//! Priority:
//! 1. CLI `--config-dir`
//! 2. `VIDGET_CONFIG_DIR` environment variable
//! 3. Platform config directory from dirs-next
//!
//! Platform paths:
//! - Linux: ~/.config/vidget/{name}
//! - macOS: ~/Library/Application Support/vidget/{name}
//! - Windows: %APPDATA%\vidget\{name}

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Overrides for the default application paths.
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Resolve overrides: CLI argument wins over the environment variable.
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| {
            std::env::var("VIDGET_CONFIG_DIR").ok().map(PathBuf::from)
        });
        Self { config_dir }
    }
}

/// Path to a named configuration file.
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    config_dir(config).join(name)
}

/// Create the config directory if missing.
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    let dir = config_dir(config);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    }
    Ok(())
}

fn config_dir(config: &PathConfig) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }
    dirs_next::config_dir()
        .map(|d| d.join("vidget"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override_wins() {
        let cfg = PathConfig::from_env_and_cli(Some(PathBuf::from("/tmp/custom")));
        assert_eq!(config_file("vidget.json", &cfg), PathBuf::from("/tmp/custom/vidget.json"));
    }

    #[test]
    fn test_default_has_app_dir() {
        let cfg = PathConfig::default();
        let path = config_file("vidget.json", &cfg);
        assert!(path.to_string_lossy().contains("vidget"));
    }
}
