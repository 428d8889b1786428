//! Configuration loading: optional YAML file, then `MCP_ANYWHERE_*` env overrides.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use anywhere_common::{ConfigOverrides, GatewayConfig};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MCP_ANYWHERE_CONFIG";

/// Prefix for per-field overrides (`MCP_ANYWHERE_HOST`, ...).
pub const ENV_PREFIX: &str = "MCP_ANYWHERE_";

/// Reads `config.yaml` from disk.
///
/// The file lives outside the data directory so `reset` never removes it.
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    /// Store at `$MCP_ANYWHERE_CONFIG`, else `<config_dir>/mcp-anywhere/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the variable nor a platform config
    /// directory is available.
    pub fn from_env() -> Result<Self> {
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(Self::at(PathBuf::from(val)));
        }
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("cannot determine config directory"))?;
        Ok(Self::at(base.join("mcp-anywhere").join("config.yaml")))
    }

    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File values (or defaults when the file is absent), without env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_file(&self) -> Result<GatewayConfig> {
        if !self.path.exists() {
            return Ok(GatewayConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(GatewayConfig::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))
    }

    /// Effective configuration: file values overridden by the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or an override cannot be
    /// parsed (for example a non-numeric `MCP_ANYWHERE_PORT`).
    pub fn load(&self) -> Result<GatewayConfig> {
        let overrides = envy::prefixed(ENV_PREFIX)
            .from_env::<ConfigOverrides>()
            .context("invalid MCP_ANYWHERE_* environment override")?;
        Ok(self.load_file()?.with_overrides(overrides))
    }
}
