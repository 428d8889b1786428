use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bind address used by both transports when nothing else is configured.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Port used by both transports when nothing else is configured.
pub const DEFAULT_PORT: i64 = 8000;

/// SQLite database file name inside the data directory.
pub const DATABASE_FILE: &str = "mcp_anywhere.db";

/// Gateway configuration.
///
/// Loaded from `config.yaml` and then overridden by `MCP_ANYWHERE_*`
/// environment variables. Every field has a default so an absent file is
/// equivalent to an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Default host for `serve http` / `serve stdio` and the `connect` target.
    pub host: String,

    /// Default port. Kept as a plain integer; range checks belong to the
    /// transport that binds it.
    pub port: i64,

    /// Root of all resettable state (database, build cache, logs).
    pub data_dir: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: default_data_dir(),
        }
    }
}

impl GatewayConfig {
    /// Path of the SQLite database file.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Directory for tool-server container logs.
    #[must_use]
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Apply environment overrides on top of file/default values.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = data_dir;
        }
        self
    }
}

/// Environment overrides.
///
/// Each field maps to `MCP_ANYWHERE_<FIELD>`:
///   - `MCP_ANYWHERE_HOST`
///   - `MCP_ANYWHERE_PORT`
///   - `MCP_ANYWHERE_DATA_DIR`
#[derive(Debug, Default, Deserialize)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<i64>,
    pub data_dir: Option<PathBuf>,
}

/// `~/.mcp-anywhere`, or `.data` relative to the working directory when no
/// home directory can be determined.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".data"), |home| home.join(".mcp-anywhere"))
}
