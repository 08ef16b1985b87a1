//! SVCS configuration types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::types::{Result, SvcsError};

/// Environment variable overriding the store root.
pub const ROOT_ENV_VAR: &str = "SVCS_ROOT";

/// Default store directory name inside the user's home directory.
pub const DEFAULT_ROOT_DIR_NAME: &str = ".svcs";

const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

/// Store configuration, optionally stored in `svcs.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding every repository.
    pub root: PathBuf,

    /// How long to wait for a repository lock before giving up.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

impl Config {
    /// Create a configuration for the given store root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// Set the lock timeout.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Lock timeout as a [`Duration`].
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Default store root: `~/.svcs`.
    pub fn default_root() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_ROOT_DIR_NAME))
            .ok_or_else(|| SvcsError::config("cannot determine home directory"))
    }

    /// Default location of the configuration file (`<config_dir>/svcs/svcs.toml`).
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("svcs").join(Self::config_filename()))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        log::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        log::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Resolve the effective configuration.
    ///
    /// Precedence: explicit root, then `SVCS_ROOT`, then the config file at
    /// [`Config::default_config_path`], then [`Config::default_root`].
    pub fn resolve(explicit_root: Option<PathBuf>) -> Result<Self> {
        let env_root = std::env::var_os(ROOT_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve_from(explicit_root, env_root, Self::default_config_path())
    }

    fn resolve_from(
        explicit_root: Option<PathBuf>,
        env_root: Option<PathBuf>,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let file_config = match config_path {
            Some(path) if path.is_file() => Some(Self::load(&path)?),
            _ => None,
        };
        let lock_timeout_ms = file_config
            .as_ref()
            .map_or(DEFAULT_LOCK_TIMEOUT_MS, |c| c.lock_timeout_ms);

        let root = match (explicit_root, env_root, file_config) {
            (Some(root), _, _) => root,
            (None, Some(root), _) => root,
            (None, None, Some(config)) => config.root,
            (None, None, None) => Self::default_root()?,
        };
        log::debug!("Resolved store root: {}", root.display());

        Ok(Self {
            root,
            lock_timeout_ms,
        })
    }

    /// Get the default config file name.
    pub const fn config_filename() -> &'static str {
        "svcs.toml"
    }
}
