use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default = "default_sidecar_extension")]
    pub sidecar_extension: String,

    /// Longest category chain accepted before a photo is reported as broken.
    #[serde(default = "default_max_tag_depth")]
    pub max_tag_depth: usize,

    /// Directory for the run log. Defaults to the user data directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

/// Settings for a single migration run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Log every skipped photo at info level instead of debug.
    pub verbose: bool,
    pub sidecar_extension: String,
    pub max_tag_depth: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            sidecar_extension: default_sidecar_extension(),
            max_tag_depth: default_max_tag_depth(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("f-spot")
        .join("photos.db")
}

fn default_sidecar_extension() -> String {
    "xmp".to_string()
}

fn default_max_tag_depth() -> usize {
    64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            sidecar_extension: default_sidecar_extension(),
            max_tag_depth: default_max_tag_depth(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load from `FSPOT_XMP_CONFIG` or the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var_os("FSPOT_XMP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(Self::config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fspot-xmp")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fspot-xmp")
                .join("logs")
        })
    }

    pub fn run_options(&self, verbose: bool) -> RunOptions {
        RunOptions {
            verbose,
            sidecar_extension: self.sidecar_extension.clone(),
            max_tag_depth: self.max_tag_depth,
        }
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
