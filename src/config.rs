use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Dojo configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub log_level: LogLevel,
    pub allocation: AllocationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Saved engine state, loaded before and written after each command
    pub state: PathBuf,
    /// Directory that receives report files
    pub output: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// How a room is picked among those with space
    pub strategy: AllocationStrategy,
    /// Fixed seed for reproducible random selection
    pub seed: Option<u64>,
    /// Write state back after mutating commands
    pub autosave: bool,
}

/// Room selection strategy for automatic allocation
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AllocationStrategy {
    /// Uniformly random among rooms with space
    #[default]
    Random,
    /// Fill rooms in creation order
    Sequential,
}

/// Logging verbosity
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            log_level: LogLevel::default(),
            allocation: AllocationConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data_dir = Config::data_dir();

        Self {
            state: data_dir.join("dojo.json"),
            output: data_dir.join("output"),
        }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            strategy: AllocationStrategy::default(),
            seed: None,
            autosave: true,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check DOJO_CONFIG env var
        if let Ok(env_path) = std::env::var("DOJO_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from DOJO_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try DOJO_DIR/dojo.yaml
        if let Ok(dojo_dir) = std::env::var("DOJO_DIR") {
            let path = PathBuf::from(dojo_dir).join("dojo.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from DOJO_DIR: {}", e);
                    }
                }
            }
        }

        // Try ~/.config/dojo/dojo.yaml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("dojo").join("dojo.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./dojo.yaml (for development)
        let local_config = PathBuf::from("dojo.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Where state, reports and logs live unless configured otherwise
    pub fn data_dir() -> PathBuf {
        std::env::var("DOJO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("dojo"))
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    pub fn state_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.state)
    }

    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.output)
    }
}
