//! Configuration options

use crate::{core::DIAGNOSTIC_LOG_NAME, utils::deserialize_shellexpand};
use anyhow::{Context, Result};
use colored::Colorize;
use directories::BaseDirs;
use format_serde_error::SerdeError;
use serde::Deserialize;
use std::{
    env,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Configuration file name
const CONFIG_FILE: &str = "bwm.yml";

// =============== GlobalSettings ================= [[[

/// Global configuration settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct GlobalSettings {
    /// Whether logs should be written to a file
    #[serde(alias = "log-to-file")]
    pub(crate) log_to_file: bool,

    /// The directory to write the log to
    #[serde(alias = "log-dir", deserialize_with = "deserialize_shellexpand")]
    pub(crate) log_dir: Option<PathBuf>,

    /// File receiving diagnostic checkpoints. Truncated at startup
    #[serde(alias = "diagnostic-log", deserialize_with = "deserialize_shellexpand")]
    pub(crate) diagnostic_log: Option<PathBuf>,

    // ====================== Window Manager Specific ======================
    /// Size of the border around each frame
    #[serde(alias = "border-width")]
    pub(crate) border_width: u16,

    /// Color of the border of each frame
    #[serde(alias = "border-color")]
    pub(crate) border_color: String,

    /// Color filling each frame
    #[serde(alias = "background-color")]
    pub(crate) background_color: String,
} // ]]] === Global Settings ===

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            log_to_file:    false,
            log_dir:        None,
            diagnostic_log: None,

            border_width:     3_u16,
            border_color:     String::from("#ff0000"),
            background_color: String::from("#0000ff"),
        }
    }
}

// =================== Config ===================== [[[

/// Configuration file to parse
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct Config {
    /// Global settings
    #[serde(flatten)]
    pub(crate) global: GlobalSettings,
}

impl Config {
    /// Create the default configuration file inside `path` if it is missing,
    /// then load it
    pub(crate) fn create_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!("Creating configuration path: {}", path.display());
            fs::create_dir_all(path).context("unable to create configuration directory")?;
        }

        let path = path.join(CONFIG_FILE);
        log::debug!("{}: {}", "Configuration path".bright_blue(), path.display());

        if !path.is_file() {
            let initialization = include_str!("../example/bwm.yml");

            let mut config_file: fs::File = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .open(&path)
                .with_context(|| format!("could not create bwm config: '{}'", path.display()))?;

            config_file
                .write_all(initialization.as_bytes())
                .with_context(|| format!("could not create bwm config: '{}'", path.display()))?;
            config_file.flush()?;
        }

        Self::load(path)
    }

    /// Load the configuration file from a given path
    pub(crate) fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: '{}'", path.display()))?;
        let res = serde_yaml::from_str(&file).map_err(|e| SerdeError::new(file, e))?;

        Ok(res)
    }

    /// Load the default configuration file
    pub(crate) fn load_default() -> Result<Self> {
        let dirs = BwmDirs::new().context("could not detect user home directory")?;
        let path = dirs.config_dir();
        log::debug!("loading default config: {}", path.display());
        Self::create_default(path)
    }

    /// Load the file given on the command line, else the default one
    pub(crate) fn load_from(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(Self::load_default, Self::load)
    }

    /// Where diagnostic checkpoints are written. `cli` takes precedence over
    /// the configured value
    pub(crate) fn diagnostic_log(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.global.diagnostic_log.clone())
            .unwrap_or_else(|| PathBuf::from(DIAGNOSTIC_LOG_NAME))
    }
} // ]]] === Config ===

// ================ Project Dirs ================== [[[

/// The project directories relevant to [`bwm`]
#[derive(Debug, Clone)]
pub(crate) struct BwmDirs {
    /// User's `$XDG_CONFIG_HOME/bwm` directory
    config_dir: PathBuf,
}

impl BwmDirs {
    /// Create a new [`BwmDirs`]
    fn new() -> Option<Self> {
        Some(Self {
            config_dir: Self::get_dir("BWM_CONFIG_DIR", "XDG_CONFIG_HOME", ".config")?,
        })
    }

    /// Wrapper function that makes it easier to get directories
    fn get_dir(env_var: &str, var: &str, join: &str) -> Option<PathBuf> {
        env::var_os(env_var).map(PathBuf::from).map_or_else(
            || {
                env::var_os(var)
                    .map(PathBuf::from)
                    .filter(|p| p.is_absolute())
                    .or_else(|| BaseDirs::new().map(|p| p.home_dir().join(join)))
                    .map(|p| p.join(env!("CARGO_PKG_NAME")))
            },
            |v| {
                // Custom env var is set
                if v.is_absolute() {
                    Some(v)
                } else {
                    BaseDirs::new()
                        .map(|p| p.home_dir().join(join))
                        .map(|p| p.join(env!("CARGO_PKG_NAME")))
                }
            },
        )
    }

    /// Get configuration directory
    #[must_use]
    pub(crate) fn config_dir(&self) -> &Path {
        &self.config_dir
    }
} // ]]] === Project Dirs ===
