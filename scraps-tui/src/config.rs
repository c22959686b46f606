//! Configuration loading.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, environment
//! variables, command-line flags.

use std::env;
use std::fs;
use std::io::Error as IoError;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

const APP_DIR: &str = "scraps";
const CONFIG_ENV: &str = "SCRAPS_CONFIG";
const DATA_FILE_ENV: &str = "SCRAPS_DATA_FILE";
const ANIMATION_URL_ENV: &str = "SCRAPS_ANIMATION_URL";

#[derive(Debug, Parser)]
#[command(name = "scraps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Log food waste and see where it goes")]
pub(crate) struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Record file to load and append entries to
    #[arg(long, conflicts_with = "in_memory")]
    pub data_file: Option<PathBuf>,

    /// Keep entries for this session only
    #[arg(long)]
    pub in_memory: bool,

    /// Skip fetching the header animation
    #[arg(long)]
    pub no_animation: bool,
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: IoError,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub animation: AnimationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default)]
    pub in_memory: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            in_memory: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnimationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_animation_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AnimationConfig {
    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_animation_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,

    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: default_log_file(),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(|| PathBuf::from("./scraps_data"), |dir| dir.join(APP_DIR))
}

fn default_data_file() -> PathBuf {
    data_dir().join("entries.jsonl")
}

fn default_log_file() -> PathBuf {
    data_dir().join("scraps.log")
}

fn default_log_filter() -> String {
    "scraps=info".to_owned()
}

fn default_animation_url() -> String {
    scraps_lottie::DEFAULT_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    scraps_lottie::DEFAULT_TIMEOUT.as_secs()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the effective configuration for this run.
    pub(crate) fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let lookup = |key: &str| env::var(key).ok();
        let mut config = match cli.config.clone().or_else(|| lookup(CONFIG_ENV).map(PathBuf::from)) {
            Some(path) => Self::load(&path)?,
            None => match default_config_path().filter(|path| path.exists()) {
                Some(path) => Self::load(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(lookup);
        config.apply_cli(cli);
        Ok(config)
    }

    fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(data_file) = lookup(DATA_FILE_ENV) {
            self.storage.data_file = PathBuf::from(data_file);
        }
        if let Some(url) = lookup(ANIMATION_URL_ENV) {
            self.animation.url = url;
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(data_file) = &cli.data_file {
            self.storage.data_file.clone_from(data_file);
            self.storage.in_memory = false;
        }
        if cli.in_memory {
            self.storage.in_memory = true;
        }
        if cli.no_animation {
            self.animation.enabled = false;
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::iter;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(iter::once("scraps").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert!(!config.storage.in_memory);
        assert!(config.storage.data_file.ends_with("entries.jsonl"));
        assert!(config.animation.enabled);
        assert_eq!(config.animation.url, scraps_lottie::DEFAULT_URL);
        assert_eq!(config.logging.filter, "scraps=info");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [animation]
            enabled = false
            timeout_secs = 2

            [storage]
            data_file = "/tmp/waste.jsonl"
            "#,
        )
        .expect("valid toml");
        assert!(!config.animation.enabled);
        assert_eq!(config.animation.timeout(), Duration::from_secs(2));
        assert_eq!(config.animation.url, scraps_lottie::DEFAULT_URL);
        assert_eq!(config.storage.data_file, PathBuf::from("/tmp/waste.jsonl"));
        assert_eq!(config.logging.filter, "scraps=info");
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage\n").expect("write");
        let err = Config::load(&path).expect_err("broken toml");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn env_then_cli_override_file_values() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            DATA_FILE_ENV => Some("/var/scraps/env.jsonl".to_owned()),
            ANIMATION_URL_ENV => Some("http://localhost:9000/a.json".to_owned()),
            _ => None,
        });
        assert_eq!(config.storage.data_file, PathBuf::from("/var/scraps/env.jsonl"));
        assert_eq!(config.animation.url, "http://localhost:9000/a.json");

        config.apply_cli(&cli(&["--data-file", "/tmp/cli.jsonl", "--no-animation"]));
        assert_eq!(config.storage.data_file, PathBuf::from("/tmp/cli.jsonl"));
        assert!(!config.animation.enabled);

        config.apply_cli(&cli(&["--in-memory"]));
        assert!(config.storage.in_memory);
    }

    #[test]
    fn data_file_and_in_memory_conflict() {
        let parsed = Cli::try_parse_from(["scraps", "--in-memory", "--data-file", "x.jsonl"]);
        assert!(parsed.is_err());
    }
}
