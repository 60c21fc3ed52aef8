use crate::error::Error;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::error;

pub const DEFAULT_WATCH_LIST: &str = "watch_dirs.txt";
pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 20;
pub const MIN_RETRY_INTERVAL_SECS: u64 = 1;

fn default_watch_list() -> String {
    DEFAULT_WATCH_LIST.to_string()
}

fn default_retry_interval_secs() -> u64 {
    DEFAULT_RETRY_INTERVAL_SECS
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Plain-text file listing one watched directory per line.
    #[serde(default = "default_watch_list")]
    pub watch_list: String,
    /// Idle time between retry sweeps.
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watch_list: default_watch_list(),
            retry_interval_secs: default_retry_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Clamped to at least [`MIN_RETRY_INTERVAL_SECS`].
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs.max(MIN_RETRY_INTERVAL_SECS))
    }

    pub fn watch_list_path(&self) -> PathBuf {
        PathBuf::from(&self.watch_list)
    }
}

/// Settings come from an optional `Config.*` file next to the process, overridden by
/// `DATESTAMP_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, Error> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("DATESTAMP"))
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}

/// Read the watch list: one directory per non-empty line, in file order.
pub fn load_watch_dirs(path: &Path) -> Result<Vec<PathBuf>, Error> {
    let contents = fs::read_to_string(path).map_err(|source| Error::WatchList {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_watch_dirs(&contents))
}

/// Like [`load_watch_dirs`], but a missing or unreadable list is logged and treated as empty.
pub fn load_watch_dirs_or_empty(path: &Path) -> Vec<PathBuf> {
    match load_watch_dirs(path) {
        Ok(dirs) => dirs,
        Err(err) => {
            error!("{}; continuing with no watched directories", err);
            Vec::new()
        }
    }
}

pub fn parse_watch_dirs(contents: &str) -> Vec<PathBuf> {
    let dirs = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect();
    distinct_directories(dirs)
}

/// Collapse repeated entries so each directory gets a single watch. First occurrence keeps its place.
pub fn distinct_directories(dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::with_capacity(dirs.len());

    for dir in dirs {
        if !result.iter().any(|seen| seen == &dir) {
            result.push(dir);
        }
    }

    result
}
