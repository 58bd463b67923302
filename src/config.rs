//! Runtime configuration for the command-line front end.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::level_filters::LevelFilter;

const APP_NAME: &str = "todo-board";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `todos.json` and `categories.json`.
    pub data_dir: PathBuf,
    pub log_level: LevelFilter,
}

impl Config {
    /// Resolve settings from the command-line flags.
    pub fn resolve(data_dir: Option<&Path>, verbose: u8) -> Self {
        Config {
            data_dir: data_dir.map_or_else(default_data_dir, Path::to_path_buf),
            log_level: level_for(verbose),
        }
    }
}

/// Platform data directory, falling back to `$HOME/.todo-board`, then to
/// `./.todo-board`.
pub fn default_data_dir() -> PathBuf {
    match ProjectDirs::from("", "", APP_NAME) {
        Some(proj) => proj.data_dir().to_path_buf(),
        None => home_data_dir(std::env::var_os("HOME")),
    }
}

fn home_data_dir(home: Option<OsString>) -> PathBuf {
    let hidden = format!(".{APP_NAME}");
    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(hidden),
        _ => PathBuf::from(hidden),
    }
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
