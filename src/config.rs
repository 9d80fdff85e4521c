use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_MAX_SLEEP_SECONDS: u64 = 5;
pub const DEFAULT_TRY_SONGS: usize = 5;
pub const DEFAULT_DESTINATION_PATH: &str = "/music";
pub const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

#[derive(Debug, Clone)]
pub struct Config {
    pub listenbrainz_username: String,
    pub max_sleep: Duration,
    pub try_songs: usize,
    pub destination_path: PathBuf,
    pub ytdlp_path: PathBuf,
    pub report_dir: Option<PathBuf>,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listenbrainz_username = lookup("LISTENBRAINZ_USERNAME")
            .map(|name| name.trim().to_string())
            .unwrap_or_default();

        let max_sleep_seconds = match lookup("YTDLP_MAX_SLEEP_SECONDS") {
            Some(value) => parse_integer::<u64>("YTDLP_MAX_SLEEP_SECONDS", &value)?,
            None => DEFAULT_MAX_SLEEP_SECONDS,
        };

        let try_songs = match lookup("TRY_SONGS") {
            Some(value) => parse_integer::<usize>("TRY_SONGS", &value)?,
            None => DEFAULT_TRY_SONGS,
        };
        if try_songs == 0 {
            return Err(AppError::Config("TRY_SONGS must be at least 1".into()));
        }

        let debug = match lookup("DEBUG") {
            Some(value) => parse_bool("DEBUG", &value)?,
            None => false,
        };

        let destination_path = lookup("DESTINATION_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DESTINATION_PATH));
        // Every path derived from the root (yt-dlp output, playlist entries) must be absolute.
        let destination_path = std::path::absolute(&destination_path).map_err(|e| {
            AppError::Config(format!(
                "Cannot resolve destination path {}: {}",
                destination_path.display(),
                e
            ))
        })?;

        let ytdlp_path = lookup("YTDLP_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_YTDLP_PATH));

        let report_dir = lookup("SYNC_REPORT_DIR")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listenbrainz_username,
            max_sleep: Duration::from_secs(max_sleep_seconds),
            try_songs,
            destination_path,
            ytdlp_path,
            report_dir,
            debug,
        })
    }

    pub fn get_missing_config(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.listenbrainz_username.is_empty() {
            missing.push("LISTENBRAINZ_USERNAME".to_string());
        }

        missing
    }

    /// Checks everything that must hold before the first playlist is touched.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.get_missing_config().first() {
            return Err(AppError::Config(format!("{} not set", name)));
        }

        ensure_directory(&self.destination_path)?;

        which::which(&self.ytdlp_path).map_err(|e| {
            AppError::Config(format!(
                "{} not found ({}). Install yt-dlp or set YTDLP_PATH.",
                self.ytdlp_path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Destination path {} does not exist",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(AppError::Config(format!(
            "Destination path {} is not a directory",
            path.display()
        )));
    }
    Ok(())
}

fn parse_integer<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be an integer, got '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(AppError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, value
        ))),
    }
}
