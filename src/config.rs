use crate::roster::{SortConfig, SortDirection, SortKey};
use anyhow::{anyhow, Context};
use serde::Serialize;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::OpenOptions;
use std::path::PathBuf;

const LOG_LEVEL_VAR: &str = "ACADEMYD_LOG";
const LOG_FILE_VAR: &str = "ACADEMYD_LOG_FILE";

/// Process settings read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct DaemonConfig {
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Warn,
            log_file: None,
        }
    }
}

impl DaemonConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(LOG_LEVEL_VAR) {
            cfg.log_level = parse_level(&raw)
                .ok_or_else(|| anyhow!("{} has unknown level: {}", LOG_LEVEL_VAR, raw))?;
        }
        if let Some(path) = lookup(LOG_FILE_VAR).filter(|p| !p.trim().is_empty()) {
            cfg.log_file = Some(PathBuf::from(path));
        }
        Ok(cfg)
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Stdout carries IPC responses, so logs go to stderr or a file.
pub fn init_logging(cfg: &DaemonConfig) -> anyhow::Result<()> {
    let installed = match &cfg.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.to_string_lossy()))?;
            WriteLogger::init(cfg.log_level, Config::default(), file)
        }
        None => WriteLogger::init(cfg.log_level, Config::default(), std::io::stderr()),
    };
    installed.context("failed to install logger")
}

/// Runtime settings for the roster screen (`setup.*` section `roster`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSettings {
    pub default_sort_key: SortKey,
    pub default_sort_direction: SortDirection,
}

impl Default for RosterSettings {
    fn default() -> Self {
        let sort = SortConfig::default();
        Self {
            default_sort_key: sort.key,
            default_sort_direction: sort.direction,
        }
    }
}

impl RosterSettings {
    pub fn default_sort(&self) -> SortConfig {
        SortConfig {
            key: self.default_sort_key,
            direction: self.default_sort_direction,
        }
    }
}
