use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// named filter texts, combined with `--filter` by `&&`
    #[serde(default)]
    pub presets: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: Settings,
}

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// exclude list used when `--exclude` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<PathBuf>,
    /// include list used when `--include` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<PathBuf>,
    /// log filter directive (e.g. "warn", "listen_filter=debug")
    #[serde(default = "default_log")]
    pub log: String,
}

fn default_log() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exclude: None,
            include: None,
            log: default_log(),
        }
    }
}
