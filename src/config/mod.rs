mod schema;

pub use schema::{Config, Settings, DEFAULT_LOG_LEVEL};

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::expr::{self, FilterOptions, ListSource, CONJUNCTION};

const CONFIG_ENV_VAR: &str = "LISTEN_FILTER_CONFIG";

/// resolve the config path: explicit override, then env var, then
/// `~/.listen-filter/config.json`
pub fn get_config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .join(".listen-filter")
        .join("config.json"))
}

/// load config, falling back to defaults when the file does not exist
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

pub fn save(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    let mut errors = Vec::new();

    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid JSON: {}", e));
        }
    };

    for (name, text) in &config.presets {
        if let Err(e) = expr::parse_filter(text) {
            errors.push(format!("presets.{}: {}", name, e));
        }
    }

    let lists = [
        ("settings.exclude", &config.settings.exclude),
        ("settings.include", &config.settings.include),
    ];
    for (field, list) in lists {
        if let Some(list_path) = list {
            if let Err(e) = ListSource::from_path(list_path).and_then(|s| s.entries()) {
                errors.push(format!("{}: {}", field, e));
            }
        }
    }

    if let Err(e) = tracing_subscriber::EnvFilter::try_new(&config.settings.log) {
        errors.push(format!("settings.log: {}", e));
    }

    Ok(errors)
}

/// set a config value by dotted key
pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.splitn(2, '.').collect();

    match parts.as_slice() {
        ["settings", "exclude"] => {
            config.settings.exclude = optional_path(value);
        }
        ["settings", "include"] => {
            config.settings.include = optional_path(value);
        }
        ["settings", "log"] => {
            config.settings.log = value.to_string();
        }
        ["presets", name] if !name.is_empty() => {
            if value.is_empty() {
                config.presets.remove(*name);
            } else {
                expr::parse_filter(value)
                    .with_context(|| format!("Invalid filter for preset '{}'", name))?;
                config.presets.insert(name.to_string(), value.to_string());
            }
        }
        _ => {
            return Err(anyhow!(
                "Unknown config key: {}. Valid keys: settings.exclude, settings.include, settings.log, presets.<name>",
                key
            ));
        }
    }

    Ok(())
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// join the filter text with the named presets
pub fn combine_filter(config: &Config, filter: Option<&str>, presets: &[String]) -> Result<Option<String>> {
    let mut parts: Vec<&str> = Vec::new();

    for name in presets {
        let text = config
            .presets
            .get(name)
            .ok_or_else(|| anyhow!("Unknown preset: {}", name))?;
        parts.push(text);
    }
    parts.extend(filter);
    parts.retain(|p| !p.trim().is_empty());

    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts.join(CONJUNCTION)))
    }
}

/// load list sources, letting explicit paths override the config defaults
pub fn resolve_lists(
    config: &Config,
    options: FilterOptions,
    exclude: Option<&Path>,
    include: Option<&Path>,
) -> Result<FilterOptions> {
    let mut options = options;

    if let Some(path) = exclude.or(config.settings.exclude.as_deref()) {
        options = options.with_exclude(ListSource::from_path(path)?);
    }
    if let Some(path) = include.or(config.settings.include.as_deref()) {
        options = options.with_include(ListSource::from_path(path)?);
    }

    Ok(options)
}
