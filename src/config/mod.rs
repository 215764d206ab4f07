mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variables that override values from the config file.
pub const ENV_API_KEY: &str = "TMDB_API_KEY";
pub const ENV_BASE_URL: &str = "TMDB_BASE_URL";
pub const ENV_STORE_URI: &str = "MONGO_URI";
pub const ENV_DATABASE: &str = "MOVIE_DB_NAME";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or fall back to defaults.
///
/// Environment overrides and validation apply in every case.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./catalog-ingest.toml",
        "~/.config/catalog-ingest/config.toml",
        "/etc/catalog-ingest/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides from `lookup`; empty values are ignored.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_API_KEY) {
        config.tmdb.api_key = v;
    }
    if let Some(v) = get(ENV_BASE_URL) {
        config.tmdb.base_url = v;
    }
    if let Some(v) = get(ENV_STORE_URI) {
        config.store.uri = v;
    }
    if let Some(v) = get(ENV_DATABASE) {
        config.store.database = v;
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.tmdb.api_key.trim().is_empty() {
        anyhow::bail!(
            "TMDB API key is not set (tmdb.api_key or {})",
            ENV_API_KEY
        );
    }

    let base = config.tmdb.base_url.trim();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        anyhow::bail!("tmdb.base_url must be an http(s) URL: {:?}", base);
    }

    if config.store.uri.trim().is_empty() {
        anyhow::bail!("store.uri is empty");
    }

    if config.store.database.trim().is_empty() {
        anyhow::bail!("store.database is empty");
    }

    Ok(())
}

/// Render an API key for display, keeping only its last four characters.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
