/// Configuration system for checkrr-dash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: [`schema::DashConfig::default()`]
/// 2. **User global config**: `~/.checkrr-dash/config.toml`
/// 3. **Project local config**: `.checkrr-dash.toml` in the current directory
/// 4. **Environment variables**: `CHECKRR_DASH_*` overrides
///
/// The CLI `--url` flag is applied on top by the binary.
///
/// # Usage
///
/// ```rust,ignore
/// use checkrr_dash::config;
///
/// let cfg = config::load();
/// let interval = cfg.polling.interval();
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::{DashConfig, LogLevel};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges defaults → global TOML → project TOML → env vars. Malformed files
/// are skipped with a warning rather than aborting.
pub fn load() -> DashConfig {
    let layers: Vec<toml::Table> = [global_config_path(), project_config_path()]
        .into_iter()
        .filter_map(load_toml_file)
        .collect();
    let mut config = resolve(&layers);

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config
}

/// Read one config layer, keeping only the keys the file actually sets.
///
/// A file that is not valid TOML, or does not describe a valid config, is
/// skipped.
fn load_toml_file(path: Option<PathBuf>) -> Option<toml::Table> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    match parse_layer(&content) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "ignoring malformed config file");
            None
        }
    }
}

fn parse_layer(content: &str) -> Result<toml::Table> {
    let table: toml::Table = toml::from_str(content).context("not valid TOML")?;
    let _: DashConfig = toml::from_str(content).context("not a valid checkrr-dash config")?;
    Ok(table)
}

/// Apply `layers` in order on top of the built-in defaults.
fn resolve(layers: &[toml::Table]) -> DashConfig {
    let mut merged = match toml::Value::try_from(DashConfig::default()) {
        Ok(toml::Value::Table(table)) => table,
        Ok(_) => return DashConfig::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize default config");
            return DashConfig::default();
        }
    };
    for layer in layers {
        merge_table(&mut merged, layer);
    }
    match toml::Value::Table(merged).try_into() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "merged config is invalid; using defaults");
            DashConfig::default()
        }
    }
}

/// Overlay `overlay` onto `base`: nested tables merge key by key, any other
/// value replaces the base value.
fn merge_table(base: &mut toml::Table, overlay: &toml::Table) {
    for (key, value) in overlay {
        if let (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) =
            (base.get_mut(key), value)
        {
            merge_table(base_table, overlay_table);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.checkrr-dash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".checkrr-dash").join("config.toml"))
}

/// `.checkrr-dash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".checkrr-dash.toml"))
}

/// Path of the global config file, for display.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment overrides (highest precedence layer).
///
/// Supported variables:
/// - `CHECKRR_DASH_URL`: backend base URL
/// - `CHECKRR_DASH_INTERVAL_SECS`: polling interval in seconds
/// - `CHECKRR_DASH_ADDR`: listen address for `serve`
/// - `CHECKRR_DASH_LOG`: log level
fn apply_env_overrides(config: &mut DashConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("CHECKRR_DASH_URL")
        && !val.trim().is_empty()
    {
        config.server.base_url = val.trim().to_string();
    }
    if let Some(val) = var("CHECKRR_DASH_INTERVAL_SECS")
        && let Ok(secs) = val.trim().parse::<u64>()
    {
        config.polling.interval_secs = secs;
    }
    if let Some(val) = var("CHECKRR_DASH_ADDR")
        && !val.trim().is_empty()
    {
        config.web.addr = val.trim().to_string();
    }
    if let Some(val) = var("CHECKRR_DASH_LOG")
        && let Some(level) = parse_level(&val)
    {
        config.logging.level = level;
    }
}

/// Parse a log level name.
pub fn parse_level(val: &str) -> Option<LogLevel> {
    match val.trim().to_ascii_lowercase().as_str() {
        "error" => Some(LogLevel::Error),
        "warn" | "warning" => Some(LogLevel::Warn),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        "trace" => Some(LogLevel::Trace),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.checkrr-dash/config.toml`.
///
/// Fails if the file already exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.checkrr-dash/ directory")?;
    }

    fs::write(&path, DashConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set one dotted key (`polling.interval_secs`) in the global config file.
///
/// Starts from the existing file, or from the defaults when there is none,
/// and keeps the type of the value being replaced.
pub fn set_config_value(key: &str, value: &str) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    let current = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&DashConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&current).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    let updated = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    // Reject edits that would no longer load, e.g. an unknown log level.
    let _: DashConfig = toml::from_str(&updated)
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, updated).context("failed to write config file")?;

    Ok(path)
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("invalid config key '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];
    let table = current
        .as_table_mut()
        .with_context(|| format!("expected a table above '{key}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("config key '{key}' cannot be set from the command line"),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = DashConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("CHECKRR_DASH_URL", "http://nas:8585/checkrr/"),
                ("CHECKRR_DASH_INTERVAL_SECS", "30"),
                ("CHECKRR_DASH_ADDR", "0.0.0.0:9000"),
                ("CHECKRR_DASH_LOG", "DEBUG"),
            ]),
        );
        assert_eq!(config.server.base_url, "http://nas:8585/checkrr/");
        assert_eq!(config.polling.interval_secs, 30);
        assert_eq!(config.web.addr, "0.0.0.0:9000");
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut config = DashConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("CHECKRR_DASH_URL", "  "),
                ("CHECKRR_DASH_INTERVAL_SECS", "soon"),
                ("CHECKRR_DASH_LOG", "loud"),
            ]),
        );
        assert_eq!(config, DashConfig::default());
    }

    #[test]
    fn parse_level_handles_variants() {
        assert_eq!(parse_level("warning"), Some(LogLevel::Warn));
        assert_eq!(parse_level(" Trace "), Some(LogLevel::Trace));
        assert_eq!(parse_level("verbose"), None);
    }

    fn layer(content: &str) -> toml::Table {
        parse_layer(content).unwrap()
    }

    #[test]
    fn later_layer_only_overrides_keys_it_sets() {
        let global = layer("[server]\nbase_url = \"http://nas:8585/checkrr/\"\n[logging]\nlevel = \"info\"\n");
        let project = layer("[polling]\ninterval_secs = 30\n");

        let config = resolve(&[global, project]);
        assert_eq!(config.server.base_url, "http://nas:8585/checkrr/");
        assert_eq!(config.polling.interval_secs, 30);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.web, DashConfig::default().web);
    }

    #[test]
    fn later_layer_wins_on_shared_keys() {
        let global = layer("[server]\nbase_url = \"http://a:8585/\"\n");
        let project = layer("[server]\nbase_url = \"http://b:8585/\"\n");
        assert_eq!(resolve(&[global, project]).server.base_url, "http://b:8585/");
    }

    #[test]
    fn no_layers_is_default() {
        assert_eq!(resolve(&[]), DashConfig::default());
    }

    #[test]
    fn invalid_layer_is_rejected() {
        assert!(parse_layer("[logging]\nlevel = \"loud\"\n").is_err());
        assert!(parse_layer("[server\n").is_err());
    }

    #[test]
    fn set_toml_value_rejects_non_scalar_keys() {
        let mut root: toml::Value = toml::from_str("[web]\nopen = true\n").unwrap();
        assert!(set_toml_value(&mut root, "web.open", "yes").is_err());
        assert!(set_toml_value(&mut root, "web", "x").is_err());
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value =
            toml::from_str("[server]\nbase_url = \"http://a/\"\n").unwrap();
        set_toml_value(&mut root, "server.base_url", "http://b:8585/").unwrap();
        assert_eq!(root["server"]["base_url"].as_str(), Some("http://b:8585/"));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let mut root: toml::Value = toml::from_str("[polling]\ninterval_secs = 10\n").unwrap();
        set_toml_value(&mut root, "polling.interval_secs", "5").unwrap();
        assert_eq!(root["polling"]["interval_secs"].as_integer(), Some(5));
    }

    #[test]
    fn set_toml_value_rejects_bad_integer() {
        let mut root: toml::Value = toml::from_str("[polling]\ninterval_secs = 10\n").unwrap();
        assert!(set_toml_value(&mut root, "polling.interval_secs", "fast").is_err());
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root: toml::Value = toml::from_str("[polling]\ninterval_secs = 10\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "1").is_err());
        assert!(set_toml_value(&mut root, "polling.cadence", "1").is_err());
        assert!(set_toml_value(&mut root, "polling.", "1").is_err());
    }

    #[test]
    fn show_effective_config_round_trips() {
        let toml_str = show_effective_config().unwrap();
        let _: DashConfig = toml::from_str(&toml_str).unwrap();
    }
}
