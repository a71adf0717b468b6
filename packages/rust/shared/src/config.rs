//! Application configuration for keypeople.
//!
//! User config lives at `~/.keypeople/keypeople.toml`. API keys and
//! endpoint URLs are never stored in the file; the config names the
//! environment variables that hold them. CLI flags override config
//! file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KeyPeopleError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "keypeople.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".keypeople";

// ---------------------------------------------------------------------------
// Config structs (matching keypeople.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Corporate-intelligence GraphQL API settings.
    #[serde(default)]
    pub graph: GraphConfig,

    /// Watchlist search API settings.
    #[serde(default)]
    pub watchlist: WatchlistConfig,

    /// Beneficial-owner filter settings.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Report output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// `[graph]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_graph_key_env")]
    pub api_key_env: String,

    /// Name of the env var holding the GraphQL endpoint URL.
    #[serde(default = "default_graph_url_env")]
    pub endpoint_env: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_graph_key_env(),
            endpoint_env: default_graph_url_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_graph_key_env() -> String {
    "KEY_CRAFT_SOLENG".into()
}
fn default_graph_url_env() -> String {
    "URL_CRAFT_QUERY".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[watchlist]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_watchlist_key_env")]
    pub api_key_env: String,

    /// Name of the env var holding the individual-search endpoint URL.
    #[serde(default = "default_watchlist_url_env")]
    pub endpoint_env: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum match score requested from the search API.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: u32,

    /// Country codes included in every search payload.
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,

    /// Watchlist datasets included in every search payload.
    #[serde(default = "default_datasets")]
    pub datasets: Vec<String>,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_watchlist_key_env(),
            endpoint_env: default_watchlist_url_env(),
            timeout_secs: default_timeout_secs(),
            match_threshold: default_match_threshold(),
            countries: default_countries(),
            datasets: default_datasets(),
        }
    }
}

fn default_watchlist_key_env() -> String {
    "KEY_ACURIS_TEST".into()
}
fn default_watchlist_url_env() -> String {
    "URL_ACURIS_INDIVIDUAL".into()
}
fn default_match_threshold() -> u32 {
    95
}
fn default_countries() -> Vec<String> {
    ["CN", "US", "TW", "HK"].map(String::from).to_vec()
}
fn default_datasets() -> Vec<String> {
    [
        "PEP-CURRENT",
        "PEP-FORMER",
        "PEP-LINKED",
        "SAN-CURRENT",
        "SAN-FORMER",
        "RRE",
        "POI",
        "REL",
    ]
    .map(String::from)
    .to_vec()
}

/// `[filter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Minimum ownership percentage an individual must exceed to be
    /// screened. 0.0 means "has any recorded stake".
    #[serde(default = "default_ownership_threshold")]
    pub ownership_threshold: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ownership_threshold: default_ownership_threshold(),
        }
    }
}

fn default_ownership_threshold() -> f64 {
    0.0
}

/// `[report]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default directory for rendered report files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "~/keypeople-reports".into()
}

// ---------------------------------------------------------------------------
// Resolved credentials (runtime, read from the environment)
// ---------------------------------------------------------------------------

/// API keys and endpoint URLs resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// GraphQL endpoint URL.
    pub graph_url: String,
    /// GraphQL API key.
    pub graph_key: String,
    /// Watchlist search endpoint URL.
    pub watchlist_url: String,
    /// Watchlist API key.
    pub watchlist_key: String,
}

/// Resolve credentials from the env vars named in the config.
///
/// Fails with a single config error naming every missing variable so the
/// user can fix them all at once. Runs before any network call.
pub fn resolve_credentials(config: &AppConfig) -> Result<Credentials> {
    let mut missing: Vec<&str> = Vec::new();

    let graph_key = lookup_env(&config.graph.api_key_env, &mut missing);
    let graph_url = lookup_env(&config.graph.endpoint_env, &mut missing);
    let watchlist_key = lookup_env(&config.watchlist.api_key_env, &mut missing);
    let watchlist_url = lookup_env(&config.watchlist.endpoint_env, &mut missing);

    if !missing.is_empty() {
        return Err(KeyPeopleError::config(format!(
            "missing required environment variables: {}",
            missing.join(", ")
        )));
    }

    Ok(Credentials {
        graph_url: graph_url.unwrap_or_default(),
        graph_key: graph_key.unwrap_or_default(),
        watchlist_url: watchlist_url.unwrap_or_default(),
        watchlist_key: watchlist_key.unwrap_or_default(),
    })
}

fn lookup_env<'a>(var: &'a str, missing: &mut Vec<&'a str>) -> Option<String> {
    match std::env::var(var) {
        Ok(val) if !val.is_empty() => Some(val),
        _ => {
            missing.push(var);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.keypeople/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| KeyPeopleError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.keypeople/keypeople.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| KeyPeopleError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        KeyPeopleError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| KeyPeopleError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| KeyPeopleError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| KeyPeopleError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("KEY_CRAFT_SOLENG"));
        assert!(toml_str.contains("KEY_ACURIS_TEST"));
        assert!(toml_str.contains("ownership_threshold"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.watchlist.match_threshold, 95);
        assert_eq!(parsed.watchlist.countries, vec!["CN", "US", "TW", "HK"]);
        assert_eq!(parsed.filter.ownership_threshold, 0.0);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[filter]
ownership_threshold = 1.0

[watchlist]
countries = ["GB"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.filter.ownership_threshold, 1.0);
        assert_eq!(config.watchlist.countries, vec!["GB"]);
        // untouched sections keep their defaults
        assert_eq!(config.watchlist.match_threshold, 95);
        assert_eq!(config.watchlist.datasets.len(), 8);
        assert_eq!(config.graph.timeout_secs, 30);
    }

    #[test]
    fn missing_env_vars_reported_together() {
        let mut config = AppConfig::default();
        // Unique env var names to avoid interfering with other tests
        config.graph.api_key_env = "KP_TEST_NONEXISTENT_GRAPH_KEY".into();
        config.graph.endpoint_env = "KP_TEST_NONEXISTENT_GRAPH_URL".into();
        config.watchlist.api_key_env = "KP_TEST_NONEXISTENT_WL_KEY".into();
        config.watchlist.endpoint_env = "KP_TEST_NONEXISTENT_WL_URL".into();

        let err = resolve_credentials(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("KP_TEST_NONEXISTENT_GRAPH_KEY"));
        assert!(msg.contains("KP_TEST_NONEXISTENT_GRAPH_URL"));
        assert!(msg.contains("KP_TEST_NONEXISTENT_WL_KEY"));
        assert!(msg.contains("KP_TEST_NONEXISTENT_WL_URL"));
    }
}
