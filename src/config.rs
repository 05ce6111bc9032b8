//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Storefront base URL override (staging or test servers)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Base delay between requests in milliseconds
    #[serde(default)]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default)]
    pub delay_jitter_ms: u64,

    /// Whether the response cache is consulted at all
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Cache expiry in seconds
    #[serde(default = "default_cache_expire_secs")]
    pub cache_expire_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_expire_secs() -> u64 {
    24 * 60 * 60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            proxy: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            delay_ms: 0,
            delay_jitter_ms: 0,
            cache_enabled: default_cache_enabled(),
            cache_expire_secs: default_cache_expire_secs(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("gobilda-quoter").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("GOBILDA_BASE_URL") {
            self.base_url = Some(base_url);
        }

        if let Ok(proxy) = std::env::var("GOBILDA_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("GOBILDA_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.base_url.is_none());
        assert!(config.proxy.is_none());
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.delay_jitter_ms, 0);
        assert!(config.cache_enabled);
        assert_eq!(config.cache_expire_secs, 86400);
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            proxy = "socks5://localhost:1080"
            timeout_secs = 15
            cache_enabled = false
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.proxy, Some("socks5://localhost:1080".to_string()));
        assert_eq!(config.timeout_secs, 15);
        assert!(!config.cache_enabled);
        // Unset fields keep defaults
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.cache_expire_secs, 86400);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            base_url = "http://staging.local"
            delay_ms = 500
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, Some("http://staging.local".to_string()));
        assert_eq!(config.delay_ms, 500);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/config.toml");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let result = Config::from_file(file.path());
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            timeout_secs = 5
            "#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_config_with_env() {
        let orig_proxy = std::env::var("GOBILDA_PROXY").ok();
        let orig_delay = std::env::var("GOBILDA_DELAY").ok();

        std::env::set_var("GOBILDA_PROXY", "http://proxy:8080");
        std::env::set_var("GOBILDA_DELAY", "750");

        let config = Config::new().with_env();
        assert_eq!(config.proxy, Some("http://proxy:8080".to_string()));
        assert_eq!(config.delay_ms, 750);

        match orig_proxy {
            Some(v) => std::env::set_var("GOBILDA_PROXY", v),
            None => std::env::remove_var("GOBILDA_PROXY"),
        }
        match orig_delay {
            Some(v) => std::env::set_var("GOBILDA_DELAY", v),
            None => std::env::remove_var("GOBILDA_DELAY"),
        }
    }

    #[test]
    fn test_config_with_env_invalid_delay() {
        let orig_delay = std::env::var("GOBILDA_DELAY").ok();

        std::env::set_var("GOBILDA_DELAY", "not_a_number");

        let config = Config::new().with_env();
        assert_eq!(config.delay_ms, 0);

        match orig_delay {
            Some(v) => std::env::set_var("GOBILDA_DELAY", v),
            None => std::env::remove_var("GOBILDA_DELAY"),
        }
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            base_url: Some("http://staging.local".to_string()),
            proxy: Some("socks5://localhost:1080".to_string()),
            timeout_secs: 20,
            connect_timeout_secs: 5,
            delay_ms: 100,
            delay_jitter_ms: 50,
            cache_enabled: false,
            cache_expire_secs: 600,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.base_url, config.base_url);
        assert_eq!(parsed.proxy, config.proxy);
        assert_eq!(parsed.timeout_secs, config.timeout_secs);
        assert_eq!(parsed.cache_enabled, config.cache_enabled);
        assert_eq!(parsed.cache_expire_secs, config.cache_expire_secs);
    }
}
