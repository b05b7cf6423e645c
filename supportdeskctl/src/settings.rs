//! Client settings
//!
//! Settings come from four layers, each overriding the previous one:
//! built-in defaults, the TOML settings file, `SUPPORTDESK_*` environment
//! variables, and command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use supportdesk_core::{default_cache_dir, default_settings_path};
use tracing::debug;

pub const ENV_URL: &str = "SUPPORTDESK_URL";
pub const ENV_FORMAT: &str = "SUPPORTDESK_FORMAT";
pub const ENV_VERBOSE: &str = "SUPPORTDESK_VERBOSE";
pub const ENV_TIMEOUT: &str = "SUPPORTDESK_TIMEOUT";
pub const ENV_CACHE_DIR: &str = "SUPPORTDESK_CACHE_DIR";

/// Effective client settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSettings {
    /// Base URL of the asset server
    pub base_url: String,

    /// Default output format
    pub output_format: String,

    /// Enable debug logging
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding the configuration cache
    pub cache_dir: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            output_format: "table".to_string(),
            verbose: false,
            timeout: 10,
            cache_dir: default_cache_dir(),
        }
    }
}

impl ClientSettings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }
}

/// On-disk form; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    base_url: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
    cache_dir: Option<PathBuf>,
}

/// Builder applying the settings layers in priority order.
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Settings file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Call the layers in that order; each one overrides what came before.
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    base_url: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
    cache_dir: Option<PathBuf>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL (with validation)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Self::validate_url(&url)?;
        self.base_url = Some(url);
        Ok(self)
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Apply the settings file at `path`, or the default location.
    ///
    /// A missing file is skipped; an unreadable or invalid one is an error.
    pub fn with_settings_file(self, path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_settings_path);

        if !path.exists() {
            debug!(path = %path.display(), "no settings file");
            return Ok(self);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let file: SettingsFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;

        self.apply_file(file)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    fn apply_file(mut self, file: SettingsFile) -> Result<Self> {
        if let Some(url) = file.base_url {
            self = self.with_base_url(url)?;
        }
        if let Some(format) = file.output_format {
            self = self.with_output_format(format)?;
        }
        if let Some(verbose) = file.verbose {
            self = self.with_verbose(verbose);
        }
        if let Some(timeout) = file.timeout {
            self = self.with_timeout(timeout)?;
        }
        if let Some(dir) = file.cache_dir {
            self = self.with_cache_dir(dir);
        }
        Ok(self)
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_URL) {
            if Self::validate_url(&url).is_ok() {
                self.base_url = Some(url);
            }
        }

        if let Ok(format) = std::env::var(ENV_FORMAT) {
            if Self::validate_output_format(&format).is_ok() {
                self.output_format = Some(format);
            }
        }

        if let Ok(verbose) = std::env::var(ENV_VERBOSE) {
            self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
        }

        if let Ok(timeout) = std::env::var(ENV_TIMEOUT) {
            if let Ok(timeout) = timeout.parse() {
                if Self::validate_timeout(timeout).is_ok() {
                    self.timeout = Some(timeout);
                }
            }
        }

        if let Ok(dir) = std::env::var(ENV_CACHE_DIR) {
            if !dir.is_empty() {
                self.cache_dir = Some(PathBuf::from(dir));
            }
        }

        self
    }

    /// Build the final settings with validation
    pub fn build(self) -> Result<ClientSettings> {
        let defaults = ClientSettings::default();

        let base_url = self.base_url.unwrap_or(defaults.base_url);
        let output_format = self.output_format.unwrap_or(defaults.output_format);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        Self::validate_url(&base_url)?;
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;

        Ok(ClientSettings {
            base_url,
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            timeout,
            cache_dir: self.cache_dir.unwrap_or(defaults.cache_dir),
        })
    }

    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(anyhow::anyhow!("Base URL cannot be empty"));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Base URL must start with http:// or https://"
            ));
        }

        Ok(())
    }

    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            )),
        }
    }

    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to 300 seconds"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ALL_VARS: [&str; 5] = [ENV_URL, ENV_FORMAT, ENV_VERBOSE, ENV_TIMEOUT, ENV_CACHE_DIR];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    fn write_settings(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("client.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_settings() {
        let settings = ClientSettings::default();
        assert_eq!(settings.base_url, "http://localhost:8080");
        assert_eq!(settings.output_format, "table");
        assert!(!settings.verbose);
        assert_eq!(settings.timeout, 10);
        assert!(settings.cache_dir.ends_with("supportdesk"));
    }

    #[test]
    fn test_settings_serialization() {
        let settings = ClientSettings::default();
        let toml_str = toml::to_string(&settings).unwrap();
        let parsed: ClientSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    #[serial]
    fn test_builder_with_defaults() {
        clear_env();
        let settings = SettingsBuilder::new().build().unwrap();
        assert_eq!(settings, ClientSettings::default());
    }

    #[test]
    fn test_builder_validation() {
        assert!(SettingsBuilder::new().with_base_url("").is_err());
        assert!(SettingsBuilder::new()
            .with_base_url("ftp://example.com")
            .is_err());
        assert!(SettingsBuilder::new()
            .with_base_url("https://support.example.com")
            .is_ok());

        assert!(SettingsBuilder::new().with_output_format("xml").is_err());
        assert!(SettingsBuilder::new().with_output_format("json").is_ok());

        assert!(SettingsBuilder::new().with_timeout(0).is_err());
        assert!(SettingsBuilder::new().with_timeout(301).is_err());
        assert!(SettingsBuilder::new().with_timeout(1).is_ok());
        assert!(SettingsBuilder::new().with_timeout(300).is_ok());
    }

    #[test]
    fn test_partial_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = write_settings(&dir, "base_url = \"https://help.acme.com\"\ntimeout = 30\n");

        let settings = SettingsBuilder::new()
            .with_settings_file(Some(&path))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.base_url, "https://help.acme.com");
        assert_eq!(settings.timeout, 30);
        assert_eq!(settings.output_format, "table");
    }

    #[test]
    fn test_missing_settings_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let builder = SettingsBuilder::new().with_settings_file(Some(&path));
        assert!(builder.is_ok());
    }

    #[test]
    fn test_invalid_settings_file_is_rejected() {
        let dir = TempDir::new().unwrap();

        let path = write_settings(&dir, "timeout = 0\n");
        let err = SettingsBuilder::new()
            .with_settings_file(Some(&path))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("greater than 0"));

        let path = write_settings(&dir, "timeout = \"soon\"\n");
        assert!(SettingsBuilder::new()
            .with_settings_file(Some(&path))
            .is_err());
    }

    #[test]
    #[serial]
    fn test_builder_with_env_overrides() {
        clear_env();
        std::env::set_var(ENV_URL, "http://env.example.com:9000");
        std::env::set_var(ENV_FORMAT, "json");
        std::env::set_var(ENV_VERBOSE, "true");
        std::env::set_var(ENV_TIMEOUT, "25");
        std::env::set_var(ENV_CACHE_DIR, "/var/cache/supportdesk-test");

        let settings = SettingsBuilder::new().with_env_overrides().build().unwrap();

        assert_eq!(settings.base_url, "http://env.example.com:9000");
        assert_eq!(settings.output_format, "json");
        assert!(settings.verbose);
        assert_eq!(settings.timeout, 25);
        assert_eq!(
            settings.cache_dir,
            PathBuf::from("/var/cache/supportdesk-test")
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_priority_chain() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = write_settings(
            &dir,
            "base_url = \"http://file.example.com\"\ntimeout = 40\noutput_format = \"json\"\n",
        );
        std::env::set_var(ENV_URL, "http://env.example.com");
        std::env::set_var(ENV_TIMEOUT, "25");

        let settings = SettingsBuilder::new()
            .with_settings_file(Some(&path))
            .unwrap()
            .with_env_overrides()
            .with_base_url("http://cli.example.com")
            .unwrap()
            .build()
            .unwrap();

        // CLI beats env, env beats file, file beats defaults
        assert_eq!(settings.base_url, "http://cli.example.com");
        assert_eq!(settings.timeout, 25);
        assert_eq!(settings.output_format, "json");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_env_values_ignored() {
        clear_env();
        std::env::set_var(ENV_TIMEOUT, "invalid");
        std::env::set_var(ENV_FORMAT, "xml");
        std::env::set_var(ENV_URL, "localhost");

        let settings = SettingsBuilder::new().with_env_overrides().build().unwrap();

        assert_eq!(settings.timeout, 10);
        assert_eq!(settings.output_format, "table");
        assert_eq!(settings.base_url, "http://localhost:8080");

        clear_env();
    }
}
