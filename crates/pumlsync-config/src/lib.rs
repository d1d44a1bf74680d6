//! Configuration management for pumlsync.
//!
//! Parses `pumlsync.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings (flags and GitHub Actions inputs) are applied during load via
//! [`CliSettings`] and take precedence over file values.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `output.path`
//! - `render.server`
//! - `render.username`
//! - `render.password`
//! - `github.api_url`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

pub use pumlsync_github::DEFAULT_API_URL;
pub use pumlsync_sync::DEFAULT_MESSAGE;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config;
/// empty strings count as None, since GitHub Actions passes unset inputs as
/// empty environment variables.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_path: Option<String>,
    /// Override commit message.
    pub message: Option<String>,
    /// Override render server URL.
    pub server: Option<String>,
    /// Override render server username.
    pub username: Option<String>,
    /// Override render server password.
    pub password: Option<String>,
    /// Override GitHub API URL.
    pub api_url: Option<String>,
    /// GitHub token.
    pub token: Option<String>,
    /// Override forced ref update.
    pub force: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "pumlsync.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,
    /// Render server configuration.
    pub render: RenderConfig,
    /// GitHub configuration.
    pub github: GitHubConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Where generated files go and how they are committed.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory; `.` writes each SVG next to its source.
    pub path: String,
    /// Message of the generated commit.
    pub message: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: ".".to_owned(),
            message: DEFAULT_MESSAGE.to_owned(),
        }
    }
}

impl OutputConfig {
    /// Output directory override, `None` when SVGs are co-located.
    #[must_use]
    pub fn output_dir(&self) -> Option<&str> {
        let path = self.path.trim();
        (!path.is_empty() && path != ".").then_some(path)
    }
}

/// `PlantUML` render server configuration.
///
/// Without a server the public `plantuml.com` instance is used and
/// credentials are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Custom render server URL.
    pub server: Option<String>,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
}

/// GitHub API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL (GitHub Enterprise uses `https://<host>/api/v3`).
    pub api_url: String,
    /// Force-update the branch ref.
    pub force: bool,
    /// Token, only ever taken from CLI settings.
    #[serde(skip)]
    token: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            force: false,
            token: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`render.password`").
        field: String,
        /// Error message (e.g., "${`PLANTUML_PASSWORD`} not set").
        message: String,
    },
    /// No GitHub token was provided.
    #[error("GitHub token required (set GITHUB_TOKEN)")]
    MissingToken,
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Treat empty strings as unset.
fn non_empty(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `pumlsync.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading, then the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            debug!(path = %discovered.display(), "Discovered config file");
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(path) = non_empty(settings.output_path.as_ref()) {
            self.output.path.clone_from(path);
        }
        if let Some(message) = non_empty(settings.message.as_ref()) {
            self.output.message.clone_from(message);
        }
        if let Some(server) = non_empty(settings.server.as_ref()) {
            self.render.server = Some(server.clone());
        }
        if let Some(username) = non_empty(settings.username.as_ref()) {
            self.render.username = Some(username.clone());
        }
        if let Some(password) = non_empty(settings.password.as_ref()) {
            self.render.password = Some(password.clone());
        }
        if let Some(api_url) = non_empty(settings.api_url.as_ref()) {
            self.github.api_url.clone_from(api_url);
        }
        if let Some(token) = non_empty(settings.token.as_ref()) {
            self.github.token = Some(token.clone());
        }
        if let Some(force) = settings.force {
            self.github.force = force;
        }
    }

    /// Get the GitHub token.
    ///
    /// Call this before any network access so a missing token fails fast.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` if no token was provided.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.github
            .token
            .as_deref()
            .ok_or(ConfigError::MissingToken)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`load`](Self::load) after CLI settings are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.output.message, "output.message")?;

        if let Some(server) = non_empty(self.render.server.as_ref()) {
            require_http_url(server, "render.server")?;
        }

        require_non_empty(&self.github.api_url, "github.api_url")?;
        require_http_url(&self.github.api_url, "github.api_url")?;

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.output.path = expand::expand_env(&self.output.path, "output.path")?;

        expand::expand_optional(&mut self.render.server, "render.server")?;
        expand::expand_optional(&mut self.render.username, "render.username")?;
        expand::expand_optional(&mut self.render.password, "render.password")?;

        self.github.api_url = expand::expand_env(&self.github.api_url, "github.api_url")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.output.path, ".");
        assert_eq!(config.output.output_dir(), None);
        assert_eq!(config.output.message, DEFAULT_MESSAGE);
        assert!(config.render.server.is_none());
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(!config.github.force);
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults_match_sync_and_client() {
        let config = Config::default();

        assert_eq!(config.output.message, pumlsync_sync::SyncConfig::default().message);
        assert_eq!(config.github.api_url, pumlsync_github::DEFAULT_API_URL);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[output]
path = "docs/images"
message = "Render diagrams"

[render]
server = "https://plantuml.example.com"
username = "ci"
password = "secret"

[github]
api_url = "https://ghe.example.com/api/v3"
force = true
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.output.output_dir(), Some("docs/images"));
        assert_eq!(config.output.message, "Render diagrams");
        assert_eq!(
            config.render.server.as_deref(),
            Some("https://plantuml.example.com")
        );
        assert_eq!(config.render.username.as_deref(), Some("ci"));
        assert_eq!(config.render.password.as_deref(), Some("secret"));
        assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
        assert!(config.github.force);
    }

    #[test]
    fn test_token_not_read_from_file() {
        let config: Config = toml::from_str("[github]\ntoken = \"ghp_x\"\n").unwrap();

        assert!(matches!(
            config.require_token(),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_load_explicit_path() {
        let (_dir, path) = write_config("[output]\npath = \"out\"\n");

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.output.path, "out");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/pumlsync.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let (_dir, path) = write_config("[output\npath = 1");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_expands_env() {
        let (_dir, path) = write_config(
            "[render]\nserver = \"https://uml.example.com\"\npassword = \"${PUMLSYNC_CONFIG_TEST_PASSWORD:-none}\"\n",
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.render.password.as_deref(), Some("none"));
    }

    #[test]
    fn test_load_unset_env_fails() {
        let (_dir, path) = write_config("[render]\nusername = \"${PUMLSYNC_CONFIG_TEST_UNSET}\"\n");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(err.to_string().contains("render.username"));
    }

    #[test]
    fn test_cli_settings_override_file() {
        let (_dir, path) = write_config("[output]\npath = \"out\"\nmessage = \"from file\"\n");
        let settings = CliSettings {
            output_path: Some("images".to_owned()),
            server: Some("http://localhost:8080".to_owned()),
            token: Some("ghp_token".to_owned()),
            force: Some(true),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.output.path, "images");
        assert_eq!(config.output.message, "from file");
        assert_eq!(config.render.server.as_deref(), Some("http://localhost:8080"));
        assert!(config.github.force);
        assert_eq!(config.require_token().unwrap(), "ghp_token");
    }

    #[test]
    fn test_empty_cli_settings_are_ignored() {
        let mut config = Config::default();
        let settings = CliSettings {
            output_path: Some(String::new()),
            message: Some(String::new()),
            server: Some(String::new()),
            token: Some(String::new()),
            ..Default::default()
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.output.path, ".");
        assert_eq!(config.output.message, DEFAULT_MESSAGE);
        assert!(config.render.server.is_none());
        assert!(matches!(
            config.require_token(),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_validate_render_server_scheme() {
        let mut config = Config::default();
        config.render.server = Some("plantuml.example.com".to_owned());

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("render.server"));
    }

    #[test]
    fn test_validate_empty_message() {
        let mut config = Config::default();
        config.output.message = "  ".to_owned();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("output.message"));
    }

    #[test]
    fn test_validate_api_url() {
        let mut config = Config::default();
        config.github.api_url = "api.github.com".to_owned();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_dir_normalization() {
        let output = |path: &str| OutputConfig {
            path: path.to_owned(),
            ..OutputConfig::default()
        };

        assert_eq!(output(".").output_dir(), None);
        assert_eq!(output(" ").output_dir(), None);
        assert_eq!(output("out").output_dir(), Some("out"));
    }
}
