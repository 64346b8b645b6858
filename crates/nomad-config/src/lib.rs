//! Configuration management for the visa directory.
//!
//! Parses `nomad.toml` with serde and discovers it in the current directory
//! or any parent. Command-line overrides are applied through [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` and `${VAR:-default}` are expanded in:
//! - `server.host`
//! - `content.project_id`
//! - `content.dataset`
//! - `content.api_version`
//!
//! ## Example
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [content]
//! project_id = "${NOMAD_PROJECT_ID}"
//! dataset = "production"
//! api_version = "2024-01-01"
//! use_cdn = true
//!
//! [site]
//! title = "Digital Nomad Visas"
//! order = "country_name"
//! ```

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "nomad.toml";

/// Default request timeout for content queries.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Upper bound for `content.timeout_secs`.
const MAX_TIMEOUT_SECS: u64 = 60;

/// Maximum dataset name length accepted by the content store.
const MAX_DATASET_LEN: usize = 64;

/// CLI settings that override configuration file values.
///
/// Only `Some` values are applied.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content project identifier.
    pub project_id: Option<String>,
    /// Override dataset name.
    pub dataset: Option<String>,
    /// Override pinned API version.
    pub api_version: Option<String>,
    /// Override CDN reads.
    pub use_cdn: Option<bool>,
    /// Override static build output directory.
    pub output_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content store section as written in the file.
    content: ContentConfigRaw,
    /// Site section as written in the file.
    site: SiteConfigRaw,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// `[content]` as parsed from TOML; every field may be supplied later by the CLI.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    project_id: Option<String>,
    dataset: Option<String>,
    api_version: Option<String>,
    use_cdn: Option<bool>,
    timeout_secs: Option<u64>,
}

/// Validated content store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    /// Project identifier of the content store.
    pub project_id: String,
    /// Dataset name within the project.
    pub dataset: String,
    /// Pinned API version (`YYYY-MM-DD`, without the leading `v`).
    pub api_version: String,
    /// Whether reads may be served by the caching edge network.
    pub use_cdn: bool,
    /// Bound on a single query round trip.
    pub timeout: Duration,
}

/// `[site]` as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    title: Option<String>,
    output_dir: Option<String>,
    order: Option<ListingOrder>,
}

/// Order in which listings are requested from the content store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingOrder {
    /// Sort by country name, ascending.
    #[default]
    CountryName,
    /// Whatever order the content store returns.
    Unspecified,
}

/// Resolved site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Site title shown in the page header.
    pub title: String,
    /// Static build output directory.
    pub output_dir: PathBuf,
    /// Listing order.
    pub order: ListingOrder,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            output_dir: PathBuf::from("dist"),
            order: ListingOrder::default(),
        }
    }
}

fn default_title() -> String {
    "Digital Nomad Visa Directory".to_owned()
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
        /// Config field path (e.g., "`content.project_id`").
        field: String,
        /// Error message (e.g., "${`NOMAD_PROJECT_ID`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_charset(value: &str, field: &str, allowed: fn(char) -> bool) -> Result<(), ConfigError> {
    if let Some(c) = value.chars().find(|c| !allowed(*c)) {
        return Err(ConfigError::Validation(format!(
            "{field} contains invalid character {c:?}"
        )));
    }
    Ok(())
}

/// Normalize an API version to `YYYY-MM-DD`.
///
/// A leading `v` is accepted and stripped.
fn normalize_api_version(raw: &str) -> Result<String, ConfigError> {
    let version = raw.strip_prefix('v').unwrap_or(raw);
    let bytes = version.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(ConfigError::Validation(format!(
            "content.api_version must be a date like 2024-01-01, got {raw:?}"
        )));
    }
    Ok(version.to_owned())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `nomad.toml` in the current directory and its parents, falling back
    /// to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the result after CLI overrides is invalid.
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
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(project_id) = &settings.project_id {
            self.content.project_id = Some(project_id.clone());
        }
        if let Some(dataset) = &settings.dataset {
            self.content.dataset = Some(dataset.clone());
        }
        if let Some(api_version) = &settings.api_version {
            self.content.api_version = Some(api_version.clone());
        }
        if let Some(use_cdn) = settings.use_cdn {
            self.content.use_cdn = Some(use_cdn);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir.clone_from(output_dir);
        }
    }

    /// Get validated content store configuration.
    ///
    /// The project, dataset and API version must all be present, either from
    /// the file or from CLI settings. The API version is never defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a field is missing or malformed.
    pub fn require_content(&self) -> Result<ContentConfig, ConfigError> {
        let missing =
            |field: &str| ConfigError::Validation(format!("content.{field} must be set"));

        let project_id = self
            .content
            .project_id
            .clone()
            .ok_or_else(|| missing("project_id"))?;
        require_non_empty(&project_id, "content.project_id")?;
        require_charset(&project_id, "content.project_id", |c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
        })?;

        let dataset = self
            .content
            .dataset
            .clone()
            .ok_or_else(|| missing("dataset"))?;
        require_non_empty(&dataset, "content.dataset")?;
        require_charset(&dataset, "content.dataset", |c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
        })?;
        if dataset.len() > MAX_DATASET_LEN {
            return Err(ConfigError::Validation(format!(
                "content.dataset cannot exceed {MAX_DATASET_LEN} characters"
            )));
        }

        let api_version = self
            .content
            .api_version
            .as_deref()
            .ok_or_else(|| missing("api_version"))?;
        let api_version = normalize_api_version(api_version)?;

        let timeout_secs = self.content.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 || timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "content.timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}"
            )));
        }

        Ok(ContentConfig {
            project_id,
            dataset,
            api_version,
            use_cdn: self.content.use_cdn.unwrap_or(true),
            timeout: Duration::from_secs(timeout_secs),
        })
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

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            content: ContentConfigRaw::default(),
            site: SiteConfigRaw::default(),
            site_resolved: SiteConfig {
                output_dir: base.join("dist"),
                ..SiteConfig::default()
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_site(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate server and site values.
    ///
    /// The content section is validated on demand by [`Config::require_content`],
    /// so commands that never touch the content store work without it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        require_non_empty(&self.site_resolved.title, "site.title")?;
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        expand::expand_opt(&mut self.content.project_id, "content.project_id")?;
        expand::expand_opt(&mut self.content.dataset, "content.dataset")?;
        expand::expand_opt(&mut self.content.api_version, "content.api_version")?;
        Ok(())
    }

    fn resolve_site(&mut self, config_dir: &Path) {
        self.site_resolved = SiteConfig {
            title: self.site.title.clone().unwrap_or_else(default_title),
            output_dir: config_dir.join(self.site.output_dir.as_deref().unwrap_or("dist")),
            order: self.site.order.unwrap_or_default(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_site(Path::new("/project"));
        config
    }

    const CONTENT: &str = r#"
[content]
project_id = "ab12cd34"
dataset = "production"
api_version = "2024-01-01"
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.site_resolved.output_dir, PathBuf::from("/test/dist"));
        assert_eq!(config.site_resolved.order, ListingOrder::CountryName);
        assert_eq!(config.site_resolved.title, "Digital Nomad Visa Directory");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("");
        assert_eq!(config.server.port, 7979);
        assert!(config.require_content().is_err());
    }

    #[test]
    fn test_parse_content_section() {
        let content = parse(CONTENT).require_content().unwrap();
        assert_eq!(
            content,
            ContentConfig {
                project_id: "ab12cd34".to_owned(),
                dataset: "production".to_owned(),
                api_version: "2024-01-01".to_owned(),
                use_cdn: true,
                timeout: Duration::from_secs(5),
            }
        );
    }

    #[test]
    fn test_parse_site_section() {
        let config = parse(
            r#"
[site]
title = "Visas"
output_dir = "public"
order = "unspecified"
"#,
        );
        assert_eq!(config.site_resolved.title, "Visas");
        assert_eq!(
            config.site_resolved.output_dir,
            PathBuf::from("/project/public")
        );
        assert_eq!(config.site_resolved.order, ListingOrder::Unspecified);
    }

    #[test]
    fn test_unknown_order_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[site]\norder = \"random\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_api_version_leading_v_is_stripped() {
        let config = parse(&CONTENT.replace("2024-01-01", "v2023-05-03"));
        assert_eq!(config.require_content().unwrap().api_version, "2023-05-03");
    }

    #[test]
    fn test_api_version_is_never_defaulted() {
        let config = parse(
            r#"
[content]
project_id = "ab12cd34"
dataset = "production"
"#,
        );
        let err = config.require_content().unwrap_err();
        assert!(err.to_string().contains("api_version"));
    }

    #[test]
    fn test_api_version_must_be_date() {
        let config = parse(&CONTENT.replace("2024-01-01", "latest"));
        assert!(matches!(
            config.require_content(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_project_id_charset() {
        let config = parse(&CONTENT.replace("ab12cd34", "AB/12"));
        let err = config.require_content().unwrap_err();
        assert!(err.to_string().contains("content.project_id"));
    }

    #[test]
    fn test_dataset_too_long() {
        let config = parse(&CONTENT.replace("production", &"d".repeat(65)));
        assert!(config.require_content().is_err());
    }

    #[test]
    fn test_timeout_bounds() {
        let config = parse(&format!("{CONTENT}timeout_secs = 0\n"));
        assert!(config.require_content().is_err());

        let config = parse(&format!("{CONTENT}timeout_secs = 61\n"));
        assert!(config.require_content().is_err());

        let config = parse(&format!("{CONTENT}timeout_secs = 10\n"));
        assert_eq!(
            config.require_content().unwrap().timeout,
            Duration::from_secs(10)
        );
    }

    #[test]
    fn test_use_cdn_false() {
        let config = parse(&format!("{CONTENT}use_cdn = false\n"));
        assert!(!config.require_content().unwrap().use_cdn);
    }

    #[test]
    fn test_cli_settings_supply_missing_content() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            project_id: Some("proj".to_owned()),
            dataset: Some("staging".to_owned()),
            api_version: Some("2024-06-01".to_owned()),
            use_cdn: Some(false),
            ..CliSettings::default()
        });

        let content = config.require_content().unwrap();
        assert_eq!(content.project_id, "proj");
        assert_eq!(content.dataset, "staging");
        assert!(!content.use_cdn);
    }

    #[test]
    fn test_cli_settings_override_file() {
        let mut config = parse(CONTENT);
        config.apply_cli_settings(&CliSettings {
            port: Some(9000),
            dataset: Some("staging".to_owned()),
            output_dir: Some(PathBuf::from("/out")),
            ..CliSettings::default()
        });

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.require_content().unwrap().dataset, "staging");
        assert_eq!(config.site_resolved.output_dir, PathBuf::from("/out"));
    }

    #[test]
    fn test_validate_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_port_zero_from_cli() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, CONTENT).unwrap();
        let settings = CliSettings {
            port: Some(0),
            ..CliSettings::default()
        };

        let result = Config::load(Some(&path), Some(&settings));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_rejects_port_zero_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 0\n").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let result = Config::load(Some(Path::new("/nonexistent/nomad.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_expands_env() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("NOMAD_TEST_LOAD_PROJECT", "fromenv");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            CONTENT.replace("ab12cd34", "${NOMAD_TEST_LOAD_PROJECT}"),
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.require_content().unwrap().project_id, "fromenv");
        assert_eq!(config.site_resolved.output_dir, dir.path().join("dist"));
        assert_eq!(config.config_path, Some(path));
        unsafe {
            std::env::remove_var("NOMAD_TEST_LOAD_PROJECT");
        }
    }
}
