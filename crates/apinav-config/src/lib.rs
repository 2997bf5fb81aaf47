//! Configuration management for apinav.
//!
//! Parses `apinav.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `spec.path`
//! - `output.dir`
//! - `site.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override OpenAPI document path.
    pub spec_path: Option<PathBuf>,
    /// Override output directory for generated docs.
    pub output_dir: Option<PathBuf>,
    /// Override presentation locale.
    pub locale: Option<String>,
    /// Override site base URL.
    pub base_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "apinav.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenAPI input configuration (paths are relative strings from TOML).
    spec: SpecConfigRaw,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Sidebar grouping configuration.
    pub sidebar: SidebarConfig,
    /// Root overview page configuration.
    pub overview: OverviewConfig,
    /// Site presentation configuration.
    pub site: SiteConfig,

    /// Resolved input configuration (set after loading).
    #[serde(skip)]
    pub spec_resolved: SpecConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw input configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SpecConfigRaw {
    path: Option<String>,
}

/// Resolved input configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SpecConfig {
    /// OpenAPI document (YAML or JSON).
    pub path: PathBuf,
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    id_prefix: Option<String>,
}

/// Resolved output configuration.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory receiving the sidebar and generated pages.
    pub dir: PathBuf,
    /// Prefix prepended to every doc id in the sidebar (e.g. `api`).
    pub id_prefix: String,
}

/// How operations are grouped into sidebar categories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupPathsBy {
    /// One category per operation tag.
    #[default]
    Tag,
}

/// Where a category's link points to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryLinkSource {
    /// Link each category to a generated tag page.
    #[default]
    Tag,
    /// Categories have no link and no page.
    None,
}

/// Sidebar configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Grouping strategy.
    pub group_paths_by: GroupPathsBy,
    /// Category link source.
    pub category_link_source: CategoryLinkSource,
}

/// Root overview page configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OverviewConfig {
    /// Explicit overview doc id. Derived from the API title when unset.
    pub id: Option<String>,
    /// Whether to generate the overview page. When false the page is
    /// expected to be written by hand.
    pub generate: bool,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            id: None,
            generate: true,
        }
    }
}

/// Site presentation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Locale for generated headings.
    pub locale: String,
    /// Base URL path the site is served under.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_owned(),
            base_url: "/".to_owned(),
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
        /// Config field path (e.g., "`spec.path`").
        field: String,
        /// Error message (e.g., "${`SPEC_PATH`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a string field to have no leading or trailing slash.
fn require_no_surrounding_slash(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.starts_with('/') || value.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must not start or end with /"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `apinav.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(spec_path) = &settings.spec_path {
            self.spec_resolved.path.clone_from(spec_path);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(output_dir);
        }
        if let Some(locale) = &settings.locale {
            self.site.locale.clone_from(locale);
        }
        if let Some(base_url) = &settings.base_url {
            self.site.base_url.clone_from(base_url);
        }
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            spec: SpecConfigRaw::default(),
            output: OutputConfigRaw::default(),
            sidebar: SidebarConfig::default(),
            overview: OverviewConfig::default(),
            site: SiteConfig::default(),
            spec_resolved: SpecConfig {
                path: base.join("openapi.yaml"),
            },
            output_resolved: OutputConfig {
                dir: base.join("docs/api"),
                id_prefix: "api".to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_output()?;
        self.validate_overview()?;
        self.validate_site()?;
        Ok(())
    }

    /// Validate output configuration.
    fn validate_output(&self) -> Result<(), ConfigError> {
        let prefix = &self.output_resolved.id_prefix;
        require_non_empty(prefix, "output.id_prefix")?;
        require_no_surrounding_slash(prefix, "output.id_prefix")?;
        Ok(())
    }

    /// Validate overview configuration.
    fn validate_overview(&self) -> Result<(), ConfigError> {
        if let Some(ref id) = self.overview.id {
            require_non_empty(id, "overview.id")?;
            if !id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            {
                return Err(ConfigError::Validation(
                    "overview.id may only contain lowercase letters, digits and hyphens"
                        .to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.locale, "site.locale")?;
        require_no_surrounding_slash(&self.site.locale, "site.locale")?;

        let base_url = &self.site.base_url;
        if !base_url.starts_with('/') || !base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must start and end with /".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.spec.path {
            self.spec.path = Some(expand::expand_env(path, "spec.path")?);
        }
        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }
        self.site.base_url = expand::expand_env(&self.site.base_url, "site.base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.spec_resolved = SpecConfig {
            path: resolve(self.spec.path.as_deref(), "openapi.yaml"),
        };
        self.output_resolved = OutputConfig {
            dir: resolve(self.output.dir.as_deref(), "docs/api"),
            id_prefix: self
                .output
                .id_prefix
                .clone()
                .unwrap_or_else(|| "api".to_owned()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.spec_resolved.path,
            PathBuf::from("/test/openapi.yaml")
        );
        assert_eq!(config.output_resolved.dir, PathBuf::from("/test/docs/api"));
        assert_eq!(config.output_resolved.id_prefix, "api");
        assert_eq!(config.sidebar.group_paths_by, GroupPathsBy::Tag);
        assert_eq!(config.sidebar.category_link_source, CategoryLinkSource::Tag);
        assert!(config.overview.generate);
        assert!(config.overview.id.is_none());
        assert_eq!(config.site.locale, "en");
        assert_eq!(config.site.base_url, "/");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.locale, "en");
        assert!(config.overview.generate);
    }

    #[test]
    fn test_parse_sidebar_config() {
        let toml = r#"
[sidebar]
group_paths_by = "tag"
category_link_source = "none"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sidebar.group_paths_by, GroupPathsBy::Tag);
        assert_eq!(config.sidebar.category_link_source, CategoryLinkSource::None);
    }

    #[test]
    fn test_unknown_grouping_strategy_rejected() {
        let toml = r#"
[sidebar]
group_paths_by = "path"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_overview_and_site() {
        let toml = r#"
[overview]
id = "pahlawan-pangan-public-api"
generate = false

[site]
locale = "id"
base_url = "/pahlawan-pangan/"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.overview.id.as_deref(),
            Some("pahlawan-pangan-public-api")
        );
        assert!(!config.overview.generate);
        assert_eq!(config.site.locale, "id");
        assert_eq!(config.site.base_url, "/pahlawan-pangan/");
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[spec]
path = "../api/openapi.yaml"

[output]
dir = "portal/docs/api"
id_prefix = "reference"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.spec_resolved.path,
            PathBuf::from("/project/../api/openapi.yaml")
        );
        assert_eq!(
            config.output_resolved.dir,
            PathBuf::from("/project/portal/docs/api")
        );
        assert_eq!(config.output_resolved.id_prefix, "reference");
    }

    #[test]
    fn test_validate_base_url_slashes() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.base_url = "/docs".to_owned();

        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("site.base_url"));
    }

    #[test]
    fn test_validate_id_prefix() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.output_resolved.id_prefix = "/api".to_owned();
        assert!(config.validate().is_err());

        config.output_resolved.id_prefix = String::new();
        assert!(config.validate().is_err());

        config.output_resolved.id_prefix = "docs/api".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_overview_id() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.overview.id = Some("Overview Page".to_owned());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("overview.id"));

        config.overview.id = Some("overview-2".to_owned());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_cli_settings_paths() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            spec_path: Some(PathBuf::from("/custom/openapi.json")),
            output_dir: Some(PathBuf::from("/custom/out")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.spec_resolved.path,
            PathBuf::from("/custom/openapi.json")
        );
        assert_eq!(config.output_resolved.dir, PathBuf::from("/custom/out"));
        assert_eq!(config.site.locale, "en"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_site() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            locale: Some("id".to_owned()),
            base_url: Some("/pahlawan-pangan/".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.site.locale, "id");
        assert_eq!(config.site.base_url, "/pahlawan-pangan/");
        assert_eq!(config.output_resolved.dir, PathBuf::from("/test/docs/api")); // Unchanged
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/apinav.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[spec]
path = "api/openapi.yaml"

[site]
base_url = "${APINAV_TEST_SURELY_UNSET_BASE:-/pahlawan-pangan/}"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.spec_resolved.path, dir.path().join("api/openapi.yaml"));
        assert_eq!(config.output_resolved.dir, dir.path().join("docs/api"));
        assert_eq!(config.site.base_url, "/pahlawan-pangan/");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            base_url: Some("no-slashes".to_owned()),
            ..Default::default()
        };

        let result = Config::load(Some(&path), Some(&overrides));

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
