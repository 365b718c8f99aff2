//! Configuration management for ont2wb
//!
//! This module handles loading and validating configuration from environment variables,
//! TOML files, and command-line arguments. Credentials are never read from the
//! configuration file; the CLI takes them from the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::migrate::labels::LabelPolicy;
use crate::wikibase::{EntityId, LoginMethod, SessionConfig};

/// Upstream location of the Open Source Hardware metadata ontology
pub const DEFAULT_ONTOLOGY_URL: &str =
    "https://raw.githubusercontent.com/OPEN-NEXT/LOSH/master/osh-metadata.ttl";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target wiki configuration
    pub wikibase: WikibaseConfig,

    /// Migration behaviour
    pub migration: MigrationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Target wiki configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikibaseConfig {
    /// URL of the wiki's `api.php`
    pub api_url: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,

    /// Login flavour (client, bot)
    #[serde(default)]
    pub login_method: LoginMethod,

    /// `loginreturnurl` sent with `clientlogin`
    pub login_return_url: String,
}

/// Migration behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Ontology to migrate (Turtle file path or http(s) URL)
    pub input: String,

    /// Used when `input` is a local path that does not exist
    #[serde(default)]
    pub fallback_input: Option<String>,

    /// IRI of the ontology's own node, never migrated
    #[serde(default)]
    pub base_uri: Option<String>,

    /// Link store file
    pub link_file: PathBuf,

    /// Language assumed for untagged literals
    pub default_language: String,

    /// Joins several labels of one language
    pub label_separator: String,

    /// Joins several descriptions of one language
    pub description_separator: String,

    /// Longest description the wiki accepts, in characters
    pub max_description_len: usize,

    /// Which label/description predicates are consulted
    #[serde(default)]
    pub label_policy: LabelPolicy,

    /// Property identifiers that never receive claims
    #[serde(default)]
    pub excluded_properties: Vec<String>,

    /// Log entity/claim operations instead of calling the wiki
    #[serde(default)]
    pub dry_run: bool,

    /// Log every built claim payload at info level
    #[serde(default)]
    pub debug_claims: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_url = std::env::var("ONT2WB_API_URL").unwrap_or(defaults.wikibase.api_url);

        let request_timeout_secs = std::env::var("ONT2WB_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.wikibase.request_timeout_secs);

        let user_agent = std::env::var("ONT2WB_USER_AGENT").unwrap_or(defaults.wikibase.user_agent);

        let login_method = match std::env::var("ONT2WB_LOGIN_METHOD").ok().as_deref() {
            Some("bot") => LoginMethod::Bot,
            Some("client") | None => LoginMethod::Client,
            Some(other) => anyhow::bail!("Unknown ONT2WB_LOGIN_METHOD: {other}"),
        };

        let input = std::env::var("ONT2WB_INPUT").unwrap_or(defaults.migration.input);

        let base_uri = std::env::var("ONT2WB_BASE_URI")
            .ok()
            .or(defaults.migration.base_uri);

        let link_file = std::env::var("ONT2WB_LINK_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.migration.link_file);

        let default_language =
            std::env::var("ONT2WB_DEFAULT_LANGUAGE").unwrap_or(defaults.migration.default_language);

        let excluded_properties = std::env::var("ONT2WB_EXCLUDED_PROPERTIES")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.migration.excluded_properties);

        let dry_run = std::env::var("ONT2WB_DRY_RUN")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let log_level = std::env::var("ONT2WB_LOG_LEVEL").unwrap_or(defaults.logging.level);
        let log_format = std::env::var("ONT2WB_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            wikibase: WikibaseConfig {
                api_url,
                request_timeout_secs,
                user_agent,
                login_method,
                ..defaults.wikibase
            },
            migration: MigrationConfig {
                input,
                base_uri,
                link_file,
                default_language,
                excluded_properties,
                dry_run,
                ..defaults.migration
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.wikibase.api_url)
            .with_context(|| format!("api_url is not a valid URL: {}", self.wikibase.api_url))?;

        if self.wikibase.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.migration.input.trim().is_empty() {
            anyhow::bail!("input must not be empty");
        }

        if self.migration.link_file.as_os_str().is_empty() {
            anyhow::bail!("link_file must not be empty");
        }

        if self.migration.default_language.trim().is_empty() {
            anyhow::bail!("default_language must not be empty");
        }

        if self.migration.max_description_len < 4 {
            anyhow::bail!("max_description_len must be at least 4");
        }

        self.migration.excluded_property_ids()?;

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.wikibase.request_timeout_secs)
    }

    /// Session settings for the live client
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.wikibase.api_url.clone())
            .with_timeout(self.request_timeout())
            .with_user_agent(self.wikibase.user_agent.clone())
            .with_login_return_url(self.wikibase.login_return_url.clone())
    }
}

impl MigrationConfig {
    /// Parsed `excluded_properties`
    pub fn excluded_property_ids(&self) -> Result<Vec<EntityId>> {
        self.excluded_properties
            .iter()
            .map(|s| {
                s.parse::<EntityId>()
                    .with_context(|| format!("Invalid excluded property: {s}"))
            })
            .collect()
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            input: String::from("../OSHI/osh-metadata.ttl"),
            fallback_input: Some(String::from(DEFAULT_ONTOLOGY_URL)),
            base_uri: Some(String::from(
                "http://purl.org/oseg/ontologies/osh-metadata/0.1/base",
            )),
            link_file: PathBuf::from("tmp_ont2wb_links.ttl"),
            default_language: String::from("en"),
            label_separator: String::from("\n\n"),
            description_separator: String::from("\n\n"),
            max_description_len: 250,
            label_policy: LabelPolicy::default(),
            excluded_properties: Vec::new(),
            dry_run: false,
            debug_claims: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wikibase: WikibaseConfig {
                api_url: String::from("http://losh.ose-germany.de/api.php"),
                request_timeout_secs: 30,
                user_agent: format!("ont2wb/{}", env!("CARGO_PKG_VERSION")),
                login_method: LoginMethod::Client,
                login_return_url: String::from("http://127.0.0.1:5000/"),
            },
            migration: MigrationConfig::default(),
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
