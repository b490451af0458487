//! TOML-based configuration for nlq.
//!
//! Supports a config file (nlq.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [database]
//! locator = "${HR_DATABASE}"
//! dialect = "sqlite"
//!
//! [analysis]
//! sample_rows = 3
//! system_table_prefix = "sqlite_"
//!
//! [query]
//! include_documents = true
//! document_top_k = 5
//! max_select_columns = 5
//! default_rank_limit = 10
//! join_strategy = "naming_pattern"
//!
//! [patterns]
//! path = "./hr_patterns.toml"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::patterns::{NamingPatterns, PatternsError};
use crate::sql::{Dialect, JoinStrategy};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("No database locator configured")]
    MissingLocator,

    #[error("Failed to load naming patterns: {0}")]
    Patterns(#[from] PatternsError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Database connection.
    pub database: DatabaseSettings,

    /// Schema analysis.
    pub analysis: AnalysisSettings,

    /// Query mapping and execution.
    pub query: QuerySettings,

    /// Naming pattern dictionary source.
    pub patterns: PatternSettings,
}

/// Database configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database locator (supports ${ENV_VAR} expansion).
    pub locator: Option<String>,

    /// Dialect of SQL that is rendered but not executed. Executed SQL always
    /// follows the connection's own dialect.
    pub dialect: Dialect,
}

impl DatabaseSettings {
    /// Get the locator with environment variables expanded.
    pub fn resolved_locator(&self) -> Result<String, SettingsError> {
        let locator = self.locator.as_deref().ok_or(SettingsError::MissingLocator)?;
        expand_env_vars(locator)
    }
}

/// Upper bound on sample rows kept per table.
pub const MAX_SAMPLE_ROWS: usize = 3;

/// Schema analysis configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Sample rows fetched per table, capped at [`MAX_SAMPLE_ROWS`].
    pub sample_rows: usize,

    /// Tables whose name starts with this prefix are engine-internal.
    pub system_table_prefix: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            sample_rows: MAX_SAMPLE_ROWS,
            system_table_prefix: "sqlite_".to_string(),
        }
    }
}

impl AnalysisSettings {
    /// Sample rows to actually fetch.
    pub fn sample_limit(&self) -> usize {
        self.sample_rows.min(MAX_SAMPLE_ROWS)
    }
}

/// Query configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Search documents alongside the database by default.
    pub include_documents: bool,

    /// Document hits requested from the document-search collaborator.
    pub document_top_k: usize,

    /// Upper bound on columns in a plain SELECT list.
    pub max_select_columns: usize,

    /// LIMIT applied to ranking queries without an explicit "top N".
    pub default_rank_limit: u64,

    /// How JOIN clauses are derived.
    pub join_strategy: JoinStrategy,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            include_documents: true,
            document_top_k: 5,
            max_select_columns: 5,
            default_rank_limit: 10,
            join_strategy: JoinStrategy::default(),
        }
    }
}

/// Naming pattern source.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternSettings {
    /// TOML dictionary replacing the built-in one (supports ${ENV_VAR}).
    pub path: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `NLQ_CONFIG`
    /// 2. `./nlq.toml`
    /// 3. `~/.config/nlq/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("NLQ_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("nlq.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("nlq").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Build the naming pattern dictionary: the configured file, or the
    /// built-in dictionary when none is set.
    pub fn naming_patterns(&self) -> Result<NamingPatterns, SettingsError> {
        match &self.patterns.path {
            Some(path) => {
                let path = expand_env_vars(path)?;
                Ok(NamingPatterns::from_file(path)?)
            }
            None => Ok(NamingPatterns::default()),
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
