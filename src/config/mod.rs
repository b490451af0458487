//! Configuration module for nlq.
//!
//! Handles the settings file, environment variables, and the naming pattern
//! dictionary.

mod patterns;
mod settings;

pub use patterns::{NamingPatterns, PatternsError};
pub use settings::{
    expand_env_vars, AnalysisSettings, DatabaseSettings, PatternSettings, QuerySettings,
    Settings, SettingsError, MAX_SAMPLE_ROWS,
};
