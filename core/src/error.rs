//! Error types for overlaykit operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing settings files and export bundles
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse settings JSON in {path}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize settings")]
    Serialize(#[source] toml::ser::Error),

    #[error("unsupported settings format for {path} (expected .toml or .json)")]
    UnknownFormat { path: PathBuf },

    #[error("failed to create export directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("failed to locate configuration file")]
    Locate(#[source] confy::ConfyError),
}

/// Errors from the palette analysis service
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("palette service request failed: {0}")]
    Service(String),

    #[error("malformed palette response")]
    Parse(#[from] serde_json::Error),

    #[error("palette response contained no colors")]
    Empty,
}

impl PaletteError {
    /// Message shown to the user for any analysis failure
    pub const USER_MESSAGE: &'static str = "Failed to analyze. Ensure API key is configured.";
}

/// Errors editing asset layers
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("maximum layers reached ({max})")]
    MaxLayersReached { max: usize },

    #[error("layer '{id}' not found")]
    LayerNotFound { id: String },
}
