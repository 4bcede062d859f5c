//! Studio configuration
//!
//! This module re-exports the shared config types from overlaykit-types and
//! provides persistence through confy.

use std::path::PathBuf;

pub use overlaykit_types::{PreviewConfig, StudioConfig, Tool};

use crate::error::ConfigError;

const APP_NAME: &str = "overlaykit";
const CONFIG_NAME: &str = "config";

fn default_export_root() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|p| p.join("overlaykit"))
        .unwrap_or_else(|| PathBuf::from("overlaykit-export"))
}

// ─────────────────────────────────────────────────────────────────────────────
// StudioConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for StudioConfig persistence
pub trait StudioConfigExt: Sized {
    /// Load from disk, falling back to defaults if the file is missing or bad
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    /// Directory a tool's bundle is exported to
    fn export_dir_for(&self, tool: Tool) -> PathBuf;
}

impl StudioConfigExt for StudioConfig {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Using default configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        confy::load(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)?;
        tracing::debug!("Configuration saved");
        Ok(())
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Locate)
    }

    fn export_dir_for(&self, tool: Tool) -> PathBuf {
        let root = match self.export_dir.as_deref() {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => default_export_root(),
        };
        root.join(tool.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_dir_uses_configured_root() {
        let config = StudioConfig {
            export_dir: Some("/tmp/widgets".into()),
            ..StudioConfig::default()
        };
        assert_eq!(
            config.export_dir_for(Tool::Timer),
            PathBuf::from("/tmp/widgets/timer")
        );
    }

    #[test]
    fn blank_export_dir_falls_back_to_default() {
        let config = StudioConfig {
            export_dir: Some("  ".into()),
            ..StudioConfig::default()
        };
        let dir = config.export_dir_for(Tool::Chat);
        assert!(dir.ends_with("overlaykit/chat") || dir.ends_with("overlaykit-export/chat"));
    }
}
