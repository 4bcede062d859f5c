//! Loading and saving tool settings files
//!
//! The format follows the file extension: `.toml` or `.json`. Every field is
//! optional on read; missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::SettingsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Toml,
    Json,
}

impl SettingsFormat {
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(SettingsError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

pub fn load_settings<T: DeserializeOwned>(path: &Path) -> Result<T, SettingsError> {
    let format = SettingsFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| SettingsError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let settings = match format {
        SettingsFormat::Toml => toml::from_str(&text).map_err(|source| SettingsError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?,
        SettingsFormat::Json => {
            serde_json::from_str(&text).map_err(|source| SettingsError::ParseJson {
                path: path.to_path_buf(),
                source,
            })?
        }
    };
    tracing::info!(path = %path.display(), "Loaded settings");
    Ok(settings)
}

pub fn to_toml<T: Serialize>(settings: &T) -> Result<String, SettingsError> {
    toml::to_string_pretty(settings).map_err(SettingsError::Serialize)
}

pub fn save_settings<T: Serialize>(settings: &T, path: &Path) -> Result<(), SettingsError> {
    let text = match SettingsFormat::from_path(path)? {
        SettingsFormat::Toml => to_toml(settings)?,
        SettingsFormat::Json => crate::codegen::json_pretty(settings),
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| SettingsError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlaykit_types::{GoalSettings, TimerMode, TimerSettings};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("overlaykit-{}-{}", std::process::id(), name))
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            SettingsFormat::from_path(Path::new("a/timer.TOML")).unwrap(),
            SettingsFormat::Toml
        );
        assert!(matches!(
            SettingsFormat::from_path(Path::new("timer.yaml")),
            Err(SettingsError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn partial_toml_takes_defaults() {
        let path = temp_path("timer.toml");
        fs::write(&path, "mode = \"countdown_sub\"\ncap_hours = 2\n").unwrap();

        let timer: TimerSettings = load_settings(&path).unwrap();
        assert_eq!(timer.mode, TimerMode::CountdownSub);
        assert_eq!(timer.cap_hours, 2);
        assert_eq!(timer.start_hours, TimerSettings::default().start_hours);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_then_load_json() {
        let path = temp_path("goal.json");
        let mut goal = GoalSettings::default();
        goal.start_amount = 42.0;
        save_settings(&goal, &path).unwrap();

        let loaded: GoalSettings = load_settings(&path).unwrap();
        assert_eq!(loaded, goal);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn parse_errors_carry_path() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_settings::<GoalSettings>(&path).unwrap_err();
        assert!(matches!(err, SettingsError::ParseJson { .. }));
        assert!(err.to_string().contains("broken.json"));
        let _ = fs::remove_file(&path);
    }
}
