//! Widget export
//!
//! Each tool's settings serialize to a [`WidgetBundle`]: the five text
//! artifacts pasted into the overlay host's custom-widget editor. Generation
//! is a pure function of the settings; identical settings give byte-identical
//! bundles.
//!
//! Scripts are assembled as a generated constants header followed by a fixed
//! runtime body. The header carries everything the runtime needs (timings,
//! tier tables, resolved styles, reward rates) as JSON literals so the runtime
//! never re-derives values the simulators already define.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::SettingsError;

/// File names written by [`WidgetBundle::write_to`]
pub const HTML_FILE: &str = "widget.html";
pub const CSS_FILE: &str = "widget.css";
pub const JS_FILE: &str = "widget.js";
pub const FIELDS_FILE: &str = "fields.json";
pub const DATA_FILE: &str = "data.json";

/// The exported text artifacts of one widget
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetBundle {
    pub html: String,
    pub css: String,
    pub js: String,
    /// Host field definitions (live-tunable settings)
    pub fields: String,
    /// Pretty-printed settings snapshot
    pub data: String,
}

impl WidgetBundle {
    /// Artifacts paired with their file names, in a fixed order
    pub fn files(&self) -> [(&'static str, &str); 5] {
        [
            (HTML_FILE, &self.html),
            (CSS_FILE, &self.css),
            (JS_FILE, &self.js),
            (FIELDS_FILE, &self.fields),
            (DATA_FILE, &self.data),
        ]
    }

    /// Write every artifact into `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, SettingsError> {
        fs::create_dir_all(dir).map_err(|source| SettingsError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(5);
        for (name, contents) in self.files() {
            let path = dir.join(name);
            fs::write(&path, contents).map_err(|source| SettingsError::WriteFile {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }

        tracing::info!(dir = %dir.display(), files = written.len(), "Wrote widget bundle");
        Ok(written)
    }
}

/// Settings that export to a deployable widget
pub trait ExportWidget {
    fn export(&self) -> WidgetBundle;
}

// ─────────────────────────────────────────────────────────────────────────────
// Emission helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Compact JSON literal for embedding in a script
pub(crate) fn json_literal<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Pretty-printed JSON document
pub(crate) fn json_pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Append `const NAME = <json>;`
pub(crate) fn js_const<T: Serialize + ?Sized>(out: &mut String, name: &str, value: &T) {
    let _ = writeln!(out, "const {} = {};", name, json_literal(value));
}

pub(crate) fn css_display(visible: bool) -> &'static str {
    if visible { "block" } else { "none" }
}

/// CSS font-family value with a generic fallback
pub(crate) fn css_font_family(family: &str) -> String {
    format!("'{}', sans-serif", family.trim().replace('\'', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_const_emits_json_literal() {
        let mut out = String::new();
        js_const(&mut out, "LABEL", "a \"quoted\" name");
        js_const(&mut out, "TIERS", &[0.5, 0.25]);
        assert_eq!(
            out,
            "const LABEL = \"a \\\"quoted\\\" name\";\nconst TIERS = [0.5,0.25];\n"
        );
    }

    #[test]
    fn write_to_creates_all_files() {
        let dir = std::env::temp_dir().join(format!("overlaykit-bundle-{}", std::process::id()));
        let bundle = WidgetBundle {
            html: "<div></div>".into(),
            css: "body {}".into(),
            js: "// js".into(),
            fields: "{}".into(),
            data: "{}".into(),
        };

        let written = bundle.write_to(&dir).unwrap();
        assert_eq!(written.len(), 5);
        assert_eq!(fs::read_to_string(dir.join(JS_FILE)).unwrap(), "// js");
        let _ = fs::remove_dir_all(&dir);
    }
}
