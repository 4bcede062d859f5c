//! Asset recolor adjustments
//!
//! [`AssetEditor`] owns an [`AdjustmentState`] plus the palette of the last
//! successful analysis. Base corrections become a CSS filter; color layers are
//! composited over the image in list order.
//!
//! # Analysis
//!
//! Palette extraction is an external service. Its raw JSON response goes
//! through [`parse_analysis`]; any failure is surfaced to the user as
//! [`PaletteError::USER_MESSAGE`] and leaves the current palette in place.

use overlaykit_types::{
    AdjustmentState, AnalysisResult, AssetLayer, BlendMode, Color, MAX_LAYERS, PaletteColor,
};

use crate::error::{AssetError, PaletteError};

/// Color given to a freshly added layer
pub const DEFAULT_LAYER_COLOR: Color = Color::rgb(0x2e, 0x5c, 0xff);
pub const DEFAULT_LAYER_OPACITY: f32 = 0.8;

pub const HUE_RANGE: (i32, i32) = (-180, 180);
pub const PERCENT_MAX: u32 = 200;

/// Partial layer update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPatch {
    pub color: Option<Color>,
    pub opacity: Option<f32>,
    pub blend_mode: Option<BlendMode>,
    pub name: Option<String>,
}

/// Canvas filter string for the base corrections
pub fn filter_css(state: &AdjustmentState) -> String {
    format!(
        "hue-rotate({}deg) saturate({}%) brightness({}%) contrast({}%)",
        state.hue, state.saturation, state.brightness, state.contrast
    )
}

/// Validate a palette service response
pub fn parse_analysis(json: &str) -> Result<AnalysisResult, PaletteError> {
    let result: AnalysisResult = serde_json::from_str(json)?;
    if result.colors.is_empty() {
        return Err(PaletteError::Empty);
    }
    Ok(result)
}

#[derive(Debug, Clone, Default)]
pub struct AssetEditor {
    state: AdjustmentState,
    next_layer: u64,
    palette: Option<AnalysisResult>,
    error: Option<&'static str>,
}

impl AssetEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AdjustmentState {
        &self.state
    }

    pub fn layers(&self) -> &[AssetLayer] {
        &self.state.layers
    }

    pub fn palette(&self) -> Option<&AnalysisResult> {
        self.palette.as_ref()
    }

    /// User-facing message from the last failed analysis
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn filter_css(&self) -> String {
        filter_css(&self.state)
    }

    fn next_id(&mut self) -> String {
        self.next_layer += 1;
        format!("layer-{}", self.next_layer)
    }

    // ─── Base corrections ───────────────────────────────────────────────────

    pub fn set_hue(&mut self, degrees: i32) {
        self.state.hue = degrees.clamp(HUE_RANGE.0, HUE_RANGE.1);
    }

    pub fn set_saturation(&mut self, percent: u32) {
        self.state.saturation = percent.min(PERCENT_MAX);
    }

    pub fn set_brightness(&mut self, percent: u32) {
        self.state.brightness = percent.min(PERCENT_MAX);
    }

    pub fn set_contrast(&mut self, percent: u32) {
        self.state.contrast = percent.min(PERCENT_MAX);
    }

    /// Restore neutral corrections and drop every layer
    pub fn reset(&mut self) {
        self.state = AdjustmentState::default();
    }

    // ─── Layers ─────────────────────────────────────────────────────────────

    pub fn add_layer(&mut self) -> Result<&AssetLayer, AssetError> {
        if self.state.layers.len() >= MAX_LAYERS {
            return Err(AssetError::MaxLayersReached { max: MAX_LAYERS });
        }
        let layer = AssetLayer {
            id: self.next_id(),
            color: DEFAULT_LAYER_COLOR,
            opacity: DEFAULT_LAYER_OPACITY,
            blend_mode: BlendMode::Overlay,
            name: format!("Layer {}", self.state.layers.len() + 1),
        };
        self.state.layers.push(layer);
        Ok(&self.state.layers[self.state.layers.len() - 1])
    }

    pub fn remove_layer(&mut self, id: &str) -> Result<AssetLayer, AssetError> {
        let pos = self
            .state
            .layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| AssetError::LayerNotFound { id: id.to_string() })?;
        Ok(self.state.layers.remove(pos))
    }

    pub fn update_layer(&mut self, id: &str, patch: LayerPatch) -> Result<&AssetLayer, AssetError> {
        let layer = self
            .state
            .layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AssetError::LayerNotFound { id: id.to_string() })?;

        if let Some(color) = patch.color {
            layer.color = color;
        }
        if let Some(opacity) = patch.opacity {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(mode) = patch.blend_mode {
            layer.blend_mode = mode;
        }
        if let Some(name) = patch.name {
            layer.name = name;
        }
        Ok(layer)
    }

    /// Recolor toward a palette entry: desaturated base, slight contrast
    /// boost, then a full `color` layer and a half-strength `soft-light` tint.
    /// Replaces any existing layers.
    pub fn smart_recolor(&mut self, color: &PaletteColor) {
        let match_layer = AssetLayer {
            id: self.next_id(),
            color: color.hex,
            opacity: 1.0,
            blend_mode: BlendMode::Color,
            name: format!("Match: {}", color.name),
        };
        let tint_layer = AssetLayer {
            id: self.next_id(),
            color: color.hex,
            opacity: 0.5,
            blend_mode: BlendMode::SoftLight,
            name: format!("Tint: {}", color.name),
        };
        self.state = AdjustmentState {
            hue: 0,
            saturation: 0,
            brightness: 100,
            contrast: 110,
            layers: vec![match_layer, tint_layer],
        };
        tracing::debug!(color = %color.hex, name = %color.name, "Applied smart recolor");
    }

    // ─── Analysis ───────────────────────────────────────────────────────────

    /// Store a finished analysis. Failures keep the previous palette.
    pub fn apply_analysis(&mut self, result: Result<AnalysisResult, PaletteError>) {
        match result {
            Ok(analysis) => {
                self.error = None;
                self.palette = Some(analysis);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Palette analysis failed");
                self.error = Some(PaletteError::USER_MESSAGE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlaykit_types::PaletteCategory;

    fn swatch() -> PaletteColor {
        PaletteColor {
            hex: Color::rgb(0xff, 0x88, 0x00),
            name: "Amber".into(),
            category: PaletteCategory::Hair,
        }
    }

    #[test]
    fn add_layer_defaults_and_limit() {
        let mut editor = AssetEditor::new();
        let first = editor.add_layer().unwrap();
        assert_eq!(first.name, "Layer 1");
        assert_eq!(first.color, DEFAULT_LAYER_COLOR);
        assert_eq!(first.blend_mode, BlendMode::Overlay);
        assert_eq!(first.opacity, 0.8);

        for _ in 1..MAX_LAYERS {
            editor.add_layer().unwrap();
        }
        assert!(matches!(
            editor.add_layer(),
            Err(AssetError::MaxLayersReached { max: 5 })
        ));
        assert_eq!(editor.layers().len(), MAX_LAYERS);
    }

    #[test]
    fn layer_ids_are_never_reused() {
        let mut editor = AssetEditor::new();
        let id = editor.add_layer().unwrap().id.clone();
        editor.remove_layer(&id).unwrap();
        let next = editor.add_layer().unwrap();
        assert_ne!(next.id, id);
        assert_eq!(next.name, "Layer 1");
    }

    #[test]
    fn update_and_remove_unknown_layer() {
        let mut editor = AssetEditor::new();
        let id = editor.add_layer().unwrap().id.clone();

        let layer = editor
            .update_layer(
                &id,
                LayerPatch {
                    opacity: Some(1.5),
                    blend_mode: Some(BlendMode::Multiply),
                    ..LayerPatch::default()
                },
            )
            .unwrap();
        assert_eq!(layer.opacity, 1.0);
        assert_eq!(layer.blend_mode, BlendMode::Multiply);
        assert_eq!(layer.name, "Layer 1");

        assert!(matches!(
            editor.remove_layer("layer-99"),
            Err(AssetError::LayerNotFound { .. })
        ));
    }

    #[test]
    fn filter_string_and_reset() {
        let mut editor = AssetEditor::new();
        assert_eq!(
            editor.filter_css(),
            "hue-rotate(0deg) saturate(100%) brightness(100%) contrast(100%)"
        );

        editor.set_hue(-270);
        editor.set_saturation(250);
        editor.set_contrast(90);
        editor.add_layer().unwrap();
        assert_eq!(
            editor.filter_css(),
            "hue-rotate(-180deg) saturate(200%) brightness(100%) contrast(90%)"
        );

        editor.reset();
        assert_eq!(editor.state(), &AdjustmentState::default());
    }

    #[test]
    fn smart_recolor_replaces_layers() {
        let mut editor = AssetEditor::new();
        editor.add_layer().unwrap();
        editor.smart_recolor(&swatch());

        let state = editor.state();
        assert_eq!((state.saturation, state.contrast), (0, 110));
        assert_eq!(state.layers.len(), 2);
        assert_eq!(state.layers[0].blend_mode, BlendMode::Color);
        assert_eq!(state.layers[0].opacity, 1.0);
        assert_eq!(state.layers[1].blend_mode, BlendMode::SoftLight);
        assert_eq!(state.layers[1].opacity, 0.5);
        assert_eq!(state.layers[1].name, "Tint: Amber");
    }

    #[test]
    fn parse_analysis_validates_response() {
        let ok = parse_analysis(
            r##"{"colors":[{"hex":"#FF8800","name":"Amber","category":"hair"}],"description":"warm"}"##,
        )
        .unwrap();
        assert_eq!(ok.colors[0].hex, Color::rgb(0xff, 0x88, 0x00));

        assert!(matches!(parse_analysis(r#"{"colors":[]}"#), Err(PaletteError::Empty)));
        assert!(matches!(parse_analysis("not json"), Err(PaletteError::Parse(_))));
    }

    #[test]
    fn failed_analysis_keeps_previous_palette() {
        let mut editor = AssetEditor::new();
        editor.apply_analysis(Ok(AnalysisResult {
            colors: vec![swatch()],
            description: None,
        }));
        editor.apply_analysis(Err(PaletteError::Service("timeout".into())));

        assert_eq!(editor.error(), Some(PaletteError::USER_MESSAGE));
        assert_eq!(editor.palette().map(|p| p.colors.len()), Some(1));

        editor.apply_analysis(parse_analysis(r##"{"colors":[{"hex":"#000","name":"Ink"}]}"##));
        assert_eq!(editor.error(), None);
        assert_eq!(editor.palette().map(|p| p.colors[0].name.as_str()), Some("Ink"));
    }
}
