//! Derived style resolution
//!
//! Shared by the preview renderers and the code generators: unified/custom
//! role overrides, per-goal fill fallback, font weights and text shadows.

use overlaykit_types::{
    BoxStyle, BoxStyleOverride, ChatSettings, Color, Fill, FillOverride, GoalItem, GoalSettings,
    Role, RoleColors, SurfaceStyle, TextShadow,
};

/// Font weights for slider levels 1..=5
pub const FONT_WEIGHTS: [u16; 5] = [300, 400, 500, 600, 700];

/// Map a weight level 1..=5 to a CSS font weight, clamping out-of-range levels
pub fn font_weight(level: u8) -> u16 {
    let idx = (level.max(1) as usize - 1).min(FONT_WEIGHTS.len() - 1);
    FONT_WEIGHTS[idx]
}

/// Apply an optional fill override field-by-field onto a base fill
pub fn resolve_fill(base: &Fill, over: Option<&FillOverride>) -> Fill {
    let Some(over) = over else {
        return *base;
    };
    Fill {
        color: over.color.unwrap_or(base.color),
        color2: over.color2.unwrap_or(base.color2),
        angle: over.angle.unwrap_or(base.angle),
        gradient: over.gradient.unwrap_or(base.gradient),
    }
}

fn apply_box_override(base: &BoxStyle, over: &BoxStyleOverride) -> BoxStyle {
    BoxStyle {
        background: resolve_fill(&base.background, over.background.as_ref()),
        border_color: over.border_color.unwrap_or(base.border_color),
        border_width: over.border_width.unwrap_or(base.border_width),
        corner_radius: over.corner_radius.unwrap_or(base.corner_radius),
    }
}

/// Effective box style for a role on a surface
pub fn resolve_box(surface: &SurfaceStyle, role: Role) -> BoxStyle {
    if surface.unified {
        return surface.base;
    }
    match surface.overrides.get(&role) {
        Some(over) => apply_box_override(&surface.base, over),
        None => surface.base,
    }
}

/// Effective username color for a role
pub fn resolve_username_color(colors: &RoleColors, role: Role) -> Color {
    if colors.unified {
        return colors.base;
    }
    colors.overrides.get(&role).copied().unwrap_or(colors.base)
}

/// Effective bar fill for a goal
pub fn resolve_goal_fill(settings: &GoalSettings, goal: &GoalItem) -> Fill {
    if settings.unified_colors {
        settings.fill
    } else {
        resolve_fill(&settings.fill, goal.fill.as_ref())
    }
}

/// Fully resolved chat styling for one role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleStyle {
    pub role: Role,
    pub username_color: Color,
    /// `None` when username boxes are disabled
    pub username_box: Option<BoxStyle>,
    /// `None` when message boxes are disabled
    pub message_box: Option<BoxStyle>,
}

pub fn resolve_role_style(settings: &ChatSettings, role: Role) -> RoleStyle {
    let surface = |s: &SurfaceStyle| s.enabled.then(|| resolve_box(s, role));
    RoleStyle {
        role,
        username_color: resolve_username_color(&settings.username_colors, role),
        username_box: surface(&settings.username_box),
        message_box: surface(&settings.message_box),
    }
}

/// CSS `text-shadow` value
pub fn text_shadow_css(shadow: &TextShadow) -> String {
    if !shadow.enabled {
        return "none".to_string();
    }
    format!(
        "{}px {}px {}px {}",
        shadow.x, shadow.y, shadow.blur, shadow.color
    )
}

/// Inline CSS declarations for a box
pub fn box_css(style: &BoxStyle) -> String {
    format!(
        "background: {}; border: {}px solid {}; border-radius: {}px;",
        style.background.css(),
        style.border_width,
        style.border_color,
        style.corner_radius
    )
}

/// Google Fonts `@import` rule for a family and weight list
pub fn google_font_import(family: &str, weights: &[u16]) -> String {
    let weights = weights
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(";");
    format!(
        "@import url('https://fonts.googleapis.com/css2?family={}:wght@{}&display=swap');",
        family.trim().replace(' ', "+"),
        weights
    )
}
