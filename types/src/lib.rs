//! Shared settings types for overlaykit
//!
//! This crate contains the serializable settings for every widget tool. Both
//! the preview simulators and the code generators in `overlaykit-core` read
//! these types; nothing here carries runtime state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Limits
// ─────────────────────────────────────────────────────────────────────────────

/// Upper bound for the chat `max_messages` setting
pub const MAX_CHAT_MESSAGES: u32 = 20;

/// Maximum number of goals the configurator lets a user add
pub const MAX_GOALS: usize = 20;

/// Maximum number of color layers on the asset tool
pub const MAX_LAYERS: usize = 5;

/// Default number of mock messages kept in the preview source list
pub const MOCK_HISTORY_LIMIT: usize = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color, serialized as a CSS hex string.
///
/// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa` on input. Displays as lowercase
/// `#rrggbb` when fully opaque, `#rrggbbaa` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const TRANSPARENT: Color = Color([0, 0, 0, 0]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b, 255])
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color([r, g, b, a])
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    pub fn is_opaque(&self) -> bool {
        self.0[3] == 255
    }
}

/// Error returned when a string is not a valid hex color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    pub input: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color '{}'", self.input)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError {
            input: s.to_string(),
        };
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        match hex.len() {
            3 => {
                let mut out = [0u8, 0, 0, 255];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16).ok_or_else(err)? as u8;
                    out[i] = v * 17;
                }
                Ok(Color(out))
            }
            6 => Ok(Color([byte(0)?, byte(2)?, byte(4)?, 255])),
            8 => Ok(Color([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fill (solid or gradient surface)
// ─────────────────────────────────────────────────────────────────────────────

/// Solid-or-gradient surface color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fill {
    pub color: Color,
    pub color2: Color,
    /// Gradient angle in degrees
    pub angle: i32,
    pub gradient: bool,
}

impl Fill {
    pub const fn solid(color: Color) -> Self {
        Self {
            color,
            color2: Color::BLACK,
            angle: 90,
            gradient: false,
        }
    }

    pub const fn linear(color: Color, color2: Color, angle: i32) -> Self {
        Self {
            color,
            color2,
            angle,
            gradient: true,
        }
    }

    /// CSS `background` value for this fill
    pub fn css(&self) -> String {
        if self.gradient {
            format!(
                "linear-gradient({}deg, {}, {})",
                self.angle, self.color, self.color2
            )
        } else {
            self.color.to_string()
        }
    }
}

impl Default for Fill {
    fn default() -> Self {
        Fill::solid(Color::TRANSPARENT)
    }
}

/// Partial fill; unset fields fall back to a base [`Fill`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color2: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<bool>,
}

impl From<Fill> for FillOverride {
    fn from(fill: Fill) -> Self {
        Self {
            color: Some(fill.color),
            color2: Some(fill.color2),
            angle: Some(fill.angle),
            gradient: Some(fill.gradient),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Roles
// ─────────────────────────────────────────────────────────────────────────────

/// Chat-message priority classification driving style resolution
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Default,
    Broadcaster,
    Moderator,
    Vip,
    Subscriber,
}

impl Role {
    /// Roles in priority order, highest first
    pub const PRIORITY: [Role; 4] = [
        Role::Broadcaster,
        Role::Moderator,
        Role::Vip,
        Role::Subscriber,
    ];

    pub const ALL: [Role; 5] = [
        Role::Default,
        Role::Broadcaster,
        Role::Moderator,
        Role::Vip,
        Role::Subscriber,
    ];

    /// Badge name as it appears in the `name/version` tag tokens
    pub fn badge_name(&self) -> Option<&'static str> {
        match self {
            Role::Default => None,
            Role::Broadcaster => Some("broadcaster"),
            Role::Moderator => Some("moderator"),
            Role::Vip => Some("vip"),
            Role::Subscriber => Some("subscriber"),
        }
    }

    /// Short label used in generated CSS class names
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Default => "default",
            Role::Broadcaster => "broadcaster",
            Role::Moderator => "mod",
            Role::Vip => "vip",
            Role::Subscriber => "sub",
        }
    }

    /// Highest-priority role present in a comma-joined badge tag.
    ///
    /// Tokens are `name/version`; matching is by exact name.
    pub fn from_badges(badges: &str) -> Role {
        let names: Vec<&str> = badges
            .split(',')
            .filter_map(|token| token.split('/').next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        Role::PRIORITY
            .into_iter()
            .find(|role| role.badge_name().is_some_and(|b| names.contains(&b)))
            .unwrap_or(Role::Default)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Settings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatDirection {
    /// Newest message at the bottom
    #[default]
    Up,
    /// Newest message at the top
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLayout {
    Inline,
    #[default]
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    None,
    #[default]
    Default,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimestampFormat {
    #[serde(rename = "none")]
    None,
    #[default]
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "24h")]
    Hour24,
}

/// Entrance animation for new chat messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageAnimation {
    None,
    FadeIn,
    SlideInLeft,
    SlideInRight,
    #[default]
    SlideInUp,
    SlideInDown,
    PopIn,
    BounceIn,
}

impl MessageAnimation {
    /// CSS keyframes name, `None` for no animation
    pub fn keyframes(&self) -> Option<&'static str> {
        match self {
            MessageAnimation::None => None,
            MessageAnimation::FadeIn => Some("fadeIn"),
            MessageAnimation::SlideInLeft => Some("slideInLeft"),
            MessageAnimation::SlideInRight => Some("slideInRight"),
            MessageAnimation::SlideInUp => Some("slideInUp"),
            MessageAnimation::SlideInDown => Some("slideInDown"),
            MessageAnimation::PopIn => Some("popIn"),
            MessageAnimation::BounceIn => Some("bounceIn"),
        }
    }
}

/// Text shadow applied to chat text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextShadow {
    pub enabled: bool,
    pub color: Color,
    pub x: i32,
    pub y: i32,
    pub blur: u32,
}

impl Default for TextShadow {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::rgba(0, 0, 0, 0x99),
            x: 1,
            y: 1,
            blur: 2,
        }
    }
}

/// Background, border and corner style of a message or username box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxStyle {
    pub background: Fill,
    pub border_color: Color,
    pub border_width: u32,
    pub corner_radius: u32,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            background: Fill::default(),
            border_color: Color::rgb(0x58, 0xfb, 0xb0),
            border_width: 0,
            corner_radius: 0,
        }
    }
}

/// Per-role box override; unset fields fall back to the base box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxStyleOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<FillOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<u32>,
}

impl From<BoxStyle> for BoxStyleOverride {
    fn from(style: BoxStyle) -> Self {
        Self {
            background: Some(style.background.into()),
            border_color: Some(style.border_color),
            border_width: Some(style.border_width),
            corner_radius: Some(style.corner_radius),
        }
    }
}

/// A styled surface (message box or username box) with optional role overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceStyle {
    pub enabled: bool,
    /// When true, `overrides` are ignored and every role uses `base`
    pub unified: bool,
    pub base: BoxStyle,
    pub overrides: BTreeMap<Role, BoxStyleOverride>,
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            enabled: false,
            unified: true,
            base: BoxStyle::default(),
            overrides: BTreeMap::new(),
        }
    }
}

/// Username colors with optional role overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleColors {
    pub unified: bool,
    pub base: Color,
    pub overrides: BTreeMap<Role, Color>,
}

impl Default for RoleColors {
    fn default() -> Self {
        Self {
            unified: true,
            base: Color::rgb(0x58, 0xfb, 0xb0),
            overrides: BTreeMap::from([
                (Role::Broadcaster, Color::rgb(0xff, 0x45, 0x00)),
                (Role::Moderator, Color::rgb(0x34, 0xd3, 0x99)),
                (Role::Vip, Color::rgb(0xf4, 0x72, 0xb6)),
                (Role::Subscriber, Color::rgb(0xa7, 0x8b, 0xfa)),
            ]),
        }
    }
}

/// Chat box widget settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    // ─── Layout ─────────────────────────────────────────────────────────────
    pub direction: ChatDirection,
    pub text_align: TextAlign,
    pub message_layout: MessageLayout,
    /// Maximum visible messages (1-20)
    pub max_messages: u32,

    // ─── Typography ─────────────────────────────────────────────────────────
    pub font_family: String,
    /// Font size in px
    pub font_size: u32,
    /// Weight level 1-5 for usernames
    pub username_weight: u8,
    /// Weight level 1-5 for message text
    pub message_weight: u8,
    pub text_shadow: TextShadow,

    // ─── Colors ─────────────────────────────────────────────────────────────
    pub background: Fill,
    pub username_colors: RoleColors,
    pub message_color: Color,
    pub timestamp_color: Color,

    // ─── Badges ─────────────────────────────────────────────────────────────
    pub badge_style: BadgeStyle,
    /// Badge height in em
    pub badge_size: f32,
    /// Image source (URL or data URI) per role, used with `BadgeStyle::Custom`
    pub custom_badges: BTreeMap<Role, String>,

    // ─── Behaviour ──────────────────────────────────────────────────────────
    pub timestamp: TimestampFormat,
    pub animation: MessageAnimation,
    pub hide_messages: bool,
    /// Seconds before a displayed message starts hiding
    pub hide_messages_after: u32,

    // ─── Surfaces ───────────────────────────────────────────────────────────
    pub message_box: SurfaceStyle,
    pub username_box: SurfaceStyle,
}

impl ChatSettings {
    /// `max_messages` clamped into the supported range
    pub fn visible_limit(&self) -> usize {
        self.max_messages.clamp(1, MAX_CHAT_MESSAGES) as usize
    }
}

fn role_box(bg: Color, color2: Color, border: Color, border_width: u32) -> BoxStyleOverride {
    BoxStyle {
        background: Fill {
            color: bg,
            color2,
            angle: 90,
            gradient: false,
        },
        border_color: border,
        border_width,
        corner_radius: 0,
    }
    .into()
}

impl Default for ChatSettings {
    fn default() -> Self {
        let message_box = SurfaceStyle {
            enabled: false,
            unified: true,
            base: BoxStyle {
                background: Fill {
                    color: Color::rgba(0x1a, 0x20, 0x2c, 0x80),
                    color2: Color::rgba(0x2d, 0x37, 0x48, 0x80),
                    angle: 90,
                    gradient: false,
                },
                border_color: Color::rgb(0x58, 0xfb, 0xb0),
                border_width: 0,
                corner_radius: 0,
            },
            overrides: BTreeMap::from([
                (
                    Role::Broadcaster,
                    role_box(
                        Color::rgba(0x58, 0x00, 0x00, 0x80),
                        Color::BLACK,
                        Color::rgb(0xb3, 0x00, 0x1b),
                        1,
                    ),
                ),
                (
                    Role::Moderator,
                    role_box(
                        Color::rgba(0x00, 0x33, 0x22, 0x80),
                        Color::BLACK,
                        Color::rgb(0x00, 0xf5, 0xd4),
                        1,
                    ),
                ),
                (
                    Role::Vip,
                    role_box(
                        Color::rgba(0x44, 0x00, 0x44, 0x80),
                        Color::BLACK,
                        Color::rgb(0xff, 0x00, 0xff),
                        1,
                    ),
                ),
                (
                    Role::Subscriber,
                    role_box(
                        Color::rgba(0x22, 0x00, 0x44, 0x80),
                        Color::BLACK,
                        Color::rgb(0xaa, 0x00, 0xff),
                        1,
                    ),
                ),
            ]),
        };

        let username_box = SurfaceStyle {
            enabled: false,
            unified: true,
            base: BoxStyle {
                background: Fill {
                    color: Color::rgba(0x4a, 0x55, 0x68, 0x80),
                    color2: Color::rgba(0x2d, 0x37, 0x48, 0x80),
                    angle: 90,
                    gradient: false,
                },
                border_color: Color::rgb(0x58, 0xfb, 0xb0),
                border_width: 0,
                corner_radius: 0,
            },
            overrides: BTreeMap::from([
                (
                    Role::Broadcaster,
                    role_box(
                        Color::rgba(0xeb, 0x40, 0x34, 0x80),
                        Color::rgba(0xa3, 0x22, 0x19, 0x80),
                        Color::rgb(0xb3, 0x00, 0x1b),
                        0,
                    ),
                ),
                (
                    Role::Moderator,
                    role_box(
                        Color::rgba(0x2f, 0x5b, 0x4a, 0x80),
                        Color::rgba(0x1f, 0x3d, 0x31, 0x80),
                        Color::rgb(0x00, 0xf5, 0xd4),
                        0,
                    ),
                ),
                (
                    Role::Vip,
                    role_box(
                        Color::rgba(0x6b, 0x37, 0x58, 0x80),
                        Color::rgba(0x4a, 0x26, 0x3c, 0x80),
                        Color::rgb(0xff, 0x00, 0xff),
                        0,
                    ),
                ),
                (
                    Role::Subscriber,
                    role_box(
                        Color::rgba(0x4c, 0x42, 0x6b, 0x80),
                        Color::rgba(0x35, 0x2e, 0x4a, 0x80),
                        Color::rgb(0xaa, 0x00, 0xff),
                        0,
                    ),
                ),
            ]),
        };

        Self {
            direction: ChatDirection::Up,
            text_align: TextAlign::Left,
            message_layout: MessageLayout::Block,
            max_messages: 15,
            font_family: "Inter".to_string(),
            font_size: 16,
            username_weight: 5,
            message_weight: 2,
            text_shadow: TextShadow::default(),
            background: Fill {
                color: Color::TRANSPARENT,
                color2: Color::rgba(0x2d, 0x37, 0x48, 0x80),
                angle: 90,
                gradient: false,
            },
            username_colors: RoleColors::default(),
            message_color: Color::WHITE,
            timestamp_color: Color::rgb(0xa9, 0xa9, 0xa9),
            badge_style: BadgeStyle::Default,
            badge_size: 1.2,
            custom_badges: BTreeMap::new(),
            timestamp: TimestampFormat::Hour12,
            animation: MessageAnimation::SlideInUp,
            hide_messages: false,
            hide_messages_after: 60,
            message_box,
            username_box,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Messages
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageTags {
    /// Chatter's own name color, if any
    #[serde(default)]
    pub color: Option<Color>,
    /// Comma-joined `name/version` badge tokens
    #[serde(default)]
    pub badges: String,
}

/// Synthetic chat message feeding the chat preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockMessage {
    /// Monotonic id, used as dedupe and sort key
    pub id: u64,
    pub user: String,
    pub message: String,
    #[serde(default)]
    pub tags: MessageTags,
}

impl MockMessage {
    pub fn new(id: u64, user: &str, message: &str, color: Option<Color>, badges: &str) -> Self {
        Self {
            id,
            user: user.to_string(),
            message: message.to_string(),
            tags: MessageTags {
                color,
                badges: badges.to_string(),
            },
        }
    }

    pub fn role(&self) -> Role {
        Role::from_badges(&self.tags.badges)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Goal Settings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    #[default]
    Subscriber,
    Tip,
    Cheer,
    Follower,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Subscriber => "subscriber",
            GoalType::Tip => "tip",
            GoalType::Cheer => "cheer",
            GoalType::Follower => "follower",
        }
    }

    /// Host session key holding the running total for this goal type
    pub fn session_key(&self) -> String {
        format!("{}-total", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalLayout {
    #[default]
    Bar,
}

impl GoalLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalLayout::Bar => "bar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDisplayMode {
    /// Only the active goal
    #[default]
    Single,
    /// Active goal plus upcoming goals, fading with distance
    Stack,
}

impl GoalDisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalDisplayMode::Single => "single",
            GoalDisplayMode::Stack => "stack",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalItem {
    pub id: String,
    pub title: String,
    pub target_amount: f64,
    /// Per-goal fill, used when `unified_colors` is off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillOverride>,
}

impl GoalItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            target_amount,
            fill: None,
        }
    }
}

/// Donation-goal tracker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalSettings {
    pub goal_type: GoalType,
    pub start_amount: f64,
    pub goals: Vec<GoalItem>,
    pub layout: GoalLayout,
    pub font_family: String,
    pub display_mode: GoalDisplayMode,
    /// Goals shown in stack mode (0 falls back to 3)
    pub goals_to_display: u32,

    // ─── Style ──────────────────────────────────────────────────────────────
    pub fill: Fill,
    pub unified_colors: bool,
    pub use_stripes: bool,
    pub track_color: Color,
    pub text_color: Color,
    pub bar_height: u32,
    pub border_width: u32,
    pub border_color: Color,
    pub corner_radius: u32,
    pub show_title: bool,
    pub show_amount: bool,
    pub show_percentage: bool,
}

impl Default for GoalSettings {
    fn default() -> Self {
        Self {
            goal_type: GoalType::Subscriber,
            start_amount: 0.0,
            goals: vec![
                GoalItem::new("1", "Subathon Level 1", 100.0),
                GoalItem::new("2", "Subathon Level 2", 200.0),
            ],
            layout: GoalLayout::Bar,
            font_family: "Inter".to_string(),
            display_mode: GoalDisplayMode::Single,
            goals_to_display: 3,
            fill: Fill::linear(
                Color::rgb(0xf4, 0xc4, 0x30),
                Color::rgb(0xff, 0xd7, 0x00),
                90,
            ),
            unified_colors: true,
            use_stripes: false,
            track_color: Color::rgb(0x1a, 0x1a, 0x1a),
            text_color: Color::WHITE,
            bar_height: 40,
            border_width: 2,
            border_color: Color::rgb(0x33, 0x33, 0x33),
            corner_radius: 8,
            show_title: true,
            show_amount: true,
            show_percentage: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Timer Settings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Twitch,
    Youtube,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitch => "twitch",
            Platform::Youtube => "youtube",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Events add time (subathon)
    #[default]
    CountdownAdd,
    /// Events remove time
    CountdownSub,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::CountdownAdd => "countdown_add",
            TimerMode::CountdownSub => "countdown_sub",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerLayout {
    Digital,
    #[default]
    Box,
}

impl TimerLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerLayout::Digital => "digital",
            TimerLayout::Box => "box",
        }
    }
}

/// Seconds awarded per event kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTable {
    /// Twitch sub, or YouTube free subscribe
    pub per_sub: u32,
    /// Per currency unit
    pub per_tip: u32,
    /// Per 100 bits
    pub per_cheer: u32,
    pub per_follow: u32,
    pub per_member: u32,
    /// Per currency unit
    pub per_super_chat: u32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            per_sub: 300,
            per_tip: 60,
            per_cheer: 60,
            per_follow: 0,
            per_member: 300,
            per_super_chat: 60,
        }
    }
}

/// Countdown timer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub platform: Platform,
    pub mode: TimerMode,
    pub start_hours: u32,
    pub start_minutes: u32,
    pub start_seconds: u32,
    /// Maximum remaining time in hours (0 = unlimited)
    pub cap_hours: u32,
    pub rewards: RewardTable,

    // ─── Style ──────────────────────────────────────────────────────────────
    pub layout: TimerLayout,
    pub font_family: String,
    pub font_size: u32,
    pub text_color: Color,
    pub background: Fill,
    pub border_color: Color,
    pub border_width: u32,
    pub corner_radius: u32,
    pub show_end_time: bool,
    pub end_time_color: Color,
    pub text_shadow: bool,
}

impl TimerSettings {
    pub fn start_total_seconds(&self) -> u64 {
        self.start_hours as u64 * 3600 + self.start_minutes as u64 * 60 + self.start_seconds as u64
    }

    /// Cap in seconds, 0 meaning unlimited
    pub fn cap_seconds(&self) -> u64 {
        self.cap_hours as u64 * 3600
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            platform: Platform::Twitch,
            mode: TimerMode::CountdownAdd,
            start_hours: 4,
            start_minutes: 0,
            start_seconds: 0,
            cap_hours: 24,
            rewards: RewardTable::default(),
            layout: TimerLayout::Box,
            font_family: "Inter".to_string(),
            font_size: 64,
            text_color: Color::WHITE,
            background: Fill::linear(
                Color::rgb(0xd9, 0x46, 0xef),
                Color::rgb(0x7e, 0x22, 0xce),
                45,
            ),
            border_color: Color::WHITE,
            border_width: 0,
            corner_radius: 16,
            show_end_time: true,
            end_time_color: Color::rgb(0xa1, 0xa1, 0xaa),
            text_shadow: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Asset Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Canvas composite operation for a color layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    SourceOver,
    Multiply,
    Screen,
    #[default]
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
        }
    }
}

impl FromStr for BlendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [BlendMode; 16] = [
            BlendMode::SourceOver,
            BlendMode::Multiply,
            BlendMode::Screen,
            BlendMode::Overlay,
            BlendMode::Darken,
            BlendMode::Lighten,
            BlendMode::ColorDodge,
            BlendMode::ColorBurn,
            BlendMode::HardLight,
            BlendMode::SoftLight,
            BlendMode::Difference,
            BlendMode::Exclusion,
            BlendMode::Hue,
            BlendMode::Saturation,
            BlendMode::Color,
            BlendMode::Luminosity,
        ];
        ALL.into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown blend mode '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetLayer {
    pub id: String,
    pub color: Color,
    /// 0.0 - 1.0
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub name: String,
}

/// Image adjustments and color layers for the recolor tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentState {
    /// Degrees, -180..=180
    pub hue: i32,
    /// Percent, 0..=200
    pub saturation: u32,
    /// Percent, 0..=200
    pub brightness: u32,
    /// Percent, 0..=200
    pub contrast: u32,
    /// Composited over the base image in list order
    pub layers: Vec<AssetLayer>,
}

impl Default for AdjustmentState {
    fn default() -> Self {
        Self {
            hue: 0,
            saturation: 100,
            brightness: 100,
            contrast: 100,
            layers: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Palette Analysis
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteCategory {
    Skin,
    Hair,
    Outfit,
    Accent,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub hex: Color,
    pub name: String,
    #[serde(default)]
    pub category: PaletteCategory,
}

/// Palette extracted from an image by the analysis service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub colors: Vec<PaletteColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────────────────────────────────────

/// The configurator's tool pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Chat,
    Goal,
    Timer,
    Asset,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Chat, Tool::Goal, Tool::Timer, Tool::Asset];

    /// Accent color for this tool's page
    pub fn accent(&self) -> Color {
        match self {
            Tool::Chat => Color::rgb(0x58, 0xfb, 0xb0),
            Tool::Goal => Color::rgb(0xf4, 0xc4, 0x30),
            Tool::Timer => Color::rgb(0xd9, 0x46, 0xef),
            Tool::Asset => Color::rgb(0x2e, 0x5c, 0xff),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Chat => "chat",
            Tool::Goal => "goal",
            Tool::Timer => "timer",
            Tool::Asset => "asset",
        }
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tool '{s}' (expected chat, goal, timer or asset)"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Studio Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Preview session tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Seconds between synthetic chat messages when auto-feed is on
    #[serde(default = "default_mock_interval")]
    pub mock_message_interval_secs: u64,
    #[serde(default = "default_mock_history")]
    pub mock_history_limit: usize,
    #[serde(default)]
    pub auto_feed: bool,
}

fn default_mock_interval() -> u64 {
    3
}

fn default_mock_history() -> usize {
    MOCK_HISTORY_LIMIT
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            mock_message_interval_secs: default_mock_interval(),
            mock_history_limit: default_mock_history(),
            auto_feed: false,
        }
    }
}

/// Persisted configuration for the overlaykit command-line studio
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Directory export bundles are written to (per-tool subdirectories)
    #[serde(default)]
    pub export_dir: Option<String>,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_short_long_and_alpha_forms() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#58FBB0".parse::<Color>().unwrap(), Color::rgb(0x58, 0xfb, 0xb0));
        assert_eq!(
            "#1a202c80".parse::<Color>().unwrap(),
            Color::rgba(0x1a, 0x20, 0x2c, 0x80)
        );
        assert!("58fbb0".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn color_displays_lowercase_and_drops_opaque_alpha() {
        assert_eq!(Color::rgb(0xF4, 0xC4, 0x30).to_string(), "#f4c430");
        assert_eq!(Color::rgba(0, 0, 0, 0x99).to_string(), "#00000099");
    }

    #[test]
    fn fill_css_solid_and_gradient() {
        assert_eq!(Fill::solid(Color::WHITE).css(), "#ffffff");
        let fill = Fill::linear(Color::rgb(0xd9, 0x46, 0xef), Color::rgb(0x7e, 0x22, 0xce), 45);
        assert_eq!(fill.css(), "linear-gradient(45deg, #d946ef, #7e22ce)");
    }

    #[test]
    fn role_from_badges_uses_priority_and_exact_names() {
        assert_eq!(Role::from_badges("vip/1,subscriber/6"), Role::Vip);
        assert_eq!(Role::from_badges("broadcaster/1,subscriber/0"), Role::Broadcaster);
        assert_eq!(Role::from_badges("subscriber/3"), Role::Subscriber);
        assert_eq!(Role::from_badges(""), Role::Default);
        assert_eq!(Role::from_badges("vip-ish/1"), Role::Default);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: TimerSettings = toml::from_str("cap_hours = 2\nmode = \"countdown_sub\"").unwrap();
        assert_eq!(settings.cap_hours, 2);
        assert_eq!(settings.mode, TimerMode::CountdownSub);
        assert_eq!(settings.start_hours, 4);
        assert_eq!(settings.rewards.per_sub, 300);
    }

    #[test]
    fn chat_settings_round_trip_through_json() {
        let settings = ChatSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: ChatSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
        assert!(json.contains("\"#58fbb0\""));
    }

    #[test]
    fn tool_accents() {
        assert_eq!(Tool::Goal.accent().to_string(), "#f4c430");
        assert_eq!("timer".parse::<Tool>().unwrap(), Tool::Timer);
    }
}
