pub mod asset;
pub mod chat;
pub mod clock;
pub mod codegen;
pub mod config;
pub mod error;
pub mod events;
pub mod goal;
pub mod settings_io;
pub mod style;
pub mod timer;

// Shared data model
pub use overlaykit_types as types;

// Re-exports for convenience
pub use asset::{AssetEditor, LayerPatch, filter_css, parse_analysis};
pub use chat::{ChatPreview, MockFeed, RenderedMessage};
pub use clock::{Clock, Millis, SessionClock};
pub use codegen::{ExportWidget, WidgetBundle};
pub use config::StudioConfigExt;
pub use error::{AssetError, ConfigError, PaletteError, SettingsError};
pub use events::{HostEvent, Listener};
pub use goal::{CompletionTimings, GoalListExt, GoalTracker, GoalView, GoalWarning};
pub use settings_io::{load_settings, save_settings, to_toml};
pub use style::resolve_role_style;
pub use timer::{Countdown, RewardLookup};
