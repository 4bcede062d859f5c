//! Chat box widget: retention window, mock feed, render model and export

pub mod codegen;
mod feed;
mod render;
mod retention;

#[cfg(test)]
mod retention_tests;

pub use feed::MockFeed;
pub use render::{
    BadgeImage, DEFAULT_BADGES, EMOTES, RenderedMessage, Segment, badge_source, badges_for,
    format_timestamp, render_message, split_emotes,
};
pub use retention::{ChatPreview, DisplayedMessage, HIDE_FADE_MS};
