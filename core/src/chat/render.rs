//! Render model for the chat preview
//!
//! Turns the visible messages into fully resolved rows: role styling, badge
//! images, emote segments and timestamp text. Presentation layers draw these
//! rows without consulting settings again.

use chrono::{DateTime, TimeZone};
use phf::phf_map;

use overlaykit_types::{BadgeStyle, ChatSettings, Role, TimestampFormat};

use super::retention::{ChatPreview, DisplayedMessage};
use crate::style::{RoleStyle, resolve_role_style};

/// Default badge images keyed by badge name
pub static DEFAULT_BADGES: phf::Map<&'static str, &'static str> = phf_map! {
    "broadcaster" => "https://static-cdn.jtvnw.net/badges/v1/5527c58c-fb7d-422d-b71b-f349d43c2af2/1",
    "moderator" => "https://static-cdn.jtvnw.net/badges/v1/3267646d-33f0-4b17-b3df-f923a41db1d0/1",
    "vip" => "https://static-cdn.jtvnw.net/badges/v1/b817aba4-fad8-49e2-b88a-7cc744fcfc1d/1",
    "subscriber" => "https://static-cdn.jtvnw.net/badges/v1/5d9f2208-5dd8-11e7-8513-2ff4adfae661/1",
};

/// Emote images keyed by emote code
pub static EMOTES: phf::Map<&'static str, &'static str> = phf_map! {
    "PogChamp" => "https://static-cdn.jtvnw.net/emoticons/v2/84608/default/dark/1.0",
    "Kappa" => "https://static-cdn.jtvnw.net/emoticons/v2/25/default/dark/1.0",
    "LUL" => "https://static-cdn.jtvnw.net/emoticons/v2/425618/default/dark/1.0",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeImage {
    pub name: String,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Emote { code: String, src: &'static str },
}

/// One chat row ready for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub id: u64,
    pub user: String,
    pub style: RoleStyle,
    pub badges: Vec<BadgeImage>,
    pub segments: Vec<Segment>,
    pub timestamp: Option<String>,
    pub hiding: bool,
}

/// Image source for a badge under the current badge style
pub fn badge_source(settings: &ChatSettings, name: &str) -> Option<String> {
    match settings.badge_style {
        BadgeStyle::None => None,
        BadgeStyle::Default => DEFAULT_BADGES.get(name).map(|s| s.to_string()),
        BadgeStyle::Custom => Role::PRIORITY
            .into_iter()
            .find(|r| r.badge_name() == Some(name))
            .and_then(|r| settings.custom_badges.get(&r))
            .filter(|src| !src.is_empty())
            .cloned(),
    }
}

/// Badge images for a comma-joined `name/version` tag
pub fn badges_for(settings: &ChatSettings, badges: &str) -> Vec<BadgeImage> {
    badges
        .split(',')
        .filter_map(|token| token.split('/').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| {
            badge_source(settings, name).map(|src| BadgeImage {
                name: name.to_string(),
                src,
            })
        })
        .collect()
}

fn flush_word(word: &mut String, plain: &mut String, segments: &mut Vec<Segment>) {
    if word.is_empty() {
        return;
    }
    match EMOTES.get(word.as_str()) {
        Some(src) => {
            if !plain.is_empty() {
                segments.push(Segment::Text(std::mem::take(plain)));
            }
            segments.push(Segment::Emote {
                code: std::mem::take(word),
                src: *src,
            });
        }
        None => {
            plain.push_str(word);
            word.clear();
        }
    }
}

/// Split message text into plain runs and known emotes, preserving whitespace
pub fn split_emotes(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            flush_word(&mut word, &mut plain, &mut segments);
            plain.push(c);
        } else {
            word.push(c);
        }
    }
    flush_word(&mut word, &mut plain, &mut segments);
    if !plain.is_empty() {
        segments.push(Segment::Text(plain));
    }
    segments
}

/// Timestamp text for a message shown at `at`
pub fn format_timestamp<Tz: TimeZone>(format: TimestampFormat, at: &DateTime<Tz>) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    match format {
        TimestampFormat::None => None,
        TimestampFormat::Hour12 => Some(at.format("%-I:%M %p").to_string()),
        TimestampFormat::Hour24 => Some(at.format("%H:%M").to_string()),
    }
}

pub fn render_message<Tz: TimeZone>(
    settings: &ChatSettings,
    displayed: &DisplayedMessage,
    now_local: &DateTime<Tz>,
) -> RenderedMessage
where
    Tz::Offset: std::fmt::Display,
{
    let msg = &displayed.message;
    RenderedMessage {
        id: msg.id,
        user: msg.user.clone(),
        style: resolve_role_style(settings, msg.role()),
        badges: badges_for(settings, &msg.tags.badges),
        segments: split_emotes(&msg.message),
        timestamp: format_timestamp(settings.timestamp, now_local),
        hiding: displayed.is_hiding(),
    }
}

impl ChatPreview {
    /// Render the visible window in screen order
    pub fn render<Tz: TimeZone>(
        &self,
        settings: &ChatSettings,
        now_local: &DateTime<Tz>,
    ) -> Vec<RenderedMessage>
    where
        Tz::Offset: std::fmt::Display,
    {
        self.visible(settings.direction)
            .into_iter()
            .map(|d| render_message(settings, d, now_local))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use overlaykit_types::{ChatDirection, MockMessage};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn splits_known_emotes_only() {
        let segments = split_emotes("So excited Kappa  see you");
        assert_eq!(
            segments,
            vec![
                Segment::Text("So excited ".into()),
                Segment::Emote {
                    code: "Kappa".into(),
                    src: EMOTES["Kappa"],
                },
                Segment::Text("  see you".into()),
            ]
        );
        assert_eq!(split_emotes("kappa"), vec![Segment::Text("kappa".into())]);
    }

    #[test]
    fn badge_sources_follow_badge_style() {
        let mut settings = ChatSettings::default();
        let badges = badges_for(&settings, "vip/1,subscriber/6,turbo/1");
        assert_eq!(badges.len(), 2);
        assert_eq!(badges[0].name, "vip");

        settings.badge_style = BadgeStyle::Custom;
        settings
            .custom_badges
            .insert(Role::Subscriber, "data:image/png;base64,AAAA".into());
        let badges = badges_for(&settings, "vip/1,subscriber/6");
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].src, "data:image/png;base64,AAAA");

        settings.badge_style = BadgeStyle::None;
        assert!(badges_for(&settings, "vip/1").is_empty());
    }

    #[test]
    fn timestamps_in_12h_and_24h() {
        assert_eq!(
            format_timestamp(TimestampFormat::Hour12, &at(15, 7)).as_deref(),
            Some("3:07 PM")
        );
        assert_eq!(
            format_timestamp(TimestampFormat::Hour24, &at(9, 5)).as_deref(),
            Some("09:05")
        );
        assert_eq!(format_timestamp(TimestampFormat::None, &at(9, 5)), None);
    }

    #[test]
    fn render_orders_by_direction_and_resolves_roles() {
        let mut settings = ChatSettings::default();
        settings.username_colors.unified = false;
        settings.direction = ChatDirection::Down;
        let source = vec![
            MockMessage::new(1, "a", "hi", None, ""),
            MockMessage::new(2, "b", "hey", None, "broadcaster/1"),
        ];
        let mut preview = ChatPreview::new(&settings);
        preview.sync(&source, 0);

        let rows = preview.render(&settings, &at(12, 0));
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(rows[0].style.role, Role::Broadcaster);
        assert_eq!(rows[0].style.username_color.to_string(), "#ff4500");
    }
}
