//! Chat widget export
//!
//! Role styling is resolved here, once, through [`resolve_role_style`] and
//! emitted as per-role CSS rules. The script only classifies each incoming
//! message by badge priority and applies the same retention window as
//! [`ChatPreview`](super::ChatPreview): cap trimming from the oldest end and
//! two-phase auto-hide with permanently retired ids.

use std::collections::BTreeMap;

use serde::Serialize;

use overlaykit_types::{
    BadgeStyle, BoxStyle, ChatDirection, ChatSettings, MAX_CHAT_MESSAGES, MessageAnimation,
    MessageLayout, Role, TimestampFormat,
};

use super::render::{EMOTES, badge_source};
use super::retention::HIDE_FADE_MS;
use crate::codegen::{
    ExportWidget, WidgetBundle, css_font_family, js_const, json_pretty,
};
use crate::events::Listener;
use crate::style::{FONT_WEIGHTS, font_weight, google_font_import, resolve_role_style, text_shadow_css};

impl ExportWidget for ChatSettings {
    fn export(&self) -> WidgetBundle {
        WidgetBundle {
            html: chat_html(self),
            css: chat_css(self),
            js: chat_js(self),
            fields: chat_fields(self),
            data: json_pretty(self),
        }
    }
}

fn direction_str(direction: ChatDirection) -> &'static str {
    match direction {
        ChatDirection::Up => "up",
        ChatDirection::Down => "down",
    }
}

fn timestamp_str(format: TimestampFormat) -> &'static str {
    match format {
        TimestampFormat::None => "none",
        TimestampFormat::Hour12 => "12h",
        TimestampFormat::Hour24 => "24h",
    }
}

fn badge_style_str(style: BadgeStyle) -> &'static str {
    match style {
        BadgeStyle::None => "none",
        BadgeStyle::Default => "default",
        BadgeStyle::Custom => "custom",
    }
}

pub fn chat_html(settings: &ChatSettings) -> String {
    let layout = match settings.message_layout {
        MessageLayout::Inline => "inline",
        MessageLayout::Block => "block",
    };
    format!(
        r#"
<div id="chat-container" class="direction-{} layout-{}">
    <div id="chat-log"></div>
</div>
"#,
        direction_str(settings.direction),
        layout
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

fn box_rule(selector: &str, style: &BoxStyle, padding: &str) -> String {
    format!(
        "{selector} {{\n    padding: {padding};\n    background: {};\n    border: {}px solid {};\n    border-radius: {}px;\n}}\n",
        style.background.css(),
        style.border_width,
        style.border_color,
        style.corner_radius,
    )
}

fn role_rules(settings: &ChatSettings) -> String {
    let mut css = String::new();
    for role in Role::ALL {
        let style = resolve_role_style(settings, role);
        let class = format!(".role-{}", role.as_str());
        css.push_str(&format!(
            "{class} .username {{ color: {}; }}\n",
            style.username_color
        ));
        if let Some(b) = &style.username_box {
            css.push_str(&box_rule(
                &format!("{class} .username-box"),
                b,
                "2px 6px",
            ));
        }
        if let Some(b) = &style.message_box {
            css.push_str(&box_rule(&format!("{class}.chat-message"), b, "6px 10px"));
        }
    }
    css
}

fn animation_keyframes(animation: MessageAnimation) -> &'static str {
    match animation {
        MessageAnimation::None => "",
        MessageAnimation::FadeIn => "@keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }",
        MessageAnimation::SlideInLeft => {
            "@keyframes slideInLeft { from { opacity: 0; transform: translateX(-100%); } to { opacity: 1; transform: translateX(0); } }"
        }
        MessageAnimation::SlideInRight => {
            "@keyframes slideInRight { from { opacity: 0; transform: translateX(100%); } to { opacity: 1; transform: translateX(0); } }"
        }
        MessageAnimation::SlideInUp => {
            "@keyframes slideInUp { from { opacity: 0; transform: translateY(100%); } to { opacity: 1; transform: translateY(0); } }"
        }
        MessageAnimation::SlideInDown => {
            "@keyframes slideInDown { from { opacity: 0; transform: translateY(-100%); } to { opacity: 1; transform: translateY(0); } }"
        }
        MessageAnimation::PopIn => {
            "@keyframes popIn { 0% { opacity: 0; transform: scale(0.5); } 80% { transform: scale(1.05); } 100% { opacity: 1; transform: scale(1); } }"
        }
        MessageAnimation::BounceIn => {
            "@keyframes bounceIn { 0% { opacity: 0; transform: scale(0.3); } 50% { opacity: 1; transform: scale(1.1); } 70% { transform: scale(0.95); } 100% { transform: scale(1); } }"
        }
    }
}

pub fn chat_css(settings: &ChatSettings) -> String {
    let justify = match settings.direction {
        ChatDirection::Up => "flex-end",
        ChatDirection::Down => "flex-start",
    };

    let mut css = format!(
        r#"
{import}

:root {{
    --font-family: {family};
    --font-size: {size}px;
    --username-weight: {uweight};
    --message-weight: {mweight};
    --message-color: {message_color};
    --timestamp-color: {timestamp_color};
    --text-shadow: {shadow};
    --badge-size: {badge_size}em;
}}

body, html {{
    height: 100%;
    margin: 0;
    overflow: hidden;
    background: transparent;
}}

#chat-container {{
    height: 100%;
    display: flex;
    flex-direction: column;
    justify-content: {justify};
    box-sizing: border-box;
    padding: 10px;
    overflow: hidden;
    background: {background};
    font-family: var(--font-family);
    font-size: var(--font-size);
    text-align: {align};
    text-shadow: var(--text-shadow);
}}

#chat-log {{
    display: flex;
    flex-direction: column;
    gap: 6px;
}}

.chat-message {{
    color: var(--message-color);
    transition: opacity {fade}ms ease;
}}
.chat-message.hiding {{ opacity: 0; }}

.timestamp {{ color: var(--timestamp-color); font-size: 0.8em; margin-right: 6px; }}
.badge {{ height: var(--badge-size); vertical-align: middle; margin: 0 2px; }}
.emote {{ height: 1.2em; vertical-align: middle; margin: 0 1px; }}
.username-box {{ display: inline-block; }}
.username {{ font-weight: var(--username-weight); }}
.message-text {{ font-weight: var(--message-weight); word-wrap: break-word; }}
.layout-inline .message-text {{ display: inline; margin-left: 4px; }}
.layout-block .message-text {{ display: block; margin-top: 2px; }}

/* Roles */
"#,
        import = google_font_import(&settings.font_family, &FONT_WEIGHTS),
        family = css_font_family(&settings.font_family),
        size = settings.font_size,
        uweight = font_weight(settings.username_weight),
        mweight = font_weight(settings.message_weight),
        message_color = settings.message_color,
        timestamp_color = settings.timestamp_color,
        shadow = text_shadow_css(&settings.text_shadow),
        badge_size = settings.badge_size,
        justify = justify,
        background = settings.background.css(),
        align = settings.text_align.as_str(),
        fade = HIDE_FADE_MS,
    );

    css.push_str(&role_rules(settings));

    if let Some(name) = settings.animation.keyframes() {
        css.push_str("\n/* Entrance */\n");
        css.push_str(animation_keyframes(settings.animation));
        css.push('\n');
        css.push_str(&format!(
            ".animate-{name} {{ animation: {name} 0.3s ease-out both; }}\n"
        ));
    }

    css
}

// ─────────────────────────────────────────────────────────────────────────────
// JS
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatListeners {
    message: &'static str,
    delete_message: &'static str,
    delete_messages: &'static str,
}

/// Badge name to image source for the configured badge style
fn badge_sources(settings: &ChatSettings) -> BTreeMap<&'static str, String> {
    Role::PRIORITY
        .iter()
        .filter_map(|role| role.badge_name())
        .filter_map(|name| badge_source(settings, name).map(|src| (name, src)))
        .collect()
}

pub fn chat_js(settings: &ChatSettings) -> String {
    let role_badges: Vec<[&str; 2]> = Role::PRIORITY
        .iter()
        .filter_map(|r| r.badge_name().map(|b| [b, r.as_str()]))
        .collect();
    let emotes: BTreeMap<&str, &str> = EMOTES.entries().map(|(k, v)| (*k, *v)).collect();

    let mut js = String::from("\n");
    js_const(&mut js, "MAX_MESSAGES", &settings.visible_limit());
    js_const(&mut js, "MAX_MESSAGES_LIMIT", &MAX_CHAT_MESSAGES);
    js_const(&mut js, "DIRECTION", direction_str(settings.direction));
    js_const(&mut js, "HIDE_MESSAGES", &settings.hide_messages);
    js_const(
        &mut js,
        "HIDE_AFTER_MS",
        &(settings.hide_messages_after as u64 * 1000),
    );
    js_const(&mut js, "HIDE_FADE_MS", &HIDE_FADE_MS);
    js_const(&mut js, "TIMESTAMP", timestamp_str(settings.timestamp));
    js_const(&mut js, "BADGE_STYLE", badge_style_str(settings.badge_style));
    js_const(&mut js, "BADGE_SOURCES", &badge_sources(settings));
    js_const(&mut js, "ROLE_BADGES", &role_badges);
    js_const(&mut js, "EMOTES", &emotes);
    js_const(&mut js, "ANIMATION", &settings.animation.keyframes());
    js_const(
        &mut js,
        "LISTENERS",
        &ChatListeners {
            message: Listener::Message.as_str(),
            delete_message: Listener::DeleteMessage.as_str(),
            delete_messages: Listener::DeleteMessages.as_str(),
        },
    );
    js.push_str(CHAT_RUNTIME);
    js
}

const CHAT_RUNTIME: &str = r#"
let maxMessages = MAX_MESSAGES;
let hideMessages = HIDE_MESSAGES;
let hideAfterMs = HIDE_AFTER_MS;
const retired = new Set();

window.addEventListener('onWidgetLoad', function (obj) {
    const fieldData = obj.detail.fieldData || {};
    if (typeof fieldData.maxMessages === 'number') {
        maxMessages = Math.max(1, Math.min(MAX_MESSAGES_LIMIT, fieldData.maxMessages));
    }
    if (typeof fieldData.hideMessages === 'boolean') hideMessages = fieldData.hideMessages;
    if (typeof fieldData.hideMessagesAfter === 'number') hideAfterMs = fieldData.hideMessagesAfter * 1000;

    const root = document.documentElement.style;
    if (fieldData.fontSize) root.setProperty('--font-size', fieldData.fontSize + 'px');
    if (fieldData.messageColor) root.setProperty('--message-color', fieldData.messageColor);
    if (fieldData.timestampColor) root.setProperty('--timestamp-color', fieldData.timestampColor);
});

window.addEventListener('onEventReceived', function (obj) {
    const listener = obj.detail.listener;
    const event = obj.detail.event || {};

    if (listener === LISTENERS.message) {
        addMessage(event.data);
    } else if (listener === LISTENERS.delete_message) {
        removeWhere(el => el.dataset.msgId === String(event.msgId));
    } else if (listener === LISTENERS.delete_messages) {
        removeWhere(el => el.dataset.userId === String(event.userId));
    }
});

function escapeHtml(text) {
    return String(text)
        .replace(/&/g, '&amp;')
        .replace(/</g, '&lt;')
        .replace(/>/g, '&gt;')
        .replace(/"/g, '&quot;')
        .replace(/'/g, '&#39;');
}

function roleFor(badges) {
    const names = (badges || []).map(b => b.type);
    for (const [badge, role] of ROLE_BADGES) {
        if (names.includes(badge)) return role;
    }
    return 'default';
}

function badgeHtml(badges) {
    if (BADGE_STYLE === 'none') return '';
    return (badges || []).map(b => {
        let src = BADGE_SOURCES[b.type];
        if (BADGE_STYLE === 'default' && b.url) src = b.url;
        if (!src) return '';
        return '<img class="badge" src="' + escapeHtml(src) + '" alt="' + escapeHtml(b.type) + '">';
    }).join('');
}

function messageHtml(data) {
    const hostEmotes = {};
    (data.emotes || []).forEach(e => {
        if (e.name && e.urls) hostEmotes[e.name] = e.urls['1'] || e.urls[Object.keys(e.urls)[0]];
    });
    return String(data.text || '').split(/(\s+)/).map(part => {
        const src = hostEmotes[part] || EMOTES[part];
        if (src) return '<img class="emote" src="' + escapeHtml(src) + '" alt="' + escapeHtml(part) + '">';
        return escapeHtml(part);
    }).join('');
}

function formatTime(date) {
    if (TIMESTAMP === '12h') {
        return date.toLocaleTimeString('en-US', { hour: 'numeric', minute: '2-digit', hour12: true });
    }
    return date.toLocaleTimeString('en-US', { hour: '2-digit', minute: '2-digit', hour12: false });
}

function rowsOldestFirst() {
    const rows = Array.from(document.querySelectorAll('#chat-log .chat-message'));
    return DIRECTION === 'down' ? rows.reverse() : rows;
}

function addMessage(data) {
    if (!data) return;
    const id = String(data.msgId);
    if (retired.has(id) || document.querySelector('[data-msg-id="' + CSS.escape(id) + '"]')) return;

    const row = document.createElement('div');
    row.className = 'chat-message role-' + roleFor(data.badges);
    if (ANIMATION) row.classList.add('animate-' + ANIMATION);
    row.dataset.msgId = id;
    row.dataset.userId = String(data.userId);

    let html = '';
    if (TIMESTAMP !== 'none') html += '<span class="timestamp">' + formatTime(new Date()) + '</span>';
    html += '<span class="username-box">' + badgeHtml(data.badges);
    html += '<span class="username">' + escapeHtml(data.displayName || data.nick || '') + '</span></span>';
    html += '<span class="message-text">' + messageHtml(data) + '</span>';
    row.innerHTML = html;

    const log = document.getElementById('chat-log');
    if (DIRECTION === 'down') log.prepend(row); else log.appendChild(row);
    trimToLimit();

    if (hideMessages) scheduleHide(row);

    const container = document.getElementById('chat-container');
    container.scrollTop = DIRECTION === 'down' ? 0 : container.scrollHeight;
}

function trimToLimit() {
    const rows = rowsOldestFirst();
    while (rows.length > maxMessages) {
        rows.shift().remove();
    }
}

function scheduleHide(row) {
    setTimeout(() => {
        if (!row.isConnected) return;
        row.classList.add('hiding');
        setTimeout(() => {
            retired.add(row.dataset.msgId);
            row.remove();
        }, HIDE_FADE_MS);
    }, hideAfterMs);
}

function removeWhere(predicate) {
    rowsOldestFirst().filter(predicate).forEach(row => row.remove());
}
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Fields
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldDef {
    #[serde(rename = "type")]
    kind: &'static str,
    label: &'static str,
    value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'static str>,
}

impl FieldDef {
    fn number(label: &'static str, value: u32, min: u32, max: u32) -> Self {
        Self {
            kind: "number",
            label,
            value: value.into(),
            min: Some(min),
            max: Some(max),
            group: Some("Behaviour"),
        }
    }

    fn colorpicker(label: &'static str, value: String) -> Self {
        Self {
            kind: "colorpicker",
            label,
            value: value.into(),
            min: None,
            max: None,
            group: Some("Colors"),
        }
    }

    fn checkbox(label: &'static str, value: bool) -> Self {
        Self {
            kind: "checkbox",
            label,
            value: value.into(),
            min: None,
            max: None,
            group: Some("Behaviour"),
        }
    }
}

/// Host field definitions for the settings the widget can retune live
pub fn chat_fields(settings: &ChatSettings) -> String {
    let fields: BTreeMap<&str, FieldDef> = BTreeMap::from([
        (
            "maxMessages",
            FieldDef::number(
                "Max messages",
                settings.visible_limit() as u32,
                1,
                MAX_CHAT_MESSAGES,
            ),
        ),
        (
            "hideMessages",
            FieldDef::checkbox("Hide messages", settings.hide_messages),
        ),
        (
            "hideMessagesAfter",
            FieldDef::number(
                "Hide after (seconds)",
                settings.hide_messages_after,
                1,
                3600,
            ),
        ),
        (
            "fontSize",
            FieldDef::number("Font size (px)", settings.font_size, 8, 96),
        ),
        (
            "messageColor",
            FieldDef::colorpicker("Message color", settings.message_color.to_string()),
        ),
        (
            "timestampColor",
            FieldDef::colorpicker("Timestamp color", settings.timestamp_color.to_string()),
        ),
    ]);
    json_pretty(&fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_is_deterministic() {
        let settings = ChatSettings::default();
        assert_eq!(settings.export(), settings.export());
    }

    #[test]
    fn css_carries_role_styles_only_when_custom() {
        let mut settings = ChatSettings::default();
        settings.username_colors.unified = false;
        settings.message_box.enabled = true;
        settings.message_box.unified = false;

        let css = chat_css(&settings);
        assert!(css.contains(".role-broadcaster .username { color: #ff4500; }"));
        assert!(css.contains(".role-mod.chat-message {"));
        assert!(css.contains("border: 1px solid #00f5d4;"));
        assert!(!css.contains(".username-box {\n    padding"));
    }

    #[test]
    fn css_includes_only_selected_animation() {
        let mut settings = ChatSettings::default();
        settings.animation = MessageAnimation::PopIn;
        let css = chat_css(&settings);
        assert!(css.contains("@keyframes popIn"));
        assert!(!css.contains("@keyframes slideInUp"));

        settings.animation = MessageAnimation::None;
        assert!(!chat_css(&settings).contains("@keyframes"));
    }

    #[test]
    fn js_embeds_retention_constants() {
        let settings = ChatSettings {
            max_messages: 7,
            hide_messages: true,
            hide_messages_after: 12,
            ..ChatSettings::default()
        };
        let js = chat_js(&settings);
        assert!(js.contains("const MAX_MESSAGES = 7;"));
        assert!(js.contains("const HIDE_MESSAGES = true;"));
        assert!(js.contains("const HIDE_AFTER_MS = 12000;"));
        assert!(js.contains("const HIDE_FADE_MS = 500;"));
        assert!(js.contains(
            r#"const ROLE_BADGES = [["broadcaster","broadcaster"],["moderator","mod"],["vip","vip"],["subscriber","sub"]];"#
        ));
    }

    #[test]
    fn custom_badges_replace_default_sources() {
        let mut settings = ChatSettings::default();
        settings.badge_style = BadgeStyle::Custom;
        settings.custom_badges.insert(Role::Vip, "https://example.test/vip.png".into());

        let sources = badge_sources(&settings);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources["vip"], "https://example.test/vip.png");
    }

    #[test]
    fn fields_expose_live_settings() {
        let fields: serde_json::Value =
            serde_json::from_str(&chat_fields(&ChatSettings::default())).unwrap();
        assert_eq!(fields["maxMessages"]["value"], 15);
        assert_eq!(fields["maxMessages"]["type"], "number");
        assert_eq!(fields["messageColor"]["value"], "#ffffff");
    }
}
