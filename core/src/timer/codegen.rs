//! Timer widget export

use serde::Serialize;

use overlaykit_types::TimerSettings;

use super::countdown::{ENDED_LABEL, PERSIST_EVERY_SECS, RewardLookup, RewardUnit, STORE_KEY};
use crate::codegen::{ExportWidget, WidgetBundle, css_display, css_font_family, js_const, json_pretty};
use crate::style::google_font_import;

/// Shake on subtracted time, pulse on added time
const SHAKE_MS: u64 = 400;
const PULSE_MS: u64 = 300;

impl ExportWidget for TimerSettings {
    fn export(&self) -> WidgetBundle {
        WidgetBundle {
            html: timer_html(self),
            css: timer_css(self),
            js: timer_js(self),
            fields: "{}".to_string(),
            data: json_pretty(self),
        }
    }
}

pub fn timer_html(settings: &TimerSettings) -> String {
    format!(
        r#"
<div id="timer-container" class="layout-{}">
    <div id="timer-display">00:00:00</div>
    <div id="end-time-display"></div>
</div>
"#,
        settings.layout.as_str()
    )
}

pub fn timer_css(settings: &TimerSettings) -> String {
    let shadow = if settings.text_shadow {
        "2px 2px 0px rgba(0,0,0,0.5)"
    } else {
        "none"
    };
    format!(
        r#"
{import}

:root {{
    --font-family: {family};
    --text-color: {text_color};
    --bg-color: {background};
    --border-color: {border_color};
    --border-width: {border_width}px;
    --corner-radius: {corner_radius}px;
    --font-size: {font_size}px;
    --end-time-color: {end_time_color};
}}

body, html {{
    margin: 0;
    padding: 0;
    overflow: hidden;
    display: flex;
    justify-content: center;
    align-items: center;
    height: 100vh;
}}

#timer-container {{
    font-family: var(--font-family);
    color: var(--text-color);
    display: inline-flex;
    flex-direction: column;
    align-items: center;
    justify-content: center;
    padding: 20px 40px;
    transition: all 0.3s ease;
}}

#timer-display {{
    font-size: var(--font-size);
    font-weight: 800;
    font-variant-numeric: tabular-nums;
    line-height: 1;
    text-shadow: {shadow};
}}

#end-time-display {{
    font-size: calc(var(--font-size) * 0.35);
    color: var(--end-time-color);
    font-weight: 600;
    margin-top: 8px;
    text-transform: uppercase;
    letter-spacing: 0.05em;
    display: {show_end};
}}

.layout-digital {{
    background: transparent;
    padding: 0;
}}

.layout-box {{
    background: var(--bg-color);
    border: var(--border-width) solid var(--border-color);
    border-radius: var(--corner-radius);
    box-shadow: 0 10px 25px rgba(0,0,0,0.3);
}}

.pulse-anim {{ animation: pulse {pulse}s ease-out; }}
.shake-anim {{ animation: shake {shake}s ease-in-out; }}

@keyframes pulse {{ 0% {{ transform: scale(1); }} 50% {{ transform: scale(1.05); }} 100% {{ transform: scale(1); }} }}
@keyframes shake {{ 0%, 100% {{ transform: translateX(0); }} 25% {{ transform: translateX(-5px); }} 75% {{ transform: translateX(5px); }} }}
"#,
        import = google_font_import(&settings.font_family, &[400, 600, 800]),
        family = css_font_family(&settings.font_family),
        text_color = settings.text_color,
        background = settings.background.css(),
        border_color = settings.border_color,
        border_width = settings.border_width,
        corner_radius = settings.corner_radius,
        font_size = settings.font_size,
        end_time_color = settings.end_time_color,
        shadow = shadow,
        show_end = css_display(settings.show_end_time),
        pulse = PULSE_MS as f64 / 1000.0,
        shake = SHAKE_MS as f64 / 1000.0,
    )
}

#[derive(Serialize)]
struct EmbeddedRule {
    listener: &'static str,
    rate: u32,
    unit: RewardUnit,
}

pub fn timer_js(settings: &TimerSettings) -> String {
    let rules: Vec<EmbeddedRule> = settings
        .rewards
        .rules(settings.platform)
        .into_iter()
        .map(|rule| EmbeddedRule {
            listener: rule.listener.as_str(),
            rate: rule.rate,
            unit: rule.unit,
        })
        .collect();

    let mut js = String::from("\n");
    js_const(&mut js, "START_SECONDS", &settings.start_total_seconds());
    js_const(&mut js, "CAP_SECONDS", &settings.cap_seconds());
    js_const(&mut js, "MODE", settings.mode.as_str());
    js_const(&mut js, "PLATFORM", settings.platform.as_str());
    js_const(&mut js, "REWARD_RULES", &rules);
    js_const(&mut js, "STORE_KEY", STORE_KEY);
    js_const(&mut js, "PERSIST_EVERY", &PERSIST_EVERY_SECS);
    js_const(&mut js, "SHOW_END_TIME", &settings.show_end_time);
    js_const(&mut js, "ENDED_LABEL", ENDED_LABEL);
    js_const(&mut js, "PULSE_MS", &PULSE_MS);
    js_const(&mut js, "SHAKE_MS", &SHAKE_MS);
    js.push_str(TIMER_RUNTIME);
    js
}

const TIMER_RUNTIME: &str = r#"
let remainingSeconds = clampToCap(START_SECONDS);
let timerInterval = null;

const displayEl = document.getElementById('timer-display');
const endTimeEl = document.getElementById('end-time-display');
const containerEl = document.getElementById('timer-container');

window.addEventListener('onWidgetLoad', function (obj) {
    const data = (obj.detail.session && obj.detail.session.data) || {};
    const stored = data[STORE_KEY];
    if (stored !== undefined && stored !== null && !isNaN(Number(stored))) {
        remainingSeconds = clampToCap(Math.max(0, Math.floor(Number(stored))));
    }
    updateDisplay();
    startTimer();
});

window.addEventListener('onEventReceived', function (obj) {
    const listener = obj.detail.listener;
    const event = obj.detail.event || {};
    const added = secondsFor(listener, event);
    if (added > 0) applyTime(added);
});

function clampToCap(seconds) {
    return CAP_SECONDS > 0 ? Math.min(seconds, CAP_SECONDS) : seconds;
}

function secondsFor(listener, event) {
    const rule = REWARD_RULES.find(r => r.listener === listener);
    if (!rule) return 0;
    const amount = Number(event.amount) || 0;
    switch (rule.unit) {
        case 'subs': return (event.bulkGifted ? amount : 1) * rule.rate;
        case 'amount': return Math.floor(amount * rule.rate);
        case 'hundreds': return Math.floor(amount / 100 * rule.rate);
        default: return rule.rate;
    }
}

function applyTime(seconds) {
    if (MODE === 'countdown_sub') {
        remainingSeconds -= seconds;
        flash('shake-anim', SHAKE_MS);
    } else {
        remainingSeconds += seconds;
        flash('pulse-anim', PULSE_MS);
    }
    remainingSeconds = Math.max(0, clampToCap(remainingSeconds));
    updateDisplay();
    persist();
}

function flash(cls, ms) {
    containerEl.classList.remove(cls);
    void containerEl.offsetWidth;
    containerEl.classList.add(cls);
    setTimeout(() => containerEl.classList.remove(cls), ms);
}

function persist() {
    if (typeof SE_API !== 'undefined') SE_API.store.set(STORE_KEY, remainingSeconds);
}

function startTimer() {
    if (timerInterval) clearInterval(timerInterval);
    timerInterval = setInterval(() => {
        if (remainingSeconds > 0) {
            remainingSeconds--;
            updateDisplay();
            if (remainingSeconds % PERSIST_EVERY === 0) persist();
        }
    }, 1000);
}

function pad(n) {
    return n.toString().padStart(2, '0');
}

function updateDisplay() {
    const h = Math.floor(remainingSeconds / 3600);
    const m = Math.floor((remainingSeconds % 3600) / 60);
    const s = remainingSeconds % 60;
    displayEl.innerText = pad(h) + ':' + pad(m) + ':' + pad(s);

    if (!SHOW_END_TIME) return;
    if (remainingSeconds <= 0) {
        endTimeEl.innerText = ENDED_LABEL;
        return;
    }
    const end = new Date(Date.now() + remainingSeconds * 1000);
    endTimeEl.innerText = 'ENDS ' + end.toLocaleTimeString([], { hour: 'numeric', minute: '2-digit' });
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use overlaykit_types::{Platform, TimerLayout, TimerMode};

    #[test]
    fn export_is_deterministic() {
        let settings = TimerSettings::default();
        assert_eq!(settings.export(), settings.export());
    }

    #[test]
    fn html_carries_layout_class() {
        let settings = TimerSettings {
            layout: TimerLayout::Digital,
            ..TimerSettings::default()
        };
        assert!(timer_html(&settings).contains(r#"class="layout-digital""#));
    }

    #[test]
    fn js_embeds_rates_for_platform() {
        let mut settings = TimerSettings::default();
        settings.start_hours = 1;
        settings.cap_hours = 2;
        let js = timer_js(&settings);
        assert!(js.contains("const START_SECONDS = 3600;"));
        assert!(js.contains("const CAP_SECONDS = 7200;"));
        assert!(js.contains(r#"{"listener":"cheer-latest","rate":60,"unit":"hundreds"}"#));
        assert!(js.contains("const STORE_KEY = \"subathon-timer-val\";"));
        assert!(!js.contains("superchat-latest"));

        settings.platform = Platform::Youtube;
        settings.mode = TimerMode::CountdownSub;
        let js = timer_js(&settings);
        assert!(js.contains(r#"{"listener":"superchat-latest","rate":60,"unit":"amount"}"#));
        assert!(js.contains("const MODE = \"countdown_sub\";"));
        assert!(!js.contains("cheer-latest"));
    }

    #[test]
    fn css_toggles_shadow_and_end_time() {
        let mut settings = TimerSettings::default();
        let css = timer_css(&settings);
        assert!(css.contains("text-shadow: 2px 2px 0px rgba(0,0,0,0.5);"));
        assert!(css.contains("--font-size: 64px;"));

        settings.text_shadow = false;
        settings.show_end_time = false;
        let css = timer_css(&settings);
        assert!(css.contains("text-shadow: none;"));
        assert!(css.contains("display: none;"));
    }
}
