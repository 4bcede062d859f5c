//! Goal widget export
//!
//! Per-goal fills are resolved with [`resolve_goal_fill`] and the stack
//! falloff, completion timings and listener names come straight from the
//! progression module, so the script and [`GoalTracker`](super::GoalTracker)
//! share one definition of every constant.

use serde::Serialize;

use overlaykit_types::GoalSettings;

use super::progress::{COMPLETED_TEXT, CompletionTimings, DEFAULT_STACK_SIZE, STACK_FALLOFF};
use crate::codegen::{ExportWidget, WidgetBundle, css_display, css_font_family, js_const, json_pretty};
use crate::events::Listener;
use crate::style::{google_font_import, resolve_goal_fill};

impl ExportWidget for GoalSettings {
    fn export(&self) -> WidgetBundle {
        WidgetBundle {
            html: goal_html(self),
            css: goal_css(self),
            js: goal_js(self),
            fields: "{}".to_string(),
            data: json_pretty(self),
        }
    }
}

pub fn goal_html(settings: &GoalSettings) -> String {
    format!(
        r#"
<div id="goals-wrapper" class="{}-layout mode-{}"></div>

<template id="bar-template">
    <div class="goal-item-container">
        <div class="header-row">
            <div class="goal-text title"></div>
            <div class="goal-text amount"></div>
        </div>
        <div class="progress-bar-track">
            <div class="progress-bar-fill">
                <div class="stripes"></div>
                <div class="shine"></div>
            </div>
        </div>
    </div>
</template>
"#,
        settings.layout.as_str(),
        settings.display_mode.as_str()
    )
}

fn falloff_rules() -> String {
    STACK_FALLOFF
        .iter()
        .enumerate()
        .map(|(i, tier)| {
            format!(
                ".goal-item-container.future-goal-{} {{ opacity: {}; transform: scale({}); }}\n",
                i + 1,
                tier.opacity,
                tier.scale
            )
        })
        .collect()
}

pub fn goal_css(settings: &GoalSettings) -> String {
    let fade_secs = CompletionTimings::WIDGET.fade_ms as f64 / 1000.0;
    format!(
        r#"
{import}

:root {{
    --font-family: {family};
    --text-color: {text_color};
    --track-color: {track_color};
    --fill-background: {fill};
    --border-color: {border_color};
    --border-width: {border_width}px;
    --corner-radius: {corner_radius}px;
    --bar-height: {bar_height}px;
}}

body, html {{
    height: 100%;
    margin: 0;
    overflow: hidden;
    font-family: var(--font-family);
    color: var(--text-color);
}}

#goals-wrapper {{
    width: 100%;
    height: 100%;
    display: flex;
    flex-direction: column;
    justify-content: center;
    padding: 10px;
    box-sizing: border-box;
    gap: 20px;
}}

.mode-stack {{
    justify-content: flex-start;
    padding-top: 20px;
}}

.goal-item-container {{
    width: 100%;
    opacity: 1;
    transition: all {fade}s cubic-bezier(0.22, 1, 0.36, 1);
    transform-origin: top center;
}}

@keyframes fadeOut {{ from {{ opacity: 1; transform: scale(1); }} to {{ opacity: 0; transform: scale(0.9); }} }}
@keyframes barberpole {{ 100% {{ background-position: var(--bar-height) var(--bar-height); }} }}
@keyframes shineMove {{ 0% {{ background-position: 200% 0; }} 100% {{ background-position: -200% 0; }} }}
@keyframes pulse {{ 0%, 100% {{ opacity: 1; }} 50% {{ opacity: 0.6; }} }}

.goal-item-container.completed {{ animation: pulse 0.75s ease-in-out infinite; }}
.goal-item-container.animating-out {{ animation: fadeOut {fade}s forwards; }}
{falloff}
.goal-text {{ text-shadow: 1px 1px 2px rgba(0,0,0,0.8); font-weight: 800; text-transform: uppercase; letter-spacing: 0.05em; }}
.title {{ font-size: 1.2em; margin-bottom: 4px; display: {show_title}; }}
.amount {{ font-size: 1em; font-variant-numeric: tabular-nums; }}
.goals-completed {{ display: flex; align-items: center; justify-content: center; height: 100%; font-weight: 900; font-size: 2em; text-transform: uppercase; }}

.bar-layout .header-row {{ display: flex; justify-content: space-between; align-items: flex-end; margin-bottom: 4px; }}
.progress-bar-track {{
    width: 100%;
    height: var(--bar-height);
    background: var(--track-color);
    border: var(--border-width) solid var(--border-color);
    border-radius: var(--corner-radius);
    overflow: hidden;
    position: relative;
    box-shadow: inset 0 2px 4px rgba(0,0,0,0.3);
}}
.progress-bar-fill {{
    height: 100%;
    width: 0%;
    background: var(--fill-background);
    border-radius: max(0px, calc(var(--corner-radius) - var(--border-width)));
    transition: width 1s cubic-bezier(0.22, 1, 0.36, 1);
    position: relative;
    overflow: hidden;
}}
.stripes {{
    position: absolute;
    inset: 0;
    background-image: linear-gradient(45deg, rgba(255,255,255,0.15) 25%, transparent 25%, transparent 50%, rgba(255,255,255,0.15) 50%, rgba(255,255,255,0.15) 75%, transparent 75%, transparent);
    background-size: var(--bar-height) var(--bar-height);
    animation: barberpole 1s linear infinite;
    display: {show_stripes};
}}
.shine {{
    position: absolute;
    inset: 0;
    opacity: 0.6;
    background: linear-gradient(90deg, transparent 0%, rgba(255,255,255,0.4) 50%, transparent 100%);
    background-size: 200% 100%;
    animation: shineMove 3s infinite linear;
}}
"#,
        import = google_font_import(&settings.font_family, &[400, 600, 800]),
        family = css_font_family(&settings.font_family),
        text_color = settings.text_color,
        track_color = settings.track_color,
        fill = settings.fill.css(),
        border_color = settings.border_color,
        border_width = settings.border_width,
        corner_radius = settings.corner_radius,
        bar_height = settings.bar_height,
        fade = fade_secs,
        falloff = falloff_rules(),
        show_title = css_display(settings.show_title),
        show_stripes = css_display(settings.use_stripes),
    )
}

#[derive(Serialize)]
struct EmbeddedGoal<'a> {
    id: &'a str,
    title: &'a str,
    target: f64,
    fill: String,
}

pub fn goal_js(settings: &GoalSettings) -> String {
    let goals: Vec<EmbeddedGoal> = settings
        .goals
        .iter()
        .map(|g| EmbeddedGoal {
            id: &g.id,
            title: &g.title,
            target: g.target_amount,
            fill: resolve_goal_fill(settings, g).css(),
        })
        .collect();
    let listeners: Vec<&str> = Listener::for_goal(settings.goal_type)
        .iter()
        .map(Listener::as_str)
        .collect();
    let stack_size = match settings.goals_to_display {
        0 => DEFAULT_STACK_SIZE,
        n => n as usize,
    };
    let timings = CompletionTimings::WIDGET;

    let mut js = String::from("\n");
    js_const(&mut js, "GOALS", &goals);
    js_const(&mut js, "START_AMOUNT", &settings.start_amount);
    js_const(&mut js, "GOAL_TYPE", settings.goal_type.as_str());
    js_const(&mut js, "SESSION_KEY", &settings.goal_type.session_key());
    js_const(&mut js, "LISTENERS", &listeners);
    js_const(&mut js, "DISPLAY_MODE", settings.display_mode.as_str());
    js_const(&mut js, "GOALS_TO_DISPLAY", &stack_size);
    js_const(&mut js, "STACK_TIERS", &STACK_FALLOFF.len());
    js_const(&mut js, "SHOW_AMOUNT", &settings.show_amount);
    js_const(&mut js, "SHOW_PERCENTAGE", &settings.show_percentage);
    js_const(&mut js, "HOLD_MS", &timings.hold_ms);
    js_const(&mut js, "FADE_MS", &timings.fade_ms);
    js_const(&mut js, "COMPLETED_TEXT", COMPLETED_TEXT);
    js.push_str(GOAL_RUNTIME);
    js
}

const GOAL_RUNTIME: &str = r#"
let currentGoalIndex = 0;
let sessionTotal = START_AMOUNT;
let completing = false;

window.addEventListener('onWidgetLoad', function (obj) {
    const data = (obj.detail.session && obj.detail.session.data) || {};
    const entry = data[SESSION_KEY];
    sessionTotal = START_AMOUNT + (entry && entry.count ? entry.count : 0);
    renderGoals();
});

window.addEventListener('onEventReceived', function (obj) {
    if (!GOALS.length) return;
    const listener = obj.detail.listener;
    const event = obj.detail.event || {};
    if (!LISTENERS.includes(listener)) return;

    let amount = 0;
    if (GOAL_TYPE === 'subscriber') {
        amount = event.bulkGifted ? Number(event.amount) || 0 : 1;
    } else if (GOAL_TYPE === 'follower') {
        amount = 1;
    } else {
        amount = Number(event.amount) || 0;
    }

    if (amount > 0) {
        sessionTotal += amount;
        updateGoalProgress();
    }
});

function goalPercent(index) {
    const goal = GOALS[index];
    if (!goal) return 100;
    const prev = index > 0 ? GOALS[index - 1].target : START_AMOUNT;
    if (goal.target <= prev) return 100;
    return Math.min(1, Math.max(0, (sessionTotal - prev) / (goal.target - prev))) * 100;
}

function amountText(goal, percent) {
    let text = '';
    if (SHOW_AMOUNT) text += Math.floor(Math.min(sessionTotal, goal.target)) + ' / ' + goal.target;
    if (SHOW_PERCENTAGE) {
        if (text) text += ' ';
        text += '(' + Math.floor(percent) + '%)';
    }
    return text;
}

function renderGoals() {
    const container = document.getElementById('goals-wrapper');
    container.innerHTML = '';

    if (currentGoalIndex >= GOALS.length) {
        const done = document.createElement('div');
        done.className = 'goals-completed';
        done.innerText = COMPLETED_TEXT;
        container.appendChild(done);
        return;
    }

    const count = DISPLAY_MODE === 'single' ? 1 : GOALS_TO_DISPLAY;
    const template = document.getElementById('bar-template');

    for (let distance = 0; distance < count; distance++) {
        const index = currentGoalIndex + distance;
        const goal = GOALS[index];
        if (!goal) break;

        const clone = template.content.cloneNode(true);
        const el = clone.querySelector('.goal-item-container');
        el.id = 'goal-item-' + index;
        el.dataset.index = index;
        if (distance > 0) el.classList.add('future-goal-' + Math.min(distance, STACK_TIERS));

        el.querySelector('.progress-bar-fill').style.background = goal.fill;
        el.querySelector('.title').innerText = goal.title;
        container.appendChild(clone);
    }

    updateGoalProgress();
}

function updateGoalProgress() {
    document.querySelectorAll('.goal-item-container').forEach(el => {
        const index = parseInt(el.dataset.index, 10);
        const goal = GOALS[index];
        if (!goal) return;
        const percent = goalPercent(index);
        const active = index === currentGoalIndex;

        el.querySelector('.amount').innerText = active ? amountText(goal, percent) : '';
        el.querySelector('.progress-bar-fill').style.width = percent + '%';

        if (active && sessionTotal >= goal.target) handleCompletion(el);
    });
}

function handleCompletion(el) {
    if (completing) return;
    completing = true;
    el.classList.add('completed');
    setTimeout(() => {
        el.classList.add('animating-out');
        setTimeout(() => {
            currentGoalIndex++;
            completing = false;
            renderGoals();
        }, FADE_MS);
    }, HOLD_MS);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use overlaykit_types::{Color, FillOverride, GoalType};

    #[test]
    fn export_is_deterministic() {
        let settings = GoalSettings::default();
        assert_eq!(settings.export(), settings.export());
        assert_eq!(settings.export().fields, "{}");
    }

    #[test]
    fn js_embeds_resolved_goals_and_timings() {
        let mut settings = GoalSettings::default();
        settings.unified_colors = false;
        settings.goals[1].fill = Some(FillOverride {
            color: Some(Color::rgb(255, 0, 0)),
            gradient: Some(false),
            ..Default::default()
        });

        let js = goal_js(&settings);
        assert!(js.contains(r##""fill":"#ff0000""##));
        assert!(js.contains(r##""fill":"linear-gradient(90deg, #f4c430, #ffd700)""##));
        assert!(js.contains("const HOLD_MS = 1500;"));
        assert!(js.contains("const FADE_MS = 500;"));
        assert!(js.contains("const SESSION_KEY = \"subscriber-total\";"));
        assert!(js.contains(
            "const LISTENERS = [\"subscriber-latest\",\"bulk-subscriber-latest\"];"
        ));
    }

    #[test]
    fn listeners_follow_goal_type() {
        let settings = GoalSettings {
            goal_type: GoalType::Cheer,
            ..GoalSettings::default()
        };
        let js = goal_js(&settings);
        assert!(js.contains("const LISTENERS = [\"cheer-latest\"];"));
        assert!(js.contains("const GOAL_TYPE = \"cheer\";"));
    }

    #[test]
    fn css_falloff_matches_stack_table() {
        let css = goal_css(&GoalSettings::default());
        assert!(css.contains(".goal-item-container.future-goal-1 { opacity: 0.5; transform: scale(0.98); }"));
        assert!(css.contains(".goal-item-container.future-goal-3 { opacity: 0.1; transform: scale(0.94); }"));
        assert!(css.contains("--fill-background: linear-gradient(90deg, #f4c430, #ffd700);"));
    }

    #[test]
    fn zero_goals_to_display_falls_back() {
        let settings = GoalSettings {
            goals_to_display: 0,
            ..GoalSettings::default()
        };
        assert!(goal_js(&settings).contains("const GOALS_TO_DISPLAY = 3;"));
    }
}
