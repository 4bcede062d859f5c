//! Goal progression state machine
//!
//! `GoalTracker` accumulates a running total and walks an ordered goal list.
//! When the total meets the active goal's target a completion starts; after
//! the hold (and optional fade-out) the active index advances and the check
//! repeats, cascading through goals that are already met.
//!
//! # Lifecycle
//!
//! 1. Contribution raises `total`
//! 2. `total >= goals[index].target` → completion pending
//! 3. Hold elapses → fading out (widget only)
//! 4. Fade elapses → `index += 1`, re-check
//!
//! The index never decreases within a session; `index == goals.len()` is the
//! terminal "all goals completed" state.

use overlaykit_types::{Fill, GoalDisplayMode, GoalItem, GoalSettings};
use serde::Serialize;

use crate::clock::Millis;
use crate::style::resolve_goal_fill;

/// Goals shown in stack mode when `goals_to_display` is 0
pub const DEFAULT_STACK_SIZE: usize = 3;

/// Text shown once every goal is complete
pub const COMPLETED_TEXT: &str = "Goal Completed!";

/// Opacity and scale of an upcoming goal in stack mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StackTier {
    pub opacity: f64,
    pub scale: f64,
}

/// Falloff by distance from the active goal: 1, 2, 3 and beyond
pub const STACK_FALLOFF: [StackTier; 3] = [
    StackTier {
        opacity: 0.5,
        scale: 0.98,
    },
    StackTier {
        opacity: 0.25,
        scale: 0.96,
    },
    StackTier {
        opacity: 0.1,
        scale: 0.94,
    },
];

/// Tier for a goal `distance` positions after the active one
pub fn stack_tier(distance: usize) -> StackTier {
    match distance {
        0 => StackTier {
            opacity: 1.0,
            scale: 1.0,
        },
        d => STACK_FALLOFF[(d - 1).min(STACK_FALLOFF.len() - 1)],
    }
}

/// Completion animation timings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionTimings {
    /// Time the completed goal stays on screen
    pub hold_ms: Millis,
    /// Fade-out after the hold, before the index advances
    pub fade_ms: Millis,
}

impl CompletionTimings {
    /// In-app preview: a single 1.5 s pulse
    pub const PREVIEW: CompletionTimings = CompletionTimings {
        hold_ms: 1500,
        fade_ms: 0,
    };

    /// Deployed widget: 1.5 s hold then a 0.5 s fade-out
    pub const WIDGET: CompletionTimings = CompletionTimings {
        hold_ms: 1500,
        fade_ms: 500,
    };

    pub fn total_ms(&self) -> Millis {
        self.hold_ms + self.fade_ms
    }
}

/// Percent complete of goal `index`, in `[0, 100]`.
///
/// The range starts at the previous goal's target (or `start_amount` for the
/// first goal). A goal whose target does not exceed that start is reported
/// as 100.
pub fn goal_percent(goals: &[GoalItem], start_amount: f64, total: f64, index: usize) -> f64 {
    let Some(goal) = goals.get(index) else {
        return 100.0;
    };
    let prev = if index > 0 {
        goals[index - 1].target_amount
    } else {
        start_amount
    };
    let target = goal.target_amount;
    if target <= prev {
        return 100.0;
    }
    ((total - prev) / (target - prev)).clamp(0.0, 1.0) * 100.0
}

/// Amount label for the active goal: `"{done} / {target}"` and/or `"({pct}%)"`
pub fn amount_text(
    total: f64,
    target: f64,
    percent: f64,
    show_amount: bool,
    show_percentage: bool,
) -> String {
    let mut text = String::new();
    if show_amount {
        text.push_str(&format!("{} / {}", total.min(target).floor(), target));
    }
    if show_percentage {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&format!("({}%)", percent.floor()));
    }
    text
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingCompletion {
    hold_until: Millis,
    advance_at: Millis,
}

/// One bar in the rendered goal view
#[derive(Debug, Clone, PartialEq)]
pub struct GoalBar {
    pub index: usize,
    pub title: Option<String>,
    /// Only set for the active goal
    pub amount_text: Option<String>,
    pub percent: f64,
    pub fill: Fill,
    pub tier: StackTier,
    /// Active goal is mid-completion
    pub completing: bool,
    /// Active goal is fading out
    pub fading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GoalView {
    Bars(Vec<GoalBar>),
    Completed,
}

/// Goal progression over an explicit clock
#[derive(Debug, Clone)]
pub struct GoalTracker {
    goals: Vec<GoalItem>,
    start_amount: f64,
    total: f64,
    index: usize,
    pending: Option<PendingCompletion>,
    timings: CompletionTimings,
}

impl GoalTracker {
    pub fn new(settings: &GoalSettings, timings: CompletionTimings) -> Self {
        Self {
            goals: settings.goals.clone(),
            start_amount: settings.start_amount,
            total: settings.start_amount,
            index: 0,
            pending: None,
            timings,
        }
    }

    /// Tracker with the in-app preview timings
    pub fn preview(settings: &GoalSettings) -> Self {
        Self::new(settings, CompletionTimings::PREVIEW)
    }

    /// Resume with a prior session total on top of the start amount
    ///
    /// A non-finite stored total is treated as zero.
    pub fn resume(&mut self, session_total: f64, now: Millis) {
        let session_total = if session_total.is_finite() { session_total } else { 0.0 };
        self.total = self.start_amount + session_total;
        self.check(now);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn goals(&self) -> &[GoalItem] {
        &self.goals
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.goals.len()
    }

    pub fn is_completing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn percent(&self, index: usize) -> f64 {
        goal_percent(&self.goals, self.start_amount, self.total, index)
    }

    /// Percent of the active goal (100 once complete)
    pub fn active_percent(&self) -> f64 {
        self.percent(self.index)
    }

    /// Add an amount from a host event. Non-positive and non-finite amounts
    /// are ignored; returns whether the amount was applied.
    pub fn contribute(&mut self, amount: f64, now: Millis) -> bool {
        if !amount.is_finite() || amount <= 0.0 {
            return false;
        }
        self.total += amount;
        self.check(now);
        true
    }

    /// Preview donation button: refused while a completion is pending or
    /// every goal is complete. Returns whether the amount was applied.
    pub fn simulate_contribution(&mut self, amount: f64, now: Millis) -> bool {
        if self.pending.is_some() || self.is_complete() {
            return false;
        }
        self.contribute(amount, now)
    }

    /// Run pending completions up to `now`. Returns true if the index moved.
    pub fn advance(&mut self, now: Millis) -> bool {
        let mut moved = false;
        while let Some(pending) = self.pending {
            if now < pending.advance_at {
                break;
            }
            self.pending = None;
            self.index += 1;
            moved = true;
            tracing::debug!(index = self.index, total = self.total, "Goal advanced");
            // Cascade from the moment of advancing, not from `now`
            self.check(pending.advance_at);
        }
        moved
    }

    fn check(&mut self, now: Millis) {
        if self.pending.is_some() {
            return;
        }
        let Some(goal) = self.goals.get(self.index) else {
            return;
        };
        if self.total >= goal.target_amount {
            tracing::debug!(
                index = self.index,
                target = goal.target_amount,
                "Goal completion started"
            );
            self.pending = Some(PendingCompletion {
                hold_until: now + self.timings.hold_ms,
                advance_at: now + self.timings.total_ms(),
            });
        }
    }

    /// Next instant at which `advance` would change state
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.map(|p| p.advance_at)
    }

    /// Re-synchronise with edited settings.
    ///
    /// A change to the goal targets or the start amount resets the session;
    /// title, color and display edits keep the running state.
    pub fn apply_settings(&mut self, settings: &GoalSettings) {
        let targets_changed = settings.goals.len() != self.goals.len()
            || settings
                .goals
                .iter()
                .zip(&self.goals)
                .any(|(a, b)| a.id != b.id || a.target_amount != b.target_amount);
        let start_changed = settings.start_amount != self.start_amount;

        self.goals = settings.goals.clone();
        if targets_changed || start_changed {
            self.start_amount = settings.start_amount;
            self.total = settings.start_amount;
            self.index = 0;
            self.pending = None;
            tracing::debug!("Goal session reset");
        }
    }

    /// Goals visible in the current display mode
    pub fn visible_indices(&self, settings: &GoalSettings) -> Vec<usize> {
        if self.is_complete() {
            return Vec::new();
        }
        let count = match settings.display_mode {
            GoalDisplayMode::Single => 1,
            GoalDisplayMode::Stack => match settings.goals_to_display {
                0 => DEFAULT_STACK_SIZE,
                n => n as usize,
            },
        };
        (self.index..self.goals.len()).take(count).collect()
    }

    /// Render model for the current state
    pub fn view(&self, settings: &GoalSettings, now: Millis) -> GoalView {
        if self.is_complete() {
            return GoalView::Completed;
        }

        let bars = self
            .visible_indices(settings)
            .into_iter()
            .map(|index| {
                let goal = &self.goals[index];
                let distance = index - self.index;
                let active = distance == 0;
                let percent = self.percent(index);
                GoalBar {
                    index,
                    title: settings.show_title.then(|| goal.title.clone()),
                    amount_text: active.then(|| {
                        amount_text(
                            self.total,
                            goal.target_amount,
                            percent,
                            settings.show_amount,
                            settings.show_percentage,
                        )
                    }),
                    percent,
                    fill: resolve_goal_fill(settings, goal),
                    tier: stack_tier(distance),
                    completing: active && self.pending.is_some(),
                    fading: active && self.pending.is_some_and(|p| now >= p.hold_until),
                }
            })
            .collect();
        GoalView::Bars(bars)
    }
}
