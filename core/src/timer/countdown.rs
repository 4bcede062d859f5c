//! Countdown arithmetic
//!
//! `Countdown` holds the remaining seconds of a subathon timer. It ticks down
//! once per second and holds at zero; host events add or subtract time
//! depending on the mode. With a cap configured the remaining time never
//! exceeds it.

use chrono::{DateTime, Duration, TimeZone};
use serde::Serialize;

use overlaykit_types::{Platform, RewardTable, TimerMode, TimerSettings};

use crate::events::{HostEvent, Listener};

/// Host store key the deployed widget persists remaining seconds under
pub const STORE_KEY: &str = "subathon-timer-val";

/// The deployed widget persists on ticks landing on multiples of this
pub const PERSIST_EVERY_SECS: u64 = 10;

/// Label shown once the countdown reaches zero
pub const ENDED_LABEL: &str = "ENDED";

/// How a reward rate scales with the event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardUnit {
    /// Rate per event
    Flat,
    /// Rate per subscription (gift bundles count each gift)
    Subs,
    /// Rate per currency unit, floored
    Amount,
    /// Rate per 100 bits, floored
    Hundreds,
}

/// One listener's reward on a platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardRule {
    pub listener: Listener,
    pub rate: u32,
    pub unit: RewardUnit,
}

impl RewardRule {
    const fn new(listener: Listener, rate: u32, unit: RewardUnit) -> Self {
        Self { listener, rate, unit }
    }

    pub fn seconds(&self, event: &HostEvent) -> u64 {
        let rate = self.rate as f64;
        let seconds = match self.unit {
            RewardUnit::Flat => rate,
            RewardUnit::Subs => event.sub_count() * rate,
            RewardUnit::Amount => (event.amount * rate).floor(),
            RewardUnit::Hundreds => (event.amount / 100.0 * rate).floor(),
        };
        seconds.max(0.0) as u64
    }
}

/// Event to seconds lookup
pub trait RewardLookup {
    /// Listeners that award time on `platform`
    fn rules(&self, platform: Platform) -> Vec<RewardRule>;

    /// Seconds awarded for `event` on `platform` (0 for unrelated listeners)
    fn seconds_for(&self, platform: Platform, event: &HostEvent) -> u64 {
        self.rules(platform)
            .iter()
            .find(|rule| rule.listener == event.listener)
            .map_or(0, |rule| rule.seconds(event))
    }
}

impl RewardLookup for RewardTable {
    fn rules(&self, platform: Platform) -> Vec<RewardRule> {
        use RewardUnit::*;
        match platform {
            Platform::Twitch => vec![
                RewardRule::new(Listener::Subscriber, self.per_sub, Subs),
                RewardRule::new(Listener::BulkSubscriber, self.per_sub, Subs),
                RewardRule::new(Listener::Tip, self.per_tip, Amount),
                RewardRule::new(Listener::Cheer, self.per_cheer, Hundreds),
                RewardRule::new(Listener::Follower, self.per_follow, Flat),
            ],
            Platform::Youtube => vec![
                RewardRule::new(Listener::Member, self.per_member, Flat),
                RewardRule::new(Listener::Subscriber, self.per_sub, Flat),
                RewardRule::new(Listener::SuperChat, self.per_super_chat, Amount),
                RewardRule::new(Listener::Tip, self.per_tip, Amount),
            ],
        }
    }
}

/// Format seconds as `HH:MM:SS`
pub fn format_hms(total: u64) -> String {
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// End-time label: `ENDS h:mm AM`, or `ENDED` at zero
pub fn end_label<Tz: TimeZone>(remaining: u64, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if remaining == 0 {
        return ENDED_LABEL.to_string();
    }
    let end = now.clone() + Duration::seconds(remaining as i64);
    format!("ENDS {}", end.format("%-I:%M %p"))
}

/// Countdown state over one-second ticks
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u64,
    start: u64,
    cap: u64,
    mode: TimerMode,
    platform: Platform,
    rewards: RewardTable,
}

impl Countdown {
    pub fn new(settings: &TimerSettings) -> Self {
        let mut countdown = Self {
            remaining: 0,
            start: settings.start_total_seconds(),
            cap: settings.cap_seconds(),
            mode: settings.mode,
            platform: settings.platform,
            rewards: settings.rewards,
        };
        countdown.remaining = countdown.clamp(countdown.start);
        countdown
    }

    fn clamp(&self, seconds: u64) -> u64 {
        if self.cap > 0 {
            seconds.min(self.cap)
        } else {
            seconds
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Cap in seconds, 0 meaning unlimited
    pub fn cap(&self) -> u64 {
        self.cap
    }

    /// One-second tick; holds at zero
    pub fn tick(&mut self) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            tracing::info!("Countdown reached zero");
        }
    }

    /// Whether the deployed widget would persist after a tick landing here
    pub fn should_persist(&self) -> bool {
        self.remaining % PERSIST_EVERY_SECS == 0
    }

    /// Apply an event worth `seconds`, adding or subtracting per the mode
    pub fn apply(&mut self, seconds: u64) {
        self.remaining = match self.mode {
            TimerMode::CountdownAdd => self.clamp(self.remaining.saturating_add(seconds)),
            TimerMode::CountdownSub => self.remaining.saturating_sub(seconds),
        };
    }

    /// Look up and apply a host event. Returns the seconds applied.
    pub fn handle_event(&mut self, event: &HostEvent) -> u64 {
        let seconds = self.rewards.seconds_for(self.platform, event);
        if seconds > 0 {
            self.apply(seconds);
            tracing::debug!(
                listener = %event.listener,
                seconds,
                remaining = self.remaining,
                "Timer event applied"
            );
        }
        seconds
    }

    /// Restore a persisted value (clamped to the cap)
    pub fn resume(&mut self, stored: u64) {
        self.remaining = self.clamp(stored);
    }

    /// Re-synchronise with edited settings.
    ///
    /// A changed start time restarts the countdown; mode, platform, rate and
    /// cap edits apply to the running value, re-clamping to the new cap.
    pub fn apply_settings(&mut self, settings: &TimerSettings) {
        let start = settings.start_total_seconds();
        self.cap = settings.cap_seconds();
        self.mode = settings.mode;
        self.platform = settings.platform;
        self.rewards = settings.rewards;

        if start != self.start {
            self.start = start;
            self.remaining = self.clamp(start);
        } else {
            self.remaining = self.clamp(self.remaining);
        }
    }

    pub fn display(&self) -> String {
        format_hms(self.remaining)
    }

    pub fn end_time<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        now.clone() + Duration::seconds(self.remaining as i64)
    }

    pub fn end_label<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        end_label(self.remaining, now)
    }
}
