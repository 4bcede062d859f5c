//! Overlay host events
//!
//! The deployed widgets receive `onEventReceived` notifications carrying a
//! listener name and an event payload. The preview simulators consume the same
//! shapes so both sides agree on which listener maps to which reward.

use std::fmt;
use std::str::FromStr;

use overlaykit_types::GoalType;

/// Host listener names the widgets react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Subscriber,
    BulkSubscriber,
    Follower,
    Tip,
    Cheer,
    Member,
    SuperChat,
    Message,
    DeleteMessage,
    DeleteMessages,
}

impl Listener {
    pub const ALL: [Listener; 10] = [
        Listener::Subscriber,
        Listener::BulkSubscriber,
        Listener::Follower,
        Listener::Tip,
        Listener::Cheer,
        Listener::Member,
        Listener::SuperChat,
        Listener::Message,
        Listener::DeleteMessage,
        Listener::DeleteMessages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Listener::Subscriber => "subscriber-latest",
            Listener::BulkSubscriber => "bulk-subscriber-latest",
            Listener::Follower => "follower-latest",
            Listener::Tip => "tip-latest",
            Listener::Cheer => "cheer-latest",
            Listener::Member => "member-latest",
            Listener::SuperChat => "superchat-latest",
            Listener::Message => "message",
            Listener::DeleteMessage => "delete-message",
            Listener::DeleteMessages => "delete-messages",
        }
    }

    /// Listeners that feed a goal of the given type
    pub fn for_goal(goal_type: GoalType) -> &'static [Listener] {
        match goal_type {
            GoalType::Subscriber => &[Listener::Subscriber, Listener::BulkSubscriber],
            GoalType::Follower => &[Listener::Follower],
            GoalType::Tip => &[Listener::Tip],
            GoalType::Cheer => &[Listener::Cheer],
        }
    }
}

impl fmt::Display for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Listener {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Listener::ALL
            .into_iter()
            .find(|l| l.as_str() == name || l.as_str().trim_end_matches("-latest") == name)
            .ok_or_else(|| format!("unknown listener '{name}'"))
    }
}

/// An event as delivered by the overlay host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostEvent {
    pub listener: Listener,
    /// Count, currency amount or bits depending on the listener
    pub amount: f64,
    /// Set on gifted subscription bundles; `amount` is then the gift count
    pub bulk_gifted: bool,
}

impl HostEvent {
    pub fn new(listener: Listener, amount: f64) -> Self {
        Self {
            listener,
            amount,
            bulk_gifted: false,
        }
    }

    pub fn gifted(listener: Listener, count: f64) -> Self {
        Self {
            listener,
            amount: count,
            bulk_gifted: true,
        }
    }

    /// Subscription count carried by a sub event
    pub fn sub_count(&self) -> f64 {
        if self.bulk_gifted { self.amount } else { 1.0 }
    }

    /// Amount this event contributes to a goal of `goal_type` (0 if unrelated)
    pub fn goal_contribution(&self, goal_type: GoalType) -> f64 {
        if !Listener::for_goal(goal_type).contains(&self.listener) {
            return 0.0;
        }
        match goal_type {
            GoalType::Subscriber => self.sub_count(),
            GoalType::Follower => 1.0,
            GoalType::Tip | GoalType::Cheer => self.amount,
        }
    }
}
