//! Chat message retention window
//!
//! `ChatPreview` decides which messages of the source list are visible. New
//! messages are appended, sorted by id and trimmed from the front to the
//! visible limit. With auto-hide on, each message is hidden in two phases:
//! after `hide_messages_after` seconds it starts hiding (fade-out), and
//! [`HIDE_FADE_MS`] later it is retired.
//!
//! Retired ids (auto-hidden) are never displayed again, even if they remain in
//! the source list. Messages trimmed by the cap are only dropped from the
//! window; raising the cap re-admits them on the next sync.

use hashbrown::HashSet;

use overlaykit_types::{ChatDirection, ChatSettings, MockMessage};

use crate::clock::Millis;

/// Fade-out duration between "hiding" and removal
pub const HIDE_FADE_MS: Millis = 500;

/// A message currently in the visible window
#[derive(Debug, Clone)]
pub struct DisplayedMessage {
    pub message: MockMessage,
    /// When the message entered the window
    pub shown_at: Millis,
    /// When the message starts hiding (auto-hide only)
    pub hide_at: Option<Millis>,
    /// When the fade-out began
    pub hiding_since: Option<Millis>,
}

impl DisplayedMessage {
    pub fn id(&self) -> u64 {
        self.message.id
    }

    pub fn is_hiding(&self) -> bool {
        self.hiding_since.is_some()
    }
}

/// Preview-side chat retention state machine
#[derive(Debug, Clone)]
pub struct ChatPreview {
    displayed: Vec<DisplayedMessage>,
    retired: HashSet<u64>,
    max_messages: usize,
    hide_messages: bool,
    hide_after_ms: Millis,
}

impl ChatPreview {
    pub fn new(settings: &ChatSettings) -> Self {
        Self {
            displayed: Vec::new(),
            retired: HashSet::new(),
            max_messages: settings.visible_limit(),
            hide_messages: settings.hide_messages,
            hide_after_ms: settings.hide_messages_after as Millis * 1000,
        }
    }

    /// Reconcile the window with the current source list.
    ///
    /// Returns true if the visible set changed.
    pub fn sync(&mut self, source: &[MockMessage], now: Millis) -> bool {
        let before = self.displayed_ids();

        // Prune messages removed upstream
        self.displayed
            .retain(|d| source.iter().any(|m| m.id == d.message.id));

        let fresh: Vec<DisplayedMessage> = source
            .iter()
            .filter(|m| !self.retired.contains(&m.id))
            .filter(|m| !self.displayed.iter().any(|d| d.message.id == m.id))
            .map(|m| DisplayedMessage {
                message: m.clone(),
                shown_at: now,
                hide_at: self.hide_messages.then(|| now + self.hide_after_ms),
                hiding_since: None,
            })
            .collect();

        if !fresh.is_empty() {
            self.displayed.extend(fresh);
            self.displayed.sort_by_key(|d| d.message.id);
            self.trim_to_limit();
        }
        self.displayed_ids() != before
    }

    /// Advance auto-hide deadlines to `now`.
    ///
    /// Returns true if the visible set changed.
    pub fn advance(&mut self, now: Millis) -> bool {
        let mut changed = false;

        for d in &mut self.displayed {
            if d.hiding_since.is_none()
                && let Some(hide_at) = d.hide_at
                && hide_at <= now
            {
                d.hiding_since = Some(hide_at);
                changed = true;
            }
        }

        let retired = &mut self.retired;
        self.displayed.retain(|d| match d.hiding_since {
            Some(since) if since + HIDE_FADE_MS <= now => {
                tracing::debug!(id = d.message.id, "Chat message hidden");
                retired.insert(d.message.id);
                changed = true;
                false
            }
            _ => true,
        });

        changed
    }

    /// Re-synchronise with edited settings, superseding pending deadlines
    pub fn apply_settings(&mut self, settings: &ChatSettings) {
        let hide_after_ms = settings.hide_messages_after as Millis * 1000;

        if settings.hide_messages && !self.hide_messages {
            // Toggling auto-hide on empties the window; the next sync
            // re-admits messages with fresh deadlines.
            self.displayed.clear();
        } else if !settings.hide_messages && self.hide_messages {
            for d in &mut self.displayed {
                d.hide_at = None;
                d.hiding_since = None;
            }
        } else if settings.hide_messages && hide_after_ms != self.hide_after_ms {
            for d in &mut self.displayed {
                if d.hiding_since.is_none() {
                    d.hide_at = Some(d.shown_at + hide_after_ms);
                }
            }
        }

        self.hide_messages = settings.hide_messages;
        self.hide_after_ms = hide_after_ms;
        self.max_messages = settings.visible_limit();
        self.trim_to_limit();
    }

    fn trim_to_limit(&mut self) {
        if self.displayed.len() <= self.max_messages {
            return;
        }
        let excess = self.displayed.len() - self.max_messages;
        self.displayed.drain(..excess);
        tracing::debug!(trimmed = excess, "Chat messages trimmed by cap");
    }

    /// Displayed messages in screen order for `direction`
    pub fn visible(&self, direction: ChatDirection) -> Vec<&DisplayedMessage> {
        match direction {
            ChatDirection::Up => self.displayed.iter().collect(),
            ChatDirection::Down => self.displayed.iter().rev().collect(),
        }
    }

    /// Displayed messages in ascending id order
    pub fn displayed(&self) -> &[DisplayedMessage] {
        &self.displayed
    }

    pub fn displayed_ids(&self) -> Vec<u64> {
        self.displayed.iter().map(|d| d.message.id).collect()
    }

    pub fn is_retired(&self, id: u64) -> bool {
        self.retired.contains(&id)
    }

    /// Earliest pending auto-hide transition, if any
    pub fn next_deadline(&self) -> Option<Millis> {
        self.displayed
            .iter()
            .filter_map(|d| match (d.hiding_since, d.hide_at) {
                (Some(since), _) => Some(since + HIDE_FADE_MS),
                (None, Some(at)) => Some(at),
                _ => None,
            })
            .min()
    }
}
