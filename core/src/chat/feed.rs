//! Synthetic chat source for the preview

use overlaykit_types::{Color, MOCK_HISTORY_LIMIT, MockMessage};

const USERS: [&str; 5] = ["NewViewer", "SuperFan99", "RandomUser", "ChatterBox", "ProPlayer"];

const MESSAGES: [&str; 7] = [
    "This is a test message!",
    "How is everyone?",
    "Great stream!",
    "Loving the content!",
    "Keep it up!",
    "Kappa",
    "PogChamp",
];

const BADGES: [&str; 5] = ["", "subscriber/1", "vip/1", "moderator/1", "broadcaster/1"];

const COLORS: [Color; 5] = [
    Color::rgb(0xff, 0x69, 0xb4),
    Color::rgb(0xa7, 0x8b, 0xfa),
    Color::rgb(0xf5, 0x9e, 0x0b),
    Color::rgb(0x34, 0xd3, 0x99),
    Color::rgb(0x60, 0xa5, 0xfa),
];

const BROADCASTER_NAME: &str = "TheStreamer";

fn seed_messages() -> Vec<MockMessage> {
    vec![
        MockMessage::new(
            1,
            "StreamGamer22",
            "This game is amazing! PogChamp",
            Some(Color::rgb(0xff, 0x69, 0xb4)),
            "subscriber/1",
        ),
        MockMessage::new(2, "MODBot", "Please keep the chat respectful. LUL", None, "moderator/1"),
        MockMessage::new(3, "VIP_Fan", "So excited for this stream! Kappa", None, "vip/1,subscriber/6"),
        MockMessage::new(
            4,
            "CasualViewer",
            "What is this game?",
            Some(Color::rgb(0xa7, 0x8b, 0xfa)),
            "",
        ),
        MockMessage::new(
            5,
            "AnotherUser",
            "Hello everyone! Have a great day!",
            Some(Color::rgb(0xf5, 0x9e, 0x0b)),
            "subscriber/3",
        ),
        MockMessage::new(
            6,
            BROADCASTER_NAME,
            "Welcome everyone! Thanks for tuning in.",
            Some(Color::rgb(0xff, 0x00, 0x00)),
            "broadcaster/1,subscriber/0",
        ),
    ]
}

/// Append-only message source, capped to the newest `limit` messages
#[derive(Debug, Clone)]
pub struct MockFeed {
    messages: Vec<MockMessage>,
    next_id: u64,
    cursor: usize,
    limit: usize,
}

impl MockFeed {
    /// Feed seeded with the demo conversation
    pub fn new(limit: usize) -> Self {
        let messages = seed_messages();
        let next_id = messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let mut feed = Self {
            messages,
            next_id,
            cursor: 0,
            limit: limit.max(1),
        };
        feed.enforce_limit();
        feed
    }

    pub fn empty(limit: usize) -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            cursor: 0,
            limit: limit.max(1),
        }
    }

    pub fn messages(&self) -> &[MockMessage] {
        &self.messages
    }

    /// Append a message with an explicit user, text and badges
    pub fn push(&mut self, user: &str, text: &str, color: Option<Color>, badges: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages
            .push(MockMessage::new(id, user, text, color, badges));
        self.enforce_limit();
        id
    }

    /// Append the next message from the fixed rotation of users, texts and badges
    pub fn generate(&mut self) -> u64 {
        let n = self.cursor;
        self.cursor += 1;

        let badges = BADGES[n % BADGES.len()];
        let user = if badges.starts_with("broadcaster") {
            BROADCASTER_NAME
        } else {
            USERS[n % USERS.len()]
        };
        let text = MESSAGES[n % MESSAGES.len()];
        let color = COLORS[n % COLORS.len()];
        self.push(user, text, Some(color), badges)
    }

    /// Remove one message upstream (host `delete-message`)
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        before != self.messages.len()
    }

    /// Remove every message from one user (host `delete-messages`)
    pub fn remove_user(&mut self, user: &str) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !m.user.eq_ignore_ascii_case(user));
        before - self.messages.len()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn enforce_limit(&mut self) {
        if self.messages.len() > self.limit {
            let excess = self.messages.len() - self.limit;
            self.messages.drain(..excess);
        }
    }
}

impl Default for MockFeed {
    fn default() -> Self {
        Self::new(MOCK_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_with_demo_conversation() {
        let feed = MockFeed::default();
        let ids: Vec<u64> = feed.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn generated_ids_are_monotonic_and_history_is_capped() {
        let mut feed = MockFeed::new(10);
        for _ in 0..20 {
            feed.generate();
        }
        let ids: Vec<u64> = feed.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(ids.first(), Some(&17));
        assert_eq!(ids.last(), Some(&26));
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn broadcaster_badge_uses_streamer_name() {
        let mut feed = MockFeed::empty(50);
        for _ in 0..5 {
            feed.generate();
        }
        let last = feed.messages().last().unwrap();
        assert_eq!(last.tags.badges, "broadcaster/1");
        assert_eq!(last.user, BROADCASTER_NAME);
    }

    #[test]
    fn remove_user_is_case_insensitive() {
        let mut feed = MockFeed::default();
        assert_eq!(feed.remove_user("modbot"), 1);
        assert!(feed.messages().iter().all(|m| m.id != 2));
    }
}
