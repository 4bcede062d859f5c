use std::sync::Arc;

use overlaykit_core::types::{
    ChatSettings, GoalSettings, PreviewConfig, StudioConfig, TimerSettings, Tool,
};
use overlaykit_core::{
    AssetEditor, ChatPreview, Clock, Countdown, GoalTracker, HostEvent, Millis, MockFeed,
    SessionClock, StudioConfigExt,
};
use tokio::sync::{Mutex, RwLock};

use crate::tasks::{self, BackgroundTasks};

/// Shared handle to the preview state mutated by commands and background tasks
pub type StudioHandle = Arc<RwLock<Studio>>;

/// Live preview state for every tool
#[derive(Debug)]
pub struct Studio {
    pub tool: Tool,
    pub chat_settings: ChatSettings,
    pub feed: MockFeed,
    pub chat: ChatPreview,
    pub goal_settings: GoalSettings,
    pub goals: GoalTracker,
    pub timer_settings: TimerSettings,
    pub countdown: Countdown,
    pub asset: AssetEditor,
}

/// What a simulated host event did to the previews
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventOutcome {
    pub goal_amount: f64,
    pub timer_seconds: u64,
}

impl Studio {
    pub fn new(preview: &PreviewConfig, now: Millis) -> Self {
        let chat_settings = ChatSettings::default();
        let goal_settings = GoalSettings::default();
        let timer_settings = TimerSettings::default();
        let feed = MockFeed::new(preview.mock_history_limit);
        let mut chat = ChatPreview::new(&chat_settings);
        chat.sync(feed.messages(), now);

        Self {
            tool: Tool::default(),
            goals: GoalTracker::preview(&goal_settings),
            countdown: Countdown::new(&timer_settings),
            chat_settings,
            feed,
            chat,
            goal_settings,
            timer_settings,
            asset: AssetEditor::new(),
        }
    }

    pub fn set_chat_settings(&mut self, settings: ChatSettings, now: Millis) {
        self.chat.apply_settings(&settings);
        self.chat.sync(self.feed.messages(), now);
        self.chat_settings = settings;
    }

    pub fn set_goal_settings(&mut self, settings: GoalSettings) {
        self.goals.apply_settings(&settings);
        self.goal_settings = settings;
    }

    pub fn set_timer_settings(&mut self, settings: TimerSettings) {
        self.countdown.apply_settings(&settings);
        self.timer_settings = settings;
    }

    /// Re-read the mock feed into the chat window
    pub fn refresh_chat(&mut self, now: Millis) -> bool {
        self.chat.sync(self.feed.messages(), now)
    }

    /// Run chat hide and goal completion deadlines up to `now`
    pub fn advance(&mut self, now: Millis) -> bool {
        let chat = self.chat.advance(now);
        let goals = self.goals.advance(now);
        chat || goals
    }

    /// Feed a host event to the goal and timer previews
    pub fn handle_event(&mut self, event: &HostEvent, now: Millis) -> EventOutcome {
        let goal_amount = event.goal_contribution(self.goal_settings.goal_type);
        if goal_amount > 0.0 {
            self.goals.contribute(goal_amount, now);
        }
        let timer_seconds = self.countdown.handle_event(event);
        EventOutcome {
            goal_amount,
            timer_seconds,
        }
    }
}

/// Holds all shared state for the CLI application.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<StudioConfig>>,
    pub studio: StudioHandle,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
    pub clock: SessionClock,
}

impl CliContext {
    pub fn new() -> Self {
        Self::with_config(StudioConfig::load())
    }

    pub fn with_config(config: StudioConfig) -> Self {
        let clock = SessionClock::new();
        let studio = Studio::new(&config.preview, clock.now());
        Self {
            config: Arc::new(RwLock::new(config)),
            studio: Arc::new(RwLock::new(studio)),
            tasks: Arc::new(Mutex::new(BackgroundTasks::default())),
            clock,
        }
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// Abort every background task and spawn fresh ones against current state
    pub async fn restart_tasks(&self) {
        let preview = self.config.read().await.preview.clone();
        let mut tasks = self.tasks.lock().await;
        tasks.abort_all().await;
        *tasks = tasks::spawn_all(self, &preview);
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlaykit_core::Listener;
    use overlaykit_core::types::{GoalType, TimerMode};

    #[test]
    fn new_studio_shows_seed_messages() {
        let studio = Studio::new(&PreviewConfig::default(), 0);
        assert_eq!(studio.chat.displayed().len(), studio.feed.messages().len());
    }

    #[test]
    fn events_reach_goal_and_timer() {
        let mut studio = Studio::new(&PreviewConfig::default(), 0);
        let start = studio.countdown.remaining();

        let outcome = studio.handle_event(&HostEvent::gifted(Listener::BulkSubscriber, 3.0), 0);
        assert_eq!(outcome.goal_amount, 3.0);
        assert_eq!(outcome.timer_seconds, 900);
        assert_eq!(studio.goals.total(), 3.0);
        assert_eq!(studio.countdown.remaining(), (start + 900).min(studio.countdown.cap()));
    }

    #[test]
    fn unrelated_goal_listener_only_moves_timer() {
        let mut studio = Studio::new(&PreviewConfig::default(), 0);
        let mut goal = GoalSettings::default();
        goal.goal_type = GoalType::Cheer;
        studio.set_goal_settings(goal);
        let mut timer = TimerSettings::default();
        timer.mode = TimerMode::CountdownSub;
        studio.set_timer_settings(timer);

        let outcome = studio.handle_event(&HostEvent::new(Listener::Tip, 5.0), 0);
        assert_eq!(outcome.goal_amount, 0.0);
        assert_eq!(outcome.timer_seconds, 300);
        assert_eq!(studio.goals.total(), 0.0);
    }

    #[test]
    fn lowering_chat_limit_trims_window() {
        let mut studio = Studio::new(&PreviewConfig::default(), 0);
        let mut chat = ChatSettings::default();
        chat.max_messages = 2;
        studio.set_chat_settings(chat, 10);
        assert_eq!(studio.chat.displayed().len(), 2);
    }
}
