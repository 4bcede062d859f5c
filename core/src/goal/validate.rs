//! Goal list editing and ordering checks

use std::fmt;

use overlaykit_types::{FillOverride, GoalItem, GoalSettings, MAX_GOALS};

/// Non-fatal ordering problem in a goal list
#[derive(Debug, Clone, PartialEq)]
pub struct GoalWarning {
    pub index: usize,
    pub goal_id: String,
    pub target: f64,
    pub previous_target: f64,
}

impl fmt::Display for GoalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "goal {} ({}): target must be greater than previous goal ({})",
            self.index + 1,
            self.target,
            self.previous_target
        )
    }
}

/// Goals whose target does not exceed their predecessor's
pub fn validate_goals(goals: &[GoalItem]) -> Vec<GoalWarning> {
    goals
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1].target_amount <= pair[0].target_amount)
        .map(|(i, pair)| GoalWarning {
            index: i + 1,
            goal_id: pair[1].id.clone(),
            target: pair[1].target_amount,
            previous_target: pair[0].target_amount,
        })
        .collect()
}

/// Editing operations on a goal list
pub trait GoalListExt {
    /// Append a goal after the last one (+50) or above the start (+100).
    /// Returns `None` once [`MAX_GOALS`] is reached.
    fn add_goal(&mut self) -> Option<&GoalItem>;
    fn remove_goal(&mut self, id: &str) -> bool;
    fn set_goal_target(&mut self, id: &str, target: f64) -> bool;
    fn set_goal_title(&mut self, id: &str, title: &str) -> bool;
    /// Stable sort by ascending target
    fn sort_goals(&mut self);
    fn warnings(&self) -> Vec<GoalWarning>;
}

impl GoalListExt for GoalSettings {
    fn add_goal(&mut self) -> Option<&GoalItem> {
        if self.goals.len() >= MAX_GOALS {
            return None;
        }
        let target = match self.goals.last() {
            Some(last) => last.target_amount + 50.0,
            None => self.start_amount + 100.0,
        };

        let mut n = self.goals.len() + 1;
        while self.goals.iter().any(|g| g.id == n.to_string()) {
            n += 1;
        }

        self.goals.push(GoalItem {
            id: n.to_string(),
            title: format!("Goal {}", self.goals.len() + 1),
            target_amount: target,
            fill: Some(FillOverride::from(self.fill)),
        });
        self.goals.last()
    }

    fn remove_goal(&mut self, id: &str) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        before != self.goals.len()
    }

    fn set_goal_target(&mut self, id: &str, target: f64) -> bool {
        match self.goals.iter_mut().find(|g| g.id == id) {
            Some(goal) => {
                goal.target_amount = target;
                true
            }
            None => false,
        }
    }

    fn set_goal_title(&mut self, id: &str, title: &str) -> bool {
        match self.goals.iter_mut().find(|g| g.id == id) {
            Some(goal) => {
                goal.title = title.to_string();
                true
            }
            None => false,
        }
    }

    fn sort_goals(&mut self) {
        self.goals
            .sort_by(|a, b| a.target_amount.total_cmp(&b.target_amount));
    }

    fn warnings(&self) -> Vec<GoalWarning> {
        validate_goals(&self.goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_non_ascending_targets() {
        let goals = vec![
            GoalItem::new("a", "A", 100.0),
            GoalItem::new("b", "B", 100.0),
            GoalItem::new("c", "C", 50.0),
            GoalItem::new("d", "D", 300.0),
        ];
        let warnings = validate_goals(&goals);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].goal_id, "b");
        assert_eq!(warnings[1].previous_target, 100.0);
        assert!(warnings[1].to_string().contains("must be greater than previous goal"));
    }

    #[test]
    fn add_goal_steps_targets_and_copies_fill() {
        let mut settings = GoalSettings {
            goals: Vec::new(),
            start_amount: 20.0,
            ..GoalSettings::default()
        };
        assert_eq!(settings.add_goal().map(|g| g.target_amount), Some(120.0));
        assert_eq!(settings.add_goal().map(|g| g.target_amount), Some(170.0));
        assert_eq!(settings.goals[1].title, "Goal 2");
        assert_eq!(
            settings.goals[0].fill.and_then(|f| f.color),
            Some(settings.fill.color)
        );
    }

    #[test]
    fn add_goal_stops_at_limit_and_ids_stay_unique() {
        let mut settings = GoalSettings::default();
        settings.remove_goal("1");
        while settings.add_goal().is_some() {}
        assert_eq!(settings.goals.len(), MAX_GOALS);

        let mut ids: Vec<&str> = settings.goals.iter().map(|g| g.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), MAX_GOALS);
    }

    #[test]
    fn sort_orders_by_target() {
        let mut settings = GoalSettings::default();
        settings.set_goal_target("1", 500.0);
        assert_eq!(settings.warnings().len(), 1);
        settings.sort_goals();
        assert_eq!(settings.goals[0].id, "2");
        assert!(settings.warnings().is_empty());
    }
}
