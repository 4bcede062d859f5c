//! Tests for goal progression
//!
//! Verifies percent arithmetic, completion timing, cascading through met
//! goals and session resets on settings edits.

use overlaykit_types::{GoalDisplayMode, GoalItem, GoalSettings};

use super::progress::{
    CompletionTimings, GoalTracker, GoalView, amount_text, goal_percent, stack_tier,
};

fn goals(targets: &[f64]) -> Vec<GoalItem> {
    targets
        .iter()
        .enumerate()
        .map(|(i, t)| GoalItem::new((i + 1).to_string(), format!("Goal {}", i + 1), *t))
        .collect()
}

fn settings(start: f64, targets: &[f64]) -> GoalSettings {
    GoalSettings {
        start_amount: start,
        goals: goals(targets),
        ..GoalSettings::default()
    }
}

#[test]
fn percent_of_second_goal_at_150() {
    let settings = settings(0.0, &[100.0, 200.0]);
    let mut tracker = GoalTracker::preview(&settings);

    tracker.contribute(150.0, 0);
    tracker.advance(10_000);

    assert_eq!(tracker.index(), 1);
    assert_eq!(tracker.active_percent(), 50.0);
}

#[test]
fn degenerate_goal_is_exactly_100_percent() {
    let list = goals(&[100.0, 100.0, 80.0]);
    assert_eq!(goal_percent(&list, 0.0, 0.0, 1), 100.0);
    assert_eq!(goal_percent(&list, 0.0, 0.0, 2), 100.0);
    assert_eq!(goal_percent(&goals(&[10.0]), 50.0, 0.0, 0), 100.0);
}

#[test]
fn percent_stays_within_bounds() {
    let list = goals(&[100.0, 250.0, 1000.0]);
    for total in [-50.0, 0.0, 42.0, 100.0, 180.0, 999.0, 5000.0] {
        for index in 0..list.len() {
            let p = goal_percent(&list, 0.0, total, index);
            assert!((0.0..=100.0).contains(&p), "percent {p} out of range");
        }
    }
}

#[test]
fn completion_holds_before_advancing() {
    let settings = settings(0.0, &[100.0, 200.0]);
    let mut tracker = GoalTracker::new(&settings, CompletionTimings::WIDGET);

    tracker.contribute(100.0, 1_000);
    assert!(tracker.is_completing());
    assert!(!tracker.advance(2_999));
    assert_eq!(tracker.index(), 0);

    assert!(tracker.advance(3_000));
    assert_eq!(tracker.index(), 1);
    assert!(!tracker.is_completing());
}

#[test]
fn cascades_through_goals_already_met() {
    let settings = settings(0.0, &[100.0, 200.0, 300.0]);
    let mut tracker = GoalTracker::preview(&settings);

    tracker.contribute(250.0, 0);
    tracker.advance(1_500);
    assert_eq!(tracker.index(), 1);
    assert!(tracker.is_completing());

    // Second completion was scheduled from the first advance, not from `now`
    tracker.advance(3_000);
    assert_eq!(tracker.index(), 2);
    assert!(!tracker.is_completing());
}

#[test]
fn large_jump_resolves_in_one_advance() {
    let settings = settings(0.0, &[100.0, 200.0, 300.0]);
    let mut tracker = GoalTracker::preview(&settings);

    tracker.contribute(1_000.0, 0);
    tracker.advance(60_000);
    assert_eq!(tracker.index(), 3);
    assert!(tracker.is_complete());
    assert_eq!(tracker.view(&settings, 60_000), GoalView::Completed);
}

#[test]
fn index_is_monotonic_and_reaches_end_only_when_all_met() {
    let settings = settings(0.0, &[50.0, 120.0, 200.0]);
    let mut tracker = GoalTracker::preview(&settings);
    let mut last = 0;
    let mut now = 0;

    for _ in 0..19 {
        tracker.contribute(10.0, now);
        now += 2_000;
        tracker.advance(now);
        assert!(tracker.index() >= last);
        last = tracker.index();
    }
    assert_eq!(tracker.total(), 190.0);
    assert_eq!(tracker.index(), 2);

    tracker.contribute(10.0, now);
    tracker.advance(now + 1_500);
    assert!(tracker.is_complete());
}

#[test]
fn simulated_donation_refused_while_completing_or_done() {
    let settings = settings(0.0, &[100.0]);
    let mut tracker = GoalTracker::preview(&settings);

    assert!(tracker.simulate_contribution(100.0, 0));
    assert!(!tracker.simulate_contribution(10.0, 100));
    assert_eq!(tracker.total(), 100.0);

    tracker.advance(1_500);
    assert!(tracker.is_complete());
    assert!(!tracker.simulate_contribution(10.0, 2_000));
}

#[test]
fn target_edit_resets_but_style_edit_keeps_state() {
    let mut settings = settings(0.0, &[100.0, 200.0]);
    let mut tracker = GoalTracker::preview(&settings);
    tracker.contribute(120.0, 0);
    tracker.advance(1_500);
    assert_eq!(tracker.index(), 1);

    settings.goals[0].title = "Renamed".into();
    settings.use_stripes = true;
    tracker.apply_settings(&settings);
    assert_eq!(tracker.index(), 1);
    assert_eq!(tracker.total(), 120.0);

    settings.goals[1].target_amount = 300.0;
    tracker.apply_settings(&settings);
    assert_eq!(tracker.index(), 0);
    assert_eq!(tracker.total(), 0.0);
    assert!(!tracker.is_completing());
}

#[test]
fn start_amount_change_resets_total() {
    let mut settings = settings(0.0, &[100.0]);
    let mut tracker = GoalTracker::preview(&settings);
    tracker.contribute(40.0, 0);

    settings.start_amount = 25.0;
    tracker.apply_settings(&settings);
    assert_eq!(tracker.total(), 25.0);
}

#[test]
fn stack_view_shows_upcoming_goals_with_falloff() {
    let mut settings = settings(0.0, &[100.0, 200.0, 300.0, 400.0, 500.0]);
    settings.display_mode = GoalDisplayMode::Stack;
    settings.goals_to_display = 4;
    let mut tracker = GoalTracker::preview(&settings);
    tracker.contribute(50.0, 0);

    let GoalView::Bars(bars) = tracker.view(&settings, 0) else {
        panic!("expected bars");
    };
    assert_eq!(bars.len(), 4);
    assert_eq!(bars[0].amount_text.as_deref(), Some("50 / 100 (50%)"));
    assert!(bars[1].amount_text.is_none());
    assert_eq!(bars[1].tier, stack_tier(1));
    assert_eq!(bars[3].tier.opacity, 0.1);
}

#[test]
fn single_view_shows_only_active_goal() {
    let settings = settings(0.0, &[100.0, 200.0]);
    let tracker = GoalTracker::preview(&settings);
    let GoalView::Bars(bars) = tracker.view(&settings, 0) else {
        panic!("expected bars");
    };
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].tier.opacity, 1.0);
}

#[test]
fn widget_view_reports_fade_after_hold() {
    let settings = settings(0.0, &[100.0, 200.0]);
    let mut tracker = GoalTracker::new(&settings, CompletionTimings::WIDGET);
    tracker.contribute(100.0, 0);

    let GoalView::Bars(bars) = tracker.view(&settings, 1_000) else {
        panic!("expected bars");
    };
    assert!(bars[0].completing && !bars[0].fading);

    let GoalView::Bars(bars) = tracker.view(&settings, 1_600) else {
        panic!("expected bars");
    };
    assert!(bars[0].fading);
}

#[test]
fn amount_text_variants() {
    assert_eq!(amount_text(37.9, 100.0, 37.9, true, false), "37 / 100");
    assert_eq!(amount_text(150.0, 100.0, 100.0, true, true), "100 / 100 (100%)");
    assert_eq!(amount_text(12.0, 40.0, 30.0, false, true), "(30%)");
    assert_eq!(amount_text(12.0, 40.0, 30.0, false, false), "");
}

#[test]
fn resume_adds_session_total_to_start() {
    let settings = settings(10.0, &[100.0, 200.0]);
    let mut tracker = GoalTracker::new(&settings, CompletionTimings::WIDGET);
    tracker.resume(95.0, 0);
    assert_eq!(tracker.total(), 105.0);
    assert!(tracker.is_completing());
}

#[test]
fn non_finite_amounts_are_rejected() {
    let settings = settings(0.0, &[100.0, 200.0]);
    let mut tracker = GoalTracker::preview(&settings);

    assert!(!tracker.contribute(f64::NAN, 0));
    assert!(!tracker.contribute(f64::INFINITY, 0));
    assert!(!tracker.simulate_contribution(f64::NAN, 0));
    assert!(!tracker.contribute(-5.0, 0));
    assert_eq!(tracker.total(), 0.0);

    tracker.resume(f64::NAN, 0);
    assert_eq!(tracker.total(), 0.0);
    for index in 0..2 {
        assert!((0.0..=100.0).contains(&tracker.percent(index)));
    }
}
