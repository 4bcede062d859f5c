//! Tests for the chat retention window
//!
//! Covers cap trimming, two-phase auto-hide, upstream pruning and settings
//! changes superseding pending deadlines.

use overlaykit_types::{ChatDirection, ChatSettings, MockMessage};

use super::retention::{ChatPreview, HIDE_FADE_MS};

fn msg(id: u64) -> MockMessage {
    MockMessage::new(id, &format!("user{id}"), "hello", None, "")
}

fn feed(ids: &[u64]) -> Vec<MockMessage> {
    ids.iter().copied().map(msg).collect()
}

fn settings(max: u32) -> ChatSettings {
    ChatSettings {
        max_messages: max,
        ..ChatSettings::default()
    }
}

fn hiding_settings(max: u32, after_secs: u32) -> ChatSettings {
    ChatSettings {
        max_messages: max,
        hide_messages: true,
        hide_messages_after: after_secs,
        ..ChatSettings::default()
    }
}

#[test]
fn cap_keeps_newest_in_ascending_order() {
    let settings = settings(2);
    let mut preview = ChatPreview::new(&settings);

    let mut source = Vec::new();
    for id in 1..=3 {
        source.push(msg(id));
        preview.sync(&source, id * 10);
    }

    assert_eq!(preview.displayed_ids(), vec![2, 3]);
    assert!(!preview.is_retired(1));
}

#[test]
fn batch_sync_trims_from_the_front() {
    let mut preview = ChatPreview::new(&settings(2));
    preview.sync(&feed(&[3, 1, 2]), 0);
    assert_eq!(preview.displayed_ids(), vec![2, 3]);
}

#[test]
fn raising_cap_readmits_trimmed_messages() {
    let mut settings = settings(2);
    let mut preview = ChatPreview::new(&settings);
    let source = feed(&[1, 2, 3, 4, 5]);
    preview.sync(&source, 0);
    assert_eq!(preview.displayed_ids(), vec![4, 5]);

    settings.max_messages = 5;
    preview.apply_settings(&settings);
    assert!(preview.sync(&source, 10));
    assert_eq!(preview.displayed_ids(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn resync_at_cap_reports_no_change() {
    let mut preview = ChatPreview::new(&settings(2));
    let source = feed(&[1, 2, 3]);
    assert!(preview.sync(&source, 0));
    assert!(!preview.sync(&source, 10));
    assert_eq!(preview.displayed_ids(), vec![2, 3]);
}

#[test]
fn displayed_count_never_exceeds_cap() {
    for max in 1..=5 {
        let mut preview = ChatPreview::new(&settings(max));
        let mut source = Vec::new();
        for id in 1..=30u64 {
            source.push(msg(id));
            preview.sync(&source, id);
            assert!(preview.displayed().len() <= max as usize);
        }
    }
}

#[test]
fn upstream_removal_prunes_preserving_order() {
    let mut preview = ChatPreview::new(&settings(10));
    preview.sync(&feed(&[1, 2, 3, 4]), 0);

    assert!(preview.sync(&feed(&[1, 3, 4]), 5));
    assert_eq!(preview.displayed_ids(), vec![1, 3, 4]);
    assert!(!preview.is_retired(2));
}

#[test]
fn auto_hide_is_two_phase() {
    let settings = hiding_settings(10, 5);
    let mut preview = ChatPreview::new(&settings);
    preview.sync(&feed(&[1]), 1_000);

    preview.advance(5_999);
    assert!(!preview.displayed()[0].is_hiding());

    assert!(preview.advance(6_000));
    assert!(preview.displayed()[0].is_hiding());
    assert_eq!(preview.displayed().len(), 1);

    assert!(preview.advance(6_000 + HIDE_FADE_MS));
    assert!(preview.displayed().is_empty());
    assert!(preview.is_retired(1));
}

#[test]
fn hidden_message_is_never_redisplayed() {
    let settings = hiding_settings(10, 1);
    let mut preview = ChatPreview::new(&settings);
    let source = feed(&[1, 2]);
    preview.sync(&source, 0);
    preview.advance(10_000);
    assert!(preview.displayed().is_empty());

    preview.sync(&source, 10_001);
    assert!(preview.displayed().is_empty());
}

#[test]
fn toggling_hide_on_clears_then_readmits_with_fresh_deadlines() {
    let mut settings = settings(10);
    let mut preview = ChatPreview::new(&settings);
    let source = feed(&[1, 2]);
    preview.sync(&source, 0);

    settings.hide_messages = true;
    settings.hide_messages_after = 2;
    preview.apply_settings(&settings);
    assert!(preview.displayed().is_empty());

    preview.sync(&source, 10_000);
    assert_eq!(preview.displayed_ids(), vec![1, 2]);
    assert_eq!(preview.next_deadline(), Some(12_000));
}

#[test]
fn toggling_hide_off_cancels_pending_hides() {
    let mut settings = hiding_settings(10, 1);
    let mut preview = ChatPreview::new(&settings);
    preview.sync(&feed(&[1]), 0);
    preview.advance(1_000);
    assert!(preview.displayed()[0].is_hiding());

    settings.hide_messages = false;
    preview.apply_settings(&settings);
    preview.advance(60_000);
    assert_eq!(preview.displayed_ids(), vec![1]);
    assert!(!preview.displayed()[0].is_hiding());
    assert_eq!(preview.next_deadline(), None);
}

#[test]
fn changing_hide_delay_recomputes_from_display_time() {
    let mut settings = hiding_settings(10, 60);
    let mut preview = ChatPreview::new(&settings);
    preview.sync(&feed(&[1]), 1_000);

    settings.hide_messages_after = 3;
    preview.apply_settings(&settings);
    assert_eq!(preview.next_deadline(), Some(4_000));
}

#[test]
fn lowering_cap_trims_immediately() {
    let mut settings = settings(5);
    let mut preview = ChatPreview::new(&settings);
    preview.sync(&feed(&[1, 2, 3, 4, 5]), 0);

    settings.max_messages = 2;
    preview.apply_settings(&settings);
    assert_eq!(preview.displayed_ids(), vec![4, 5]);
    assert!(!preview.is_retired(3));
}

#[test]
fn down_direction_reverses_screen_order() {
    let mut preview = ChatPreview::new(&settings(10));
    preview.sync(&feed(&[1, 2, 3]), 0);

    let down: Vec<u64> = preview
        .visible(ChatDirection::Down)
        .iter()
        .map(|d| d.id())
        .collect();
    assert_eq!(down, vec![3, 2, 1]);

    let up: Vec<u64> = preview
        .visible(ChatDirection::Up)
        .iter()
        .map(|d| d.id())
        .collect();
    assert_eq!(up, vec![1, 2, 3]);
}
