// Host-side tests for style derivation and the overlay positioner.

use app_core::constants::{BASE_OVERLAY_SCALE, PLANE_HEIGHT, PLANE_WIDTH};
use app_core::detect::{DetectionFrame, HandUpdate};
use app_core::hand::Hand;
use app_core::overlay::{
    style_for, LostDetectionPolicy, OverlayPositioner, RenderSink, StyleParams,
};
use app_core::params::ParamStore;
use glam::{Vec2, Vec3};

/// Sink that records every accepted command as a line of text.
#[derive(Default)]
struct RecordingSink {
    commands: Vec<String>,
    reject_all: bool,
}

impl RenderSink for RecordingSink {
    fn set_position(&mut self, hand: Hand, position: Vec3) -> bool {
        if self.reject_all {
            return false;
        }
        self.commands.push(format!(
            "pos {} {} {}",
            hand.as_str(),
            position.x,
            position.y
        ));
        true
    }
    fn set_visible(&mut self, hand: Hand, visible: bool) -> bool {
        if self.reject_all {
            return false;
        }
        self.commands
            .push(format!("vis {} {}", hand.as_str(), visible));
        true
    }
    fn set_style(&mut self, hand: Hand, style: &StyleParams) -> bool {
        if self.reject_all {
            return false;
        }
        self.commands
            .push(format!("style {} {}", hand.as_str(), style.filter));
        true
    }
    fn load_media(&mut self, hand: Hand, url: &str, _start: f32, _end: Option<f32>) -> bool {
        if self.reject_all {
            return false;
        }
        self.commands.push(format!("load {} {url}", hand.as_str()));
        true
    }
    fn set_clip_region(&mut self, hand: Hand, clip_path: &str) -> bool {
        if self.reject_all {
            return false;
        }
        self.commands
            .push(format!("clip {} {clip_path}", hand.as_str()));
        true
    }
}

fn frame(right: Option<Vec2>, left: Option<Vec2>) -> DetectionFrame {
    let update = |p: Option<Vec2>| HandUpdate {
        detected: p.is_some(),
        position: p.unwrap_or(Vec2::ZERO),
    };
    DetectionFrame {
        right: update(right),
        left: update(left),
    }
}

#[test]
fn style_emission_is_idempotent() {
    let store = ParamStore::new();
    let a = style_for(&store, Hand::Right);
    let b = style_for(&store, Hand::Right);
    assert_eq!(a.filter, b.filter);
    assert_eq!(a, b);
}

#[test]
fn all_seven_filters_emit_in_fixed_order_at_defaults() {
    let store = ParamStore::new();
    let style = style_for(&store, Hand::Left);
    assert_eq!(
        style.filter,
        "hue-rotate(0deg) saturate(100%) brightness(100%) contrast(100%) blur(0px) grayscale(0%) sepia(0%)"
    );
    assert_eq!(style.volume, 1.0);
    assert_eq!(style.playback_rate, 1.0);
    assert_eq!(style.opacity, 1.0);
    assert_eq!(style.scale, BASE_OVERLAY_SCALE);
}

#[test]
fn style_tracks_parameter_changes() {
    let mut store = ParamStore::new();
    store.update(Hand::Right, "hue", 10.0); // -> 50 degrees
    store.update(Hand::Right, "volume", -20.0); // -> 80%
    store.update(Hand::Right, "scale", 100.0); // -> clamped to 2.0
    let style = style_for(&store, Hand::Right);
    assert!(style.filter.starts_with("hue-rotate(50deg)"));
    assert_eq!(style.volume, 0.8);
    assert_eq!(style.scale, BASE_OVERLAY_SCALE * 2.0);
}

#[test]
fn positioner_ignores_hands_without_media() {
    let mut positioner = OverlayPositioner::new(LostDetectionPolicy::StickyPosition);
    let mut sink = RecordingSink::default();
    positioner.apply_frame(&frame(Some(Vec2::new(0.5, 0.5)), None), &mut sink);
    assert!(sink.commands.is_empty());
}

#[test]
fn media_created_places_overlay_at_last_known_position() {
    let mut positioner = OverlayPositioner::new(LostDetectionPolicy::StickyPosition);
    let mut sink = RecordingSink::default();
    // Detection arrives before the media finishes loading.
    positioner.apply_frame(&frame(Some(Vec2::new(1.0, 0.0)), None), &mut sink);
    positioner.media_created(Hand::Right, &mut sink);
    assert_eq!(
        sink.commands,
        vec![
            "vis right true".to_string(),
            format!("pos right {} {}", PLANE_WIDTH / 2.0, PLANE_HEIGHT / 2.0),
        ]
    );
}

#[test]
fn sticky_policy_freezes_position_on_detection_loss() {
    let mut positioner = OverlayPositioner::new(LostDetectionPolicy::StickyPosition);
    let mut sink = RecordingSink::default();
    positioner.media_created(Hand::Right, &mut sink);
    positioner.apply_frame(&frame(Some(Vec2::new(0.5, 0.5)), None), &mut sink);
    sink.commands.clear();

    positioner.apply_frame(&frame(None, None), &mut sink);
    // Still visible, but no new position command: it stays where it was.
    assert_eq!(sink.commands, vec!["vis right true".to_string()]);
}

#[test]
fn hide_policy_hides_on_detection_loss() {
    let mut positioner = OverlayPositioner::new(LostDetectionPolicy::HideOnLoss);
    let mut sink = RecordingSink::default();
    positioner.media_created(Hand::Left, &mut sink);
    positioner.apply_frame(&frame(None, Some(Vec2::new(0.5, 0.5))), &mut sink);
    sink.commands.clear();

    positioner.apply_frame(&frame(None, None), &mut sink);
    assert_eq!(sink.commands, vec!["vis left false".to_string()]);

    positioner.apply_frame(&frame(None, Some(Vec2::new(0.5, 0.5))), &mut sink);
    assert_eq!(sink.commands[1], "vis left true".to_string());
}

#[test]
fn media_removed_forgets_the_overlay() {
    let mut positioner = OverlayPositioner::new(LostDetectionPolicy::StickyPosition);
    let mut sink = RecordingSink::default();
    positioner.media_created(Hand::Right, &mut sink);
    positioner.media_removed(Hand::Right);
    sink.commands.clear();
    positioner.apply_frame(&frame(Some(Vec2::new(0.5, 0.5)), None), &mut sink);
    assert!(sink.commands.is_empty());
}

#[test]
fn dropped_commands_do_not_panic() {
    let mut positioner = OverlayPositioner::new(LostDetectionPolicy::StickyPosition);
    let mut sink = RecordingSink {
        reject_all: true,
        ..Default::default()
    };
    positioner.media_created(Hand::Right, &mut sink);
    positioner.apply_frame(&frame(Some(Vec2::new(0.5, 0.5)), None), &mut sink);
    assert!(sink.commands.is_empty());
}
