// Host-side tests for the session lifecycle: program loads, media
// resolution generations, movement routing and detection.

use app_core::detect::{DetectionFrame, HandUpdate};
use app_core::hand::Hand;
use app_core::livecode::parse;
use app_core::overlay::{LostDetectionPolicy, RenderSink, StyleParams};
use app_core::session::{MediaOutcome, Session};
use glam::{Vec2, Vec3};

#[derive(Default)]
struct RecordingSink {
    commands: Vec<String>,
}

impl RenderSink for RecordingSink {
    fn set_position(&mut self, hand: Hand, position: Vec3) -> bool {
        self.commands.push(format!(
            "pos {} {} {}",
            hand.as_str(),
            position.x,
            position.y
        ));
        true
    }
    fn set_visible(&mut self, hand: Hand, visible: bool) -> bool {
        self.commands
            .push(format!("vis {} {}", hand.as_str(), visible));
        true
    }
    fn set_style(&mut self, hand: Hand, style: &StyleParams) -> bool {
        self.commands
            .push(format!("style {} {}", hand.as_str(), style.filter));
        true
    }
    fn load_media(&mut self, hand: Hand, url: &str, start: f32, end: Option<f32>) -> bool {
        self.commands
            .push(format!("load {} {url} {start} {end:?}", hand.as_str()));
        true
    }
    fn set_clip_region(&mut self, hand: Hand, clip_path: &str) -> bool {
        self.commands
            .push(format!("clip {} {clip_path}", hand.as_str()));
        true
    }
}

fn scrub_session() -> (Session, Vec<app_core::session::PendingLoad>) {
    let mut session = Session::new(LostDetectionPolicy::StickyPosition);
    let program = parse(
        r#"right_hand({ url: "a.mp4", start: 5, end: 15 });
           foot_mode(0, "scrub", { target: "right", x: "timestamp", y: "volume" });"#,
    );
    assert!(program.skipped.is_empty());
    let pending = session.load_program(&program);
    (session, pending)
}

#[test]
fn load_program_reports_pending_loads() {
    let (session, pending) = scrub_session();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].hand, Hand::Right);
    assert_eq!(pending[0].source, "a.mp4");
    assert_eq!(pending[0].start, 5.0);
    assert_eq!(pending[0].end, Some(15.0));
    assert_eq!(session.video(Hand::Right).unwrap().url, "a.mp4");
    assert!(session.video(Hand::Left).is_none());
}

#[test]
fn load_program_pins_timestamp_to_the_clip() {
    let (session, _) = scrub_session();
    assert_eq!(session.store.get(Hand::Right, "timestamp"), Some(5.0));
}

#[test]
fn successful_resolution_loads_media_and_emits_initial_style() {
    let (mut session, pending) = scrub_session();
    let mut sink = RecordingSink::default();
    let outcome = session.media_resolved(
        Hand::Right,
        pending[0].generation,
        Ok("https://cdn/a.mp4".to_string()),
        &mut sink,
    );
    assert_eq!(outcome, MediaOutcome::Loaded);
    assert_eq!(
        sink.commands[0],
        "load right https://cdn/a.mp4 5 Some(15.0)"
    );
    assert_eq!(sink.commands[1], "vis right true");
    assert!(sink.commands[2].starts_with("style right hue-rotate(0deg)"));
}

#[test]
fn failed_resolution_is_user_visible_and_local_to_the_hand() {
    let (mut session, pending) = scrub_session();
    let mut sink = RecordingSink::default();
    let outcome = session.media_resolved(
        Hand::Right,
        pending[0].generation,
        Err("video unavailable".to_string()),
        &mut sink,
    );
    assert_eq!(
        outcome,
        MediaOutcome::Failed {
            message: "video unavailable".to_string()
        }
    );
    assert!(sink.commands.is_empty());
}

#[test]
fn superseded_resolution_is_discarded() {
    let (mut session, first_pending) = scrub_session();
    // A second load for the same hand supersedes the first request.
    let program = parse(r#"right_hand({ url: "b.mp4" });"#);
    let second_pending = session.load_program(&program);
    assert!(second_pending[0].generation > first_pending[0].generation);

    let mut sink = RecordingSink::default();
    let outcome = session.media_resolved(
        Hand::Right,
        first_pending[0].generation,
        Ok("https://cdn/a.mp4".to_string()),
        &mut sink,
    );
    assert_eq!(outcome, MediaOutcome::Stale);
    assert!(sink.commands.is_empty());

    let outcome = session.media_resolved(
        Hand::Right,
        second_pending[0].generation,
        Ok("https://cdn/b.mp4".to_string()),
        &mut sink,
    );
    assert_eq!(outcome, MediaOutcome::Loaded);
    assert!(sink.commands[0].starts_with("load right https://cdn/b.mp4"));
}

#[test]
fn reload_resets_parameters_for_that_hand() {
    let (mut session, _) = scrub_session();
    let mut sink = RecordingSink::default();
    session.movement(20.0, 0.0, &mut sink);
    assert_eq!(session.store.get(Hand::Right, "timestamp"), Some(6.0));

    let program = parse(r#"right_hand({ url: "a.mp4", start: 5, end: 15 });"#);
    session.load_program(&program);
    assert_eq!(session.store.get(Hand::Right, "timestamp"), Some(5.0));
}

#[test]
fn movement_scrubs_the_bound_parameter_and_restyles() {
    let (mut session, pending) = scrub_session();
    let mut sink = RecordingSink::default();
    session.media_resolved(
        Hand::Right,
        pending[0].generation,
        Ok("https://cdn/a.mp4".to_string()),
        &mut sink,
    );
    sink.commands.clear();

    // 20 * 0.5 = 10% of the 5..15 clip range = +1s.
    let touched = session.movement(20.0, 0.0, &mut sink);
    assert_eq!(touched.as_slice(), &[Hand::Right]);
    assert_eq!(session.store.get(Hand::Right, "timestamp"), Some(6.0));
    assert_eq!(session.store.get(Hand::Right, "volume"), Some(100.0));
    assert_eq!(sink.commands.len(), 1);
    assert!(sink.commands[0].starts_with("style right"));
}

#[test]
fn detection_positions_loaded_overlays() {
    let (mut session, pending) = scrub_session();
    let mut sink = RecordingSink::default();
    session.media_resolved(
        Hand::Right,
        pending[0].generation,
        Ok("https://cdn/a.mp4".to_string()),
        &mut sink,
    );
    sink.commands.clear();

    let frame = DetectionFrame {
        right: HandUpdate {
            detected: true,
            position: Vec2::new(0.5, 0.5),
        },
        left: HandUpdate {
            detected: false,
            position: Vec2::ZERO,
        },
    };
    session.detection(&frame, &mut sink);
    assert_eq!(
        sink.commands,
        vec!["vis right true".to_string(), "pos right 0 0".to_string()]
    );
}
