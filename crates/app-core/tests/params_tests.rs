// Host-side tests for the parameter registry and update semantics.

use app_core::hand::Hand;
use app_core::params::{param_def, ParamStore, PARAMETERS};

#[test]
fn registry_has_expected_entries() {
    assert_eq!(PARAMETERS.len(), 12);
    for name in [
        "volume",
        "speed",
        "hue",
        "saturation",
        "brightness",
        "contrast",
        "blur",
        "timestamp",
        "scale",
        "opacity",
        "grayscale",
        "sepia",
    ] {
        assert!(param_def(name).is_some(), "missing definition for {name}");
    }
    assert!(param_def("reverb").is_none());
}

#[test]
fn store_starts_at_defaults() {
    let store = ParamStore::new();
    for hand in Hand::ALL {
        for def in &PARAMETERS {
            assert_eq!(store.get(hand, def.name), Some(def.default));
        }
    }
}

#[test]
fn absolute_update_is_percentage_of_range() {
    let mut store = ParamStore::new();
    // brightness: default 100, range 0..200; a delta of 20 moves 20% of 200.
    let v = store.update(Hand::Right, "brightness", 20.0);
    assert_eq!(v, Some(140.0));
    // The other hand is untouched.
    assert_eq!(store.get(Hand::Left, "brightness"), Some(100.0));
}

#[test]
fn values_stay_clamped_over_any_update_sequence() {
    let mut store = ParamStore::new();
    let deltas = [500.0, -37.5, 1e6, -1e6, 0.3, 250.0, -0.01, 42.0];
    for def in &PARAMETERS {
        if def.wraps {
            continue;
        }
        for hand in Hand::ALL {
            for d in deltas {
                store.update(hand, def.name, d);
                let v = store.get(hand, def.name).unwrap();
                assert!(
                    v >= def.min && v <= def.max,
                    "{} out of range after delta {d}: {v}",
                    def.name
                );
            }
        }
    }
}

#[test]
fn hue_wraps_on_large_negative_overshoot() {
    let mut store = ParamStore::new();
    // Raw delta -1000 becomes -5000 after the accumulated gain; a single
    // modulo step would not bring that back into range.
    let v = store.update(Hand::Right, "hue", -1000.0).unwrap();
    assert!((0.0..360.0).contains(&v));
    assert_eq!(v, 40.0);
}

#[test]
fn hue_wraps_on_large_positive_overshoot() {
    let mut store = ParamStore::new();
    let v = store.update(Hand::Right, "hue", 1000.0).unwrap();
    assert!((0.0..360.0).contains(&v));
    assert_eq!(v, 320.0);
}

#[test]
fn hue_round_trips_one_full_turn() {
    let mut store = ParamStore::new();
    let before = store.get(Hand::Left, "hue").unwrap();
    // 72 * gain 5 = exactly one full 360 turn.
    let after = store.update(Hand::Left, "hue", 72.0).unwrap();
    assert_eq!(after, before);
}

#[test]
fn unknown_parameter_is_a_no_op() {
    let mut store = ParamStore::new();
    assert_eq!(store.update(Hand::Right, "reverb", 10.0), None);
    assert_eq!(store.get(Hand::Right, "reverb"), None);
}

#[test]
fn timestamp_range_follows_clip_offsets() {
    let mut store = ParamStore::new();
    store.set_timestamp_range(Hand::Right, 5.0, Some(15.0));
    store.reset(Hand::Right);
    // Default 0 is pulled up to the clip start.
    assert_eq!(store.get(Hand::Right, "timestamp"), Some(5.0));
    // Scrubbing moves within the clip range only.
    let v = store.update(Hand::Right, "timestamp", 20.0);
    assert_eq!(v, Some(7.0)); // 5 + 20% of 10
    let v = store.update(Hand::Right, "timestamp", 1000.0);
    assert_eq!(v, Some(15.0));
}

#[test]
fn start_past_fallback_maximum_degenerates_safely() {
    let mut store = ParamStore::new();
    // No end offset, start beyond the fallback max: a single-point range.
    store.set_timestamp_range(Hand::Right, 150.0, None);
    store.reset(Hand::Right);
    assert_eq!(store.get(Hand::Right, "timestamp"), Some(150.0));
    assert_eq!(store.update(Hand::Right, "timestamp", 50.0), Some(150.0));
}

#[test]
fn shrinking_timestamp_range_pulls_current_value_in() {
    let mut store = ParamStore::new();
    store.update(Hand::Left, "timestamp", 80.0); // 80s of the default 0..100
    store.set_timestamp_range(Hand::Left, 10.0, Some(30.0));
    assert_eq!(store.get(Hand::Left, "timestamp"), Some(30.0));
}

#[test]
fn reset_returns_to_defaults() {
    let mut store = ParamStore::new();
    store.update(Hand::Right, "brightness", 30.0);
    store.update(Hand::Right, "hue", 10.0);
    store.reset(Hand::Right);
    assert_eq!(store.get(Hand::Right, "brightness"), Some(100.0));
    assert_eq!(store.get(Hand::Right, "hue"), Some(0.0));
    assert!(store.off_default(Hand::Right).is_empty());
}

#[test]
fn off_default_lists_only_moved_parameters() {
    let mut store = ParamStore::new();
    store.update(Hand::Right, "blur", 50.0);
    let off = store.off_default(Hand::Right);
    assert_eq!(off, vec![("blur", 5.0)]);
}
