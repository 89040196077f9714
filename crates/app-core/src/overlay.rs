//! Overlay placement from detection events and style command derivation.

use glam::Vec3;

use crate::constants::BASE_OVERLAY_SCALE;
use crate::detect::DetectionFrame;
use crate::hand::Hand;
use crate::mapping;
use crate::params::ParamStore;

/// What happens to an overlay when its hand stops being detected.
///
/// The sticky variant freezes the overlay at the last detected position;
/// the other hides it until the hand reappears.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LostDetectionPolicy {
    #[default]
    StickyPosition,
    HideOnLoss,
}

/// Full style payload for one overlay object. The filter list is a single
/// pre-composed string because the sink applies it verbatim and its order is
/// significant.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleParams {
    pub filter: String,
    /// 0..1
    pub volume: f32,
    pub playback_rate: f32,
    pub opacity: f32,
    /// Uniform 3-axis scale, base scale already folded in.
    pub scale: f32,
}

/// Commands accepted by the rendering side. Every method reports whether the
/// command was applied; `false` means the target object does not exist (yet)
/// and the command was dropped. Never fatal.
pub trait RenderSink {
    fn set_position(&mut self, hand: Hand, position: Vec3) -> bool;
    fn set_visible(&mut self, hand: Hand, visible: bool) -> bool;
    fn set_style(&mut self, hand: Hand, style: &StyleParams) -> bool;
    fn load_media(&mut self, hand: Hand, url: &str, start: f32, end: Option<f32>) -> bool;
    fn set_clip_region(&mut self, hand: Hand, clip_path: &str) -> bool;
}

/// Derive the style command for one hand from the parameter store.
///
/// All seven filter effects are always emitted, in a fixed order, even at
/// their defaults; the output is byte-identical for an unchanged store.
pub fn style_for(store: &ParamStore, hand: Hand) -> StyleParams {
    let v = |name: &str| store.get(hand, name).unwrap_or_default();
    let filter = format!(
        "hue-rotate({}deg) saturate({}%) brightness({}%) contrast({}%) blur({}px) grayscale({}%) sepia({}%)",
        v("hue"),
        v("saturation"),
        v("brightness"),
        v("contrast"),
        v("blur"),
        v("grayscale"),
        v("sepia"),
    );
    StyleParams {
        filter,
        volume: v("volume") / 100.0,
        playback_rate: v("speed"),
        opacity: v("opacity"),
        scale: BASE_OVERLAY_SCALE * v("scale"),
    }
}

/// Turns detection frames into placement/visibility commands.
///
/// An overlay only receives commands once its media object exists; after
/// that it stays live until the declaration is superseded.
#[derive(Clone, Debug)]
pub struct OverlayPositioner {
    policy: LostDetectionPolicy,
    created: [bool; 2],
    last_position: [Option<Vec3>; 2],
}

impl OverlayPositioner {
    pub fn new(policy: LostDetectionPolicy) -> Self {
        Self {
            policy,
            created: [false; 2],
            last_position: [None; 2],
        }
    }

    #[inline]
    pub fn policy(&self) -> LostDetectionPolicy {
        self.policy
    }

    /// Mark a hand's overlay object as live (its media just loaded) and put
    /// it at the last known position, if any.
    pub fn media_created(&mut self, hand: Hand, sink: &mut dyn RenderSink) {
        self.created[hand.index()] = true;
        if !sink.set_visible(hand, true) {
            log::debug!("[overlay] visibility command dropped for {} hand", hand.as_str());
        }
        if let Some(position) = self.last_position[hand.index()] {
            sink.set_position(hand, position);
        }
    }

    /// Forget a hand's overlay (its declaration was superseded or unloaded).
    pub fn media_removed(&mut self, hand: Hand) {
        self.created[hand.index()] = false;
        self.last_position[hand.index()] = None;
    }

    /// Feed one detection frame through to the sink.
    pub fn apply_frame(&mut self, frame: &DetectionFrame, sink: &mut dyn RenderSink) {
        for hand in Hand::ALL {
            let update = frame.hand(hand);
            if update.detected {
                let position = mapping::overlay_position(update.position.x, update.position.y);
                self.last_position[hand.index()] = Some(position);
            }
            if !self.created[hand.index()] {
                continue;
            }
            match self.policy {
                LostDetectionPolicy::StickyPosition => {
                    // Position freezes at the last detection; the overlay
                    // never hides once created.
                    sink.set_visible(hand, true);
                    if update.detected {
                        if let Some(position) = self.last_position[hand.index()] {
                            sink.set_position(hand, position);
                        }
                    }
                }
                LostDetectionPolicy::HideOnLoss => {
                    sink.set_visible(hand, update.detected);
                    if update.detected {
                        if let Some(position) = self.last_position[hand.index()] {
                            sink.set_position(hand, position);
                        }
                    }
                }
            }
        }
    }
}
