//! One control session: parameter state, mode bank, overlay positioner and
//! live video declarations, with its reset lifecycle tied to program loads.
//!
//! This is the single owner of what the original control surface kept as
//! module-level mutable state.

use smallvec::SmallVec;

use crate::detect::DetectionFrame;
use crate::hand::Hand;
use crate::livecode::{ModeDefinition, Program, VideoDeclaration};
use crate::overlay::{style_for, LostDetectionPolicy, OverlayPositioner, RenderSink};
use crate::params::ParamStore;
use crate::resolve::ResolveTracker;
use crate::router::{self, CycleDirection, ModeBank};

/// A media load the frontend still has to resolve to a playable URL.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingLoad {
    pub hand: Hand,
    /// The declared source reference, not yet playable.
    pub source: String,
    pub generation: u64,
    pub start: f32,
    pub end: Option<f32>,
}

/// Outcome of one resolution round trip.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaOutcome {
    Loaded,
    /// Service reported failure; user-visible, no retry.
    Failed { message: String },
    /// A newer request superseded this one; nothing was applied.
    Stale,
}

pub struct Session {
    pub store: ParamStore,
    pub bank: ModeBank,
    pub positioner: OverlayPositioner,
    videos: [Option<VideoDeclaration>; 2],
    tracker: ResolveTracker,
}

impl Session {
    pub fn new(policy: LostDetectionPolicy) -> Self {
        Self {
            store: ParamStore::new(),
            bank: ModeBank::default(),
            positioner: OverlayPositioner::new(policy),
            videos: [None, None],
            tracker: ResolveTracker::default(),
        }
    }

    #[inline]
    pub fn video(&self, hand: Hand) -> Option<&VideoDeclaration> {
        self.videos[hand.index()].as_ref()
    }

    /// Replace the whole configuration with a freshly parsed program: the
    /// mode bank is swapped wholesale, and each declared video supersedes the
    /// hand's previous one (parameter reset, timestamp range, new resolve
    /// generation). A hand the program does not mention keeps playing.
    pub fn load_program(&mut self, program: &Program) -> Vec<PendingLoad> {
        self.bank.replace(program.modes.to_vec());
        let mut pending = Vec::new();
        for hand in Hand::ALL {
            let Some(decl) = program.video_for(hand) else {
                continue;
            };
            let generation = self.tracker.begin(hand);
            self.store.set_timestamp_range(hand, decl.start, decl.end);
            self.store.reset(hand);
            self.positioner.media_removed(hand);
            self.videos[hand.index()] = Some(decl.clone());
            pending.push(PendingLoad {
                hand,
                source: decl.url.clone(),
                generation,
                start: decl.start,
                end: decl.end,
            });
        }
        pending
    }

    /// Apply the result of a resolution round trip. Stale generations are
    /// discarded; a failure affects only this hand.
    pub fn media_resolved(
        &mut self,
        hand: Hand,
        generation: u64,
        result: Result<String, String>,
        sink: &mut dyn RenderSink,
    ) -> MediaOutcome {
        if !self.tracker.is_current(hand, generation) {
            log::debug!(
                "[resolve] dropping stale generation {} for {} hand",
                generation,
                hand.as_str()
            );
            return MediaOutcome::Stale;
        }
        match result {
            Err(message) => {
                log::warn!("[resolve] {} hand failed: {}", hand.as_str(), message);
                MediaOutcome::Failed { message }
            }
            Ok(url) => {
                let Some(decl) = self.video(hand) else {
                    return MediaOutcome::Stale;
                };
                let (start, end) = (decl.start, decl.end);
                if !sink.load_media(hand, &url, start, end) {
                    log::warn!("[resolve] load command dropped for {} hand", hand.as_str());
                }
                self.positioner.media_created(hand, sink);
                sink.set_style(hand, &style_for(&self.store, hand));
                MediaOutcome::Loaded
            }
        }
    }

    /// Route a pointer movement and re-emit styles for the touched hands.
    pub fn movement(
        &mut self,
        delta_x: f32,
        delta_y: f32,
        sink: &mut dyn RenderSink,
    ) -> SmallVec<[Hand; 2]> {
        let touched = router::apply_movement(&self.bank, &mut self.store, delta_x, delta_y);
        for &hand in &touched {
            sink.set_style(hand, &style_for(&self.store, hand));
        }
        touched
    }

    pub fn cycle_mode(&mut self, direction: CycleDirection) -> Option<&ModeDefinition> {
        self.bank.cycle(direction)
    }

    /// Feed one detection frame through the positioner.
    pub fn detection(&mut self, frame: &DetectionFrame, sink: &mut dyn RenderSink) {
        self.positioner.apply_frame(frame, sink);
    }
}
