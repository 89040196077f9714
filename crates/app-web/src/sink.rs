//! DOM rendering sink: absolutely positioned `<video>` overlays on the stage.
//!
//! The stage element is a fixed-aspect viewport onto the camera plane, so
//! world coordinates convert to CSS left/top as a fraction of the stage size.
//! Position and scale live on separate CSS properties so the two command
//! channels never clobber each other.

use app_core::constants::{BASE_OVERLAY_SCALE, PLANE_HEIGHT, PLANE_WIDTH};
use app_core::hand::Hand;
use app_core::overlay::{RenderSink, StyleParams};
use glam::Vec3;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct DomSink {
    document: web::Document,
    stage: web::HtmlElement,
    videos: [Option<web::HtmlVideoElement>; 2],
    scales: [f32; 2],
}

impl DomSink {
    pub fn new(document: web::Document) -> anyhow::Result<Self> {
        let stage = document
            .get_element_by_id("stage")
            .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
            .ok_or_else(|| anyhow::anyhow!("missing #stage"))?;
        Ok(Self {
            document,
            stage,
            videos: [None, None],
            scales: [BASE_OVERLAY_SCALE; 2],
        })
    }

    fn video(&self, hand: Hand) -> Option<&web::HtmlVideoElement> {
        self.videos[hand.index()].as_ref()
    }

    /// CSS pixels per world unit at the current stage size.
    fn px_per_world(&self) -> f32 {
        self.stage.client_width() as f32 / PLANE_WIDTH
    }

    fn apply_transform(&self, hand: Hand) {
        if let Some(el) = self.video(hand) {
            let css_scale = self.scales[hand.index()] * self.px_per_world();
            let _ = el.style().set_property(
                "transform",
                &format!("translate(-50%, -50%) scale({css_scale})"),
            );
        }
    }
}

impl RenderSink for DomSink {
    fn set_position(&mut self, hand: Hand, position: Vec3) -> bool {
        let Some(el) = self.video(hand) else {
            return false;
        };
        let width = self.stage.client_width() as f32;
        let height = self.stage.client_height() as f32;
        let x = (position.x / PLANE_WIDTH + 0.5) * width;
        let y = (0.5 - position.y / PLANE_HEIGHT) * height;
        let css = el.style();
        let _ = css.set_property("left", &format!("{x}px"));
        let _ = css.set_property("top", &format!("{y}px"));
        true
    }

    fn set_visible(&mut self, hand: Hand, visible: bool) -> bool {
        let Some(el) = self.video(hand) else {
            return false;
        };
        let css = el.style();
        if visible {
            let _ = css.remove_property("display");
        } else {
            let _ = css.set_property("display", "none");
        }
        true
    }

    fn set_style(&mut self, hand: Hand, style: &StyleParams) -> bool {
        let Some(el) = self.video(hand) else {
            return false;
        };
        let css = el.style();
        let _ = css.set_property("filter", &style.filter);
        let _ = css.set_property("opacity", &style.opacity.to_string());
        el.set_volume(style.volume as f64);
        el.set_playback_rate(style.playback_rate as f64);
        self.scales[hand.index()] = style.scale;
        self.apply_transform(hand);
        true
    }

    fn load_media(&mut self, hand: Hand, url: &str, start: f32, end: Option<f32>) -> bool {
        // A new declaration supersedes the hand's previous overlay object.
        if let Some(old) = self.videos[hand.index()].take() {
            old.remove();
        }
        let Ok(el) = self.document.create_element("video") else {
            return false;
        };
        let Ok(el) = el.dyn_into::<web::HtmlVideoElement>() else {
            return false;
        };
        el.set_id(&format!("overlay-{}", hand.as_str()));
        el.set_class_name("overlay-video");
        el.set_src(url);
        el.set_autoplay(true);
        el.set_loop(end.is_none());
        el.set_current_time(start as f64);
        if let Some(end) = end {
            // Wrap playback back to the clip start when the end is reached.
            let media = el.clone();
            let (start, end) = (start as f64, end as f64);
            let closure = Closure::wrap(Box::new(move || {
                if media.current_time() >= end {
                    media.set_current_time(start);
                }
            }) as Box<dyn FnMut()>);
            let _ =
                el.add_event_listener_with_callback("timeupdate", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        if self.stage.append_child(&el).is_err() {
            return false;
        }
        self.scales[hand.index()] = BASE_OVERLAY_SCALE;
        self.videos[hand.index()] = Some(el);
        self.apply_transform(hand);
        true
    }

    fn set_clip_region(&mut self, hand: Hand, clip_path: &str) -> bool {
        let Some(el) = self.video(hand) else {
            return false;
        };
        let css = el.style();
        let _ = css.set_property("clip-path", clip_path);
        let _ = css.set_property("-webkit-clip-path", clip_path);
        true
    }
}
