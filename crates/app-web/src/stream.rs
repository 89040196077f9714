//! Hand-tracking event stream with single-connection reconnect.

use std::cell::Cell;
use std::rc::Rc;

use app_core::detect::{DetectionFrame, WireFrame};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::App;

pub const STREAM_URL: &str = "http://127.0.0.1:5000/hand_tracking";
const RECONNECT_DELAY_MS: i32 = 2000;

pub fn connect(app: Rc<App>) {
    open(app, Rc::new(Cell::new(false)));
}

fn open(app: Rc<App>, reconnect_pending: Rc<Cell<bool>>) {
    let source = match web::EventSource::new(STREAM_URL) {
        Ok(source) => source,
        Err(e) => {
            log::error!("[stream] connect failed: {e:?}");
            schedule_reconnect(app, reconnect_pending);
            return;
        }
    };
    log::info!("[stream] connecting to {STREAM_URL}");

    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MessageEvent| {
            let Some(text) = ev.data().as_string() else {
                return;
            };
            match serde_json::from_str::<WireFrame>(&text) {
                Ok(wire) => {
                    let frame = DetectionFrame::from_wire(&wire);
                    app.session
                        .borrow_mut()
                        .detection(&frame, &mut *app.sink.borrow_mut());
                }
                Err(e) => log::warn!("[stream] bad frame: {e}"),
            }
        }) as Box<dyn FnMut(_)>);
        source.set_onmessage(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    {
        let source_err = source.clone();
        let closure = Closure::wrap(Box::new(move || {
            source_err.close();
            log::warn!("[stream] connection lost, retrying in {RECONNECT_DELAY_MS}ms");
            schedule_reconnect(app.clone(), reconnect_pending.clone());
        }) as Box<dyn FnMut()>);
        source.set_onerror(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }
}

/// Schedule one delayed reconnect. The pending flag keeps at most one timer
/// (and so at most one connection) alive at a time.
fn schedule_reconnect(app: Rc<App>, pending: Rc<Cell<bool>>) {
    if pending.replace(true) {
        return;
    }
    let Some(window) = web::window() else {
        return;
    };
    let pending_cb = pending.clone();
    let closure = Closure::wrap(Box::new(move || {
        pending_cb.set(false);
        open(app.clone(), pending_cb.clone());
    }) as Box<dyn FnMut()>);
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            RECONNECT_DELAY_MS,
        )
        .is_err()
    {
        pending.set(false);
    }
    closure.forget();
}
