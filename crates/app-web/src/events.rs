//! Global input wiring: pointer deltas, mode cycling, and the run shortcut.

use std::cell::Cell;
use std::rc::Rc;

use app_core::display;
use app_core::hand::Hand;
use app_core::router::CycleDirection;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::{dom, editor, App};

/// Pointer input over the clip canvases or the code editor belongs to them,
/// not to the delta router.
fn is_guarded_target(ev: &web::MouseEvent) -> bool {
    let Some(target) = ev.target() else {
        return false;
    };
    let Ok(el) = target.dyn_into::<web::Element>() else {
        return false;
    };
    el.tag_name() == "CANVAS" || el.id() == "code-editor"
}

/// Track raw movement over the document and route the deltas.
pub fn wire_pointer_deltas(app: Rc<App>) {
    let last: Rc<Cell<Option<(f32, f32)>>> = Rc::new(Cell::new(None));
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let position = (ev.client_x() as f32, ev.client_y() as f32);
        let previous = last.replace(Some(position));
        if is_guarded_target(&ev) {
            return;
        }
        let Some((px, py)) = previous else {
            return;
        };
        let (dx, dy) = (position.0 - px, position.1 - py);
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let touched = app
            .session
            .borrow_mut()
            .movement(dx, dy, &mut *app.sink.borrow_mut());
        for hand in touched {
            editor::update_readout(&app, hand);
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(document) = dom::window_document() {
        let _ =
            document.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Primary click cycles to the next mode, secondary to the previous one.
pub fn wire_mode_cycling(app: Rc<App>) {
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            if is_guarded_target(&ev) {
                return;
            }
            let direction = match ev.button() {
                0 => CycleDirection::Next,
                2 => CycleDirection::Prev,
                _ => return,
            };
            let switched = app.session.borrow_mut().cycle_mode(direction).cloned();
            let Some(mode) = switched else {
                return;
            };
            dom::set_status(&app.document, &display::switched_status(&mode));
            update_mode_display(&app);
            for hand in Hand::ALL {
                editor::update_readout(&app, hand);
            }
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        if let Some(document) = dom::window_document() {
            let _ = document
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    // Secondary clicks cycle, so keep the context menu away except over the
    // canvases (which handle it themselves).
    {
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            if !is_guarded_target(&ev) {
                ev.prevent_default();
            }
        }) as Box<dyn FnMut(_)>);
        if let Some(document) = dom::window_document() {
            let _ = document
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }
}

/// Ctrl/Cmd+Enter in the code editor re-runs the program.
pub fn wire_run_shortcut(app: Rc<App>) {
    let editor_el = app.code_editor.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if (ev.ctrl_key() || ev.meta_key()) && ev.key() == "Enter" {
            ev.prevent_default();
            crate::run_program(&app);
        }
    }) as Box<dyn FnMut(_)>);
    let _ = editor_el.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Render the active mode heading and its binding summary.
pub fn update_mode_display(app: &Rc<App>) {
    let session = app.session.borrow();
    match session.bank.active() {
        Some(mode) => {
            dom::set_text(&app.document, "mode-display", &display::mode_heading(mode));
            dom::set_text(
                &app.document,
                "mode-params",
                &display::binding_summary(&mode.binding),
            );
        }
        None => {
            dom::set_text(&app.document, "mode-display", display::NO_MODES);
            dom::set_text(&app.document, "mode-params", "");
        }
    }
}
