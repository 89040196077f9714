//! Per-hand control panels: label, parameter readout, and the clip-region
//! canvas with its own pointer handling.

use std::cell::RefCell;
use std::rc::Rc;

use app_core::clip::{ClipRegionEditor, EditAction, EditButton};
use app_core::constants::{EDIT_CANVAS_HEIGHT, EDIT_CANVAS_WIDTH};
use app_core::display::{self, ReadoutRow};
use app_core::hand::Hand;
use app_core::livecode::{Program, VideoDeclaration};
use app_core::overlay::RenderSink;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::{dom, App};

pub struct PanelHandle {
    pub editor: Rc<RefCell<ClipRegionEditor>>,
}

/// Tear down and rebuild the per-hand panels for a freshly loaded program.
pub fn rebuild_panels(app: &Rc<App>, program: &Program) {
    let Some(container) = app.document.get_element_by_id("video-panels") else {
        log::warn!("[panel] missing #video-panels container");
        return;
    };
    container.set_inner_html("");
    *app.panels.borrow_mut() = [None, None];
    for video in &program.videos {
        if build_panel(app, &container, video).is_none() {
            log::warn!("[panel] failed to build {} hand panel", video.hand.as_str());
        }
    }
    for hand in Hand::ALL {
        update_readout(app, hand);
    }
}

fn build_panel(app: &Rc<App>, container: &web::Element, video: &VideoDeclaration) -> Option<()> {
    let document = &app.document;
    let hand = video.hand;

    let panel = document.create_element("div").ok()?;
    panel.set_class_name("video-object");
    panel.set_id(&format!("panel-{}", hand.as_str()));

    let label = document.create_element("div").ok()?;
    label.set_class_name("video-label");
    label.set_text_content(Some(&format!("{} HAND", hand.as_str().to_uppercase())));
    panel.append_child(&label).ok()?;

    let info = document.create_element("div").ok()?;
    info.set_class_name("video-info");
    info.set_text_content(Some(&truncate_url(&video.url)));
    panel.append_child(&info).ok()?;

    let params = document.create_element("div").ok()?;
    params.set_class_name("video-params");
    params.set_id(&format!("params-{}", hand.as_str()));
    panel.append_child(&params).ok()?;

    let hint = document.create_element("div").ok()?;
    hint.set_class_name("hint");
    hint.set_id(&format!("hint-{}", hand.as_str()));
    hint.set_text_content(Some("Click canvas to add vertices for the clip region"));
    panel.append_child(&hint).ok()?;

    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<web::HtmlCanvasElement>()
        .ok()?;
    canvas.set_width(EDIT_CANVAS_WIDTH as u32);
    canvas.set_height(EDIT_CANVAS_HEIGHT as u32);
    canvas.set_id(&format!("clip-canvas-{}", hand.as_str()));
    panel.append_child(&canvas).ok()?;

    container.append_child(&panel).ok()?;

    let editor = Rc::new(RefCell::new(ClipRegionEditor::new()));
    wire_canvas(app, hand, &canvas, &editor);
    draw(&canvas, &editor.borrow(), hand);
    app.panels.borrow_mut()[hand.index()] = Some(PanelHandle { editor });
    Some(())
}

fn truncate_url(url: &str) -> String {
    if url.chars().count() > 60 {
        let mut short: String = url.chars().take(60).collect();
        short.push_str("...");
        short
    } else {
        url.to_string()
    }
}

fn canvas_point(canvas: &web::HtmlCanvasElement, ev: &web::MouseEvent) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    (
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}

fn wire_canvas(
    app: &Rc<App>,
    hand: Hand,
    canvas: &web::HtmlCanvasElement,
    editor: &Rc<RefCell<ClipRegionEditor>>,
) {
    // mousedown: add, grab or delete a vertex
    {
        let app = app.clone();
        let editor = editor.clone();
        let canvas_ev = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            let (x, y) = canvas_point(&canvas_ev, &ev);
            let button = if ev.button() == 2 {
                EditButton::Secondary
            } else {
                EditButton::Primary
            };
            let action = editor.borrow_mut().press(x, y, button);
            if action != EditAction::Ignored {
                update_hint(&app, hand, editor.borrow().vertex_count());
                draw(&canvas_ev, &editor.borrow(), hand);
                emit_clip_path(&app, hand);
            }
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // mousemove: drag the grabbed vertex
    {
        let app = app.clone();
        let editor = editor.clone();
        let canvas_ev = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            let (x, y) = canvas_point(&canvas_ev, &ev);
            if editor.borrow_mut().drag_to(x, y) {
                draw(&canvas_ev, &editor.borrow(), hand);
                emit_clip_path(&app, hand);
            }
        }) as Box<dyn FnMut(_)>);
        let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // mouseup / mouseleave: end the drag
    for event in ["mouseup", "mouseleave"] {
        let editor = editor.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::MouseEvent| {
            editor.borrow_mut().release();
        }) as Box<dyn FnMut(_)>);
        let _ = canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // keep the browser menu off the canvas so secondary-delete works
    {
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        let _ =
            canvas.add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn update_hint(app: &Rc<App>, hand: Hand, count: usize) {
    dom::set_text(
        &app.document,
        &format!("hint-{}", hand.as_str()),
        &format!("{count} vertices"),
    );
}

/// Push the hand's clip region to the sink, if the region is closed.
pub fn emit_clip_path(app: &Rc<App>, hand: Hand) {
    let descriptor = {
        let panels = app.panels.borrow();
        let Some(panel) = panels[hand.index()].as_ref() else {
            return;
        };
        match panel.editor.borrow().clip_path() {
            Ok(descriptor) => descriptor,
            Err(_) => return, // not enough vertices yet
        }
    };
    if !app.sink.borrow_mut().set_clip_region(hand, &descriptor) {
        log::debug!("[clip] clip command dropped for {} hand", hand.as_str());
    }
}

/// Re-render one hand's parameter readout rows.
pub fn update_readout(app: &Rc<App>, hand: Hand) {
    let html = {
        let session = app.session.borrow();
        readout_html(&display::readout_rows(
            &session.store,
            hand,
            session.bank.active(),
        ))
    };
    if let Some(el) = app
        .document
        .get_element_by_id(&format!("params-{}", hand.as_str()))
    {
        el.set_inner_html(&html);
    }
}

fn readout_html(rows: &[ReadoutRow]) -> String {
    if rows.is_empty() {
        return r#"<div class="param-line dimmed">No active parameters</div>"#.to_string();
    }
    rows.iter()
        .map(|row| {
            let class = if row.active {
                "param-line"
            } else {
                "param-line dimmed"
            };
            format!(
                r#"<div class="{class}"><span class="param-name">{}:</span> <span class="param-value">{}</span></div>"#,
                row.name, row.value
            )
        })
        .collect()
}

// ---------------- Canvas drawing ----------------

const GRID_STEP: f64 = 40.0;

fn context(canvas: &web::HtmlCanvasElement) -> Option<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .ok()
}

fn hand_color(hand: Hand) -> &'static str {
    match hand {
        Hand::Right => "#ffa500",
        Hand::Left => "#00c8ff",
    }
}

fn hand_fill(hand: Hand) -> &'static str {
    match hand {
        Hand::Right => "rgba(255, 165, 0, 0.12)",
        Hand::Left => "rgba(0, 200, 255, 0.12)",
    }
}

pub fn draw(canvas: &web::HtmlCanvasElement, editor: &ClipRegionEditor, hand: Hand) {
    let Some(ctx) = context(canvas) else {
        return;
    };
    let (w, h) = (EDIT_CANVAS_WIDTH as f64, EDIT_CANVAS_HEIGHT as f64);

    ctx.set_fill_style_str("#000");
    ctx.fill_rect(0.0, 0.0, w, h);

    // grid
    ctx.set_stroke_style_str("#141414");
    ctx.set_line_width(1.0);
    ctx.begin_path();
    let mut x = GRID_STEP;
    while x < w {
        ctx.move_to(x, 0.0);
        ctx.line_to(x, h);
        x += GRID_STEP;
    }
    let mut y = GRID_STEP;
    while y < h {
        ctx.move_to(0.0, y);
        ctx.line_to(w, y);
        y += GRID_STEP;
    }
    ctx.stroke();

    let vertices = editor.vertices();
    let color = hand_color(hand);

    if vertices.len() >= 2 {
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.move_to(vertices[0].x as f64, vertices[0].y as f64);
        for v in &vertices[1..] {
            ctx.line_to(v.x as f64, v.y as f64);
        }
        if vertices.len() >= 3 {
            ctx.close_path();
        }
        ctx.stroke();
    }

    if vertices.len() >= 3 {
        ctx.set_fill_style_str(hand_fill(hand));
        ctx.begin_path();
        ctx.move_to(vertices[0].x as f64, vertices[0].y as f64);
        for v in &vertices[1..] {
            ctx.line_to(v.x as f64, v.y as f64);
        }
        ctx.close_path();
        ctx.fill();
    }

    // vertices with their indices
    for (i, v) in vertices.iter().enumerate() {
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        let _ = ctx.arc(v.x as f64, v.y as f64, 7.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
        ctx.set_fill_style_str("#000");
        ctx.set_text_align("center");
        ctx.set_font("10px monospace");
        let _ = ctx.fill_text(&i.to_string(), v.x as f64, v.y as f64 + 3.0);
    }
}
