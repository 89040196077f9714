#![cfg(target_arch = "wasm32")]

mod dom;
mod editor;
mod events;
mod resolver;
mod sink;
mod stream;

use std::cell::RefCell;
use std::rc::Rc;

use app_core::display;
use app_core::livecode;
use app_core::overlay::LostDetectionPolicy;
use app_core::session::Session;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::editor::PanelHandle;
use crate::sink::DomSink;

/// Shared state every event closure hangs on to.
pub struct App {
    pub document: web::Document,
    pub code_editor: web::HtmlTextAreaElement,
    pub session: RefCell<Session>,
    pub sink: RefCell<DomSink>,
    pub panels: RefCell<[Option<PanelHandle>; 2]>,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("app-web starting");
    if let Err(e) = init() {
        log::error!("init error: {e:?}");
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let code_editor = document
        .get_element_by_id("code-editor")
        .and_then(|el| el.dyn_into::<web::HtmlTextAreaElement>().ok())
        .ok_or_else(|| anyhow::anyhow!("missing #code-editor"))?;
    let sink = DomSink::new(document.clone())?;

    let app = Rc::new(App {
        document,
        code_editor,
        session: RefCell::new(Session::new(LostDetectionPolicy::StickyPosition)),
        sink: RefCell::new(sink),
        panels: RefCell::new([None, None]),
    });

    events::wire_run_shortcut(app.clone());
    events::wire_pointer_deltas(app.clone());
    events::wire_mode_cycling(app.clone());
    stream::connect(app.clone());

    // Run whatever is already in the editor on startup.
    run_program(&app);
    Ok(())
}

/// Parse the editor text and swap the session over to the new program.
pub fn run_program(app: &Rc<App>) {
    let source = app.code_editor.value();
    let program = livecode::parse(&source);
    for skipped in &program.skipped {
        log::warn!(
            "[livecode] skipped statement at {}:{}: {}",
            skipped.line,
            skipped.column,
            skipped.error
        );
    }
    let pending = app.session.borrow_mut().load_program(&program);
    editor::rebuild_panels(app, &program);
    events::update_mode_display(app);
    dom::set_status(&app.document, &display::program_status(&program));
    for load in pending {
        resolver::spawn_load(app.clone(), load);
    }
}
