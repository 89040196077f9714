//! Media URL resolution round trips to the local resolver service.
//!
//! Requests run as async fetches so the UI never blocks; the session's
//! generation counter discards responses that a newer load superseded.

use std::rc::Rc;

use anyhow::anyhow;
use app_core::display;
use app_core::resolve::{ResolveRequest, ResolveResponse};
use app_core::session::{MediaOutcome, PendingLoad};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::{dom, editor, App};

pub const RESOLVE_URL: &str = "http://127.0.0.1:5000/get-video-url";

async fn resolve(source_url: &str) -> anyhow::Result<ResolveResponse> {
    let body = serde_json::to_string(&ResolveRequest { url: source_url })?;
    let init = web::RequestInit::new();
    init.set_method("POST");
    init.set_mode(web::RequestMode::Cors);
    init.set_body(&JsValue::from_str(&body));
    let headers = web::Headers::new().map_err(|e| anyhow!("{e:?}"))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| anyhow!("{e:?}"))?;
    init.set_headers(headers.as_ref());

    let request =
        web::Request::new_with_str_and_init(RESOLVE_URL, &init).map_err(|e| anyhow!("{e:?}"))?;
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| anyhow!("fetch failed: {e:?}"))?;
    let response: web::Response = response.dyn_into().map_err(|e| anyhow!("{e:?}"))?;
    let text = JsFuture::from(response.text().map_err(|e| anyhow!("{e:?}"))?)
        .await
        .map_err(|e| anyhow!("{e:?}"))?;
    let text = text.as_string().ok_or_else(|| anyhow!("non-text response"))?;
    Ok(serde_json::from_str(&text)?)
}

/// Kick off one load's resolution and apply the outcome when it lands.
pub fn spawn_load(app: Rc<App>, load: PendingLoad) {
    dom::set_status(&app.document, &display::loading_status(load.hand));
    spawn_local(async move {
        let result = match resolve(&load.source).await {
            Ok(response) if response.success => match response.url {
                Some(url) => Ok(url),
                None => Err("resolver returned no url".to_string()),
            },
            Ok(response) => Err(response
                .error
                .unwrap_or_else(|| "unknown resolver error".to_string())),
            Err(e) => Err(e.to_string()),
        };
        let outcome = app.session.borrow_mut().media_resolved(
            load.hand,
            load.generation,
            result,
            &mut *app.sink.borrow_mut(),
        );
        match outcome {
            MediaOutcome::Loaded => {
                dom::set_status(&app.document, &display::loaded_status(load.hand));
                // A region drawn while the video was still loading applies now.
                editor::emit_clip_path(&app, load.hand);
                editor::update_readout(&app, load.hand);
            }
            MediaOutcome::Failed { message } => {
                dom::set_status(&app.document, &display::error_status(&message));
            }
            MediaOutcome::Stale => {
                log::info!("[resolve] stale response for {} hand ignored", load.hand.as_str());
            }
        }
    });
}
