#![forbid(unsafe_code)]

//! Entry point and the single-threaded page context.
//!
//! The [`Site`] and the element registry live in thread-locals. No borrow of
//! either is held while effects are applied: applying an effect can call into
//! the page synchronously (a transient download anchor's click bubbles to the
//! window listener), which must be able to dispatch again.

use std::cell::RefCell;
use std::rc::Rc;

use studydesk_core::bindings::{active_bindings, selectors as sel};
use studydesk_core::theme::STORAGE_KEY;
use studydesk_core::{ContentCatalog, Effect, Site, UiEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::Window;

use crate::dom::Page;
use crate::engine::{self, Engine};
use crate::{listeners, logging, observers, settings, timers};

thread_local! {
    static SITE: RefCell<Option<Site<Engine>>> = const { RefCell::new(None) };
    static PAGE: RefCell<Option<Rc<Page>>> = const { RefCell::new(None) };
}

/// Module start: boot now, or once the document has been parsed.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || {
            if let Err(err) = boot(window) {
                web_sys::console::error_2(&JsValue::from_str("studydesk: boot failed"), &err);
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        Ok(())
    } else {
        boot(window)
    }
}

fn boot(window: Window) -> Result<(), JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let raw_config = document
        .query_selector(sel::CONFIG_BLOCK)?
        .and_then(|block| block.text_content());
    let (config, config_error) = settings::resolve_config(raw_config.as_deref());
    logging::init(&config.log_level);
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "ignoring page config, using defaults");
    }

    let page = Rc::new(Page::collect(window.clone(), document.clone())?);
    let layout = page.layout(storage_get(&window, STORAGE_KEY));
    let bindings = active_bindings(&layout);
    let site = Site::new(config, ContentCatalog::builtin(), layout)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    SITE.with(|cell| *cell.borrow_mut() = Some(site));
    PAGE.with(|cell| *cell.borrow_mut() = Some(Rc::clone(&page)));

    listeners::install(&page, &bindings);
    observers::install(&page);
    tracing::debug!(bindings = bindings.len(), "listeners installed");

    settle(Site::bootstrap);
    if document.ready_state() == "complete" {
        dispatch(UiEvent::WindowLoaded);
    }
    Ok(())
}

fn with_site<R>(f: impl FnOnce(&mut Site<Engine>) -> R) -> Option<R> {
    SITE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut site) => site.as_mut().map(f),
        Err(_) => {
            tracing::error!("page context busy, event dropped");
            None
        }
    })
}

/// Feed one event to the page model and apply its effects.
///
/// Returns whether the DOM event's default action must be cancelled.
pub(crate) fn dispatch(event: UiEvent) -> bool {
    let effects = with_site(|site| site.dispatch(event)).unwrap_or_default();
    apply(effects)
}

/// Report asynchronous completion to the page model and apply the result.
pub(crate) fn settle(f: impl FnOnce(&mut Site<Engine>) -> Vec<Effect>) {
    let effects = with_site(f).unwrap_or_default();
    apply(effects);
}

pub(crate) fn current_engine() -> Option<Engine> {
    with_site(|site| site.engine().cloned()).flatten()
}

fn apply(effects: Vec<Effect>) -> bool {
    let Some(page) = PAGE.with(|cell| cell.borrow().clone()) else {
        return false;
    };
    let mut cancel_default = false;
    for effect in effects {
        match effect {
            Effect::StartTimer { timer, after } => timers::schedule(timer, after),
            Effect::LoadEngine {
                generation,
                index_url,
            } => engine::spawn_load(generation, index_url),
            Effect::Execute { run_id, source } => engine::spawn_run(run_id, source),
            Effect::StoreItem { key, value } => storage_set(page.window(), key, &value),
            Effect::RegisterServiceWorker { path } => register_worker(page.window(), path),
            Effect::RejectSubmit => cancel_default = true,
            other => {
                if let Err(err) = page.patch(other) {
                    tracing::warn!(error = ?err, "DOM update failed");
                }
            }
        }
    }
    cancel_default
}

fn storage_get(window: &Window, key: &str) -> Option<String> {
    window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(key).ok().flatten())
}

fn storage_set(window: &Window, key: &str, value: &str) {
    let Some(storage) = window.local_storage().ok().flatten() else {
        tracing::debug!(key, "no local storage");
        return;
    };
    if let Err(err) = storage.set_item(key, value) {
        tracing::warn!(key, error = ?err, "storage write failed");
    }
}

fn register_worker(window: &Window, path: String) {
    let navigator = window.navigator();
    let supported =
        js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false);
    if !supported {
        tracing::debug!("service workers unsupported");
        return;
    }
    let pending = navigator.service_worker().register(&path);
    spawn_local(async move {
        match JsFuture::from(pending).await {
            Ok(_) => tracing::info!(path = %path, "service worker registered"),
            Err(err) => tracing::warn!(
                path = %path,
                error = %engine::describe(&err),
                "service worker registration failed"
            ),
        }
    });
}
