#![forbid(unsafe_code)]

//! Installs the declarative bindings on the live document.
//!
//! Each DOM event is translated into a [`UiEvent`] right here, reading
//! whatever the event needs from the document at that moment (scroll
//! position, section offsets, editor text, field values).

use std::rc::Rc;

use studydesk_core::bindings::{Action, Binding, DomEvent, Source};
use studydesk_core::UiEvent;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{ErrorEvent, Event, EventTarget, HtmlElement, KeyboardEvent, Node};

use crate::dom::{self, Page};
use crate::wasm::dispatch;

/// Attach every binding. A binding that fails to attach is logged and
/// skipped; the rest of the page keeps working.
pub(crate) fn install(page: &Rc<Page>, bindings: &[Binding]) {
    for binding in bindings {
        if let Err(err) = attach(page, *binding) {
            tracing::warn!(action = ?binding.action, error = ?err, "binding not installed");
        }
    }
}

fn attach(page: &Rc<Page>, binding: Binding) -> Result<(), JsValue> {
    match binding.source {
        Source::Each(selector) => {
            let elements = dom::all(page.document(), selector)?;
            tracing::debug!(action = ?binding.action, selector, count = elements.len(), "binding");
            for (idx, el) in elements.into_iter().enumerate() {
                let handler = handler(page, binding.action, idx, Some(el.clone()));
                listen(&el, binding.event, handler)?;
            }
        }
        Source::First(selector) => match dom::one(page.document(), selector)? {
            Some(el) => {
                let handler = handler(page, binding.action, 0, Some(el.clone()));
                listen(&el, binding.event, handler)?;
            }
            None => tracing::debug!(action = ?binding.action, selector, "no element to bind"),
        },
        Source::Window => {
            let handler = handler(page, binding.action, 0, None);
            listen(page.window(), binding.event, handler)?;
        }
        Source::Document => {
            let handler = handler(page, binding.action, 0, None);
            listen(page.document(), binding.event, handler)?;
        }
    }
    Ok(())
}

fn listen(
    target: &EventTarget,
    event: DomEvent,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event.as_str(), closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn handler(
    page: &Rc<Page>,
    action: Action,
    idx: usize,
    element: Option<HtmlElement>,
) -> impl FnMut(Event) + 'static {
    let page = Rc::clone(page);
    move |event: Event| {
        if let Some(ui) = action.click_event(idx) {
            dispatch(ui);
            return;
        }
        match action {
            Action::SpyScroll => {
                let scroll_y = page.window().scroll_y().unwrap_or_default();
                dispatch(UiEvent::Scroll {
                    scroll_y,
                    sections: page.section_offsets(),
                });
            }
            Action::BackdropClick => {
                let on_backdrop = match (event.target(), page.modal()) {
                    (Some(target), Some(modal)) => {
                        let node: &Node = modal.as_ref();
                        target
                            .dyn_ref::<Node>()
                            .is_some_and(|hit| hit.is_same_node(Some(node)))
                    }
                    _ => false,
                };
                dispatch(UiEvent::WindowClick { on_backdrop });
            }
            Action::EscapeKey => {
                if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
                    dispatch(UiEvent::KeyDown { key });
                }
            }
            Action::SmoothScroll => {
                event.prevent_default();
                let target_top = element
                    .as_ref()
                    .and_then(|anchor| anchor.get_attribute("href"))
                    .and_then(|href| page.document().query_selector(&href).ok().flatten())
                    .and_then(|target| target.dyn_into::<HtmlElement>().ok())
                    .map(|target| f64::from(target.offset_top()));
                dispatch(UiEvent::AnchorClick { target_top });
            }
            Action::RunCode => {
                dispatch(UiEvent::RunRequested {
                    source: page.editor_source(),
                });
            }
            Action::Search => {
                let query = element.as_ref().map(dom::control_value).unwrap_or_default();
                dispatch(UiEvent::SearchInput { query });
            }
            Action::ValidateForm => {
                let rejected = dispatch(UiEvent::FormSubmit {
                    form: idx,
                    values: page.form_values(idx),
                });
                if rejected {
                    event.prevent_default();
                }
            }
            Action::RegisterWorker => {
                dispatch(UiEvent::WindowLoaded);
            }
            Action::ReportError => {
                let message = event
                    .dyn_ref::<ErrorEvent>()
                    .map(ErrorEvent::message)
                    .unwrap_or_default();
                tracing::error!(message = %message, "uncaught page error");
            }
            other => tracing::debug!(action = ?other, "no translation for event"),
        }
    }
}
