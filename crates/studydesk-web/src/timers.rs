#![forbid(unsafe_code)]

//! Host timers requested by the page model.

use core::time::Duration;

use studydesk_core::{Timer, UiEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

/// Fire `timer` back into the page model after `after`.
pub(crate) fn schedule(timer: Timer, after: Duration) {
    let Some(window) = web_sys::window() else {
        tracing::warn!(?timer, "no window, timer dropped");
        return;
    };
    let callback = Closure::once_into_js(move || {
        crate::wasm::dispatch(UiEvent::TimerFired(timer));
    });
    let millis = i32::try_from(after.as_millis()).unwrap_or(i32::MAX);
    if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        millis,
    ) {
        tracing::warn!(?timer, error = ?err, "setTimeout failed");
    }
}
