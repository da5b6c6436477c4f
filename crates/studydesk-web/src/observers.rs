#![forbid(unsafe_code)]

//! Viewport observers feeding [`UiEvent::Intersected`].

use js_sys::Array;
use studydesk_core::{Observed, UiEvent};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Node,
};

use crate::dom::Page;

struct Watch {
    threshold: f64,
    root_margin: Option<&'static str>,
    /// Stop observing an element after its first intersection.
    once: bool,
    observed: fn(usize) -> Observed,
}

const REVEAL: Watch = Watch {
    threshold: 0.1,
    root_margin: Some("0px 0px -50px 0px"),
    once: false,
    observed: Observed::Reveal,
};

const COUNTERS: Watch = Watch {
    threshold: 0.5,
    root_margin: None,
    once: true,
    observed: Observed::Counter,
};

const LAZY_IMAGES: Watch = Watch {
    threshold: 0.0,
    root_margin: None,
    once: true,
    observed: Observed::LazyImage,
};

/// Observe reveal elements, counters and lazy images. Failures are logged and
/// the affected group is left static.
pub(crate) fn install(page: &Page) {
    for (name, watch, elements) in [
        ("reveal", REVEAL, page.reveal()),
        ("counters", COUNTERS, page.counters()),
        ("lazy images", LAZY_IMAGES, page.lazy_images()),
    ] {
        if elements.is_empty() {
            continue;
        }
        match observe(watch, elements.to_vec()) {
            Ok(()) => tracing::debug!(group = name, count = elements.len(), "observer installed"),
            Err(err) => tracing::warn!(group = name, error = ?err, "observer unavailable"),
        }
    }
}

fn observe(watch: Watch, elements: Vec<HtmlElement>) -> Result<(), JsValue> {
    let Watch {
        threshold,
        root_margin,
        once,
        observed,
    } = watch;
    let watched = elements.clone();
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                let node: &Node = target.as_ref();
                let Some(idx) = watched.iter().position(|el| el.is_same_node(Some(node))) else {
                    continue;
                };
                if once {
                    observer.unobserve(&target);
                }
                crate::wasm::dispatch(UiEvent::Intersected(observed(idx)));
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    if let Some(margin) = root_margin {
        init.set_root_margin(margin);
    }
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    for el in &elements {
        observer.observe(el);
    }
    Ok(())
}
