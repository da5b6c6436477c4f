#![forbid(unsafe_code)]

//! Pyodide engine handle.
//!
//! The loader and the engine are reached through `Reflect` on the global
//! object rather than static imports, so a page without the Pyodide script
//! still boots and reports the missing loader as a status.

use core::fmt;

use js_sys::{Function, Object, Promise, Reflect};
use studydesk_core::output::LogStream;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_time::Instant;

use crate::pyio::{IO_MODULE, redirect_script};

/// A loaded interpreter instance.
#[derive(Clone)]
pub(crate) struct Engine {
    handle: JsValue,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub(crate) enum LoadError {
    /// No `loadPyodide` on the global object.
    Missing,
    /// The loader or stream setup threw or rejected.
    Rejected(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "loadPyodide is not defined"),
            Self::Rejected(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Render a thrown JS value the way `String(e)` would.
pub(crate) fn describe(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.to_string());
    }
    format!("{err:?}")
}

fn method(target: &JsValue, name: &str) -> Result<Function, String> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(|err| describe(&err))?
        .dyn_into::<Function>()
        .map_err(|_| format!("{name} is not a function"))
}

async fn settle_promise(value: JsValue) -> Result<JsValue, String> {
    let promise = value
        .dyn_into::<Promise>()
        .map_err(|_| "expected a promise".to_string())?;
    JsFuture::from(promise).await.map_err(|err| describe(&err))
}

impl Engine {
    /// Invoke the global loader with `index_url` and wire the standard streams.
    pub(crate) async fn load(index_url: &str) -> Result<Self, LoadError> {
        let global = js_sys::global();
        let loader = Reflect::get(&global, &JsValue::from_str("loadPyodide"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or(LoadError::Missing)?;

        let options = Object::new();
        Reflect::set(
            &options,
            &JsValue::from_str("indexURL"),
            &JsValue::from_str(index_url),
        )
        .map_err(|err| LoadError::Rejected(describe(&err)))?;

        let pending = loader
            .call1(&JsValue::NULL, &options)
            .map_err(|err| LoadError::Rejected(describe(&err)))?;
        let handle = settle_promise(pending).await.map_err(LoadError::Rejected)?;

        let engine = Self { handle };
        engine.install_streams().map_err(LoadError::Rejected)?;
        Ok(engine)
    }

    /// Register the stream callbacks and point `sys.stdout`/`sys.stderr` at them.
    fn install_streams(&self) -> Result<(), String> {
        let module = Object::new();
        for (name, stream) in [("stdout", LogStream::Stdout), ("stderr", LogStream::Stderr)] {
            let sink = Closure::<dyn FnMut(String)>::new(move |chunk: String| {
                crate::wasm::settle(|site| site.engine_output(stream, &chunk));
            });
            Reflect::set(&module, &JsValue::from_str(name), &sink.into_js_value())
                .map_err(|err| describe(&err))?;
        }

        method(&self.handle, "registerJsModule")?
            .call2(&self.handle, &JsValue::from_str(IO_MODULE), &module)
            .map_err(|err| describe(&err))?;
        method(&self.handle, "runPython")?
            .call1(&self.handle, &JsValue::from_str(&redirect_script()))
            .map_err(|err| describe(&err))?;
        Ok(())
    }

    /// Execute `source` to completion.
    pub(crate) async fn run(&self, source: &str) -> Result<(), String> {
        let pending = method(&self.handle, "runPythonAsync")?
            .call1(&self.handle, &JsValue::from_str(source))
            .map_err(|err| describe(&err))?;
        settle_promise(pending).await.map(|_| ())
    }
}

/// Start a load and report its outcome for `generation`.
pub(crate) fn spawn_load(generation: u64, index_url: String) {
    spawn_local(async move {
        let started = Instant::now();
        match Engine::load(&index_url).await {
            Ok(engine) => {
                tracing::info!(
                    generation,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "pyodide loaded"
                );
                crate::wasm::settle(move |site| site.engine_loaded(generation, engine));
            }
            Err(LoadError::Missing) => {
                crate::wasm::settle(|site| site.loader_missing(generation));
            }
            Err(LoadError::Rejected(msg)) => {
                crate::wasm::settle(|site| site.engine_failed(generation, &msg));
            }
        }
    });
}

/// Submit `source` to the current engine and report completion for `run_id`.
pub(crate) fn spawn_run(run_id: u64, source: String) {
    let Some(engine) = crate::wasm::current_engine() else {
        crate::wasm::settle(|site| site.run_finished(run_id, Err("engine not ready".into())));
        return;
    };
    spawn_local(async move {
        let result = engine.run(&source).await;
        crate::wasm::settle(move |site| site.run_finished(run_id, result));
    });
}
