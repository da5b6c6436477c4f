#![forbid(unsafe_code)]

//! WASM shell for the StudyDesk site.
//!
//! On `wasm32` the crate boots itself through `#[wasm_bindgen(start)]`:
//! - reads the optional JSON config block and installs logging,
//! - collects the [`studydesk_core::PageLayout`] from the live document in one
//!   registration pass,
//! - installs every active binding and the viewport observers,
//! - applies the [`studydesk_core::Effect`]s returned by the page model,
//!   driving host timers and the Pyodide engine on its behalf.
//!
//! The host-independent pieces (log routing, config resolution, the engine
//! stream bridge) build on every target and are tested natively.

pub mod logging;
pub mod pyio;
pub mod settings;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod engine;
#[cfg(target_arch = "wasm32")]
mod listeners;
#[cfg(target_arch = "wasm32")]
mod observers;
#[cfg(target_arch = "wasm32")]
mod timers;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::start;
