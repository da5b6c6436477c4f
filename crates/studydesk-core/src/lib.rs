#![forbid(unsafe_code)]

//! Host-agnostic page model for the StudyDesk site.
//!
//! Every interactive feature of the page is a small state machine that
//! consumes [`UiEvent`]s and emits [`Effect`]s. The embedding host (the
//! `studydesk-web` shell in a browser, or a test) is responsible for:
//! - translating DOM events into [`UiEvent`]s,
//! - applying [`Effect`]s to the document,
//! - driving timers and the external Python engine, and reporting their
//!   completion back through [`Site`].
//!
//! Nothing here touches a real DOM, a clock, or a thread, so the whole page
//! can be exercised deterministically from native tests.

pub mod bindings;
pub mod catalog;
pub mod config;
pub mod counter;
pub mod error;
pub mod execution;
pub mod forms;
pub mod layout;
pub mod markup;
pub mod modal;
pub mod nav;
pub mod notify;
pub mod output;
pub mod parallax;
pub mod search;
pub mod site;
pub mod tabs;
pub mod testing;
pub mod theme;
pub mod ui;

pub use catalog::{ContentCatalog, Download, Preview, PreviewBody};
pub use config::SiteConfig;
pub use error::SiteError;
pub use execution::{EngineStatus, ExecutionPanel};
pub use layout::PageLayout;
pub use site::Site;
pub use ui::{Control, Effect, Observed, Target, Timer, UiEvent};
