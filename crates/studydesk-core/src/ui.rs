#![forbid(unsafe_code)]

//! Abstract UI surface: the events a host feeds in and the effects it applies.
//!
//! Elements are addressed by [`Target`], not by DOM node. Indexed targets
//! refer to the n-th element matched by the corresponding selector during the
//! registration pass (see [`crate::layout::PageLayout`]).

use core::time::Duration;

use crate::nav::SectionOffset;
use crate::notify::{NotificationId, Severity};
use crate::output::LogStream;

/// An element the page model can mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Body,
    Navbar,
    Hamburger,
    NavMenu,
    NavLink(usize),
    TabButton(usize),
    TabPanel(usize),
    Modal,
    ModalTitle,
    ModalContent,
    ContentButton(usize),
    Card(usize),
    Hero,
    FloatingCard(usize),
    Reveal(usize),
    Counter(usize),
    LazyImage(usize),
    FormField { form: usize, field: usize },
    RunButton,
    PyStatus,
    PyOutput,
    Notification(NotificationId),
}

/// A clickable control whose click carries no extra payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Hamburger,
    NavLink(usize),
    TabButton(usize),
    ModalClose,
    ContentButton(usize),
    ResetButton,
    ClearButton,
    ThemeToggle,
}

/// Elements watched for viewport intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Observed {
    Reveal(usize),
    Counter(usize),
    LazyImage(usize),
}

/// Host timers requested through [`Effect::StartTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    EnginePreload,
    NotificationEnter(NotificationId),
    NotificationExit(NotificationId),
    NotificationRemove(NotificationId),
    CounterFrame(usize),
}

/// Input to [`crate::Site::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Click(Control),
    /// The run control was clicked; `source` is the editor's current text.
    RunRequested { source: String },
    /// Any click on the window; `on_backdrop` is true only when the event
    /// target is the modal overlay itself.
    WindowClick { on_backdrop: bool },
    KeyDown { key: String },
    /// Scroll position plus the measured top offset of every `section`.
    Scroll {
        scroll_y: f64,
        sections: Vec<SectionOffset>,
    },
    /// In-page anchor click; `target_top` is `None` when the anchor points at
    /// nothing in the document.
    AnchorClick { target_top: Option<f64> },
    SearchInput { query: String },
    FormSubmit { form: usize, values: Vec<String> },
    Intersected(Observed),
    TimerFired(Timer),
    WindowLoaded,
}

/// A mutation or request for the host to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SetClass {
        target: Target,
        class: &'static str,
        on: bool,
    },
    SetText {
        target: Target,
        text: String,
    },
    SetHtml {
        target: Target,
        html: String,
    },
    SetStyle {
        target: Target,
        property: &'static str,
        value: String,
    },
    SetDisabled {
        target: Target,
        disabled: bool,
    },
    AppendLog {
        stream: LogStream,
        text: String,
    },
    ClearLog,
    /// Smooth-scroll the window to an absolute offset.
    ScrollTo {
        top: f64,
    },
    /// Fire-and-forget navigation through a transient anchor.
    OpenDownload {
        href: String,
    },
    MountNotification {
        id: NotificationId,
        severity: Severity,
        html: String,
        style: String,
    },
    RemoveNotification(NotificationId),
    /// Swap `data-src` into `src` on a lazy image.
    LoadImage(usize),
    StartTimer {
        timer: Timer,
        after: Duration,
    },
    /// Invoke the engine loader; report back with the same `generation`.
    LoadEngine {
        generation: u64,
        index_url: String,
    },
    /// Submit source to the ready engine; report back with `run_id`.
    Execute {
        run_id: u64,
        source: String,
    },
    StoreItem {
        key: &'static str,
        value: String,
    },
    RegisterServiceWorker {
        path: String,
    },
    /// Cancel the default action of the form submit being dispatched.
    RejectSubmit,
}

impl Effect {
    pub(crate) fn class(target: Target, class: &'static str, on: bool) -> Self {
        Self::SetClass { target, class, on }
    }

    pub(crate) fn style(target: Target, property: &'static str, value: impl Into<String>) -> Self {
        Self::SetStyle {
            target,
            property,
            value: value.into(),
        }
    }

    pub(crate) fn timer(timer: Timer, after: Duration) -> Self {
        Self::StartTimer { timer, after }
    }
}
