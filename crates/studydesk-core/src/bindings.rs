#![forbid(unsafe_code)]

//! Declarative control → handler bindings.
//!
//! The host installs every binding returned by [`active_bindings`] in a
//! single registration pass. For [`Source::Each`] the listener is attached to
//! every element matching the selector and the element's position among the
//! matches is the index handed to [`Action::click_event`]. [`Source::First`]
//! wires only the first match, with index 0.

use crate::layout::PageLayout;
use crate::ui::{Control, UiEvent};

/// Selectors forming the document contract.
pub mod selectors {
    pub const HAMBURGER: &str = ".hamburger";
    pub const NAV_MENU: &str = ".nav-menu";
    pub const NAV_LINK: &str = ".nav-link";
    pub const NAVBAR: &str = ".navbar";
    pub const SECTION: &str = "section";
    pub const TAB_BUTTON: &str = ".tab-btn";
    pub const TAB_PANEL: &str = ".tab-content";
    pub const MODAL: &str = "#previewModal";
    pub const MODAL_CLOSE: &str = ".close";
    pub const MODAL_TITLE: &str = "#modalTitle";
    pub const MODAL_CONTENT: &str = "#modalContent";
    pub const CONTENT_BUTTON: &str = ".preview-btn, .download-btn";
    pub const DOWNLOAD_BUTTON_CLASS: &str = "download-btn";
    pub const CARD: &str = ".note-card, .question-card";
    pub const HERO: &str = ".hero";
    pub const FLOATING_CARD: &str = ".floating-card";
    pub const REVEAL: &str = "[data-aos]";
    pub const COUNTER: &str = ".stat-number";
    pub const LAZY_IMAGE: &str = "img[data-src]";
    pub const ANCHOR: &str = "a[href^=\"#\"]";
    pub const SEARCH_INPUT: &str = ".search-input";
    pub const THEME_TOGGLE: &str = ".theme-toggle";
    pub const VALIDATED_FORM: &str = "form[data-validate]";
    pub const REQUIRED_FIELD: &str = "input[required], textarea[required]";
    pub const PY_EDITOR: &str = "#pythonEditor";
    pub const PY_OUTPUT: &str = "#pythonOutput";
    pub const PY_RUN: &str = "#runPython";
    pub const PY_RESET: &str = "#resetPython";
    pub const PY_CLEAR: &str = "#clearOutput";
    pub const PY_STATUS: &str = "#pyStatus";
    pub const CONFIG_BLOCK: &str = "#studydesk-config";
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Each(&'static str),
    First(&'static str),
    Window,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
    Click,
    Scroll,
    KeyDown,
    Input,
    Submit,
    Load,
    Error,
}

impl DomEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Scroll => "scroll",
            Self::KeyDown => "keydown",
            Self::Input => "input",
            Self::Submit => "submit",
            Self::Load => "load",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ToggleMenu,
    CloseMenu,
    SpyScroll,
    SelectTab,
    CloseModal,
    BackdropClick,
    EscapeKey,
    OpenContent,
    SmoothScroll,
    RunCode,
    ResetEngine,
    ClearOutput,
    Search,
    ToggleTheme,
    ValidateForm,
    RegisterWorker,
    /// Log uncaught page errors; never reaches the page model.
    ReportError,
}

impl Action {
    /// The event for actions whose click carries nothing but the element
    /// index. Payload-carrying actions return `None` and are translated by
    /// the host.
    #[must_use]
    pub fn click_event(self, index: usize) -> Option<UiEvent> {
        let control = match self {
            Self::ToggleMenu => Control::Hamburger,
            Self::CloseMenu => Control::NavLink(index),
            Self::SelectTab => Control::TabButton(index),
            Self::CloseModal => Control::ModalClose,
            Self::OpenContent => Control::ContentButton(index),
            Self::ResetEngine => Control::ResetButton,
            Self::ClearOutput => Control::ClearButton,
            Self::ToggleTheme => Control::ThemeToggle,
            _ => return None,
        };
        Some(UiEvent::Click(control))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub source: Source,
    pub event: DomEvent,
    pub action: Action,
}

const fn bind(source: Source, event: DomEvent, action: Action) -> Binding {
    Binding {
        source,
        event,
        action,
    }
}

use self::selectors as sel;

/// Every binding the page knows, in registration order.
pub const BINDINGS: &[Binding] = &[
    bind(Source::First(sel::HAMBURGER), DomEvent::Click, Action::ToggleMenu),
    bind(Source::Each(sel::NAV_LINK), DomEvent::Click, Action::CloseMenu),
    bind(Source::Window, DomEvent::Scroll, Action::SpyScroll),
    bind(Source::Each(sel::TAB_BUTTON), DomEvent::Click, Action::SelectTab),
    bind(Source::First(sel::MODAL_CLOSE), DomEvent::Click, Action::CloseModal),
    bind(Source::Window, DomEvent::Click, Action::BackdropClick),
    bind(Source::Document, DomEvent::KeyDown, Action::EscapeKey),
    bind(Source::Each(sel::CONTENT_BUTTON), DomEvent::Click, Action::OpenContent),
    bind(Source::Each(sel::ANCHOR), DomEvent::Click, Action::SmoothScroll),
    bind(Source::First(sel::PY_RUN), DomEvent::Click, Action::RunCode),
    bind(Source::First(sel::PY_RESET), DomEvent::Click, Action::ResetEngine),
    bind(Source::First(sel::PY_CLEAR), DomEvent::Click, Action::ClearOutput),
    bind(Source::First(sel::SEARCH_INPUT), DomEvent::Input, Action::Search),
    bind(Source::First(sel::THEME_TOGGLE), DomEvent::Click, Action::ToggleTheme),
    bind(Source::Each(sel::VALIDATED_FORM), DomEvent::Submit, Action::ValidateForm),
    bind(Source::Window, DomEvent::Load, Action::RegisterWorker),
    bind(Source::Window, DomEvent::Error, Action::ReportError),
];

/// Bindings for the features present in `layout`.
///
/// The execution panel is all-or-nothing; its clear control is optional on
/// its own. Search and theme controls are only wired when they exist.
#[must_use]
pub fn active_bindings(layout: &PageLayout) -> Vec<Binding> {
    BINDINGS
        .iter()
        .copied()
        .filter(|binding| match binding.action {
            Action::RunCode | Action::ResetEngine => layout.has_execution_panel,
            Action::ClearOutput => layout.has_execution_panel && layout.has_clear_button,
            Action::Search => layout.has_search,
            Action::ToggleTheme => layout.has_theme_toggle,
            Action::ValidateForm => !layout.forms.is_empty(),
            _ => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn actions(bindings: &[Binding]) -> Vec<Action> {
        bindings.iter().map(|b| b.action).collect()
    }

    #[test]
    fn every_action_is_bound_once() {
        let mut seen = std::collections::HashSet::new();
        for binding in BINDINGS {
            assert!(seen.insert(binding.action), "{:?} bound twice", binding.action);
        }
        assert_eq!(seen.len(), 17);
    }

    #[test]
    fn bare_page_skips_optional_features() {
        let active = actions(&active_bindings(&PageLayout::default()));
        assert!(!active.contains(&Action::RunCode));
        assert!(!active.contains(&Action::ResetEngine));
        assert!(!active.contains(&Action::ClearOutput));
        assert!(!active.contains(&Action::ToggleTheme));
        assert!(!active.contains(&Action::Search));
        assert!(active.contains(&Action::ToggleMenu));
        assert!(active.contains(&Action::RegisterWorker));
    }

    #[test]
    fn clear_requires_the_whole_panel() {
        let layout = PageLayout {
            has_clear_button: true,
            ..PageLayout::default()
        };
        assert!(!actions(&active_bindings(&layout)).contains(&Action::ClearOutput));

        let layout = PageLayout {
            has_clear_button: true,
            has_execution_panel: true,
            ..PageLayout::default()
        };
        assert!(actions(&active_bindings(&layout)).contains(&Action::ClearOutput));
    }

    #[test]
    fn click_events_carry_the_index() {
        assert_eq!(
            Action::SelectTab.click_event(3),
            Some(UiEvent::Click(Control::TabButton(3)))
        );
        assert_eq!(
            Action::ToggleMenu.click_event(7),
            Some(UiEvent::Click(Control::Hamburger))
        );
        assert_eq!(Action::RunCode.click_event(0), None);
        assert_eq!(Action::SpyScroll.click_event(0), None);
    }

    #[test]
    fn singleton_controls_bind_the_first_match_only() {
        let source_of = |action: Action| {
            BINDINGS
                .iter()
                .find(|binding| binding.action == action)
                .map(|binding| binding.source)
        };
        assert_eq!(
            source_of(Action::CloseModal),
            Some(Source::First(selectors::MODAL_CLOSE))
        );
        assert_eq!(
            source_of(Action::ToggleMenu),
            Some(Source::First(selectors::HAMBURGER))
        );
        assert_eq!(
            source_of(Action::SelectTab),
            Some(Source::Each(selectors::TAB_BUTTON))
        );
    }

    #[test]
    fn dom_event_names() {
        assert_eq!(DomEvent::KeyDown.as_str(), "keydown");
        assert_eq!(DomEvent::Submit.as_str(), "submit");
    }
}
