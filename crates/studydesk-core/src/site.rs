#![forbid(unsafe_code)]

//! The page context: owns every controller and routes events between them.
//!
//! One [`Site`] is created per page load after the registration pass and
//! lives for the whole session. The host calls [`Site::bootstrap`] once, then
//! [`Site::dispatch`] for every translated DOM event, and the `engine_*` /
//! [`Site::run_finished`] methods as asynchronous engine work settles.

use crate::catalog::ContentCatalog;
use crate::config::SiteConfig;
use crate::counter::CounterAnimation;
use crate::error::SiteError;
use crate::execution::{EngineStatus, ExecutionPanel};
use crate::forms::validate_required;
use crate::layout::{ContentAction, PageLayout};
use crate::markup::escape_html;
use crate::modal::ModalController;
use crate::nav::{NavController, SectionOffset};
use crate::notify::{NotificationCenter, NotificationTimings, Severity};
use crate::output::LogStream;
use crate::parallax::Parallax;
use crate::tabs::TabController;
use crate::theme::ThemeToggle;
use crate::ui::{Control, Effect, Observed, Target, Timer, UiEvent};

pub const DOWNLOAD_STARTED: &str = "Download started";
const DOWNLOAD_BUSY_LABEL: &str = "<span class=\"loading\"></span> Downloading...";
const REVEALED_CLASS: &str = "aos-animate";

#[derive(Debug, Clone)]
enum CounterSlot {
    Idle,
    Running(CounterAnimation),
    Done,
}

/// Page-wide context object.
#[derive(Debug)]
pub struct Site<E> {
    config: SiteConfig,
    catalog: ContentCatalog,
    layout: PageLayout,
    nav: NavController,
    tabs: TabController,
    modal: ModalController,
    panel: Option<ExecutionPanel<E>>,
    notifications: NotificationCenter,
    parallax: Parallax,
    counters: Vec<CounterSlot>,
    images_loaded: Vec<bool>,
    theme: ThemeToggle,
    bootstrapped: bool,
}

impl<E> Site<E> {
    /// Build the context. Catalog overrides from `config` are applied on top
    /// of `catalog`.
    pub fn new(
        config: SiteConfig,
        mut catalog: ContentCatalog,
        layout: PageLayout,
    ) -> Result<Self, SiteError> {
        layout.validate()?;
        catalog.apply_overrides(&config.catalog);

        let nav = NavController::new(
            layout.nav_links.clone(),
            config.scroll_spy_offset,
            config.navbar_solid_threshold,
            config.anchor_offset,
        );
        let tabs = TabController::new(
            layout.tab_triggers.clone(),
            layout.tab_panels.clone(),
            layout.initial_tab_trigger,
            layout.initial_tab_panel,
        );
        let panel = layout
            .has_execution_panel
            .then(|| ExecutionPanel::new(config.engine_index_url.clone()));
        let notifications = NotificationCenter::new(NotificationTimings {
            enter: config.notification_enter(),
            hold: config.notification_hold(),
            exit: config.notification_exit(),
        });
        let parallax = Parallax {
            base: config.parallax_base,
            step: config.parallax_step,
        };

        Ok(Self {
            counters: vec![CounterSlot::Idle; layout.counters.len()],
            images_loaded: vec![false; layout.lazy_images],
            nav,
            tabs,
            modal: ModalController::new(),
            panel,
            notifications,
            parallax,
            theme: ThemeToggle::default(),
            bootstrapped: false,
            config,
            catalog,
            layout,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    #[must_use]
    pub fn nav(&self) -> &NavController {
        &self.nav
    }

    #[must_use]
    pub fn tabs(&self) -> &TabController {
        &self.tabs
    }

    #[must_use]
    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeToggle {
        &self.theme
    }

    /// `None` when the page lacks the execution panel.
    #[must_use]
    pub fn panel(&self) -> Option<&ExecutionPanel<E>> {
        self.panel.as_ref()
    }

    #[must_use]
    pub fn engine_status(&self) -> Option<EngineStatus> {
        self.panel.as_ref().map(ExecutionPanel::status)
    }

    #[must_use]
    pub fn engine(&self) -> Option<&E> {
        self.panel.as_ref().and_then(ExecutionPanel::engine)
    }

    /// Run every feature initializer. Only the first call has any effect.
    pub fn bootstrap(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.bootstrapped {
            tracing::warn!("bootstrap called twice, ignoring");
            return out;
        }
        self.bootstrapped = true;

        if self.layout.has_theme_toggle {
            let saved = self.layout.saved_theme.clone();
            self.theme.restore(saved.as_deref(), &mut out);
        }
        if self.panel.is_some() {
            out.push(Effect::timer(
                Timer::EnginePreload,
                self.config.engine_preload_delay(),
            ));
        }
        tracing::info!(
            nav_links = self.layout.nav_links.len(),
            tabs = self.layout.tab_triggers.len(),
            content_buttons = self.layout.content_buttons.len(),
            execution_panel = self.panel.is_some(),
            "page bootstrapped"
        );
        out
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Vec<Effect> {
        let mut out = Vec::new();
        match event {
            UiEvent::Click(control) => self.click(control, &mut out),
            UiEvent::RunRequested { source } => match self.panel.as_mut() {
                Some(panel) => {
                    panel.request_run(source, &mut out);
                }
                None => tracing::warn!("run requested without an execution panel"),
            },
            UiEvent::WindowClick { on_backdrop } => self.modal.window_click(on_backdrop, &mut out),
            UiEvent::KeyDown { key } => self.modal.key_down(&key, &mut out),
            UiEvent::Scroll { scroll_y, sections } => self.scroll(scroll_y, &sections, &mut out),
            UiEvent::AnchorClick { target_top } => self.nav.smooth_scroll(target_top, &mut out),
            UiEvent::SearchInput { query } => self.search(&query, &mut out),
            UiEvent::FormSubmit { form, values } => {
                validate_required(form, &values, &mut out);
            }
            UiEvent::Intersected(observed) => self.intersected(observed, &mut out),
            UiEvent::TimerFired(timer) => self.timer_fired(timer, &mut out),
            UiEvent::WindowLoaded => out.push(Effect::RegisterServiceWorker {
                path: self.config.service_worker_path.clone(),
            }),
        }
        out
    }

    /// The engine loader for `generation` resolved.
    pub fn engine_loaded(&mut self, generation: u64, engine: E) -> Vec<Effect> {
        self.with_panel(|panel, out| panel.engine_loaded(generation, engine, out))
    }

    /// The engine loader for `generation` rejected.
    pub fn engine_failed(&mut self, generation: u64, error: &str) -> Vec<Effect> {
        self.with_panel(|panel, out| panel.engine_failed(generation, error, out))
    }

    /// The host has no engine loader.
    pub fn loader_missing(&mut self, generation: u64) -> Vec<Effect> {
        self.with_panel(|panel, out| panel.loader_missing(generation, out))
    }

    pub fn run_finished(&mut self, run_id: u64, result: Result<(), String>) -> Vec<Effect> {
        self.with_panel(|panel, out| panel.run_finished(run_id, result, out))
    }

    /// Text written by the engine to one of its streams.
    pub fn engine_output(&mut self, stream: LogStream, chunk: &str) -> Vec<Effect> {
        self.with_panel(|panel, out| panel.output(stream, chunk, out))
    }

    fn with_panel(&mut self, f: impl FnOnce(&mut ExecutionPanel<E>, &mut Vec<Effect>)) -> Vec<Effect> {
        let mut out = Vec::new();
        match self.panel.as_mut() {
            Some(panel) => f(panel, &mut out),
            None => tracing::warn!("engine callback without an execution panel"),
        }
        out
    }

    fn click(&mut self, control: Control, out: &mut Vec<Effect>) {
        match control {
            Control::Hamburger => self.nav.toggle_menu(out),
            Control::NavLink(_) => self.nav.link_clicked(out),
            Control::TabButton(idx) => {
                self.tabs.select(idx, out);
            }
            Control::ModalClose => self.modal.close(out),
            Control::ContentButton(idx) => self.open_content(idx, out),
            Control::ResetButton => {
                if let Some(panel) = self.panel.as_mut() {
                    panel.reset(out);
                }
            }
            Control::ClearButton => {
                if let Some(panel) = self.panel.as_ref() {
                    panel.clear(out);
                }
            }
            Control::ThemeToggle => self.theme.toggle(out),
        }
    }

    fn open_content(&mut self, idx: usize, out: &mut Vec<Effect>) {
        let Some(button) = self.layout.content_buttons.get(idx) else {
            tracing::warn!(idx, "content button out of range");
            return;
        };
        let token = button.remote_token.as_deref();
        match button.action {
            ContentAction::Preview => {
                let preview = self.catalog.resolve_preview_with(&button.subject, token);
                tracing::debug!(subject = %button.subject, "preview opened");
                self.modal.open(
                    format!("Preview - {}", preview.title),
                    preview.body.to_html(),
                    out,
                );
            }
            ContentAction::Download => {
                let download = self.catalog.resolve_download_with(&button.subject, token);
                let target = Target::ContentButton(idx);
                out.push(Effect::SetHtml {
                    target,
                    html: DOWNLOAD_BUSY_LABEL.to_string(),
                });
                out.push(Effect::SetDisabled {
                    target,
                    disabled: true,
                });
                out.push(Effect::OpenDownload {
                    href: download.href.clone(),
                });
                out.push(Effect::SetText {
                    target,
                    text: button.label.clone(),
                });
                out.push(Effect::SetDisabled {
                    target,
                    disabled: false,
                });
                tracing::debug!(subject = %button.subject, href = %download.href, "download dispatched");

                self.notifications
                    .show(DOWNLOAD_STARTED, Severity::Success, out);
                self.modal.open(
                    format!("Download - {}", download.title),
                    download_fallback_html(&download.title, &download.href),
                    out,
                );
            }
        }
    }

    fn scroll(&mut self, scroll_y: f64, sections: &[SectionOffset], out: &mut Vec<Effect>) {
        self.nav.on_scroll(scroll_y, sections, out);
        self.parallax.on_scroll(
            scroll_y,
            self.layout.has_hero,
            self.layout.floating_cards,
            out,
        );
    }

    fn search(&self, query: &str, out: &mut Vec<Effect>) {
        for (idx, card) in self.layout.cards.iter().enumerate() {
            let display = if card.matches(query) { "block" } else { "none" };
            out.push(Effect::style(Target::Card(idx), "display", display));
        }
    }

    fn intersected(&mut self, observed: Observed, out: &mut Vec<Effect>) {
        match observed {
            Observed::Reveal(idx) => out.push(Effect::class(Target::Reveal(idx), REVEALED_CLASS, true)),
            Observed::Counter(idx) => self.start_counter(idx, out),
            Observed::LazyImage(idx) => match self.images_loaded.get_mut(idx) {
                Some(loaded @ false) => {
                    *loaded = true;
                    out.push(Effect::LoadImage(idx));
                }
                Some(true) => {}
                None => tracing::warn!(idx, "lazy image out of range"),
            },
        }
    }

    fn start_counter(&mut self, idx: usize, out: &mut Vec<Effect>) {
        let Some(slot) = self.counters.get_mut(idx) else {
            tracing::warn!(idx, "counter out of range");
            return;
        };
        if !matches!(slot, CounterSlot::Idle) {
            return;
        }
        let text = &self.layout.counters[idx];
        match CounterAnimation::new(
            text,
            core::time::Duration::from_millis(self.config.counter_duration_ms),
            self.config.counter_frame(),
        ) {
            Some(animation) => {
                *slot = CounterSlot::Running(animation);
                out.push(Effect::timer(Timer::CounterFrame(idx), self.config.counter_frame()));
            }
            None => {
                tracing::debug!(idx, text = %text, "counter has no digits");
                *slot = CounterSlot::Done;
            }
        }
    }

    fn timer_fired(&mut self, timer: Timer, out: &mut Vec<Effect>) {
        match timer {
            Timer::EnginePreload => {
                if let Some(panel) = self.panel.as_mut() {
                    panel.preload(out);
                }
            }
            Timer::CounterFrame(idx) => {
                let frame_delay = self.config.counter_frame();
                let Some(slot) = self.counters.get_mut(idx) else {
                    return;
                };
                let CounterSlot::Running(animation) = &mut *slot else {
                    return;
                };
                let frame = animation.step();
                out.push(Effect::SetText {
                    target: Target::Counter(idx),
                    text: frame.text,
                });
                if frame.done {
                    *slot = CounterSlot::Done;
                } else {
                    out.push(Effect::timer(Timer::CounterFrame(idx), frame_delay));
                }
            }
            Timer::NotificationEnter(_) | Timer::NotificationExit(_) | Timer::NotificationRemove(_) => {
                self.notifications.on_timer(timer, out);
            }
        }
    }
}

fn download_fallback_html(title: &str, href: &str) -> String {
    format!(
        "<div class=\"download-fallback\"><p>Your download of <strong>{}</strong> has started.</p>\
         <p><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Open the file directly</a></p></div>",
        escape_html(title),
        escape_html(href)
    )
}
