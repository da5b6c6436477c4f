#![forbid(unsafe_code)]

//! In-memory page mirror for exercising a [`crate::Site`] without a browser.
//!
//! [`PageMirror::apply`] folds effects into plain maps; engine, timer, and
//! navigation requests are recorded so tests can complete them by hand.

use core::time::Duration;
use std::collections::{BTreeSet, HashMap};

use crate::notify::NotificationId;
use crate::output::LogStream;
use crate::ui::{Effect, Target, Timer};

#[derive(Debug, Default, Clone)]
pub struct PageMirror {
    classes: HashMap<Target, BTreeSet<&'static str>>,
    text: HashMap<Target, String>,
    html: HashMap<Target, String>,
    styles: HashMap<(Target, &'static str), String>,
    disabled: HashMap<Target, bool>,
    pub log: Vec<(LogStream, String)>,
    pub timers: Vec<(Timer, Duration)>,
    pub engine_loads: Vec<(u64, String)>,
    pub executions: Vec<(u64, String)>,
    pub downloads: Vec<String>,
    pub scrolls: Vec<f64>,
    pub notifications: BTreeSet<NotificationId>,
    pub stored: HashMap<&'static str, String>,
    pub workers: Vec<String>,
    pub images_loaded: Vec<usize>,
    pub rejected_submits: usize,
}

impl PageMirror {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            self.apply_one(effect);
        }
    }

    fn apply_one(&mut self, effect: Effect) {
        match effect {
            Effect::SetClass { target, class, on } => {
                let set = self.classes.entry(target).or_default();
                if on {
                    set.insert(class);
                } else {
                    set.remove(class);
                }
            }
            Effect::SetText { target, text } => {
                self.html.remove(&target);
                self.text.insert(target, text);
            }
            Effect::SetHtml { target, html } => {
                self.text.remove(&target);
                self.html.insert(target, html);
            }
            Effect::SetStyle {
                target,
                property,
                value,
            } => {
                self.styles.insert((target, property), value);
            }
            Effect::SetDisabled { target, disabled } => {
                self.disabled.insert(target, disabled);
            }
            Effect::AppendLog { stream, text } => self.log.push((stream, text)),
            Effect::ClearLog => self.log.clear(),
            Effect::ScrollTo { top } => self.scrolls.push(top),
            Effect::OpenDownload { href } => self.downloads.push(href),
            Effect::MountNotification { id, .. } => {
                self.notifications.insert(id);
            }
            Effect::RemoveNotification(id) => {
                self.notifications.remove(&id);
            }
            Effect::LoadImage(idx) => self.images_loaded.push(idx),
            Effect::StartTimer { timer, after } => self.timers.push((timer, after)),
            Effect::LoadEngine {
                generation,
                index_url,
            } => self.engine_loads.push((generation, index_url)),
            Effect::Execute { run_id, source } => self.executions.push((run_id, source)),
            Effect::StoreItem { key, value } => {
                self.stored.insert(key, value);
            }
            Effect::RegisterServiceWorker { path } => self.workers.push(path),
            Effect::RejectSubmit => self.rejected_submits += 1,
        }
    }

    #[must_use]
    pub fn has_class(&self, target: Target, class: &str) -> bool {
        self.classes
            .get(&target)
            .is_some_and(|set| set.contains(class))
    }

    /// Targets currently carrying `class`.
    #[must_use]
    pub fn with_class(&self, class: &str) -> Vec<Target> {
        self.classes
            .iter()
            .filter(|(_, set)| set.contains(class))
            .map(|(target, _)| *target)
            .collect()
    }

    #[must_use]
    pub fn text(&self, target: Target) -> Option<&str> {
        self.text.get(&target).map(String::as_str)
    }

    #[must_use]
    pub fn html(&self, target: Target) -> Option<&str> {
        self.html.get(&target).map(String::as_str)
    }

    #[must_use]
    pub fn style(&self, target: Target, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|((t, p), _)| *t == target && *p == property)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn is_disabled(&self, target: Target) -> bool {
        self.disabled.get(&target).copied().unwrap_or(false)
    }

    /// Remove and return pending timers, oldest first.
    pub fn take_timers(&mut self) -> Vec<(Timer, Duration)> {
        std::mem::take(&mut self.timers)
    }

    pub fn take_engine_loads(&mut self) -> Vec<(u64, String)> {
        std::mem::take(&mut self.engine_loads)
    }

    pub fn take_executions(&mut self) -> Vec<(u64, String)> {
        std::mem::take(&mut self.executions)
    }

    /// Log lines of one stream, in order.
    #[must_use]
    pub fn log_lines(&self, stream: LogStream) -> Vec<&str> {
        self.log
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, text)| text.as_str())
            .collect()
    }
}
