#![forbid(unsafe_code)]

//! Exclusive tab selection over a fixed set of panels.

use crate::ui::{Effect, Target};

const ACTIVE: &str = "active";

/// Tab triggers and panels known at setup.
///
/// No initial state is enforced: whatever the markup marks active stays
/// active until the first selection.
#[derive(Debug, Clone)]
pub struct TabController {
    /// Panel id each trigger declares (`data-tab`).
    trigger_targets: Vec<String>,
    /// Panel ids in document order.
    panel_ids: Vec<String>,
    active_trigger: Option<usize>,
    active_panel: Option<usize>,
}

impl TabController {
    #[must_use]
    pub fn new(
        trigger_targets: Vec<String>,
        panel_ids: Vec<String>,
        initial_trigger: Option<usize>,
        initial_panel: Option<usize>,
    ) -> Self {
        Self {
            trigger_targets,
            panel_ids,
            active_trigger: initial_trigger,
            active_panel: initial_panel,
        }
    }

    #[must_use]
    pub fn active_trigger(&self) -> Option<usize> {
        self.active_trigger
    }

    #[must_use]
    pub fn active_panel(&self) -> Option<usize> {
        self.active_panel
    }

    #[must_use]
    pub fn active_panel_id(&self) -> Option<&str> {
        self.active_panel
            .and_then(|idx| self.panel_ids.get(idx))
            .map(String::as_str)
    }

    /// Activate `trigger` and the panel it declares.
    ///
    /// Returns `false` (and emits nothing) when the trigger is unknown or its
    /// target panel does not exist.
    pub fn select(&mut self, trigger: usize, out: &mut Vec<Effect>) -> bool {
        let Some(target) = self.trigger_targets.get(trigger) else {
            tracing::warn!(trigger, "tab trigger out of range");
            return false;
        };
        let Some(panel) = self.panel_ids.iter().position(|id| id == target) else {
            tracing::warn!(trigger, target = %target, "tab target panel not found");
            return false;
        };

        for idx in 0..self.trigger_targets.len() {
            out.push(Effect::class(Target::TabButton(idx), ACTIVE, false));
        }
        for idx in 0..self.panel_ids.len() {
            out.push(Effect::class(Target::TabPanel(idx), ACTIVE, false));
        }
        out.push(Effect::class(Target::TabButton(trigger), ACTIVE, true));
        out.push(Effect::class(Target::TabPanel(panel), ACTIVE, true));

        self.active_trigger = Some(trigger);
        self.active_panel = Some(panel);
        tracing::debug!(trigger, panel = %target, "tab selected");
        true
    }
}
