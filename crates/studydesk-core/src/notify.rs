#![forbid(unsafe_code)]

//! Transient on-screen notifications.
//!
//! A notification is mounted off-screen, slides in after the enter delay,
//! slides out once the hold time has elapsed (measured from mount), and is
//! removed after the exit transition. Concurrent notifications stack with
//! independent timers; there is no queue and no cap.

use core::time::Duration;
use std::collections::BTreeMap;

use crate::markup::escape_html;
use crate::ui::{Effect, Target, Timer};

const OFFSCREEN: &str = "translateX(400px)";
const ONSCREEN: &str = "translateX(0)";

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Success,
    #[default]
    Info,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
        }
    }

    /// Font Awesome icon name.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Info => "info-circle",
        }
    }

    #[must_use]
    pub const fn background(self) -> &'static str {
        match self {
            Self::Success => "#10b981",
            Self::Info => "#6366f1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Mounted,
    Shown,
    Leaving,
}

#[derive(Debug, Clone, Copy)]
pub struct NotificationTimings {
    pub enter: Duration,
    pub hold: Duration,
    pub exit: Duration,
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self {
            enter: Duration::from_millis(100),
            hold: Duration::from_millis(3000),
            exit: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    next_id: u64,
    live: BTreeMap<NotificationId, Phase>,
    timings: NotificationTimings,
}

impl NotificationCenter {
    #[must_use]
    pub fn new(timings: NotificationTimings) -> Self {
        Self {
            next_id: 0,
            live: BTreeMap::new(),
            timings,
        }
    }

    /// Number of notifications currently mounted.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn phase(&self, id: NotificationId) -> Option<Phase> {
        self.live.get(&id).copied()
    }

    pub fn show(
        &mut self,
        message: &str,
        severity: Severity,
        out: &mut Vec<Effect>,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, Phase::Mounted);

        out.push(Effect::MountNotification {
            id,
            severity,
            html: render_html(message, severity),
            style: render_style(severity),
        });
        out.push(Effect::timer(Timer::NotificationEnter(id), self.timings.enter));
        out.push(Effect::timer(Timer::NotificationExit(id), self.timings.hold));
        tracing::debug!(id = id.0, severity = severity.as_str(), "notification shown");
        id
    }

    /// Advance a notification in response to one of its timers.
    pub fn on_timer(&mut self, timer: Timer, out: &mut Vec<Effect>) {
        match timer {
            Timer::NotificationEnter(id) => {
                if let Some(phase @ Phase::Mounted) = self.live.get_mut(&id) {
                    *phase = Phase::Shown;
                    out.push(Effect::style(Target::Notification(id), "transform", ONSCREEN));
                }
            }
            Timer::NotificationExit(id) => {
                if let Some(phase) = self.live.get_mut(&id) {
                    *phase = Phase::Leaving;
                    out.push(Effect::style(Target::Notification(id), "transform", OFFSCREEN));
                    out.push(Effect::timer(Timer::NotificationRemove(id), self.timings.exit));
                }
            }
            Timer::NotificationRemove(id) => {
                if self.live.remove(&id).is_some() {
                    out.push(Effect::RemoveNotification(id));
                }
            }
            Timer::EnginePreload | Timer::CounterFrame(_) => {}
        }
    }
}

#[must_use]
pub fn render_html(message: &str, severity: Severity) -> String {
    format!(
        "<div class=\"notification-content\"><i class=\"fas fa-{}\"></i><span>{}</span></div>",
        severity.icon(),
        escape_html(message)
    )
}

#[must_use]
pub fn render_style(severity: Severity) -> String {
    format!(
        "position: fixed; top: 20px; right: 20px; background: {}; color: white; \
         padding: 1rem 1.5rem; border-radius: 10px; box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2); \
         z-index: 3000; transform: {OFFSCREEN}; transition: transform 0.3s ease;",
        severity.background()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lifecycle_runs_mount_enter_exit_remove() {
        let mut center = NotificationCenter::default();
        let mut out = Vec::new();
        let id = center.show("Download started", Severity::Success, &mut out);

        assert!(matches!(out[0], Effect::MountNotification { severity: Severity::Success, .. }));
        assert_eq!(
            &out[1..],
            &[
                Effect::timer(Timer::NotificationEnter(id), Duration::from_millis(100)),
                Effect::timer(Timer::NotificationExit(id), Duration::from_millis(3000)),
            ]
        );
        assert_eq!(center.phase(id), Some(Phase::Mounted));

        out.clear();
        center.on_timer(Timer::NotificationEnter(id), &mut out);
        assert_eq!(center.phase(id), Some(Phase::Shown));
        assert_eq!(
            out,
            vec![Effect::style(Target::Notification(id), "transform", "translateX(0)")]
        );

        out.clear();
        center.on_timer(Timer::NotificationExit(id), &mut out);
        assert_eq!(center.phase(id), Some(Phase::Leaving));
        assert_eq!(
            out[1],
            Effect::timer(Timer::NotificationRemove(id), Duration::from_millis(300))
        );

        out.clear();
        center.on_timer(Timer::NotificationRemove(id), &mut out);
        assert_eq!(out, vec![Effect::RemoveNotification(id)]);
        assert_eq!(center.live_count(), 0);
    }

    #[test]
    fn concurrent_notifications_stack_independently() {
        let mut center = NotificationCenter::default();
        let mut out = Vec::new();
        let a = center.show("one", Severity::Info, &mut out);
        let b = center.show("two", Severity::Info, &mut out);
        assert_ne!(a, b);
        assert_eq!(center.live_count(), 2);

        center.on_timer(Timer::NotificationExit(a), &mut out);
        center.on_timer(Timer::NotificationRemove(a), &mut out);
        assert_eq!(center.live_count(), 1);
        assert_eq!(center.phase(b), Some(Phase::Mounted));
    }

    #[test]
    fn late_enter_after_exit_does_not_slide_back_in() {
        let mut center = NotificationCenter::default();
        let mut out = Vec::new();
        let id = center.show("x", Severity::Info, &mut out);
        center.on_timer(Timer::NotificationExit(id), &mut out);
        out.clear();
        center.on_timer(Timer::NotificationEnter(id), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn message_is_escaped() {
        let html = render_html("<b>hi</b>", Severity::Info);
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(html.contains("fa-info-circle"));
    }

    #[test]
    fn style_starts_offscreen() {
        let style = render_style(Severity::Success);
        assert!(style.contains("#10b981"));
        assert!(style.contains("translateX(400px)"));
    }
}
