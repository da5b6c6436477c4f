#![forbid(unsafe_code)]

//! The shared preview overlay.

use crate::ui::{Effect, Target};

#[derive(Debug, Clone, Default)]
pub struct ModalController {
    visible: bool,
}

impl ModalController {
    /// Hidden overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Fill the overlay and show it.
    pub fn open(&mut self, title: String, body_html: String, out: &mut Vec<Effect>) {
        out.push(Effect::SetText {
            target: Target::ModalTitle,
            text: title,
        });
        out.push(Effect::SetHtml {
            target: Target::ModalContent,
            html: body_html,
        });
        out.push(Effect::style(Target::Modal, "display", "block"));
        self.visible = true;
    }

    /// Close control clicked.
    pub fn close(&mut self, out: &mut Vec<Effect>) {
        self.hide(out);
    }

    /// Window click; only a click landing on the backdrop itself closes.
    pub fn window_click(&mut self, on_backdrop: bool, out: &mut Vec<Effect>) {
        if on_backdrop {
            self.hide(out);
        }
    }

    pub fn key_down(&mut self, key: &str, out: &mut Vec<Effect>) {
        if key == "Escape" && self.visible {
            self.hide(out);
        }
    }

    fn hide(&mut self, out: &mut Vec<Effect>) {
        out.push(Effect::style(Target::Modal, "display", "none"));
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened() -> ModalController {
        let mut modal = ModalController::new();
        modal.open("t".into(), "<p>b</p>".into(), &mut Vec::new());
        modal
    }

    #[test]
    fn starts_hidden() {
        assert!(!ModalController::new().is_visible());
    }

    #[test]
    fn open_sets_title_content_and_display() {
        let mut modal = ModalController::new();
        let mut out = Vec::new();
        modal.open("Preview - X".into(), "<p>x</p>".into(), &mut out);
        assert!(modal.is_visible());
        assert_eq!(out.len(), 3);
        assert_eq!(out[2], Effect::style(Target::Modal, "display", "block"));
    }

    #[test]
    fn each_close_trigger_hides() {
        let mut modal = opened();
        modal.close(&mut Vec::new());
        assert!(!modal.is_visible());

        let mut modal = opened();
        modal.window_click(true, &mut Vec::new());
        assert!(!modal.is_visible());

        let mut modal = opened();
        modal.key_down("Escape", &mut Vec::new());
        assert!(!modal.is_visible());
    }

    #[test]
    fn clicks_inside_content_and_other_keys_are_ignored() {
        let mut modal = opened();
        let mut out = Vec::new();
        modal.window_click(false, &mut out);
        modal.key_down("Enter", &mut out);
        assert!(modal.is_visible());
        assert!(out.is_empty());
    }

    #[test]
    fn escape_while_hidden_does_nothing() {
        let mut modal = ModalController::new();
        let mut out = Vec::new();
        modal.key_down("Escape", &mut out);
        assert!(out.is_empty());
        assert!(!modal.is_visible());
    }
}
