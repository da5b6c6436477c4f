#![forbid(unsafe_code)]

//! Scroll-linked parallax offsets.

use crate::ui::{Effect, Target};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    pub base: f64,
    pub step: f64,
}

impl Parallax {
    /// Speed factor of floating card `index`.
    #[must_use]
    pub fn card_speed(&self, index: usize) -> f64 {
        self.base + index as f64 * self.step
    }

    /// Transforms for the hero (when present) and every floating card.
    pub fn on_scroll(
        &self,
        scroll_y: f64,
        has_hero: bool,
        floating_cards: usize,
        out: &mut Vec<Effect>,
    ) {
        if has_hero {
            out.push(Effect::style(
                Target::Hero,
                "transform",
                translate_y(scroll_y * self.base),
            ));
        }
        for idx in 0..floating_cards {
            out.push(Effect::style(
                Target::FloatingCard(idx),
                "transform",
                translate_y(scroll_y * self.card_speed(idx)),
            ));
        }
    }
}

fn translate_y(px: f64) -> String {
    format!("translateY({px}px)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cards_speed_up_with_index() {
        let p = Parallax { base: 0.5, step: 0.1 };
        assert_eq!(p.card_speed(0), 0.5);
        assert!((p.card_speed(2) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn hero_and_cards_are_translated() {
        let p = Parallax { base: 0.5, step: 0.1 };
        let mut out = Vec::new();
        p.on_scroll(100.0, true, 1, &mut out);
        assert_eq!(
            out,
            vec![
                Effect::style(Target::Hero, "transform", "translateY(50px)"),
                Effect::style(Target::FloatingCard(0), "transform", "translateY(50px)"),
            ]
        );
    }

    #[test]
    fn missing_hero_is_skipped() {
        let p = Parallax { base: 0.5, step: 0.1 };
        let mut out = Vec::new();
        p.on_scroll(10.0, false, 0, &mut out);
        assert!(out.is_empty());
    }
}
