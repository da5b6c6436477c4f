#![forbid(unsafe_code)]

//! Navigation: mobile menu, scroll-spy link highlighting, navbar style, and
//! anchor smooth scrolling.

use crate::ui::{Effect, Target};

const ACTIVE: &str = "active";

const NAVBAR_SOLID_BACKGROUND: &str = "rgba(255, 255, 255, 0.98)";
const NAVBAR_SOLID_SHADOW: &str = "0 2px 20px rgba(0, 0, 0, 0.15)";
const NAVBAR_CLEAR_BACKGROUND: &str = "rgba(255, 255, 255, 0.95)";
const NAVBAR_CLEAR_SHADOW: &str = "0 2px 20px rgba(0, 0, 0, 0.1)";

/// Measured position of a `section` at scroll time. A section without an id
/// matches no nav link.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOffset {
    pub id: Option<String>,
    pub top: f64,
}

impl SectionOffset {
    pub fn new(id: impl Into<String>, top: f64) -> Self {
        Self {
            id: Some(id.into()),
            top,
        }
    }

    #[must_use]
    pub fn anonymous(top: f64) -> Self {
        Self { id: None, top }
    }
}

/// The section considered current at `scroll_y`.
///
/// Sections are scanned in document order and the last one whose top edge
/// (minus `offset`) has been scrolled past wins. `None` when that section has
/// no id.
#[must_use]
pub fn current_section(scroll_y: f64, sections: &[SectionOffset], offset: f64) -> Option<&str> {
    sections
        .iter()
        .rev()
        .find(|section| scroll_y >= section.top - offset)
        .and_then(|section| section.id.as_deref())
}

#[derive(Debug, Clone)]
pub struct NavController {
    link_hrefs: Vec<String>,
    menu_open: bool,
    active_link: Option<usize>,
    navbar_solid: Option<bool>,
    spy_offset: f64,
    solid_threshold: f64,
    anchor_offset: f64,
}

impl NavController {
    #[must_use]
    pub fn new(
        link_hrefs: Vec<String>,
        spy_offset: f64,
        solid_threshold: f64,
        anchor_offset: f64,
    ) -> Self {
        Self {
            link_hrefs,
            menu_open: false,
            active_link: None,
            navbar_solid: None,
            spy_offset,
            solid_threshold,
            anchor_offset,
        }
    }

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    #[must_use]
    pub fn active_link(&self) -> Option<usize> {
        self.active_link
    }

    pub fn toggle_menu(&mut self, out: &mut Vec<Effect>) {
        self.menu_open = !self.menu_open;
        out.push(Effect::class(Target::Hamburger, ACTIVE, self.menu_open));
        out.push(Effect::class(Target::NavMenu, ACTIVE, self.menu_open));
    }

    /// A nav link was followed: collapse the menu unconditionally.
    pub fn link_clicked(&mut self, out: &mut Vec<Effect>) {
        self.menu_open = false;
        out.push(Effect::class(Target::Hamburger, ACTIVE, false));
        out.push(Effect::class(Target::NavMenu, ACTIVE, false));
    }

    pub fn on_scroll(&mut self, scroll_y: f64, sections: &[SectionOffset], out: &mut Vec<Effect>) {
        let solid = scroll_y > self.solid_threshold;
        if self.navbar_solid != Some(solid) {
            self.navbar_solid = Some(solid);
            let (background, shadow) = if solid {
                (NAVBAR_SOLID_BACKGROUND, NAVBAR_SOLID_SHADOW)
            } else {
                (NAVBAR_CLEAR_BACKGROUND, NAVBAR_CLEAR_SHADOW)
            };
            out.push(Effect::style(Target::Navbar, "background", background));
            out.push(Effect::style(Target::Navbar, "box-shadow", shadow));
        }

        let current = current_section(scroll_y, sections, self.spy_offset);
        let href = current.map(|id| format!("#{id}"));
        self.active_link = href
            .as_deref()
            .and_then(|href| self.link_hrefs.iter().position(|link| link == href));

        for idx in 0..self.link_hrefs.len() {
            out.push(Effect::class(
                Target::NavLink(idx),
                ACTIVE,
                self.active_link == Some(idx),
            ));
        }
    }

    /// Scroll request for an in-page anchor whose target sits at `target_top`.
    pub fn smooth_scroll(&self, target_top: Option<f64>, out: &mut Vec<Effect>) {
        match target_top {
            Some(top) => out.push(Effect::ScrollTo {
                top: top - self.anchor_offset,
            }),
            None => tracing::debug!("anchor target missing, nothing to scroll to"),
        }
    }
}
