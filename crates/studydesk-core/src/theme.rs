#![forbid(unsafe_code)]

//! Light/dark theme flag persisted in browser storage.

use crate::ui::{Effect, Target};

/// Storage key the theme is saved under.
pub const STORAGE_KEY: &str = "theme";
const DARK_CLASS: &str = "dark-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Only an exact `"dark"` selects the dark theme.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThemeToggle {
    theme: Theme,
}

impl ThemeToggle {
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Apply the stored preference at startup. Light needs no mutation.
    pub fn restore(&mut self, stored: Option<&str>, out: &mut Vec<Effect>) {
        self.theme = Theme::from_stored(stored);
        if self.theme == Theme::Dark {
            out.push(Effect::class(Target::Body, DARK_CLASS, true));
        }
    }

    pub fn toggle(&mut self, out: &mut Vec<Effect>) {
        self.theme = self.theme.toggled();
        out.push(Effect::class(
            Target::Body,
            DARK_CLASS,
            self.theme == Theme::Dark,
        ));
        out.push(Effect::StoreItem {
            key: STORAGE_KEY,
            value: self.theme.as_str().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn restore_applies_only_dark() {
        let mut toggle = ThemeToggle::default();
        let mut out = Vec::new();
        toggle.restore(Some("light"), &mut out);
        assert!(out.is_empty());

        toggle.restore(Some("dark"), &mut out);
        assert_eq!(out, vec![Effect::class(Target::Body, "dark-theme", true)]);
        assert_eq!(toggle.theme(), Theme::Dark);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let mut toggle = ThemeToggle::default();
        let mut out = Vec::new();
        toggle.toggle(&mut out);
        assert_eq!(
            out,
            vec![
                Effect::class(Target::Body, "dark-theme", true),
                Effect::StoreItem {
                    key: "theme",
                    value: "dark".into()
                },
            ]
        );
        out.clear();
        toggle.toggle(&mut out);
        assert_eq!(toggle.theme(), Theme::Light);
        assert!(out.contains(&Effect::StoreItem {
            key: "theme",
            value: "light".into()
        }));
    }

    #[test]
    fn garbage_in_storage_means_light() {
        assert_eq!(Theme::from_stored(Some("DARK")), Theme::Light);
        assert_eq!(Theme::from_stored(None), Theme::Light);
    }
}
