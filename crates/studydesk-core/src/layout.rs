#![forbid(unsafe_code)]

//! Static description of the document, collected once at bootstrap.
//!
//! Indices in this structure are the positions of elements among the matches
//! of the corresponding selector in [`crate::bindings::selectors`]; the same
//! indices appear in [`crate::ui::Target`] and [`crate::ui::Control`].

use serde::{Deserialize, Serialize};

use crate::error::SiteError;
use crate::search::CardText;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentAction {
    Preview,
    Download,
}

/// A `.preview-btn` or `.download-btn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentButton {
    pub action: ContentAction,
    /// `data-subject`, falling back to `data-type`.
    pub subject: String,
    /// `data-drive-id` of the enclosing card, if any.
    #[serde(default)]
    pub remote_token: Option<String>,
    /// Text label restored after the busy state.
    #[serde(default)]
    pub label: String,
}

impl ContentButton {
    pub fn preview(subject: impl Into<String>) -> Self {
        Self {
            action: ContentAction::Preview,
            subject: subject.into(),
            remote_token: None,
            label: String::new(),
        }
    }

    pub fn download(subject: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            action: ContentAction::Download,
            subject: subject.into(),
            remote_token: None,
            label: label.into(),
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.remote_token = Some(token.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// `href` of every `.nav-link`.
    pub nav_links: Vec<String>,
    /// `data-tab` of every `.tab-btn`.
    pub tab_triggers: Vec<String>,
    /// `id` of every `.tab-content`.
    pub tab_panels: Vec<String>,
    /// Trigger carrying `active` in markup.
    pub initial_tab_trigger: Option<usize>,
    /// Panel carrying `active` in markup.
    pub initial_tab_panel: Option<usize>,
    pub content_buttons: Vec<ContentButton>,
    /// Searchable `.note-card` / `.question-card` texts.
    pub cards: Vec<CardText>,
    pub has_hero: bool,
    pub floating_cards: usize,
    /// Initial text of every `.stat-number`.
    pub counters: Vec<String>,
    pub reveal_elements: usize,
    pub lazy_images: usize,
    /// All required execution panel elements are present.
    pub has_execution_panel: bool,
    pub has_clear_button: bool,
    pub has_search: bool,
    pub has_theme_toggle: bool,
    /// Value stored under the theme key, read before bootstrap.
    pub saved_theme: Option<String>,
    /// Required-field count of every `form[data-validate]`.
    pub forms: Vec<usize>,
}

impl PageLayout {
    /// Reject layouts whose cross references point nowhere.
    pub fn validate(&self) -> Result<(), SiteError> {
        if let Some(idx) = self.initial_tab_trigger.filter(|&idx| idx >= self.tab_triggers.len()) {
            return Err(SiteError::InvalidLayout(format!(
                "initial tab trigger {idx} out of range ({} triggers)",
                self.tab_triggers.len()
            )));
        }
        if let Some(idx) = self.initial_tab_panel.filter(|&idx| idx >= self.tab_panels.len()) {
            return Err(SiteError::InvalidLayout(format!(
                "initial tab panel {idx} out of range ({} panels)",
                self.tab_panels.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_valid() {
        assert!(PageLayout::default().validate().is_ok());
    }

    #[test]
    fn dangling_initial_tab_is_rejected() {
        let layout = PageLayout {
            tab_triggers: vec!["a".into()],
            initial_tab_trigger: Some(3),
            ..PageLayout::default()
        };
        let err = layout.validate().unwrap_err();
        assert!(err.to_string().contains("initial tab trigger 3"));
    }

    #[test]
    fn layout_round_trips_through_json_with_defaults() {
        let layout: PageLayout =
            serde_json::from_str(r##"{ "nav_links": ["#home"], "has_hero": true }"##).unwrap();
        assert_eq!(layout.nav_links, vec!["#home".to_string()]);
        assert!(layout.has_hero);
        assert!(layout.content_buttons.is_empty());
    }

    #[test]
    fn content_button_builders() {
        let button = ContentButton::download("math", "Download").with_token("t");
        assert_eq!(button.action, ContentAction::Download);
        assert_eq!(button.remote_token.as_deref(), Some("t"));
    }
}
