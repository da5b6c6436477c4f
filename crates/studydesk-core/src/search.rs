#![forbid(unsafe_code)]

//! Card search filter.

use serde::{Deserialize, Serialize};

/// Searchable text of a content card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardText {
    pub title: String,
    pub description: String,
}

impl CardText {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Case-insensitive substring match on title or description.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_title_or_description_ignoring_case() {
        let card = CardText::new("UNIT 1 Notes", "Algebra and Geometry");
        assert!(card.matches("unit"));
        assert!(card.matches("GEOMETRY"));
        assert!(!card.matches("thermo"));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(CardText::default().matches(""));
    }
}
