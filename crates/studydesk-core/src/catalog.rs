#![forbid(unsafe_code)]

//! Content catalog: study materials keyed by identifier.
//!
//! Each entry carries everything the preview and download flows need:
//! - a display name,
//! - an optional remote-location token (a shared-drive file id),
//! - an optional direct file URL used when no token is known,
//! - an optional canned preview fragment.
//!
//! Resolution precedence for both flows is: token declared on the card in
//! markup, then the entry's token, then the entry's static fallback.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::markup::escape_html;

/// Fragment shown when an identifier has neither a token nor a canned preview.
pub const PREVIEW_UNAVAILABLE: &str = "<p>Preview not available for this content.</p>";

/// Download target used when nothing better is known.
pub const DOWNLOAD_FALLBACK_HREF: &str = "#";

/// One study material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Partial entry supplied by page configuration. Present fields replace the
/// built-in ones; an unknown `id` adds a new entry named after its `id`
/// unless a `name` is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOverride {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub remote_token: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub preview: Option<String>,
}

/// What the preview modal should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBody {
    /// Embedded viewer pointed at a remote file.
    Viewer { url: String },
    /// Static document fragment.
    Fragment(String),
}

impl PreviewBody {
    /// Render into the modal content container.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Viewer { url } => format!(
                "<div class=\"drive-preview-wrapper\"><iframe src=\"{}\" allow=\"autoplay\" class=\"drive-preview-iframe\"></iframe></div>",
                escape_html(url)
            ),
            Self::Fragment(html) => html.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Display name (not yet prefixed for the modal title).
    pub title: String,
    pub body: PreviewBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub title: String,
    pub href: String,
}

/// Immutable lookup of study materials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

#[must_use]
pub fn viewer_url(token: &str) -> String {
    format!("https://drive.google.com/file/d/{token}/preview")
}

#[must_use]
pub fn direct_download_url(token: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={token}")
}

impl ContentCatalog {
    /// Empty catalog; every lookup falls back.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.id.clone(), entry))
                .collect(),
        }
    }

    /// The materials shipped with the site.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(builtin_entries())
    }

    /// Apply configuration overrides on top of the current entries.
    pub fn apply_overrides(&mut self, overrides: &[EntryOverride]) {
        for patch in overrides {
            let entry = self
                .entries
                .entry(patch.id.clone())
                .or_insert_with(|| CatalogEntry {
                    id: patch.id.clone(),
                    name: patch.id.clone(),
                    remote_token: None,
                    file_url: None,
                    preview: None,
                });
            if let Some(name) = &patch.name {
                entry.name = name.clone();
            }
            if let Some(token) = &patch.remote_token {
                entry.remote_token = Some(token.clone());
            }
            if let Some(url) = &patch.file_url {
                entry.file_url = Some(url.clone());
            }
            if let Some(preview) = &patch.preview {
                entry.preview = Some(preview.clone());
            }
            tracing::debug!(id = %patch.id, "applied catalog override");
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable name, or the raw identifier when unmapped.
    #[must_use]
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |entry| entry.name.as_str())
    }

    #[must_use]
    pub fn resolve_preview(&self, id: &str) -> Preview {
        self.resolve_preview_with(id, None)
    }

    /// Resolve a preview, preferring `card_token` over the catalog's token.
    #[must_use]
    pub fn resolve_preview_with(&self, id: &str, card_token: Option<&str>) -> Preview {
        let entry = self.get(id);
        let body = match self.token_for(entry, card_token) {
            Some(token) => PreviewBody::Viewer {
                url: viewer_url(token),
            },
            None => PreviewBody::Fragment(
                entry
                    .and_then(|entry| entry.preview.clone())
                    .unwrap_or_else(|| PREVIEW_UNAVAILABLE.to_string()),
            ),
        };
        Preview {
            title: self.display_name(id).to_string(),
            body,
        }
    }

    #[must_use]
    pub fn resolve_download(&self, id: &str) -> Download {
        self.resolve_download_with(id, None)
    }

    /// Resolve a download link, preferring `card_token` over the catalog's token.
    #[must_use]
    pub fn resolve_download_with(&self, id: &str, card_token: Option<&str>) -> Download {
        let entry = self.get(id);
        let href = match self.token_for(entry, card_token) {
            Some(token) => direct_download_url(token),
            None => entry
                .and_then(|entry| entry.file_url.clone())
                .unwrap_or_else(|| DOWNLOAD_FALLBACK_HREF.to_string()),
        };
        Download {
            title: self.display_name(id).to_string(),
            href,
        }
    }

    fn token_for<'a>(
        &'a self,
        entry: Option<&'a CatalogEntry>,
        card_token: Option<&'a str>,
    ) -> Option<&'a str> {
        card_token
            .filter(|token| !token.trim().is_empty())
            .or_else(|| entry.and_then(|entry| entry.remote_token.as_deref()))
    }
}

fn entry(id: &str, name: &str, file_url: Option<&str>, preview: Option<&str>) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        name: name.to_string(),
        remote_token: None,
        file_url: file_url.map(str::to_string),
        preview: preview.map(str::to_string),
    }
}

fn builtin_entries() -> Vec<CatalogEntry> {
    vec![
        entry(
            "math",
            "UNIT -1 Notes",
            Some("https://example.com/files/math-notes.pdf"),
            Some(MATH_NOTES),
        ),
        entry(
            "physics",
            "UNIT -2  Notes",
            Some("https://example.com/files/physics-notes.pdf"),
            Some(PHYSICS_NOTES),
        ),
        entry(
            "chemistry",
            "UNIT -3 Notes",
            Some("https://example.com/files/chemistry-notes.pdf"),
            Some(CHEMISTRY_NOTES),
        ),
        entry(
            "biology",
            "UNIT -4 Notes",
            Some("https://example.com/files/biology-notes.pdf"),
            Some(BIOLOGY_NOTES),
        ),
        entry("unit-5", "UNIT -5 Notes", None, None),
        entry(
            "math-questions",
            "UNIT -1 QB",
            Some("https://example.com/files/math-questions.pdf"),
            Some(MATH_QUESTIONS),
        ),
        entry(
            "physics-questions",
            "UNIT -2 QB",
            Some("https://example.com/files/physics-questions.pdf"),
            Some(PHYSICS_QUESTIONS),
        ),
        entry(
            "chemistry-questions",
            "UNIT -3 QB",
            Some("https://example.com/files/chemistry-questions.pdf"),
            Some(CHEMISTRY_QUESTIONS),
        ),
        entry("UNIT-4", "UNIT -4 QB", None, None),
        entry("UNIT-5", "UNIT -5 QB", None, None),
        entry("lab", "labmanual", None, None),
    ]
}

const MATH_NOTES: &str = r#"<div class="preview-content">
    <h3>Mathematics Study Notes</h3>
    <div class="preview-section">
        <h4>Chapter 1: Algebra</h4>
        <ul>
            <li>Linear Equations</li>
            <li>Quadratic Equations</li>
            <li>Polynomials</li>
            <li>Factorization</li>
        </ul>
    </div>
    <div class="preview-section">
        <h4>Chapter 2: Geometry</h4>
        <ul>
            <li>Triangles and their properties</li>
            <li>Circles and tangents</li>
            <li>Coordinate geometry</li>
            <li>Trigonometry basics</li>
        </ul>
    </div>
    <p><strong>Total Pages:</strong> 45 pages</p>
    <p><strong>File Size:</strong> 2.3 MB</p>
</div>"#;

const PHYSICS_NOTES: &str = r#"<div class="preview-content">
    <h3>Physics Study Notes</h3>
    <div class="preview-section">
        <h4>Chapter 1: Mechanics</h4>
        <ul>
            <li>Motion in one dimension</li>
            <li>Laws of motion</li>
            <li>Work, energy and power</li>
            <li>Gravitation</li>
        </ul>
    </div>
    <div class="preview-section">
        <h4>Chapter 2: Thermodynamics</h4>
        <ul>
            <li>Heat and temperature</li>
            <li>Laws of thermodynamics</li>
            <li>Heat engines</li>
            <li>Entropy</li>
        </ul>
    </div>
    <p><strong>Total Pages:</strong> 52 pages</p>
    <p><strong>File Size:</strong> 3.1 MB</p>
</div>"#;

const CHEMISTRY_NOTES: &str = r#"<div class="preview-content">
    <h3>Chemistry Study Notes</h3>
    <div class="preview-section">
        <h4>Chapter 1: Atomic Structure</h4>
        <ul>
            <li>Bohr's model</li>
            <li>Quantum mechanical model</li>
            <li>Electronic configuration</li>
            <li>Periodic properties</li>
        </ul>
    </div>
    <div class="preview-section">
        <h4>Chapter 2: Chemical Bonding</h4>
        <ul>
            <li>Ionic bonding</li>
            <li>Covalent bonding</li>
            <li>Metallic bonding</li>
            <li>Intermolecular forces</li>
        </ul>
    </div>
    <p><strong>Total Pages:</strong> 38 pages</p>
    <p><strong>File Size:</strong> 2.8 MB</p>
</div>"#;

const BIOLOGY_NOTES: &str = r#"<div class="preview-content">
    <h3>Biology Study Notes</h3>
    <div class="preview-section">
        <h4>Chapter 1: Cell Biology</h4>
        <ul>
            <li>Cell structure and function</li>
            <li>Cell division</li>
            <li>Cell organelles</li>
            <li>Cell membrane transport</li>
        </ul>
    </div>
    <div class="preview-section">
        <h4>Chapter 2: Genetics</h4>
        <ul>
            <li>Mendelian genetics</li>
            <li>DNA structure and replication</li>
            <li>Protein synthesis</li>
            <li>Genetic disorders</li>
        </ul>
    </div>
    <p><strong>Total Pages:</strong> 41 pages</p>
    <p><strong>File Size:</strong> 2.9 MB</p>
</div>"#;

const MATH_QUESTIONS: &str = r#"<div class="preview-content">
    <h3>Mathematics Question Bank</h3>
    <div class="preview-section">
        <h4>Sample Questions:</h4>
        <div class="question-sample">
            <p><strong>Q1:</strong> Solve the quadratic equation x² - 5x + 6 = 0</p>
            <p><strong>Q2:</strong> Find the area of a triangle with sides 3, 4, and 5 units</p>
            <p><strong>Q3:</strong> Calculate the derivative of f(x) = x³ + 2x² - 5x + 1</p>
        </div>
    </div>
    <p><strong>Total Questions:</strong> 500+</p>
    <p><strong>Difficulty Levels:</strong> Easy, Medium, Hard</p>
    <p><strong>File Size:</strong> 4.2 MB</p>
</div>"#;

const PHYSICS_QUESTIONS: &str = r#"<div class="preview-content">
    <h3>Physics Question Bank</h3>
    <div class="preview-section">
        <h4>Sample Questions:</h4>
        <div class="question-sample">
            <p><strong>Q1:</strong> A car accelerates from rest at 2 m/s² for 10 seconds. What is its final velocity?</p>
            <p><strong>Q2:</strong> Calculate the gravitational force between two masses of 5kg and 10kg separated by 2m</p>
            <p><strong>Q3:</strong> A wave has a frequency of 50Hz and wavelength of 2m. Find its speed</p>
        </div>
    </div>
    <p><strong>Total Questions:</strong> 400+</p>
    <p><strong>Topics Covered:</strong> Mechanics, Thermodynamics, Waves, Electricity</p>
    <p><strong>File Size:</strong> 3.8 MB</p>
</div>"#;

const CHEMISTRY_QUESTIONS: &str = r#"<div class="preview-content">
    <h3>Chemistry Question Bank</h3>
    <div class="preview-section">
        <h4>Sample Questions:</h4>
        <div class="question-sample">
            <p><strong>Q1:</strong> Balance the chemical equation: H₂ + O₂ → H₂O</p>
            <p><strong>Q2:</strong> Calculate the molar mass of CaCO₃</p>
            <p><strong>Q3:</strong> What is the pH of a 0.1M HCl solution?</p>
        </div>
    </div>
    <p><strong>Total Questions:</strong> 350+</p>
    <p><strong>Topics Covered:</strong> Organic, Inorganic, Physical Chemistry</p>
    <p><strong>File Size:</strong> 3.2 MB</p>
</div>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn math_preview_without_token_is_canned_fragment() {
        let preview = ContentCatalog::builtin().resolve_preview("math");
        assert_eq!(preview.title, "UNIT -1 Notes");
        match preview.body {
            PreviewBody::Fragment(html) => {
                assert!(html.contains("Mathematics Study Notes"));
                assert!(html.contains("45 pages"));
            }
            other => panic!("expected fragment, got {other:?}"),
        }
    }

    #[test]
    fn unknown_preview_falls_back() {
        let preview = ContentCatalog::builtin().resolve_preview("unknown-id");
        assert_eq!(preview.title, "unknown-id");
        assert_eq!(
            preview.body.to_html(),
            "<p>Preview not available for this content.</p>"
        );
    }

    #[test]
    fn known_entry_without_fragment_uses_fallback_body() {
        let preview = ContentCatalog::builtin().resolve_preview("lab");
        assert_eq!(preview.title, "labmanual");
        assert_eq!(preview.body, PreviewBody::Fragment(PREVIEW_UNAVAILABLE.into()));
    }

    #[test]
    fn token_produces_viewer_reference() {
        let mut catalog = ContentCatalog::builtin();
        catalog.apply_overrides(&[EntryOverride {
            id: "math".into(),
            remote_token: Some("tok-1".into()),
            ..EntryOverride::default()
        }]);
        let preview = catalog.resolve_preview("math");
        assert_eq!(
            preview.body,
            PreviewBody::Viewer {
                url: "https://drive.google.com/file/d/tok-1/preview".into()
            }
        );
        assert!(preview.body.to_html().contains("drive-preview-iframe"));
    }

    #[test]
    fn card_token_wins_over_catalog_token() {
        let mut catalog = ContentCatalog::builtin();
        catalog.apply_overrides(&[EntryOverride {
            id: "physics".into(),
            remote_token: Some("from-config".into()),
            ..EntryOverride::default()
        }]);
        let download = catalog.resolve_download_with("physics", Some("from-card"));
        assert_eq!(
            download.href,
            "https://drive.google.com/uc?export=download&id=from-card"
        );
    }

    #[test]
    fn blank_card_token_is_ignored() {
        let download = ContentCatalog::builtin().resolve_download_with("math", Some("  "));
        assert_eq!(download.href, "https://example.com/files/math-notes.pdf");
    }

    #[test]
    fn download_title_lookup() {
        let catalog = ContentCatalog::builtin();
        assert_eq!(catalog.resolve_download("UNIT-4").title, "UNIT -4 QB");
        assert_eq!(catalog.resolve_download("nonexistent").title, "nonexistent");
    }

    #[test]
    fn download_without_token_or_file_is_placeholder() {
        let catalog = ContentCatalog::builtin();
        assert_eq!(catalog.resolve_download("UNIT-5").href, "#");
        assert_eq!(catalog.resolve_download("nonexistent").href, "#");
    }

    #[test]
    fn override_adds_unknown_entry() {
        let mut catalog = ContentCatalog::builtin();
        let before = catalog.len();
        catalog.apply_overrides(&[EntryOverride {
            id: "unit-6".into(),
            remote_token: Some("xyz".into()),
            ..EntryOverride::default()
        }]);
        assert_eq!(catalog.len(), before + 1);
        assert_eq!(catalog.display_name("unit-6"), "unit-6");
        assert_eq!(
            catalog.resolve_download("unit-6").href,
            "https://drive.google.com/uc?export=download&id=xyz"
        );
    }
}
